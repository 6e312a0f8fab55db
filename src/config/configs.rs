use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::{defaults, envconfig::EnvConfig, validate};

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub general: GeneralConfig,
    pub logging: LoggingConfig,
    pub database: Option<DatabaseConfig>,
    pub auth: AuthConfig,
    pub settings_defaults: SettingsDefaults,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        <Self as EnvConfig>::from_env()
    }
}

impl EnvConfig for AppConfig {
    const LIST_KEYS: &'static [&'static str] = &["general.cors_origins"];

    fn finalize(mut self) -> Self {
        if self.auth.secret.trim().is_empty() && cfg!(debug_assertions) {
            tracing::warn!("auth.secret is not set; using the development secret");
            self.auth.secret = defaults::DEV_AUTH_SECRET.to_string();
        }
        self
    }

    fn validate(&self) -> Result<()> {
        validate::validate(self)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneralConfig {
    pub host: String,
    pub port: u16,
    pub cors_origins: Vec<String>,
    /// Directory holding a pre-built SPA bundle, served for non-API paths.
    pub static_dir: Option<String>,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            host: defaults::DEFAULT_HOST.to_string(),
            port: defaults::DEFAULT_PORT as u16,
            cors_origins: defaults::DEFAULT_CORS_ORIGINS
                .iter()
                .map(|origin| origin.to_string())
                .collect(),
            static_dir: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    pub rust_log: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            rust_log: defaults::DEFAULT_RUST_LOG.to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_db_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_db_min_idle")]
    pub min_idle: u32,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct AuthConfig {
    /// Signs verification tokens.
    pub secret: String,
    /// Public URL of this service; OAuth callbacks are built from it.
    pub base_url: String,
    pub frontend_url: String,
    pub cookie_name: String,
    pub cookie_secure: bool,
    pub session_ttl_days: i64,
    pub session_update_age_hours: i64,
    pub verification_ttl_minutes: i64,
    pub google: Option<GoogleConfig>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            secret: String::new(),
            base_url: defaults::DEFAULT_BASE_URL.to_string(),
            frontend_url: defaults::DEFAULT_FRONTEND_URL.to_string(),
            cookie_name: defaults::DEFAULT_COOKIE_NAME.to_string(),
            cookie_secure: false,
            session_ttl_days: defaults::DEFAULT_SESSION_TTL_DAYS,
            session_update_age_hours: defaults::DEFAULT_SESSION_UPDATE_AGE_HOURS,
            verification_ttl_minutes: defaults::DEFAULT_VERIFICATION_TTL_MINUTES,
            google: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GoogleConfig {
    pub client_id: String,
    pub client_secret: String,
}

/// Values used when a user's settings row is created.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct SettingsDefaults {
    pub hourly_rate: f64,
    pub tax_rate: f64,
    pub monthly_goal_hours: f64,
    pub date_format: String,
    pub time_format: String,
    pub timezone: String,
}

impl Default for SettingsDefaults {
    fn default() -> Self {
        Self {
            hourly_rate: defaults::DEFAULT_HOURLY_RATE,
            tax_rate: defaults::DEFAULT_TAX_RATE,
            monthly_goal_hours: defaults::DEFAULT_MONTHLY_GOAL_HOURS,
            date_format: defaults::DEFAULT_DATE_FORMAT.to_string(),
            time_format: defaults::DEFAULT_TIME_FORMAT.to_string(),
            timezone: defaults::DEFAULT_TIMEZONE.to_string(),
        }
    }
}

fn default_db_max_connections() -> u32 {
    defaults::DEFAULT_DB_MAX_CONNECTIONS as u32
}

fn default_db_min_idle() -> u32 {
    defaults::DEFAULT_DB_MIN_IDLE as u32
}
