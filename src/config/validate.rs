use anyhow::{Result, bail};

use super::AppConfig;

const MIN_SECRET_LEN: usize = 16;

pub fn validate(cfg: &AppConfig) -> Result<()> {
    let mut errors: Vec<String> = Vec::new();

    if cfg.general.host.trim().is_empty() {
        errors.push("general.host must not be empty".to_string());
    }

    if cfg
        .general
        .cors_origins
        .iter()
        .any(|origin| origin.trim().is_empty())
    {
        errors.push("general.cors_origins must not contain empty entries".to_string());
    }

    if let Some(database) = cfg.database.as_ref() {
        if database.url.trim().is_empty() {
            errors.push("database.url must not be empty".to_string());
        }

        if database.min_idle > database.max_connections {
            errors.push(format!(
                "database.min_idle ({}) must be <= database.max_connections ({})",
                database.min_idle, database.max_connections
            ));
        }
    }

    let auth = &cfg.auth;
    if auth.secret.len() < MIN_SECRET_LEN {
        errors.push(format!(
            "auth.secret must be at least {MIN_SECRET_LEN} characters"
        ));
    }

    if auth.cookie_name.trim().is_empty()
        || auth
            .cookie_name
            .chars()
            .any(|c| c.is_whitespace() || c == ';' || c == '=')
    {
        errors.push("auth.cookie_name must be a valid cookie name".to_string());
    }

    if auth.session_ttl_days <= 0 {
        errors.push("auth.session_ttl_days must be > 0".to_string());
    }

    if auth.session_update_age_hours < 0 {
        errors.push("auth.session_update_age_hours must be >= 0".to_string());
    }

    if auth.verification_ttl_minutes <= 0 {
        errors.push("auth.verification_ttl_minutes must be > 0".to_string());
    }

    if let Some(google) = auth.google.as_ref() {
        if google.client_id.trim().is_empty() || google.client_secret.trim().is_empty() {
            errors.push("auth.google requires client_id and client_secret".to_string());
        }
    }

    let defaults = &cfg.settings_defaults;
    if defaults.hourly_rate < 0.0 {
        errors.push("settings_defaults.hourly_rate must be >= 0".to_string());
    }

    if !(0.0..=1.0).contains(&defaults.tax_rate) {
        errors.push("settings_defaults.tax_rate must be between 0 and 1".to_string());
    }

    if defaults.monthly_goal_hours < 0.0 {
        errors.push("settings_defaults.monthly_goal_hours must be >= 0".to_string());
    }

    if errors.is_empty() {
        return Ok(());
    }

    bail!("invalid app config:\n- {}", errors.join("\n- "))
}

#[cfg(test)]
mod tests {
    use super::validate;
    use crate::config::{AppConfig, DatabaseConfig, GoogleConfig};

    fn valid_config() -> AppConfig {
        let mut cfg = AppConfig::default();
        cfg.auth.secret = "0123456789abcdef".to_string();
        cfg
    }

    #[test]
    fn accepts_defaults_with_secret() {
        validate(&valid_config()).expect("defaults should validate");
    }

    #[test]
    fn rejects_short_secret() {
        let mut cfg = valid_config();
        cfg.auth.secret = "short".to_string();

        let err = validate(&cfg).expect_err("short secret should fail");
        assert!(err.to_string().contains("auth.secret"));
    }

    #[test]
    fn collects_every_problem() {
        let mut cfg = valid_config();
        cfg.database = Some(DatabaseConfig {
            url: " ".to_string(),
            max_connections: 1,
            min_idle: 4,
        });
        cfg.settings_defaults.tax_rate = 1.5;
        cfg.auth.google = Some(GoogleConfig {
            client_id: String::new(),
            client_secret: "secret".to_string(),
        });

        let message = validate(&cfg).expect_err("config should fail").to_string();
        assert!(message.contains("database.url"));
        assert!(message.contains("database.min_idle"));
        assert!(message.contains("settings_defaults.tax_rate"));
        assert!(message.contains("auth.google"));
    }

    #[test]
    fn rejects_cookie_names_with_separators() {
        let mut cfg = valid_config();
        cfg.auth.cookie_name = "session token".to_string();

        let err = validate(&cfg).expect_err("cookie name should fail");
        assert!(err.to_string().contains("auth.cookie_name"));
    }
}
