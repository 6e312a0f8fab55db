use std::sync::Arc;

use axum::{Router, middleware};
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime, TimeZone};
use sea_orm::DatabaseConnection;

use crate::{
    auth::{providers::SocialProviders, verification::VerificationKeys},
    config::AppConfig,
    middleware::json_error_middleware,
    routes::router,
    state::AppState,
};

pub const TEST_SECRET: &str = "shiftbook-test-secret-0123456789";

pub fn test_config() -> AppConfig {
    let mut cfg = AppConfig::default();
    cfg.auth.secret = TEST_SECRET.to_string();
    cfg
}

pub fn test_state(db: DatabaseConnection) -> Arc<AppState> {
    let cfg = test_config();
    let keys = VerificationKeys::from_secret(cfg.auth.secret.as_bytes());
    AppState::new(cfg, db, SocialProviders::new(), keys)
}

/// The full router with the same error envelope middleware as the server.
pub fn test_router(db: DatabaseConnection) -> Router {
    router(test_state(db)).layer(middleware::from_fn(json_error_middleware))
}

/// Fixed timestamp used for `created_at`/`updated_at` in fixtures.
pub fn ts() -> DateTime<FixedOffset> {
    FixedOffset::east_opt(0)
        .expect("offset should be valid")
        .with_ymd_and_hms(2026, 1, 1, 0, 0, 0)
        .single()
        .expect("timestamp should be valid")
}

pub fn date(raw: &str) -> NaiveDate {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").expect("fixture date should parse")
}

pub fn clock(raw: &str) -> NaiveTime {
    NaiveTime::parse_from_str(raw, "%H:%M").expect("fixture time should parse")
}

/// Row builders for `MockDatabase` query results.
pub mod fixtures {
    use chrono::{DateTime, FixedOffset};
    use uuid::Uuid;

    use super::{clock, date, ts};
    use crate::{
        config::SettingsDefaults,
        db::entities::{account, project, schedule, session, user, user_settings, verification},
        ledger::shift_hours,
    };

    pub fn user(id: Uuid, email: &str) -> user::Model {
        user::Model {
            id,
            created_at: ts(),
            updated_at: ts(),
            name: "Alice".to_string(),
            email: email.to_string(),
            email_verified: false,
            image: None,
        }
    }

    pub fn session(
        user_id: Uuid,
        token: &str,
        expires_at: DateTime<FixedOffset>,
    ) -> session::Model {
        session::Model {
            id: Uuid::new_v4(),
            created_at: ts(),
            updated_at: ts(),
            token: token.to_string(),
            user_id,
            expires_at,
            ip_address: None,
            user_agent: None,
            persistent: true,
        }
    }

    pub fn credential_account(user_id: Uuid, password_hash: &str) -> account::Model {
        account::Model {
            id: Uuid::new_v4(),
            created_at: ts(),
            updated_at: ts(),
            account_id: user_id.to_string(),
            provider_id: account::CREDENTIAL_PROVIDER.to_string(),
            user_id,
            access_token: None,
            refresh_token: None,
            id_token: None,
            access_token_expires_at: None,
            refresh_token_expires_at: None,
            scope: None,
            password: Some(password_hash.to_string()),
        }
    }

    pub fn verification(identifier: &str, value: &str) -> verification::Model {
        verification::Model {
            id: Uuid::new_v4(),
            created_at: ts(),
            updated_at: ts(),
            identifier: identifier.to_string(),
            value: value.to_string(),
            expires_at: chrono::Utc::now().fixed_offset() + chrono::Duration::minutes(10),
        }
    }

    pub fn project(user_id: Uuid, name: &str, hourly_rate: Option<f64>) -> project::Model {
        project::Model {
            id: Uuid::new_v4(),
            created_at: ts(),
            updated_at: ts(),
            user_id,
            name: name.to_string(),
            company_name: None,
            description: None,
            hourly_rate,
        }
    }

    /// `day` is `YYYY-MM-DD`, times are `HH:MM`.
    pub fn schedule(
        user_id: Uuid,
        day: &str,
        start: &str,
        end: &str,
        project_id: Option<Uuid>,
    ) -> schedule::Model {
        let (start_time, end_time) = (clock(start), clock(end));
        schedule::Model {
            id: Uuid::new_v4(),
            created_at: ts(),
            updated_at: ts(),
            user_id,
            project_id,
            date: date(day),
            start_time,
            end_time,
            total_hours: shift_hours(start_time, end_time),
            notes: None,
        }
    }

    pub fn settings(user_id: Uuid) -> user_settings::Model {
        let defaults = SettingsDefaults::default();
        user_settings::Model {
            id: Uuid::new_v4(),
            created_at: ts(),
            updated_at: ts(),
            user_id,
            hourly_rate: defaults.hourly_rate,
            tax_rate: defaults.tax_rate,
            monthly_goal_hours: defaults.monthly_goal_hours,
            date_format: defaults.date_format,
            time_format: defaults.time_format,
            timezone: defaults.timezone,
            notifications_enabled: true,
            email_notifications: false,
        }
    }
}
