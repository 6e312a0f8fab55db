use sea_orm::Set;
use uuid::Uuid;

use crate::{
    config::SettingsDefaults,
    db::dao::{DaoBase, SettingsDao},
    db::entities::user_settings,
    error::AppError,
    services::crud_service::{CrudErrors, CrudOp, CrudService},
};

pub const TIME_FORMATS: &[&str] = &["12h", "24h"];

/// Partial settings update; `None` leaves the stored value alone.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SettingsPatch {
    pub hourly_rate: Option<f64>,
    pub tax_rate: Option<f64>,
    pub monthly_goal_hours: Option<f64>,
    pub date_format: Option<String>,
    pub time_format: Option<String>,
    pub timezone: Option<String>,
    pub notifications_enabled: Option<bool>,
    pub email_notifications: Option<bool>,
}

impl SettingsPatch {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if self
            .hourly_rate
            .is_some_and(|rate| !(rate.is_finite() && rate >= 0.0))
        {
            return Err(AppError::bad_request("Hourly rate must be zero or more"));
        }
        if self
            .tax_rate
            .is_some_and(|tax| !(0.0..=1.0).contains(&tax))
        {
            return Err(AppError::bad_request("Tax rate must be between 0 and 1"));
        }
        if self
            .monthly_goal_hours
            .is_some_and(|goal| !(goal.is_finite() && goal >= 0.0))
        {
            return Err(AppError::bad_request(
                "Monthly goal hours must be zero or more",
            ));
        }
        if self
            .time_format
            .as_deref()
            .is_some_and(|format| !TIME_FORMATS.contains(&format))
        {
            return Err(AppError::bad_request("Time format must be 12h or 24h"));
        }
        if self
            .date_format
            .as_deref()
            .is_some_and(|value| value.trim().is_empty())
        {
            return Err(AppError::bad_request("Date format must not be empty"));
        }
        if self
            .timezone
            .as_deref()
            .is_some_and(|value| value.trim().is_empty())
        {
            return Err(AppError::bad_request("Timezone must not be empty"));
        }
        Ok(())
    }

    fn apply(self, active: &mut user_settings::ActiveModel) {
        if let Some(rate) = self.hourly_rate {
            active.hourly_rate = Set(rate);
        }
        if let Some(tax) = self.tax_rate {
            active.tax_rate = Set(tax);
        }
        if let Some(goal) = self.monthly_goal_hours {
            active.monthly_goal_hours = Set(goal);
        }
        if let Some(format) = self.date_format {
            active.date_format = Set(format.trim().to_string());
        }
        if let Some(format) = self.time_format {
            active.time_format = Set(format);
        }
        if let Some(timezone) = self.timezone {
            active.timezone = Set(timezone.trim().to_string());
        }
        if let Some(enabled) = self.notifications_enabled {
            active.notifications_enabled = Set(enabled);
        }
        if let Some(enabled) = self.email_notifications {
            active.email_notifications = Set(enabled);
        }
    }
}

#[derive(Clone)]
pub struct SettingsService<'a> {
    settings_dao: SettingsDao,
    defaults: &'a SettingsDefaults,
}

impl<'a> SettingsService<'a> {
    pub fn new(settings_dao: SettingsDao, defaults: &'a SettingsDefaults) -> Self {
        Self {
            settings_dao,
            defaults,
        }
    }

    /// Every user has exactly one settings row; it is created lazily.
    pub async fn get_or_create(&self, user_id: Uuid) -> Result<user_settings::Model, AppError> {
        if let Some(existing) = self.settings_dao.find_for_user(user_id).await? {
            return Ok(existing);
        }

        match self.settings_dao.create_default(user_id, self.defaults).await {
            Ok(created) => {
                tracing::debug!(user_id = %user_id, "created default settings");
                Ok(created)
            }
            // A concurrent request may have inserted the row first.
            Err(err) => match self.settings_dao.find_for_user(user_id).await? {
                Some(existing) => Ok(existing),
                None => Err(self.map_error(CrudOp::Create, err)),
            },
        }
    }

    pub async fn update(
        &self,
        user_id: Uuid,
        patch: SettingsPatch,
    ) -> Result<user_settings::Model, AppError> {
        patch.validate()?;
        let current = self.get_or_create(user_id).await?;
        if patch.is_empty() {
            return Ok(current);
        }

        self.settings_dao
            .save_changes(current, move |active| patch.apply(active))
            .await
            .map_err(|err| self.map_error(CrudOp::Update, err))
    }
}

impl CrudService for SettingsService<'_> {
    type Dao = SettingsDao;

    fn dao(&self) -> &Self::Dao {
        &self.settings_dao
    }

    fn errors(&self) -> CrudErrors {
        CrudErrors {
            create_failed: "Create settings failed",
            not_found: "Settings not found",
            update_failed: "Update settings failed",
            ..CrudErrors::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use sea_orm::{DatabaseBackend, MockDatabase};
    use uuid::Uuid;

    use super::{SettingsPatch, SettingsService};
    use crate::{
        config::SettingsDefaults,
        db::dao::{DaoBase, SettingsDao},
        db::entities::user_settings,
        error::AppError,
        test_helpers::fixtures,
    };

    #[test]
    fn validation_rejects_out_of_range_values() {
        let cases = [
            SettingsPatch {
                tax_rate: Some(1.5),
                ..Default::default()
            },
            SettingsPatch {
                hourly_rate: Some(-1.0),
                ..Default::default()
            },
            SettingsPatch {
                time_format: Some("25h".to_string()),
                ..Default::default()
            },
            SettingsPatch {
                timezone: Some("  ".to_string()),
                ..Default::default()
            },
        ];

        for patch in cases {
            assert!(
                matches!(patch.validate(), Err(AppError::BadRequest(_))),
                "{patch:?} should be rejected"
            );
        }
        assert!(SettingsPatch::default().validate().is_ok());
    }

    #[tokio::test]
    async fn get_or_create_inserts_defaults_on_first_access() {
        let user_id = Uuid::new_v4();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<user_settings::Model>::new()])
            .append_query_results([[fixtures::settings(user_id)]])
            .into_connection();
        let defaults = SettingsDefaults::default();
        let service = SettingsService::new(SettingsDao::new(&db), &defaults);

        let settings = service
            .get_or_create(user_id)
            .await
            .expect("settings should be created");
        assert_eq!(settings.user_id, user_id);
        assert_eq!(settings.tax_rate, 0.30);
    }

    #[tokio::test]
    async fn update_applies_only_given_fields() {
        let user_id = Uuid::new_v4();
        let mut updated = fixtures::settings(user_id);
        updated.tax_rate = 0.25;
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[fixtures::settings(user_id)], [updated]])
            .into_connection();
        let defaults = SettingsDefaults::default();
        let service = SettingsService::new(SettingsDao::new(&db), &defaults);

        let settings = service
            .update(
                user_id,
                SettingsPatch {
                    tax_rate: Some(0.25),
                    ..Default::default()
                },
            )
            .await
            .expect("update should succeed");
        assert_eq!(settings.tax_rate, 0.25);
        assert_eq!(settings.hourly_rate, 147.0);
    }
}
