use sea_orm::{DatabaseConnection, Set};
use uuid::Uuid;

use super::{ColumnFilter, DaoBase, DaoResult};
use crate::{
    config::SettingsDefaults,
    db::entities::{prelude::UserSettings, user_settings},
};

#[derive(Clone)]
pub struct SettingsDao {
    db: DatabaseConnection,
}

impl DaoBase for SettingsDao {
    type Entity = UserSettings;
    const ENTITY_NAME: &'static str = "Settings";

    fn new(db: &DatabaseConnection) -> Self {
        Self { db: db.clone() }
    }

    fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

impl SettingsDao {
    pub async fn find_for_user(&self, user_id: Uuid) -> DaoResult<Option<user_settings::Model>> {
        self.find_with_filters(
            1,
            1,
            Vec::new(),
            &[ColumnFilter::eq(user_settings::Column::UserId, user_id)],
            |query| query,
        )
        .await
        .map(|response| response.data.into_iter().next())
    }

    pub async fn create_default(
        &self,
        user_id: Uuid,
        defaults: &SettingsDefaults,
    ) -> DaoResult<user_settings::Model> {
        let model = user_settings::ActiveModel {
            user_id: Set(user_id),
            hourly_rate: Set(defaults.hourly_rate),
            tax_rate: Set(defaults.tax_rate),
            monthly_goal_hours: Set(defaults.monthly_goal_hours),
            date_format: Set(defaults.date_format.clone()),
            time_format: Set(defaults.time_format.clone()),
            timezone: Set(defaults.timezone.clone()),
            notifications_enabled: Set(true),
            email_notifications: Set(false),
            ..Default::default()
        };
        self.create(model).await
    }
}

#[cfg(test)]
mod tests {
    use chrono::{FixedOffset, TimeZone};
    use sea_orm::{DatabaseBackend, MockDatabase};
    use uuid::Uuid;

    use crate::{config::SettingsDefaults, db::entities::user_settings};

    use super::SettingsDao;
    use crate::db::dao::DaoBase;

    fn settings_model(user_id: Uuid) -> user_settings::Model {
        let now = FixedOffset::east_opt(0)
            .expect("offset should be valid")
            .with_ymd_and_hms(2026, 1, 1, 0, 0, 0)
            .single()
            .expect("timestamp should be valid");
        let defaults = SettingsDefaults::default();
        user_settings::Model {
            id: Uuid::new_v4(),
            created_at: now,
            updated_at: now,
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

    #[tokio::test]
    async fn find_for_user_returns_none_before_first_write() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<user_settings::Model>::new()])
            .into_connection();
        let dao = SettingsDao::new(&db);

        let found = dao
            .find_for_user(Uuid::new_v4())
            .await
            .expect("query should succeed");
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn create_default_returns_inserted_row() {
        let user_id = Uuid::new_v4();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[settings_model(user_id)]])
            .into_connection();
        let dao = SettingsDao::new(&db);

        let row = dao
            .create_default(user_id, &SettingsDefaults::default())
            .await
            .expect("insert should succeed");
        assert_eq!(row.user_id, user_id);
        assert_eq!(row.hourly_rate, 147.0);
        assert_eq!(row.time_format, "24h");
    }
}
