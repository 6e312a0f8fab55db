use chrono::{DateTime, FixedOffset};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};

use super::{ColumnFilter, CompareOp, DaoBase, DaoLayerError, DaoResult};
use crate::db::entities::{prelude::Verification, verification};

#[derive(Clone)]
pub struct VerificationDao {
    db: DatabaseConnection,
}

impl DaoBase for VerificationDao {
    type Entity = Verification;
    const ENTITY_NAME: &'static str = "Verification";

    fn new(db: &DatabaseConnection) -> Self {
        Self { db: db.clone() }
    }

    fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

impl VerificationDao {
    pub async fn create_verification(
        &self,
        identifier: &str,
        value: &str,
        expires_at: DateTime<FixedOffset>,
    ) -> DaoResult<verification::Model> {
        let model = verification::ActiveModel {
            identifier: Set(identifier.to_string()),
            value: Set(value.to_string()),
            expires_at: Set(expires_at),
            ..Default::default()
        };
        self.create(model).await
    }

    /// Unexpired row for `identifier`, optionally pinned to a value.
    pub async fn find_active(
        &self,
        identifier: &str,
        value: Option<&str>,
        now: DateTime<FixedOffset>,
    ) -> DaoResult<Option<verification::Model>> {
        let mut filters = vec![
            ColumnFilter::eq(verification::Column::Identifier, identifier.to_string()),
            ColumnFilter::compare(verification::Column::ExpiresAt, CompareOp::Gt, now),
        ];
        if let Some(value) = value {
            filters.push(ColumnFilter::eq(verification::Column::Value, value.to_string()));
        }

        self.find_with_filters(1, 1, Vec::new(), &filters, |query| query)
            .await
            .map(|response| response.data.into_iter().next())
    }

    pub async fn purge_expired(&self, now: DateTime<FixedOffset>) -> DaoResult<u64> {
        let result = Verification::delete_many()
            .filter(verification::Column::ExpiresAt.lte(now))
            .exec(&self.db)
            .await
            .map_err(DaoLayerError::Db)?;
        Ok(result.rows_affected)
    }
}
