use chrono::{DateTime, FixedOffset};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, Order, QueryFilter, Set};
use uuid::Uuid;

use super::{ColumnFilter, CompareOp, DaoBase, DaoLayerError, DaoResult};
use crate::db::entities::{prelude::Session, session};

#[derive(Clone)]
pub struct SessionDao {
    db: DatabaseConnection,
}

impl DaoBase for SessionDao {
    type Entity = Session;
    const ENTITY_NAME: &'static str = "Session";

    fn new(db: &DatabaseConnection) -> Self {
        Self { db: db.clone() }
    }

    fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

pub struct NewSession {
    pub user_id: Uuid,
    pub token: String,
    pub expires_at: DateTime<FixedOffset>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub persistent: bool,
}

impl SessionDao {
    pub async fn create_session(&self, new: NewSession) -> DaoResult<session::Model> {
        let model = session::ActiveModel {
            token: Set(new.token),
            user_id: Set(new.user_id),
            expires_at: Set(new.expires_at),
            ip_address: Set(new.ip_address),
            user_agent: Set(new.user_agent),
            persistent: Set(new.persistent),
            ..Default::default()
        };
        self.create(model).await
    }

    pub async fn find_by_token(&self, token: &str) -> DaoResult<Option<session::Model>> {
        let token = token.to_string();
        self.find(1, 1, Vec::new(), move |query| {
            query.filter(session::Column::Token.eq(token))
        })
        .await
        .map(|response| response.data.into_iter().next())
    }

    pub async fn list_active_for_user(
        &self,
        user_id: Uuid,
        now: DateTime<FixedOffset>,
    ) -> DaoResult<Vec<session::Model>> {
        self.find_iter(
            None,
            vec![(session::Column::CreatedAt, Order::Desc)],
            vec![
                ColumnFilter::eq(session::Column::UserId, user_id),
                ColumnFilter::compare(session::Column::ExpiresAt, CompareOp::Gt, now),
            ],
            |query| query,
        )
        .collect_all()
        .await
    }

    pub async fn extend(
        &self,
        session: session::Model,
        expires_at: DateTime<FixedOffset>,
    ) -> DaoResult<session::Model> {
        self.save_changes(session, move |active| {
            active.expires_at = Set(expires_at);
        })
        .await
    }

    /// Returns whether a row was removed.
    pub async fn delete_by_token(&self, token: &str) -> DaoResult<bool> {
        let result = Session::delete_many()
            .filter(session::Column::Token.eq(token))
            .exec(&self.db)
            .await
            .map_err(DaoLayerError::Db)?;
        Ok(result.rows_affected > 0)
    }

    pub async fn delete_for_user(&self, user_id: Uuid, token: &str) -> DaoResult<bool> {
        let result = Session::delete_many()
            .filter(session::Column::UserId.eq(user_id))
            .filter(session::Column::Token.eq(token))
            .exec(&self.db)
            .await
            .map_err(DaoLayerError::Db)?;
        Ok(result.rows_affected > 0)
    }
}
