use chrono::{DateTime, FixedOffset};
use sea_orm::{ColumnTrait, DatabaseConnection, QueryFilter, Set};
use uuid::Uuid;

use super::{DaoBase, DaoResult};
use crate::db::entities::{
    account::{self, CREDENTIAL_PROVIDER},
    prelude::Account,
};

#[derive(Clone)]
pub struct AccountDao {
    db: DatabaseConnection,
}

impl DaoBase for AccountDao {
    type Entity = Account;
    const ENTITY_NAME: &'static str = "Account";

    fn new(db: &DatabaseConnection) -> Self {
        Self { db: db.clone() }
    }

    fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

/// Tokens handed back by an OAuth provider after a code exchange.
#[derive(Debug, Clone, Default)]
pub struct ProviderTokens {
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    pub id_token: Option<String>,
    pub access_token_expires_at: Option<DateTime<FixedOffset>>,
    pub scope: Option<String>,
}

impl AccountDao {
    pub async fn find_by_provider(
        &self,
        provider_id: &str,
        account_id: &str,
    ) -> DaoResult<Option<account::Model>> {
        let provider_id = provider_id.to_string();
        let account_id = account_id.to_string();
        self.find(1, 1, Vec::new(), move |query| {
            query
                .filter(account::Column::ProviderId.eq(provider_id))
                .filter(account::Column::AccountId.eq(account_id))
        })
        .await
        .map(|response| response.data.into_iter().next())
    }

    pub async fn find_credential(&self, user_id: Uuid) -> DaoResult<Option<account::Model>> {
        self.find(1, 1, Vec::new(), move |query| {
            query
                .filter(account::Column::UserId.eq(user_id))
                .filter(account::Column::ProviderId.eq(CREDENTIAL_PROVIDER))
        })
        .await
        .map(|response| response.data.into_iter().next())
    }

    pub async fn create_credential(
        &self,
        user_id: Uuid,
        password_hash: String,
    ) -> DaoResult<account::Model> {
        let model = account::ActiveModel {
            account_id: Set(user_id.to_string()),
            provider_id: Set(CREDENTIAL_PROVIDER.to_string()),
            user_id: Set(user_id),
            password: Set(Some(password_hash)),
            access_token: Set(None),
            refresh_token: Set(None),
            id_token: Set(None),
            access_token_expires_at: Set(None),
            refresh_token_expires_at: Set(None),
            scope: Set(None),
            ..Default::default()
        };
        self.create(model).await
    }

    pub async fn create_social(
        &self,
        user_id: Uuid,
        provider_id: &str,
        account_id: &str,
        tokens: ProviderTokens,
    ) -> DaoResult<account::Model> {
        let model = account::ActiveModel {
            account_id: Set(account_id.to_string()),
            provider_id: Set(provider_id.to_string()),
            user_id: Set(user_id),
            password: Set(None),
            access_token: Set(tokens.access_token),
            refresh_token: Set(tokens.refresh_token),
            id_token: Set(tokens.id_token),
            access_token_expires_at: Set(tokens.access_token_expires_at),
            refresh_token_expires_at: Set(None),
            scope: Set(tokens.scope),
            ..Default::default()
        };
        self.create(model).await
    }

    pub async fn store_tokens(
        &self,
        account: account::Model,
        tokens: ProviderTokens,
    ) -> DaoResult<account::Model> {
        self.save_changes(account, move |active| {
            active.access_token = Set(tokens.access_token);
            if tokens.refresh_token.is_some() {
                active.refresh_token = Set(tokens.refresh_token);
            }
            active.id_token = Set(tokens.id_token);
            active.access_token_expires_at = Set(tokens.access_token_expires_at);
            active.scope = Set(tokens.scope);
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use chrono::{FixedOffset, TimeZone};
    use sea_orm::{DatabaseBackend, MockDatabase};
    use uuid::Uuid;

    use crate::db::entities::account;

    use super::AccountDao;
    use crate::db::dao::DaoBase;

    fn credential(user_id: Uuid) -> account::Model {
        let now = FixedOffset::east_opt(0)
            .expect("offset should be valid")
            .with_ymd_and_hms(2026, 1, 1, 0, 0, 0)
            .single()
            .expect("timestamp should be valid");
        account::Model {
            id: Uuid::new_v4(),
            created_at: now,
            updated_at: now,
            account_id: user_id.to_string(),
            provider_id: "credential".to_string(),
            user_id,
            access_token: None,
            refresh_token: None,
            id_token: None,
            access_token_expires_at: None,
            refresh_token_expires_at: None,
            scope: None,
            password: Some("$argon2id$stub".to_string()),
        }
    }

    #[tokio::test]
    async fn find_credential_returns_password_account() {
        let user_id = Uuid::new_v4();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[credential(user_id)]])
            .into_connection();
        let dao = AccountDao::new(&db);

        let account = dao
            .find_credential(user_id)
            .await
            .expect("query should succeed")
            .expect("account should exist");
        assert_eq!(account.provider_id, "credential");
        assert!(account.password.is_some());
    }

    #[tokio::test]
    async fn create_credential_uses_user_id_as_account_id() {
        let user_id = Uuid::new_v4();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[credential(user_id)]])
            .into_connection();
        let dao = AccountDao::new(&db);

        let account = dao
            .create_credential(user_id, "$argon2id$stub".to_string())
            .await
            .expect("insert should succeed");
        assert_eq!(account.account_id, user_id.to_string());
    }
}
