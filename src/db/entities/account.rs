use base_entity_derive::base_entity;
use sea_orm::entity::prelude::*;

/// Provider id of email/password accounts.
pub const CREDENTIAL_PROVIDER: &str = "credential";

/// Links a user to a login method: a password hash for credential accounts,
/// provider tokens for social ones.
#[base_entity(owner = "user_id")]
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize, DeriveEntityModel)]
#[sea_orm(table_name = "accounts")]
pub struct Model {
    #[sea_orm(indexed)]
    pub account_id: String,
    #[sea_orm(indexed)]
    pub provider_id: String,
    #[sea_orm(indexed)]
    pub user_id: Uuid,
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    pub id_token: Option<String>,
    pub access_token_expires_at: Option<DateTimeWithTimeZone>,
    pub refresh_token_expires_at: Option<DateTimeWithTimeZone>,
    pub scope: Option<String>,
    pub password: Option<String>,
    #[sea_orm(belongs_to, from = "user_id", to = "id", on_delete = "Cascade")]
    pub user: HasOne<super::user::Entity>,
}

impl ActiveModelBehavior for ActiveModel {}
