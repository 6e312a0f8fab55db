use base_entity_derive::base_entity;
use sea_orm::entity::prelude::*;

#[base_entity]
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    pub name: String,
    #[sea_orm(unique)]
    pub email: String,
    #[sea_orm(default_value = false)]
    pub email_verified: bool,
    pub image: Option<String>,
    #[sea_orm(has_many)]
    pub sessions: HasMany<super::session::Entity>,
    #[sea_orm(has_many)]
    pub accounts: HasMany<super::account::Entity>,
    #[sea_orm(has_many)]
    pub projects: HasMany<super::project::Entity>,
    #[sea_orm(has_many)]
    pub schedules: HasMany<super::schedule::Entity>,
}

impl ActiveModelBehavior for ActiveModel {}
