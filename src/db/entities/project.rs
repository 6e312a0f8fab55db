use base_entity_derive::base_entity;
use sea_orm::entity::prelude::*;

#[base_entity(owner = "user_id")]
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize, DeriveEntityModel)]
#[sea_orm(table_name = "projects")]
pub struct Model {
    #[sea_orm(indexed)]
    pub user_id: Uuid,
    pub name: String,
    pub company_name: Option<String>,
    pub description: Option<String>,
    pub hourly_rate: Option<f64>,
    #[sea_orm(belongs_to, from = "user_id", to = "id", on_delete = "Cascade")]
    pub user: HasOne<super::user::Entity>,
    #[sea_orm(has_many)]
    pub schedules: HasMany<super::schedule::Entity>,
}

impl ActiveModelBehavior for ActiveModel {}
