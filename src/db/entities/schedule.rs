use base_entity_derive::base_entity;
use sea_orm::entity::prelude::*;

/// One logged shift. `total_hours` is derived from the start and end times
/// when the row is written.
#[base_entity(owner = "user_id")]
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize, DeriveEntityModel)]
#[sea_orm(table_name = "schedules")]
pub struct Model {
    #[sea_orm(indexed)]
    pub user_id: Uuid,
    #[sea_orm(indexed)]
    pub project_id: Option<Uuid>,
    #[sea_orm(indexed)]
    pub date: Date,
    pub start_time: Time,
    pub end_time: Time,
    pub total_hours: f64,
    pub notes: Option<String>,
    #[sea_orm(belongs_to, from = "user_id", to = "id", on_delete = "Cascade")]
    pub user: HasOne<super::user::Entity>,
    #[sea_orm(belongs_to, from = "project_id", to = "id", on_delete = "SetNull")]
    pub project: HasOne<super::project::Entity>,
}

impl ActiveModelBehavior for ActiveModel {}
