use base_entity_derive::base_entity;
use sea_orm::entity::prelude::*;

#[base_entity(owner = "user_id")]
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize, DeriveEntityModel)]
#[sea_orm(table_name = "user_settings")]
pub struct Model {
    #[sea_orm(unique)]
    pub user_id: Uuid,
    pub hourly_rate: f64,
    pub tax_rate: f64,
    pub monthly_goal_hours: f64,
    pub date_format: String,
    pub time_format: String,
    pub timezone: String,
    #[sea_orm(default_value = true)]
    pub notifications_enabled: bool,
    #[sea_orm(default_value = false)]
    pub email_notifications: bool,
    #[sea_orm(belongs_to, from = "user_id", to = "id", on_delete = "Cascade")]
    pub user: HasOne<super::user::Entity>,
}

impl ActiveModelBehavior for ActiveModel {}
