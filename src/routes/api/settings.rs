use std::sync::Arc;

use axum::{Json, Router, extract::State, routing::get};
use sea_orm::prelude::DateTimeWithTimeZone;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    db::entities::user_settings,
    middleware::AuthSession,
    response::{ApiResult, JsonApiResponse},
    services::{ServiceContext, settings_service::SettingsPatch},
    state::AppState,
};

use super::payload;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSettingsRequest {
    #[serde(default, deserialize_with = "payload::number")]
    pub hourly_rate: Option<f64>,
    #[serde(default, deserialize_with = "payload::number")]
    pub tax_rate: Option<f64>,
    #[serde(default, deserialize_with = "payload::number")]
    pub monthly_goal_hours: Option<f64>,
    pub date_format: Option<String>,
    pub time_format: Option<String>,
    pub timezone: Option<String>,
    pub notifications_enabled: Option<bool>,
    pub email_notifications: Option<bool>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub hourly_rate: f64,
    pub tax_rate: f64,
    pub monthly_goal_hours: f64,
    pub date_format: String,
    pub time_format: String,
    pub timezone: String,
    pub notifications_enabled: bool,
    pub email_notifications: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/settings", get(get_settings).put(update_settings))
        .with_state(state)
}

async fn get_settings(
    State(state): State<Arc<AppState>>,
    current: AuthSession,
) -> ApiResult<SettingsResponse> {
    let settings = ServiceContext::from_state(&state)
        .settings(&state.config.settings_defaults)
        .get_or_create(current.user.id)
        .await?;
    JsonApiResponse::ok(settings.into())
}

async fn update_settings(
    State(state): State<Arc<AppState>>,
    current: AuthSession,
    Json(body): Json<UpdateSettingsRequest>,
) -> ApiResult<SettingsResponse> {
    let settings = ServiceContext::from_state(&state)
        .settings(&state.config.settings_defaults)
        .update(current.user.id, body.into())
        .await?;
    JsonApiResponse::ok(settings.into())
}

impl From<UpdateSettingsRequest> for SettingsPatch {
    fn from(body: UpdateSettingsRequest) -> Self {
        Self {
            hourly_rate: body.hourly_rate,
            tax_rate: body.tax_rate,
            monthly_goal_hours: body.monthly_goal_hours,
            date_format: body.date_format,
            time_format: body.time_format,
            timezone: body.timezone,
            notifications_enabled: body.notifications_enabled,
            email_notifications: body.email_notifications,
        }
    }
}

impl From<user_settings::Model> for SettingsResponse {
    fn from(model: user_settings::Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            hourly_rate: model.hourly_rate,
            tax_rate: model.tax_rate,
            monthly_goal_hours: model.monthly_goal_hours,
            date_format: model.date_format,
            time_format: model.time_format,
            timezone: model.timezone,
            notifications_enabled: model.notifications_enabled,
            email_notifications: model.email_notifications,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
