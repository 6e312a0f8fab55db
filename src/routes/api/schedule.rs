use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
};
use chrono::{Datelike, NaiveDate, Utc};
use sea_orm::prelude::DateTimeWithTimeZone;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    db::{dao::ScheduleRange, entities::schedule},
    error::AppError,
    ledger::{ChartView, LedgerError, Period, parse_end_date, parse_month, parse_start_date},
    middleware::AuthSession,
    response::{ApiResult, JsonApiResponse},
    services::{
        ServiceContext,
        schedule_service::{
            EarningsReport, MonthlyReport, PeriodTotals, ScheduleInput, SchedulePatch,
            SeriesReport,
        },
    },
    state::AppState,
};

use super::payload;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateScheduleRequest {
    pub date: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub notes: Option<String>,
    #[serde(default, deserialize_with = "payload::uuid")]
    pub project_id: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateScheduleRequest {
    pub date: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub notes: Option<String>,
    #[serde(default, deserialize_with = "payload::nullable_uuid")]
    pub project_id: Option<Option<Uuid>>,
}

#[derive(Debug, Deserialize)]
pub struct PeriodQuery {
    pub period: Option<String>,
    pub today: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SeriesQuery {
    pub view: Option<String>,
    pub today: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct MonthlyQuery {
    pub month: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub project_id: Option<Uuid>,
    pub date: NaiveDate,
    /// `HH:MM`
    pub start_time: String,
    pub end_time: String,
    pub total_hours: f64,
    pub notes: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/schedule", get(list_entries).post(create_entry))
        .route(
            "/schedule/{id}",
            get(get_entry).put(update_entry).delete(delete_entry),
        )
        .route("/schedule/stats/totals", get(totals))
        .route("/schedule/stats/earnings", get(earnings))
        .route("/schedule/stats/series", get(series))
        .route("/schedule/stats/monthly", get(monthly))
        .with_state(state)
}

async fn list_entries(
    State(state): State<Arc<AppState>>,
    current: AuthSession,
    Query(query): Query<ListQuery>,
) -> ApiResult<Vec<ScheduleResponse>> {
    let range = ScheduleRange::new(
        optional_date(query.start_date.as_deref(), parse_start_date)?,
        optional_date(query.end_date.as_deref(), parse_end_date)?,
    );
    let entries = ServiceContext::from_state(&state)
        .schedule(&state.config.settings_defaults)
        .list(current.user.id, range)
        .await?;
    JsonApiResponse::ok(entries.into_iter().map(ScheduleResponse::from).collect())
}

async fn get_entry(
    State(state): State<Arc<AppState>>,
    current: AuthSession,
    Path(id): Path<Uuid>,
) -> ApiResult<ScheduleResponse> {
    let entry = ServiceContext::from_state(&state)
        .schedule(&state.config.settings_defaults)
        .get(current.user.id, id)
        .await?;
    JsonApiResponse::ok(entry.into())
}

async fn create_entry(
    State(state): State<Arc<AppState>>,
    current: AuthSession,
    Json(body): Json<CreateScheduleRequest>,
) -> ApiResult<ScheduleResponse> {
    let input = ScheduleInput {
        date: body.date,
        start_time: body.start_time,
        end_time: body.end_time,
        notes: body.notes,
        project_id: body.project_id,
    };
    let entry = ServiceContext::from_state(&state)
        .schedule(&state.config.settings_defaults)
        .create(current.user.id, input)
        .await?;
    JsonApiResponse::created(entry.into())
}

async fn update_entry(
    State(state): State<Arc<AppState>>,
    current: AuthSession,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateScheduleRequest>,
) -> ApiResult<ScheduleResponse> {
    let patch = SchedulePatch {
        date: body.date,
        start_time: body.start_time,
        end_time: body.end_time,
        notes: body.notes,
        project_id: body.project_id,
    };
    let entry = ServiceContext::from_state(&state)
        .schedule(&state.config.settings_defaults)
        .update(current.user.id, id, patch)
        .await?;
    JsonApiResponse::ok(entry.into())
}

async fn delete_entry(
    State(state): State<Arc<AppState>>,
    current: AuthSession,
    Path(id): Path<Uuid>,
) -> ApiResult<()> {
    ServiceContext::from_state(&state)
        .schedule(&state.config.settings_defaults)
        .delete(current.user.id, id)
        .await?;
    JsonApiResponse::with_status(StatusCode::OK, "deleted", ())
}

async fn totals(
    State(state): State<Arc<AppState>>,
    current: AuthSession,
    Query(query): Query<PeriodQuery>,
) -> ApiResult<PeriodTotals> {
    let period = Period::parse(query.period.as_deref())?;
    let today = payload::reference_date(query.today.as_deref())?;
    let report = ServiceContext::from_state(&state)
        .schedule(&state.config.settings_defaults)
        .totals(current.user.id, period, today)
        .await?;
    JsonApiResponse::ok(report)
}

async fn earnings(
    State(state): State<Arc<AppState>>,
    current: AuthSession,
    Query(query): Query<PeriodQuery>,
) -> ApiResult<EarningsReport> {
    let period = Period::parse(query.period.as_deref())?;
    let today = payload::reference_date(query.today.as_deref())?;
    let report = ServiceContext::from_state(&state)
        .schedule(&state.config.settings_defaults)
        .earnings(current.user.id, period, today)
        .await?;
    JsonApiResponse::ok(report)
}

async fn series(
    State(state): State<Arc<AppState>>,
    current: AuthSession,
    Query(query): Query<SeriesQuery>,
) -> ApiResult<SeriesReport> {
    let view = ChartView::parse(query.view.as_deref())?;
    let today = payload::reference_date(query.today.as_deref())?;
    let report = ServiceContext::from_state(&state)
        .schedule(&state.config.settings_defaults)
        .series(current.user.id, view, today)
        .await?;
    JsonApiResponse::ok(report)
}

async fn monthly(
    State(state): State<Arc<AppState>>,
    current: AuthSession,
    Query(query): Query<MonthlyQuery>,
) -> ApiResult<MonthlyReport> {
    let month = match query.month.as_deref().map(str::trim).filter(|raw| !raw.is_empty()) {
        Some(raw) => parse_month(raw)?,
        None => first_of_current_month(),
    };
    let report = ServiceContext::from_state(&state)
        .schedule(&state.config.settings_defaults)
        .monthly(current.user.id, month)
        .await?;
    JsonApiResponse::ok(report)
}

fn optional_date(
    raw: Option<&str>,
    parse: fn(&str) -> Result<NaiveDate, LedgerError>,
) -> Result<Option<NaiveDate>, AppError> {
    raw.map(str::trim)
        .filter(|value| !value.is_empty())
        .map(parse)
        .transpose()
        .map_err(AppError::from)
}

fn first_of_current_month() -> NaiveDate {
    let today = Utc::now().date_naive();
    today.with_day(1).unwrap_or(today)
}

impl From<schedule::Model> for ScheduleResponse {
    fn from(model: schedule::Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            project_id: model.project_id,
            date: model.date,
            start_time: model.start_time.format("%H:%M").to_string(),
            end_time: model.end_time.format("%H:%M").to_string(),
            total_hours: model.total_hours,
            notes: model.notes,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
