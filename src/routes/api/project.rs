use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
};
use sea_orm::prelude::DateTimeWithTimeZone;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    db::entities::project,
    ledger::Period,
    middleware::AuthSession,
    response::{ApiResult, JsonApiResponse},
    services::{
        ServiceContext,
        project_service::{ProjectDetail, ProjectHours, ProjectInput, ProjectPatch},
        schedule_service::PeriodTotals,
    },
    state::AppState,
};

use super::{payload, schedule::ScheduleResponse};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProjectRequest {
    #[serde(default)]
    pub name: String,
    pub company_name: Option<String>,
    pub description: Option<String>,
    #[serde(default, deserialize_with = "payload::number")]
    pub hourly_rate: Option<f64>,
}

/// Empty strings clear the optional text fields; `hourlyRate: null` clears
/// the project rate.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProjectRequest {
    pub name: Option<String>,
    pub company_name: Option<String>,
    pub description: Option<String>,
    #[serde(default, deserialize_with = "payload::nullable_number")]
    pub hourly_rate: Option<Option<f64>>,
}

#[derive(Debug, Deserialize)]
pub struct HoursQuery {
    pub period: Option<String>,
    pub today: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub company_name: Option<String>,
    pub description: Option<String>,
    pub hourly_rate: Option<f64>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectDetailResponse {
    #[serde(flatten)]
    pub project: ProjectResponse,
    pub total_hours: f64,
    pub entry_count: u64,
    pub schedules: Vec<ScheduleResponse>,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/project", get(list_projects).post(create_project))
        .route(
            "/project/{id}",
            get(get_project).put(update_project).delete(delete_project),
        )
        .route("/project/{id}/hours", get(project_hours))
        .route("/project/stats/hours", get(hours_by_project))
        .with_state(state)
}

async fn list_projects(
    State(state): State<Arc<AppState>>,
    current: AuthSession,
) -> ApiResult<Vec<ProjectResponse>> {
    let projects = ServiceContext::from_state(&state)
        .project()
        .list(current.user.id)
        .await?;
    JsonApiResponse::ok(projects.into_iter().map(ProjectResponse::from).collect())
}

async fn get_project(
    State(state): State<Arc<AppState>>,
    current: AuthSession,
    Path(id): Path<Uuid>,
) -> ApiResult<ProjectDetailResponse> {
    let detail = ServiceContext::from_state(&state)
        .project()
        .detail(current.user.id, id)
        .await?;
    JsonApiResponse::ok(detail.into())
}

async fn create_project(
    State(state): State<Arc<AppState>>,
    current: AuthSession,
    Json(body): Json<CreateProjectRequest>,
) -> ApiResult<ProjectResponse> {
    let input = ProjectInput {
        name: body.name,
        company_name: body.company_name,
        description: body.description,
        hourly_rate: body.hourly_rate,
    };
    let project = ServiceContext::from_state(&state)
        .project()
        .create(current.user.id, input)
        .await?;
    JsonApiResponse::created(project.into())
}

async fn update_project(
    State(state): State<Arc<AppState>>,
    current: AuthSession,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateProjectRequest>,
) -> ApiResult<ProjectResponse> {
    let patch = ProjectPatch {
        name: body.name,
        company_name: body.company_name,
        description: body.description,
        hourly_rate: body.hourly_rate,
    };
    let project = ServiceContext::from_state(&state)
        .project()
        .update(current.user.id, id, patch)
        .await?;
    JsonApiResponse::ok(project.into())
}

async fn delete_project(
    State(state): State<Arc<AppState>>,
    current: AuthSession,
    Path(id): Path<Uuid>,
) -> ApiResult<()> {
    ServiceContext::from_state(&state)
        .project()
        .delete(current.user.id, id)
        .await?;
    JsonApiResponse::with_status(StatusCode::OK, "deleted", ())
}

async fn project_hours(
    State(state): State<Arc<AppState>>,
    current: AuthSession,
    Path(id): Path<Uuid>,
    Query(query): Query<HoursQuery>,
) -> ApiResult<PeriodTotals> {
    let period = Period::parse(query.period.as_deref())?;
    let today = payload::reference_date(query.today.as_deref())?;
    let totals = ServiceContext::from_state(&state)
        .project()
        .hours(current.user.id, id, period, today)
        .await?;
    JsonApiResponse::ok(PeriodTotals { totals, period })
}

async fn hours_by_project(
    State(state): State<Arc<AppState>>,
    current: AuthSession,
) -> ApiResult<Vec<ProjectHours>> {
    let rows = ServiceContext::from_state(&state)
        .project()
        .hours_by_project(current.user.id)
        .await?;
    JsonApiResponse::ok(rows)
}

impl From<project::Model> for ProjectResponse {
    fn from(model: project::Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            name: model.name,
            company_name: model.company_name,
            description: model.description,
            hourly_rate: model.hourly_rate,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

impl From<ProjectDetail> for ProjectDetailResponse {
    fn from(detail: ProjectDetail) -> Self {
        Self {
            project: detail.project.into(),
            total_hours: detail.totals.total_hours,
            entry_count: detail.totals.entry_count,
            schedules: detail
                .schedules
                .into_iter()
                .map(ScheduleResponse::from)
                .collect(),
        }
    }
}
