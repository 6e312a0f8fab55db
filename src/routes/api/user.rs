use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    response::Response,
    routing::get,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    auth::session_token::clear_cookie,
    db::entities::user,
    error::AppError,
    middleware::AuthSession,
    response::{ApiResult, JsonApiResponse},
    services::ServiceContext,
    state::AppState,
};

use super::auth::{SessionPayload, SuccessResponse, UserResponse};

/// Blank values leave the stored field alone.
#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub image: Option<String>,
}

/// What other signed-in users may see.
#[derive(Debug, Serialize)]
pub struct PublicUserResponse {
    pub id: Uuid,
    pub name: String,
    pub image: Option<String>,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route(
            "/user",
            get(current_user).put(update_user).delete(delete_user),
        )
        .route("/user/{id}", get(get_user))
        .with_state(state)
}

async fn current_user(current: AuthSession) -> ApiResult<SessionPayload> {
    JsonApiResponse::ok(current.into())
}

async fn update_user(
    State(state): State<Arc<AppState>>,
    current: AuthSession,
    Json(body): Json<UpdateUserRequest>,
) -> ApiResult<UserResponse> {
    let user = ServiceContext::from_state(&state)
        .user()
        .update_profile(current.user.id, body.name, body.image)
        .await?;
    JsonApiResponse::ok(user.into())
}

async fn delete_user(
    State(state): State<Arc<AppState>>,
    current: AuthSession,
) -> Result<Response, AppError> {
    ServiceContext::from_state(&state)
        .user()
        .delete_account(current.user.id)
        .await?;
    JsonApiResponse::ok(SuccessResponse { success: true })?
        .with_cookie(&clear_cookie(&state.config.auth))
}

async fn get_user(
    State(state): State<Arc<AppState>>,
    _current: AuthSession,
    Path(id): Path<Uuid>,
) -> ApiResult<PublicUserResponse> {
    let user = ServiceContext::from_state(&state).user().get(id).await?;
    JsonApiResponse::ok(user.into())
}

impl From<user::Model> for PublicUserResponse {
    fn from(model: user::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            image: model.image,
        }
    }
}
