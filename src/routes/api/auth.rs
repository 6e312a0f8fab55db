use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::HeaderMap,
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
};
use sea_orm::prelude::DateTimeWithTimeZone;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    auth::session_token::{clear_cookie, read_token, session_cookie},
    db::entities::{session, user},
    error::AppError,
    middleware::{AuthSession, MaybeSession},
    response::{ApiResult, JsonApiResponse, append_cookie},
    services::{
        ServiceContext,
        auth_service::{SignUp, SignedIn},
        session_service::ClientMeta,
    },
    state::AppState,
};

#[derive(Debug, Deserialize)]
pub struct SignUpRequest {
    #[serde(default)]
    pub name: String,
    pub email: String,
    pub password: String,
    pub image: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignInRequest {
    pub email: String,
    pub password: String,
    pub remember_me: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct RevokeSessionRequest {
    pub token: String,
}

#[derive(Debug, Deserialize)]
pub struct SocialSignInRequest {
    pub provider: String,
    #[serde(rename = "callbackURL")]
    pub callback_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SendVerificationRequest {
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct VerifyEmailQuery {
    pub token: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub email_verified: bool,
    pub image: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub id: Uuid,
    pub token: String,
    pub user_id: Uuid,
    pub expires_at: DateTimeWithTimeZone,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Debug, Serialize)]
pub struct SessionPayload {
    pub user: UserResponse,
    pub session: SessionResponse,
}

#[derive(Debug, Serialize)]
pub struct SignedInResponse {
    pub user: UserResponse,
    pub token: String,
}

#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

#[derive(Debug, Serialize)]
pub struct SocialRedirectResponse {
    pub url: String,
    pub redirect: bool,
}

#[derive(Debug, Serialize)]
pub struct VerifyEmailResponse {
    pub status: bool,
    pub user: UserResponse,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/auth/sign-up/email", post(sign_up))
        .route("/auth/sign-in/email", post(sign_in))
        .route("/auth/sign-out", post(sign_out))
        .route("/auth/get-session", get(get_session))
        .route("/auth/list-sessions", get(list_sessions))
        .route("/auth/revoke-session", post(revoke_session))
        .route("/auth/sign-in/social", post(sign_in_social))
        .route("/auth/callback/{provider}", get(social_callback))
        .route("/auth/send-verification-email", post(send_verification_email))
        .route("/auth/verify-email", get(verify_email))
        .with_state(state)
}

async fn sign_up(
    State(state): State<Arc<AppState>>,
    meta: ClientMeta,
    Json(body): Json<SignUpRequest>,
) -> Result<Response, AppError> {
    let services = ServiceContext::from_state(&state);
    let signed_in = services
        .auth(&state)
        .sign_up(
            SignUp {
                name: body.name,
                email: body.email,
                password: body.password,
                image: body.image,
            },
            meta,
        )
        .await?;
    let cookie = session_cookie(&state.config.auth, &signed_in.session.token, true);
    JsonApiResponse::created(SignedInResponse::from(signed_in))?.with_cookie(&cookie)
}

async fn sign_in(
    State(state): State<Arc<AppState>>,
    meta: ClientMeta,
    Json(body): Json<SignInRequest>,
) -> Result<Response, AppError> {
    let services = ServiceContext::from_state(&state);
    let signed_in = services
        .auth(&state)
        .sign_in(
            &body.email,
            &body.password,
            body.remember_me.unwrap_or(true),
            meta,
        )
        .await?;
    let session = &signed_in.session;
    let cookie = session_cookie(&state.config.auth, &session.token, session.persistent);
    JsonApiResponse::ok(SignedInResponse::from(signed_in))?.with_cookie(&cookie)
}

async fn sign_out(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    if let Some(token) = read_token(&headers, &state.config.auth.cookie_name) {
        let services = ServiceContext::from_state(&state);
        services.auth(&state).sign_out(&token).await?;
    }
    JsonApiResponse::ok(SuccessResponse { success: true })?
        .with_cookie(&clear_cookie(&state.config.auth))
}

async fn get_session(
    MaybeSession(current): MaybeSession,
) -> ApiResult<Option<SessionPayload>> {
    JsonApiResponse::ok(current.map(SessionPayload::from))
}

async fn list_sessions(
    State(state): State<Arc<AppState>>,
    current: AuthSession,
) -> ApiResult<Vec<SessionResponse>> {
    let services = ServiceContext::from_state(&state);
    let sessions = services
        .session(&state.config.auth)
        .list(current.user.id)
        .await?;
    JsonApiResponse::ok(sessions.into_iter().map(SessionResponse::from).collect())
}

async fn revoke_session(
    State(state): State<Arc<AppState>>,
    current: AuthSession,
    Json(body): Json<RevokeSessionRequest>,
) -> Result<Response, AppError> {
    let services = ServiceContext::from_state(&state);
    let revoked = services
        .session(&state.config.auth)
        .revoke(current.user.id, &body.token)
        .await?;

    let response = JsonApiResponse::ok(SuccessResponse { success: revoked })?;
    if revoked && body.token == current.session.token {
        return response.with_cookie(&clear_cookie(&state.config.auth));
    }
    Ok(response.into_response())
}

async fn sign_in_social(
    State(state): State<Arc<AppState>>,
    Json(body): Json<SocialSignInRequest>,
) -> ApiResult<SocialRedirectResponse> {
    let services = ServiceContext::from_state(&state);
    let url = services
        .auth(&state)
        .start_social(&body.provider, body.callback_url.as_deref())
        .await?;
    JsonApiResponse::ok(SocialRedirectResponse {
        url,
        redirect: true,
    })
}

async fn social_callback(
    State(state): State<Arc<AppState>>,
    Path(provider): Path<String>,
    meta: ClientMeta,
    Query(query): Query<CallbackQuery>,
) -> Result<Response, AppError> {
    if let Some(error) = query.error {
        tracing::info!(provider = %provider, error = %error, "social sign-in cancelled");
        return Err(AppError::bad_request(format!("Social sign-in failed: {error}")));
    }
    let (Some(code), Some(oauth_state)) = (query.code, query.state) else {
        return Err(AppError::bad_request("Missing code or state"));
    };

    let services = ServiceContext::from_state(&state);
    let social = services
        .auth(&state)
        .finish_social(&provider, &code, &oauth_state, meta)
        .await?;

    let cookie = session_cookie(&state.config.auth, &social.signed_in.session.token, true);
    let mut response = Redirect::to(&social.redirect_to).into_response();
    append_cookie(&mut response, &cookie)?;
    Ok(response)
}

async fn send_verification_email(
    State(state): State<Arc<AppState>>,
    Json(body): Json<SendVerificationRequest>,
) -> ApiResult<SuccessResponse> {
    let services = ServiceContext::from_state(&state);
    services
        .auth(&state)
        .send_verification_email(&body.email)
        .await?;
    JsonApiResponse::ok(SuccessResponse { success: true })
}

async fn verify_email(
    State(state): State<Arc<AppState>>,
    Query(query): Query<VerifyEmailQuery>,
) -> ApiResult<VerifyEmailResponse> {
    let services = ServiceContext::from_state(&state);
    let user = services.auth(&state).verify_email(&query.token).await?;
    JsonApiResponse::ok(VerifyEmailResponse {
        status: true,
        user: user.into(),
    })
}

impl From<user::Model> for UserResponse {
    fn from(model: user::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            email: model.email,
            email_verified: model.email_verified,
            image: model.image,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

impl From<session::Model> for SessionResponse {
    fn from(model: session::Model) -> Self {
        Self {
            id: model.id,
            token: model.token,
            user_id: model.user_id,
            expires_at: model.expires_at,
            ip_address: model.ip_address,
            user_agent: model.user_agent,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

impl From<AuthSession> for SessionPayload {
    fn from(current: AuthSession) -> Self {
        Self {
            user: current.user.into(),
            session: current.session.into(),
        }
    }
}

impl From<SignedIn> for SignedInResponse {
    fn from(signed_in: SignedIn) -> Self {
        Self {
            user: signed_in.user.into(),
            token: signed_in.session.token,
        }
    }
}
