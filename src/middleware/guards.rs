use std::sync::Arc;

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};

use crate::{
    auth::session_token::read_token,
    db::entities::{session, user},
    error::AppError,
    services::{ServiceContext, session_service::ClientMeta},
    state::AppState,
};

use super::RefreshedSession;

/// The signed-in user and the session the request came with.
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub user: user::Model,
    pub session: session::Model,
    /// The session expiry moved on this request. The cookie middleware
    /// re-sends the cookie.
    pub refreshed: bool,
}

/// Same lookup as [`AuthSession`], but anonymous requests pass through.
#[derive(Debug, Clone)]
pub struct MaybeSession(pub Option<AuthSession>);

// One lookup per request, shared by every guard that asks.
#[derive(Clone)]
struct ResolvedAuth(Option<AuthSession>);

async fn resolve(parts: &mut Parts, state: &Arc<AppState>) -> Result<Option<AuthSession>, AppError> {
    if let Some(ResolvedAuth(cached)) = parts.extensions.get::<ResolvedAuth>() {
        return Ok(cached.clone());
    }

    let resolved = match read_token(&parts.headers, &state.config.auth.cookie_name) {
        Some(token) => ServiceContext::from_state(state)
            .session(&state.config.auth)
            .resolve(&token)
            .await?
            .map(|resolved| AuthSession {
                user: resolved.user,
                session: resolved.session,
                refreshed: resolved.refreshed,
            }),
        None => None,
    };

    if let Some(current) = resolved.as_ref().filter(|current| current.refreshed)
        && let Some(slot) = parts.extensions.get::<RefreshedSession>()
    {
        slot.record(&current.session);
    }
    parts.extensions.insert(ResolvedAuth(resolved.clone()));
    Ok(resolved)
}

impl FromRequestParts<Arc<AppState>> for AuthSession {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        resolve(parts, state)
            .await?
            .ok_or_else(|| AppError::unauthorized("Unauthorized"))
    }
}

impl FromRequestParts<Arc<AppState>> for MaybeSession {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        Ok(Self(resolve(parts, state).await?))
    }
}

impl<S: Send + Sync> FromRequestParts<S> for ClientMeta {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header_value = |name: &str| {
            parts
                .headers
                .get(name)
                .and_then(|value| value.to_str().ok())
                .map(str::trim)
                .filter(|value| !value.is_empty())
                .map(str::to_string)
        };

        let ip_address = header_value("x-forwarded-for")
            .and_then(|value| value.split(',').next().map(|first| first.trim().to_string()))
            .or_else(|| header_value("x-real-ip"));

        Ok(Self {
            ip_address,
            user_agent: header_value(header::USER_AGENT.as_str()),
        })
    }
}
