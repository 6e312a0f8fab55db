use std::sync::Arc;

use axum::{Router, middleware};

use crate::{middleware::session_cookie_middleware, state::AppState};

use super::{auth, project, public, schedule, settings, user};

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(public::router())
        .merge(auth::router(state.clone()))
        .merge(user::router(state.clone()))
        .merge(schedule::router(state.clone()))
        .merge(project::router(state.clone()))
        .merge(settings::router(state.clone()))
        .layer(middleware::from_fn_with_state(
            state,
            session_cookie_middleware,
        ))
}
