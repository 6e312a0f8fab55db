use std::sync::{Arc, Mutex};

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};

use crate::{
    auth::session_token::session_cookie, db::entities::session, response::append_cookie,
    state::AppState,
};

/// Set by the session guards when resolving the request moved the session
/// expiry forward.
#[derive(Clone, Default)]
pub(crate) struct RefreshedSession(Arc<Mutex<Option<session::Model>>>);

impl RefreshedSession {
    pub(crate) fn record(&self, session: &session::Model) {
        if let Ok(mut slot) = self.0.lock() {
            *slot = Some(session.clone());
        }
    }

    fn take(&self) -> Option<session::Model> {
        self.0.lock().ok().and_then(|mut slot| slot.take())
    }
}

/// Re-sends the session cookie after a sliding refresh, keeping the
/// session's remember-me choice. Responses that set their own cookie
/// (sign-in, sign-out) are left alone.
pub async fn session_cookie_middleware(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Response {
    let refreshed = RefreshedSession::default();
    req.extensions_mut().insert(refreshed.clone());

    let mut response = next.run(req).await;
    let Some(session) = refreshed.take() else {
        return response;
    };
    if response.headers().contains_key(header::SET_COOKIE) {
        return response;
    }

    let cookie = session_cookie(&state.config.auth, &session.token, session.persistent);
    if let Err(err) = append_cookie(&mut response, &cookie) {
        tracing::warn!(session_id = %session.id, "failed to re-send session cookie: {err}");
    }
    response
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use uuid::Uuid;

    use super::RefreshedSession;
    use crate::test_helpers::fixtures;

    #[test]
    fn recorded_session_is_taken_once() {
        let slot = RefreshedSession::default();
        assert!(slot.take().is_none());

        let session = fixtures::session(Uuid::new_v4(), "tok", Utc::now().fixed_offset());
        slot.clone().record(&session);
        assert_eq!(slot.take().map(|taken| taken.token), Some("tok".to_string()));
        assert!(slot.take().is_none());
    }
}
