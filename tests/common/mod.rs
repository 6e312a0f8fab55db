#![allow(dead_code)]

use axum::{
    body::{self, Body},
    http::{HeaderMap, Request, StatusCode, header},
};
use chrono::{Duration, Utc};
use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase};
use serde_json::Value;
use tower::ServiceExt; // for `oneshot`
use uuid::Uuid;

use shiftbook::{
    routes::API_PREFIX,
    test_helpers::{fixtures, test_router},
};

pub const TOKEN: &str = "test-session-token";

/// A mock database whose first two results resolve `TOKEN` to a fresh
/// session of `user_id`. Append the handler's own results after these.
pub fn authed_db(user_id: Uuid) -> MockDatabase {
    let expires_at = Utc::now().fixed_offset() + Duration::days(7) - Duration::hours(1);
    MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([[fixtures::session(user_id, TOKEN, expires_at)]])
        .append_query_results([[fixtures::user(user_id, "alice@example.com")]])
}

/// Like [`authed_db`], but the session was last extended two days ago, so
/// resolving it slides the expiry and stores the extended row.
pub fn refreshing_db(user_id: Uuid, persistent: bool) -> MockDatabase {
    let now = Utc::now().fixed_offset();
    let mut stale = fixtures::session(user_id, TOKEN, now + Duration::days(5));
    stale.persistent = persistent;
    let mut extended = stale.clone();
    extended.expires_at = now + Duration::days(7);
    MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([[stale]])
        .append_query_results([[fixtures::user(user_id, "alice@example.com")]])
        .append_query_results([[extended]])
}

pub fn api_path(path: &str) -> String {
    format!("{API_PREFIX}{path}")
}

pub fn anonymous(method: &str, path: &str, body: Option<Value>) -> Request<Body> {
    build(method, path, body, None)
}

pub fn authed(method: &str, path: &str, body: Option<Value>) -> Request<Body> {
    build(method, path, body, Some(TOKEN))
}

fn build(method: &str, path: &str, body: Option<Value>, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(api_path(path));
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let body = match body {
        Some(json) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };
    builder.body(body).expect("request should build")
}

pub async fn send(db: DatabaseConnection, request: Request<Body>) -> (StatusCode, HeaderMap, Value) {
    let response = test_router(db)
        .oneshot(request)
        .await
        .expect("router should respond");
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body should read");
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("body should be JSON")
    };
    (status, headers, json)
}

pub fn set_cookie(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::SET_COOKIE)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
}
