use axum::{Router, routing::get};
use serde::Serialize;

use crate::response::{ApiResult, JsonApiResponse};
use crate::routes::route_list::{RouteInfo, routes};

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub ok: bool,
}

pub fn router() -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/routes.json", get(list_routes_json))
}

async fn health() -> ApiResult<HealthResponse> {
    JsonApiResponse::ok(HealthResponse { ok: true })
}

async fn list_routes_json() -> ApiResult<&'static [RouteInfo]> {
    JsonApiResponse::ok(routes())
}
