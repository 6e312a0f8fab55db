use std::{path::Path, sync::Arc, time::Duration};

use axum::{
    Router,
    http::{HeaderValue, Method, header},
};
use tower_http::{
    cors::CorsLayer,
    services::{ServeDir, ServeFile},
};

use crate::{config::GeneralConfig, state::AppState};

use super::api;

pub const API_PREFIX: &str = "/api";

pub fn router(state: Arc<AppState>) -> Router {
    let general = &state.config.general;
    let cors = cors_layer(general);
    let static_dir = general.static_dir.clone();

    let app = Router::new().nest(API_PREFIX, api::router(state));
    let app = match static_dir {
        Some(dir) => with_spa_fallback(app, &dir),
        None => app,
    };
    app.layer(cors)
}

fn cors_layer(cfg: &GeneralConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = cfg
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_credentials(true)
        .max_age(Duration::from_secs(3600))
}

/// Unknown non-API paths fall back to `index.html` so client-side routing
/// keeps working on reload.
fn with_spa_fallback(app: Router, dir: &str) -> Router {
    let root = Path::new(dir);
    if !root.is_dir() {
        tracing::warn!(static_dir = %dir, "static_dir does not exist; not serving the SPA");
        return app;
    }
    tracing::info!(static_dir = %dir, "serving SPA bundle");
    let index = root.join("index.html");
    app.fallback_service(ServeDir::new(root).fallback(ServeFile::new(index)))
}
