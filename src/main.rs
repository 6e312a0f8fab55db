use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use axum::{Router, middleware};
use tower_http::trace::TraceLayer;

use shiftbook::{
    auth::bootstrap::{build_social_providers, build_verification_keys},
    config::AppConfig,
    db::connection,
    logging::init_tracing,
    middleware::{catch_panic_layer, json_error_middleware},
    routes::router,
    state::AppState,
};

// Errors returned from `main` are printed to stderr, which also covers
// failures before the subscriber is installed.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cfg = AppConfig::from_env().context("failed to load configuration")?;
    init_tracing(&cfg.logging.rust_log);
    run(cfg).await.inspect_err(|err| tracing::error!("server failed: {err:?}"))
}

async fn run(cfg: AppConfig) -> anyhow::Result<()> {
    let db_cfg = cfg
        .database
        .as_ref()
        .context("database.url is required (set SHIFTBOOK_DATABASE__URL)")?;
    let db = connection::connect(db_cfg).await?;

    let providers = build_social_providers(&cfg.auth)?;
    let keys = build_verification_keys(&cfg.auth);
    let addr: SocketAddr = format!("{}:{}", cfg.general.host, cfg.general.port)
        .parse()
        .context("invalid general.host/general.port")?;

    let state = AppState::new(cfg, db, providers, keys);

    let app = Router::new()
        .merge(router(Arc::clone(&state)))
        .layer(middleware::from_fn(json_error_middleware))
        .layer(catch_panic_layer())
        .layer(TraceLayer::new_for_http());

    tracing::info!("listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
