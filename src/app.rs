use std::sync::Arc;

use anyhow::Result;
use axum::{
    middleware::{from_fn, from_fn_with_state},
    routing::get,
    Router,
};

use crate::config;
use crate::database::{DatabaseManager, PgRecordStore};
use crate::handlers;
use crate::middleware;
use crate::state::AppState;

pub async fn run() -> Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    let config = config::config();
    tracing_subscriber::fmt::init();
    tracing::info!("starting record API in {:?} mode", config.environment);

    let pool = DatabaseManager::connect(&config.database).await?;
    let store = PgRecordStore::new(pool, config.security.unauthenticated_access);
    store.migrate().await?;

    let state = AppState::new(config, Arc::new(store))?;
    let app = router(state);

    // Allow tests or deployments to override port via env
    let port = std::env::var("RECORD_API_PORT")
        .ok()
        .or_else(|| std::env::var("PORT").ok())
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(3000);

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!("listening on http://{}", bind_addr);

    axum::serve(listener, app).await?;
    Ok(())
}

/// Assemble the route table and the middleware chain.
///
/// Layer order is load-bearing. Axum applies the last-added layer
/// outermost, so reading bottom-up below gives the execution order:
/// recovery, correlation, logging, CORS, authentication, handlers.
/// Recovery must observe failures from every later stage; correlation must
/// stamp ids before logging reads them; CORS must answer preflight before
/// authentication can challenge it.
pub fn router(state: AppState) -> Router {
    let cors = state.cors.clone();

    Router::new()
        .route("/health", get(handlers::health::health))
        .route(
            "/v1",
            get(handlers::records::list).post(handlers::records::create),
        )
        .route(
            "/v1/:id",
            get(handlers::records::get)
                .patch(handlers::records::update)
                .delete(handlers::records::remove),
        )
        .with_state(state.clone())
        .layer(from_fn_with_state(state, middleware::auth::auth_middleware))
        .layer(cors)
        .layer(from_fn(middleware::logging::logging_middleware))
        .layer(from_fn(middleware::correlation::correlation_middleware))
        .layer(from_fn(middleware::recovery::recovery_middleware))
}
