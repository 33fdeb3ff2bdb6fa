use std::sync::Arc;

use anyhow::Result;
use axum::http::HeaderName;
use tower_http::cors::CorsLayer;

use crate::auth::TokenVerifier;
use crate::config::AppConfig;
use crate::database::store::RecordStore;
use crate::middleware::cors::cors_layer;
use crate::service::RecordService;

/// Immutable per-process state shared by handlers and middleware.
///
/// Established once at startup and read-only thereafter; the only mutable
/// resource behind it is the store's connection pool.
#[derive(Clone)]
pub struct AppState {
    pub service: RecordService,
    pub verifier: TokenVerifier,
    pub token_header: HeaderName,
    pub auth_exceptions: Arc<Vec<String>>,
    pub cors: CorsLayer,
}

impl AppState {
    pub fn new(config: &AppConfig, store: Arc<dyn RecordStore>) -> Result<Self> {
        let verifier = TokenVerifier::new(
            &config.auth.jwt_secret,
            &config.auth.token_scheme,
            config.auth.leeway_seconds,
        )?;
        let token_header = HeaderName::from_bytes(config.auth.token_header.to_lowercase().as_bytes())?;

        Ok(Self {
            service: RecordService::new(store),
            verifier,
            token_header,
            auth_exceptions: Arc::new(config.auth.exempt_paths.clone()),
            cors: cors_layer(&config.security.cors_origins),
        })
    }
}
