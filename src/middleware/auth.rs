use axum::{
    extract::{Request, State},
    http::Method,
    middleware::Next,
    response::Response,
};

use crate::error::ApiError;
use crate::state::AppState;

/// Authentication stage: verifies the bearer token and makes the resulting
/// `Identity` available to handlers through the request extensions.
///
/// Runs after CORS, so preflight traffic never gets here; `OPTIONS` is
/// skipped outright regardless. Paths on the configured exception list
/// bypass verification entirely, by exact match, before any verification
/// work happens.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if request.method() == Method::OPTIONS {
        return Ok(next.run(request).await);
    }

    let path = request.uri().path();
    if state.auth_exceptions.iter().any(|exempt| exempt == path) {
        return Ok(next.run(request).await);
    }

    let header = request
        .headers()
        .get(&state.token_header)
        .and_then(|value| value.to_str().ok());

    let identity = state.verifier.verify(header).map_err(|err| {
        tracing::warn!(error = %err, path = %request.uri().path(), "token verification failed");
        ApiError::from(err)
    })?;

    request.extensions_mut().insert(identity);

    Ok(next.run(request).await)
}
