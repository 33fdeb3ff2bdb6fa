use axum::{extract::Request, middleware::Next, response::{IntoResponse, Response}};
use futures::FutureExt;
use std::panic::AssertUnwindSafe;

use crate::error::ApiError;

/// Outermost stage: recovers panics from every later stage.
///
/// The panic is logged with full detail server-side; the caller only ever
/// sees a generic 500 envelope.
pub async fn recovery_middleware(request: Request, next: Next) -> Response {
    match AssertUnwindSafe(next.run(request)).catch_unwind().await {
        Ok(response) => response,
        Err(panic) => {
            let detail = panic
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| panic.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());
            tracing::error!(panic = %detail, "panic recovered");

            ApiError::internal_server_error("internal server error").into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::{Request, StatusCode}, middleware::from_fn, routing::get, Router};
    use tower::ServiceExt;

    #[tokio::test]
    async fn panicking_handler_becomes_a_generic_500() {
        async fn boom() -> StatusCode {
            panic!("boom")
        }

        let app = Router::new()
            .route("/boom", get(boom))
            .layer(from_fn(recovery_middleware));

        let response = app
            .oneshot(Request::builder().uri("/boom").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
        // No panic detail reaches the client
        assert_eq!(value["error"], "internal server error");
    }

    #[tokio::test]
    async fn healthy_responses_pass_through_unchanged() {
        let app = Router::new()
            .route("/ok", get(|| async { "fine" }))
            .layer(from_fn(recovery_middleware));

        let response = app
            .oneshot(Request::builder().uri("/ok").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }
}
