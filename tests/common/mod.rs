use std::sync::Arc;

use axum::body::Body;
use axum::http::{HeaderMap, HeaderName, Method, Request, StatusCode};
use axum::Router;
use tower::ServiceExt;
use uuid::Uuid;

use record_api_rust::app;
use record_api_rust::auth::{issue, Claims, TokenVerifier};
use record_api_rust::database::{MemoryRecordStore, UnauthenticatedAccess};
use record_api_rust::middleware::cors::cors_layer;
use record_api_rust::service::RecordService;
use record_api_rust::state::AppState;

pub const TEST_SECRET: &str = "test-secret";

/// Build the full application router backed by the in-memory store, with
/// the complete middleware chain attached.
pub fn test_app() -> Router {
    let store = Arc::new(MemoryRecordStore::new(UnauthenticatedAccess::Reject));
    let state = AppState {
        service: RecordService::new(store),
        verifier: TokenVerifier::new(TEST_SECRET, "Bearer", 30).expect("verifier"),
        token_header: HeaderName::from_static("authorization"),
        auth_exceptions: Arc::new(vec!["/health".to_string(), "/signin".to_string()]),
        cors: cors_layer(&["*".to_string()]),
    };
    app::router(state)
}

/// A valid `Authorization` header value for the given owner.
pub fn bearer(owner: Uuid) -> String {
    let claims = Claims::new(owner, chrono::Duration::hours(1));
    format!("Bearer {}", issue(&claims, TEST_SECRET).expect("token"))
}

pub fn request(
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", token);
    }
    match body {
        Some(value) => builder
            .header("content-type", "application/json")
            .body(Body::from(value.to_string()))
            .expect("request"),
        None => builder.body(Body::empty()).expect("request"),
    }
}

/// Drive one request through the router and collect status, headers and the
/// decoded JSON body (Null when the body is empty).
pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, HeaderMap, serde_json::Value) {
    let response = app.clone().oneshot(request).await.expect("response");
    let status = response.status();
    let headers = response.headers().clone();

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    let body = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("json body")
    };

    (status, headers, body)
}
