use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use serde_json::{json, Map, Value};

/// Wrapper producing the uniform success envelope `{data?, message?}`.
///
/// Errors use the matching `{error}` shape via `ApiError`; the HTTP status
/// travels in the status line, never in the body.
#[derive(Debug)]
pub struct ApiResponse<T: Serialize> {
    data: Option<T>,
    message: Option<String>,
    status: StatusCode,
}

impl<T: Serialize> ApiResponse<T> {
    /// A 200 OK response carrying `data`
    pub fn success(data: T) -> Self {
        Self {
            data: Some(data),
            message: None,
            status: StatusCode::OK,
        }
    }

    /// A 201 Created response carrying `data`
    pub fn created(data: T) -> Self {
        Self {
            data: Some(data),
            message: None,
            status: StatusCode::CREATED,
        }
    }

    /// A 204 No Content response
    pub fn no_content() -> ApiResponse<()> {
        ApiResponse {
            data: None,
            message: None,
            status: StatusCode::NO_CONTENT,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        // For 204 No Content, return empty response
        if self.status == StatusCode::NO_CONTENT {
            return self.status.into_response();
        }

        let mut body = Map::new();
        if let Some(data) = self.data {
            match serde_json::to_value(&data) {
                Ok(value) => {
                    body.insert("data".to_string(), value);
                }
                Err(err) => {
                    tracing::error!("failed to serialize response data: {}", err);
                    return (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        Json(json!({ "error": "failed to serialize response data" })),
                    )
                        .into_response();
                }
            }
        }
        if let Some(message) = self.message {
            body.insert("message".to_string(), Value::String(message));
        }

        (self.status, Json(Value::Object(body))).into_response()
    }
}
