use axum::{
    extract::Request,
    http::{HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};

use crate::context::{
    CorrelationId, RequestId, TraceId, X_CORRELATION_ID, X_REQUEST_ID, X_TRACE_ID,
};

/// Stamps fresh request, trace and correlation ids on every request.
///
/// The ids go into the request extensions for later stages (logging reads
/// them) and onto the response headers for the caller. Runs before logging
/// and never overwrites anything: the ids are generated here and nowhere
/// else.
pub async fn correlation_middleware(mut request: Request, next: Next) -> Response {
    let request_id = RequestId::generate();
    let trace_id = TraceId::generate();
    let correlation_id = CorrelationId::generate();

    request.extensions_mut().insert(request_id.clone());
    request.extensions_mut().insert(trace_id.clone());
    request.extensions_mut().insert(correlation_id.clone());

    let mut response = next.run(request).await;

    let headers = response.headers_mut();
    set_header(headers, X_REQUEST_ID, &request_id.0);
    set_header(headers, X_TRACE_ID, &trace_id.0);
    set_header(headers, X_CORRELATION_ID, &correlation_id.0);

    response
}

fn set_header(headers: &mut axum::http::HeaderMap, name: &'static str, value: &str) {
    if let Ok(value) = HeaderValue::from_str(value) {
        headers.insert(HeaderName::from_static(name), value);
    }
}
