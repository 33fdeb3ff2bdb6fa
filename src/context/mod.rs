//! Typed, request-scoped context values.
//!
//! Everything a middleware stage hands to a later stage travels through the
//! request's `http::Extensions`, keyed by the closed set of types below.
//! Raw string keys are never used, so unrelated stages cannot collide.
//! The carrier is append-only along the chain: stages insert their value
//! once and nothing downstream removes or overwrites it.

use uuid::Uuid;

/// Response header carrying the per-request id.
pub const X_REQUEST_ID: &str = "x-request-id";

/// Response header carrying the trace id.
pub const X_TRACE_ID: &str = "x-trace-id";

/// Response header carrying the correlation id.
pub const X_CORRELATION_ID: &str = "x-correlation-id";

/// Unique id of one inbound request. Generated fresh, never reused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestId(pub String);

impl RequestId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

/// Id used to trace a request across services.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceId(pub String);

impl TraceId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

/// Id used to correlate a request with related requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorrelationId(pub String);

impl CorrelationId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

/// Verified proof of who issued the request.
///
/// Only the token verifier constructs an `Identity`; handlers read it from
/// the request extensions and project it into a `Requester` for the service
/// and storage layers. It is immutable for the rest of the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Identity {
    owner_id: Uuid,
}

impl Identity {
    pub(crate) fn new(owner_id: Uuid) -> Self {
        Self { owner_id }
    }

    pub fn owner_id(&self) -> Uuid {
        self.owner_id
    }
}
