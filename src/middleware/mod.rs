//! Request-processing stages, composed in `app::router`.
//!
//! Order is significant and fixed (outermost first): recovery, correlation
//! stamping, logging, CORS, authentication. Each stage may short-circuit
//! the chain by returning a response without calling the next stage.

pub mod auth;
pub mod correlation;
pub mod cors;
pub mod logging;
pub mod recovery;
pub mod response;

pub use auth::auth_middleware;
pub use correlation::correlation_middleware;
pub use cors::cors_layer;
pub use logging::logging_middleware;
pub use recovery::recovery_middleware;
pub use response::ApiResponse;
