//! Middleware stack for the report API.
//!
//! Layer order: Request → CORS → Tracing (+ metrics) → Timeout → BodyLimit → Handler

pub mod cors;
pub mod metrics;
pub mod timeout;
pub mod tracing;

pub use cors::create_cors_layer;
pub use metrics::{ApiMetrics, RequestTimer};
pub use timeout::TimeoutLayer;
pub use tracing::{TracingLayer, REQUEST_ID_HEADER};
