//! HTTP middleware stack for storefront.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (hub per request, transaction)
//! 2. `TraceLayer` (request span, see [`make_request_span`])
//! 3. Request ID (fills the span's `request_id`)
//! 4. CORS
//! 5. Body limit

pub mod request_id;

pub use request_id::{REQUEST_ID_HEADER, RequestId, make_request_span, request_id_middleware};
