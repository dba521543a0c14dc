//! Bazaar storefront library.
//!
//! JSON-over-HTTP backend for a small web shop: user registration and
//! lookup, catalog, contact/feedback capture, shipping addresses, orders and
//! hosted checkout sessions. Exposed as a library so the full router can be
//! driven in-process by tests.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;

use axum::{Router, extract::DefaultBodyLimit, middleware::from_fn, routing::get};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use state::AppState;

/// Maximum accepted request body size.
pub const BODY_LIMIT_BYTES: usize = 10 * 1024 * 1024;

/// Build the full application router with its middleware stack.
///
/// Sentry layers are added by the binary; everything else a request passes
/// through lives here so tests exercise the same stack.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(routes::health::health))
        .route("/health/ready", get(routes::health::readiness))
        .merge(routes::routes())
        .layer(DefaultBodyLimit::max(BODY_LIMIT_BYTES))
        // The browser client is served from another origin
        .layer(CorsLayer::permissive())
        .layer(from_fn(middleware::request_id_middleware))
        .layer(TraceLayer::new_for_http().make_span_with(middleware::make_request_span))
        .with_state(state)
}
