//! Unified error handling with Sentry integration.
//!
//! Every handler returns `Result<T, AppError>`. Each variant carries the
//! client-facing message for its endpoint, so the JSON error shapes stay
//! per-endpoint while the status mapping and Sentry capture live here.

use axum::{
    Json,
    extract::{
        FromRequest, FromRequestParts,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::db::RepositoryError;
use crate::services::GatewayError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Record layer failed. Responds 500 with `{ <key>: message }`.
    #[error("{message}: {source}")]
    Store {
        #[source]
        source: RepositoryError,
        message: &'static str,
        key: &'static str,
    },

    /// Payment provider failed or refused the cart.
    #[error("Payment gateway error: {0}")]
    Gateway(#[from] GatewayError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Store failure reported as `{ "message": message }`.
    #[must_use]
    pub const fn store(source: RepositoryError, message: &'static str) -> Self {
        Self::Store {
            source,
            message,
            key: "message",
        }
    }

    fn is_server_error(&self) -> bool {
        match self {
            Self::Store { .. } | Self::Internal(_) => true,
            Self::Gateway(err) => err.status_code() >= 500,
            Self::NotFound(_) | Self::BadRequest(_) => false,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        match self {
            Self::Store { message, key, .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ key: message })),
            )
                .into_response(),
            // Checkout errors are a bare JSON string, mirroring the success body
            Self::Gateway(err) => {
                let status = StatusCode::from_u16(err.status_code())
                    .unwrap_or(StatusCode::BAD_GATEWAY);
                (status, Json(err.client_message())).into_response()
            }
            Self::NotFound(message) => {
                (StatusCode::NOT_FOUND, Json(json!({ "message": message }))).into_response()
            }
            Self::BadRequest(message) => {
                (StatusCode::BAD_REQUEST, Json(json!({ "message": message }))).into_response()
            }
            // Don't expose internal error details to clients
            Self::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "message": "Internal server error" })),
            )
                .into_response(),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Attach an endpoint's client-facing message to a record-layer result.
pub trait StoreContext<T> {
    /// Map a [`RepositoryError`] to a 500 `{ "message": message }`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Store`] if `self` is an error.
    fn or_store_error(self, message: &'static str) -> Result<T>;

    /// Like [`StoreContext::or_store_error`] with a different body key.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Store`] if `self` is an error.
    fn or_store_error_keyed(self, key: &'static str, message: &'static str) -> Result<T>;
}

impl<T> StoreContext<T> for std::result::Result<T, RepositoryError> {
    fn or_store_error(self, message: &'static str) -> Result<T> {
        self.map_err(|source| AppError::store(source, message))
    }

    fn or_store_error_keyed(self, key: &'static str, message: &'static str) -> Result<T> {
        self.map_err(|source| AppError::Store {
            source,
            message,
            key,
        })
    }
}

/// JSON body extractor whose rejections render as 400 `{ "message": ... }`.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct JsonBody<T>(pub T);

/// Query string extractor whose rejections render as 400 `{ "message": ... }`.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct QueryParams<T>(pub T);

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::body::to_bytes;
    use serde_json::Value;

    use super::*;

    async fn body_json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("product-123".to_string());
        assert_eq!(err.to_string(), "Not found: product-123");

        let err = AppError::BadRequest("invalid input".to_string());
        assert_eq!(err.to_string(), "Bad request: invalid input");
    }

    #[tokio::test]
    async fn test_store_error_uses_endpoint_message() {
        let err = AppError::store(
            RepositoryError::DataCorruption("bad row".to_string()),
            "Error fetching users",
        );
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_json(response).await,
            json!({ "message": "Error fetching users" })
        );
    }

    #[tokio::test]
    async fn test_store_error_with_custom_key() {
        let result: std::result::Result<(), RepositoryError> =
            Err(RepositoryError::DataCorruption("bad row".to_string()));
        let response = result
            .or_store_error_keyed("error", "Failed to fetch orders")
            .unwrap_err()
            .into_response();
        assert_eq!(
            body_json(response).await,
            json!({ "error": "Failed to fetch orders" })
        );
    }

    #[tokio::test]
    async fn test_gateway_error_passes_status_and_message() {
        let err = AppError::Gateway(GatewayError::Api {
            status: 402,
            message: "Your card was declined.".to_string(),
        });
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::PAYMENT_REQUIRED);
        assert_eq!(body_json(response).await, json!("Your card was declined."));
    }

    #[tokio::test]
    async fn test_internal_error_hides_details() {
        let response = AppError::Internal("pool exhausted".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_json(response).await,
            json!({ "message": "Internal server error" })
        );
    }

    #[test]
    fn test_client_errors_status_codes() {
        assert_eq!(
            AppError::NotFound("x".to_string()).into_response().status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::BadRequest("x".to_string()).into_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::Gateway(GatewayError::InvalidItem("cart is empty".to_string()))
                .into_response()
                .status(),
            StatusCode::BAD_REQUEST
        );
    }
}
