//! JSON response envelopes shared by handlers.

use serde::Serialize;

/// `{ "message": ... }`
#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

impl MessageResponse {
    #[must_use]
    pub const fn new(message: &'static str) -> Self {
        Self { message }
    }
}

/// `{ "message": ..., "alert": bool, "data"?: ... }`
///
/// `alert` tells the web client whether to show a success or warning toast.
#[derive(Debug, Clone, Serialize)]
pub struct AlertResponse<T> {
    pub message: &'static str,
    pub alert: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl AlertResponse<()> {
    /// Success without a payload.
    #[must_use]
    pub const fn ok(message: &'static str) -> Self {
        Self {
            message,
            alert: true,
            data: None,
        }
    }

    /// Request understood but refused (`alert: false`, still HTTP 200).
    #[must_use]
    pub const fn refused(message: &'static str) -> Self {
        Self {
            message,
            alert: false,
            data: None,
        }
    }
}

impl<T> AlertResponse<T> {
    /// Success carrying `data`.
    #[must_use]
    pub const fn with_data(message: &'static str, data: T) -> Self {
        Self {
            message,
            alert: true,
            data: Some(data),
        }
    }
}
