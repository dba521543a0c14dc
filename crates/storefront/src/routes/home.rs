//! Root route handler.

/// GET /
pub async fn home() -> &'static str {
    "Server is running"
}
