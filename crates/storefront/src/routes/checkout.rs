//! Hosted checkout session creation.

use axum::{Json, extract::State};
use tracing::instrument;

use crate::error::{JsonBody, Result};
use crate::services::CheckoutItem;
use crate::state::AppState;

/// Create a payment session for the cart and return its id as a JSON string.
///
/// POST /create-checkout-session
///
/// Provider refusals keep the provider's status and message, also as a
/// bare JSON string.
#[instrument(skip(state, items), fields(items = items.len()))]
pub async fn create_session(
    State(state): State<AppState>,
    JsonBody(items): JsonBody<Vec<CheckoutItem>>,
) -> Result<Json<String>> {
    let session = state.payments().create_checkout_session(&items).await?;
    Ok(Json(session.id))
}
