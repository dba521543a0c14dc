//! Product feedback submission.

use axum::{Json, extract::State, http::StatusCode};
use tracing::instrument;

use super::responses::MessageResponse;
use crate::error::{JsonBody, Result, StoreContext};
use crate::models::NewFeedback;
use crate::state::AppState;

/// POST /feedback
#[instrument(skip(state, form), fields(product = %form.product_name))]
pub async fn submit(
    State(state): State<AppState>,
    JsonBody(form): JsonBody<NewFeedback>,
) -> Result<(StatusCode, Json<MessageResponse>)> {
    let feedback = state
        .records()
        .submit_feedback(form)
        .await
        .or_store_error("Server error")?;

    tracing::info!(feedback_id = %feedback.id, "Feedback submitted");
    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("Feedback submitted")),
    ))
}
