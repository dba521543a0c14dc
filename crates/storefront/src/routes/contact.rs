//! Contact form route handlers.
//!
//! Only registered emails may submit the form.

use axum::{Json, extract::State, http::StatusCode};
use tracing::instrument;

use super::responses::{AlertResponse, MessageResponse};
use crate::db::RepositoryError;
use crate::error::{AppError, JsonBody, Result, StoreContext};
use crate::models::{Contact, NewContact};
use crate::state::AppState;

/// Submit a contact message.
///
/// POST /contact
#[instrument(skip(state, form), fields(email = %form.email))]
pub async fn submit(
    State(state): State<AppState>,
    JsonBody(form): JsonBody<NewContact>,
) -> Result<(StatusCode, Json<MessageResponse>)> {
    match state.records().submit_contact(form).await {
        Ok(contact) => {
            tracing::info!(contact_id = %contact.id, "Contact submitted");
            Ok((
                StatusCode::CREATED,
                Json(MessageResponse::new("Contact submitted successfully")),
            ))
        }
        Err(RepositoryError::PreconditionFailed(_)) => {
            Err(AppError::BadRequest("User not found".to_string()))
        }
        Err(source) => Err(AppError::store(source, "Server error")),
    }
}

/// List contact submissions.
///
/// GET /allcontacts
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Result<Json<AlertResponse<Vec<Contact>>>> {
    let contacts = state
        .records()
        .list_contacts()
        .await
        .or_store_error("Error fetching data")?;

    Ok(Json(AlertResponse::with_data("Data fetched", contacts)))
}
