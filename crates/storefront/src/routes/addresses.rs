//! Shipping address route handlers.

use axum::{Json, extract::State, http::StatusCode};
use serde::Deserialize;
use tracing::instrument;

use bazaar_core::Email;

use super::responses::MessageResponse;
use crate::db::RepositoryError;
use crate::error::{AppError, JsonBody, QueryParams, Result, StoreContext};
use crate::models::{Address, NewAddress};
use crate::state::AppState;

/// Query for `GET /address`.
#[derive(Debug, Deserialize)]
pub struct AddressQuery {
    pub email: Option<String>,
}

/// Store a shipping address for a registered user.
///
/// POST /address
#[instrument(skip(state, form), fields(email = %form.email))]
pub async fn submit(
    State(state): State<AppState>,
    JsonBody(form): JsonBody<NewAddress>,
) -> Result<(StatusCode, Json<MessageResponse>)> {
    match state.records().submit_address(form).await {
        Ok(address) => {
            tracing::info!(address_id = %address.id, "Address submitted");
            Ok((
                StatusCode::CREATED,
                Json(MessageResponse::new("Address submitted")),
            ))
        }
        Err(RepositoryError::PreconditionFailed(_)) => {
            Err(AppError::BadRequest("User not found".to_string()))
        }
        Err(source) => Err(AppError::store(source, "Server error")),
    }
}

/// First address stored for an email.
///
/// GET /address?email=
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<AddressQuery>,
) -> Result<Json<Address>> {
    let not_found = || AppError::NotFound("Address not found".to_string());

    let Some(email) = query.email.as_deref().and_then(|e| Email::parse(e).ok()) else {
        return Err(not_found());
    };

    state
        .records()
        .find_address_by_email(&email)
        .await
        .or_store_error("Server error")?
        .map(Json)
        .ok_or_else(not_found)
}

/// List all addresses.
///
/// GET /addresses
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Result<Json<Vec<Address>>> {
    let addresses = state
        .records()
        .list_addresses()
        .await
        .or_store_error("Error fetching addresses")?;

    Ok(Json(addresses))
}
