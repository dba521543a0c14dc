//! Registration, login and user listing.
//!
//! Refusals (duplicate email, unknown email) are HTTP 200 with
//! `alert: false`; only store failures are 5xx.
//!
//! Login and `/allusers` return the public projection only; stored password
//! fields never appear in a response.

use axum::{Json, extract::State};
use serde::Deserialize;
use tracing::instrument;

use bazaar_core::Email;

use super::responses::AlertResponse;
use crate::db::RepositoryError;
use crate::error::{AppError, JsonBody, Result, StoreContext};
use crate::models::{NewUser, User};
use crate::state::AppState;

/// Login request body. The password is accepted but not checked.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
}

/// Register a new user.
///
/// POST /signup
#[instrument(skip(state, new_user), fields(email = %new_user.email))]
pub async fn signup(
    State(state): State<AppState>,
    JsonBody(new_user): JsonBody<NewUser>,
) -> Result<Json<AlertResponse<()>>> {
    match state.records().register_user(new_user).await {
        Ok(user) => {
            tracing::info!(user_id = %user.id, "User registered");
            Ok(Json(AlertResponse::ok("Registration successful")))
        }
        Err(RepositoryError::Conflict(_)) => {
            Ok(Json(AlertResponse::refused("Email is already registered")))
        }
        Err(source) => Err(AppError::store(source, "An error occurred")),
    }
}

/// Look up a user by email and return its public fields.
///
/// POST /login
#[instrument(skip(state, request), fields(email = %request.email))]
pub async fn login(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<LoginRequest>,
) -> Result<Json<AlertResponse<User>>> {
    let not_found = || Json(AlertResponse::<User> {
        message: "Email not found",
        alert: false,
        data: None,
    });

    // A malformed address can't match any stored user
    let Ok(email) = Email::parse(&request.email) else {
        return Ok(not_found());
    };

    let user = state
        .records()
        .find_user_by_email(&email)
        .await
        .or_store_error("An error occurred")?;

    Ok(user.map_or_else(not_found, |user| {
        Json(AlertResponse::with_data("Login successful", user))
    }))
}

/// List all users (public fields only).
///
/// GET /allusers
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Result<Json<AlertResponse<Vec<User>>>> {
    let users = state
        .records()
        .list_users()
        .await
        .or_store_error("Error fetching users")?;

    Ok(Json(AlertResponse::with_data("Users fetched", users)))
}
