//! User records.

use serde::{Deserialize, Serialize};

use bazaar_core::{Email, UserId};

use super::lenient_string;

/// A registered user, as returned to clients.
///
/// The stored password fields are never loaded into this type, so no read
/// path can leak them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id")]
    pub id: UserId,
    pub first_name: String,
    pub last_name: String,
    pub email: Email,
    pub image: Option<String>,
}

/// Signup payload.
///
/// Passwords are opaque strings stored as received; `confirm_password` is
/// not compared against `password`.
#[derive(Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    #[serde(default, deserialize_with = "lenient_string")]
    pub first_name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub last_name: String,
    pub email: Email,
    #[serde(deserialize_with = "lenient_string")]
    pub password: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub confirm_password: String,
    #[serde(default)]
    pub image: Option<String>,
}

impl NewUser {
    /// Build the stored record under a freshly generated id.
    #[must_use]
    pub fn to_user(&self, id: UserId) -> User {
        User {
            id,
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            email: self.email.clone(),
            image: self.image.clone(),
        }
    }
}

impl std::fmt::Debug for NewUser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewUser")
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .field("confirm_password", &"[REDACTED]")
            .field("image", &self.image)
            .finish()
    }
}
