//! Contact form submissions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use bazaar_core::{ContactId, Email};

use super::lenient_string;

/// A stored contact submission. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    #[serde(rename = "_id")]
    pub id: ContactId,
    pub name: String,
    pub email: Email,
    pub phone: String,
    pub message: String,
    pub date: DateTime<Utc>,
}

/// Contact payload. Accepted only when `email` belongs to a registered user.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewContact {
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,
    pub email: Email,
    #[serde(default, deserialize_with = "lenient_string")]
    pub phone: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub message: String,
}

impl NewContact {
    #[must_use]
    pub fn into_contact(self, id: ContactId, date: DateTime<Utc>) -> Contact {
        Contact {
            id,
            name: self.name,
            email: self.email,
            phone: self.phone,
            message: self.message,
            date,
        }
    }
}
