//! Product feedback. Write-only: nothing reads it back over HTTP.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use bazaar_core::FeedbackId;

use super::lenient_string;

/// A stored product review.
///
/// `product_name` is free text rather than a product reference, and
/// `rating` is kept as sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Feedback {
    #[serde(rename = "_id")]
    pub id: FeedbackId,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub product_name: String,
    pub rating: String,
    pub comment: String,
    pub date: DateTime<Utc>,
}

/// Feedback payload. No field is required and no existence check applies.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewFeedback {
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub email: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub phone: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub product_name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub rating: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub comment: String,
}

impl NewFeedback {
    #[must_use]
    pub fn into_feedback(self, id: FeedbackId, date: DateTime<Utc>) -> Feedback {
        Feedback {
            id,
            name: self.name,
            email: self.email,
            phone: self.phone,
            product_name: self.product_name,
            rating: self.rating,
            comment: self.comment,
            date,
        }
    }
}
