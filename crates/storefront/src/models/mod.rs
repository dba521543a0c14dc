//! Record kinds persisted by the storefront.
//!
//! Each record kind has a stored shape (serialized with `_id` and camelCase
//! keys, as clients see it) and a `New*` shape accepted on creation.

pub mod address;
pub mod contact;
pub mod feedback;
pub mod order;
pub mod product;
pub mod user;

pub use address::{Address, NewAddress};
pub use contact::{Contact, NewContact};
pub use feedback::{Feedback, NewFeedback};
pub use order::{
    NewOrder, Order, OrderItem, OrderItemWithProduct, OrderValidationError, OrderWithRelations,
    ProductSummary, UserSummary,
};
pub use product::{NewProduct, Product};
pub use user::{NewUser, User};

use serde::{Deserialize, Deserializer};

/// Deserialize a free-text field that clients sometimes send as a number
/// (`"price": 499`, `"phone": 9876543210`). Missing and `null` become `""`.
pub(crate) fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Lenient {
        Text(String),
        Number(serde_json::Number),
        Flag(bool),
    }

    Ok(match Option::<Lenient>::deserialize(deserializer)? {
        Some(Lenient::Text(s)) => s,
        Some(Lenient::Number(n)) => n.to_string(),
        Some(Lenient::Flag(b)) => b.to_string(),
        None => String::new(),
    })
}
