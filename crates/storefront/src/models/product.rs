//! Catalog products.

use serde::{Deserialize, Serialize};

use bazaar_core::ProductId;

use super::lenient_string;

/// A catalog entry.
///
/// `price` is display text chosen by whoever uploaded the product; it is
/// not parsed or validated as a number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(rename = "_id")]
    pub id: ProductId,
    pub name: String,
    pub category: String,
    pub image: Option<String>,
    pub price: String,
    pub description: String,
}

/// Product upload payload.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub category: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub price: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub description: String,
}

impl NewProduct {
    #[must_use]
    pub fn into_product(self, id: ProductId) -> Product {
        Product {
            id,
            name: self.name,
            category: self.category,
            image: self.image,
            price: self.price,
            description: self.description,
        }
    }
}
