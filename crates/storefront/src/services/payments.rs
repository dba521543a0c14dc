//! Payment-session gateway seam and cart-to-line-item assembly.

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use bazaar_core::{CurrencyCode, Price, PriceError};

/// Errors that can occur when creating a checkout session.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// HTTP request failed before the provider answered.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Provider rejected the request.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Provider answered with something we could not read.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Cart item cannot be turned into a line item.
    #[error("Invalid cart item: {0}")]
    InvalidItem(String),
}

impl GatewayError {
    /// HTTP status to report to the client: the provider's own status when
    /// it answered, 400 for carts rejected locally, 500 otherwise.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::Api { status, .. } => *status,
            Self::InvalidItem(_) => 400,
            Self::Http(_) | Self::Parse(_) => 500,
        }
    }

    /// Message to report to the client.
    #[must_use]
    pub fn client_message(&self) -> String {
        match self {
            Self::Api { message, .. } => message.clone(),
            Self::InvalidItem(reason) => reason.clone(),
            Self::Http(_) | Self::Parse(_) => "Payment provider unavailable".to_string(),
        }
    }
}

/// One cart entry as sent by the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutItem {
    pub name: String,
    /// Unit price in major currency units (rupees).
    pub price: Decimal,
    pub qty: i64,
}

/// A provider line item, amounts already in minor units.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineItem {
    pub name: String,
    pub currency: CurrencyCode,
    pub unit_amount: i64,
    pub quantity: u32,
}

/// Hosted checkout session returned by the provider.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CheckoutSession {
    pub id: String,
}

/// Converts a cart into an externally hosted checkout session.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Create a session for `items` and return it.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError`] if the cart is invalid or the provider
    /// refuses or cannot be reached.
    async fn create_checkout_session(
        &self,
        items: &[CheckoutItem],
    ) -> Result<CheckoutSession, GatewayError>;
}

/// Convert cart items into line items priced in `currency` minor units.
///
/// # Errors
///
/// Returns [`GatewayError::InvalidItem`] for an empty cart, a negative or
/// oversized price, or a quantity below 1.
pub fn line_items(
    items: &[CheckoutItem],
    currency: CurrencyCode,
) -> Result<Vec<LineItem>, GatewayError> {
    if items.is_empty() {
        return Err(GatewayError::InvalidItem("cart is empty".to_string()));
    }

    items
        .iter()
        .map(|item| {
            let unit_amount = Price::new(item.price, currency)
                .to_minor_units()
                .map_err(|e: PriceError| GatewayError::InvalidItem(format!("{}: {e}", item.name)))?;

            let quantity = u32::try_from(item.qty)
                .ok()
                .filter(|qty| *qty >= 1)
                .ok_or_else(|| {
                    GatewayError::InvalidItem(format!(
                        "{}: quantity must be at least 1 (got {})",
                        item.name, item.qty
                    ))
                })?;

            Ok(LineItem {
                name: item.name.clone(),
                currency,
                unit_amount,
                quantity,
            })
        })
        .collect()
}
