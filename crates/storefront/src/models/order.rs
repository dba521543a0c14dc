//! Orders and their display form with user/product references resolved.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use bazaar_core::{Email, OrderId, OrderStatus, ProductId, UserId};

use super::{Product, User};

/// One ordered line. Product reference and unit price are copied from the
/// client at order time and never re-checked against the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub product_id: ProductId,
    pub qty: i32,
    /// Written as a JSON number; read from a number or a numeric string.
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub price: Decimal,
}

/// A stored order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[serde(rename = "_id")]
    pub id: OrderId,
    pub user_id: UserId,
    pub cart_items: Vec<OrderItem>,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_amount: Decimal,
    pub order_date: DateTime<Utc>,
    pub order_status: OrderStatus,
}

/// Validation failures for a [`NewOrder`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OrderValidationError {
    #[error("order must contain at least one item")]
    EmptyCart,
    #[error("item {index}: quantity must be at least 1 (got {qty})")]
    QuantityTooLow { index: usize, qty: i32 },
}

/// An order ready to be stored. The user and products are not checked for
/// existence; only presence and quantities are.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrder {
    pub user_id: UserId,
    pub cart_items: Vec<OrderItem>,
    pub total_amount: Decimal,
}

impl NewOrder {
    /// Check the invariants the store relies on.
    ///
    /// # Errors
    ///
    /// Returns [`OrderValidationError`] for an empty cart or any item with
    /// `qty < 1`.
    pub fn validate(&self) -> Result<(), OrderValidationError> {
        if self.cart_items.is_empty() {
            return Err(OrderValidationError::EmptyCart);
        }

        if let Some((index, item)) = self
            .cart_items
            .iter()
            .enumerate()
            .find(|(_, item)| item.qty < 1)
        {
            return Err(OrderValidationError::QuantityTooLow {
                index,
                qty: item.qty,
            });
        }

        Ok(())
    }

    /// Build the stored record. New orders always start as `Pending`.
    #[must_use]
    pub fn into_order(self, id: OrderId, order_date: DateTime<Utc>) -> Order {
        Order {
            id,
            user_id: self.user_id,
            cart_items: self.cart_items,
            total_amount: self.total_amount,
            order_date,
            order_status: OrderStatus::Pending,
        }
    }
}

/// User fields shown on an order listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    #[serde(rename = "_id")]
    pub id: UserId,
    pub first_name: String,
    pub last_name: String,
    pub email: Email,
}

impl From<User> for UserSummary {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
        }
    }
}

/// Product fields shown on an order listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductSummary {
    #[serde(rename = "_id")]
    pub id: ProductId,
    pub name: String,
    pub price: String,
}

impl From<Product> for ProductSummary {
    fn from(product: Product) -> Self {
        Self {
            id: product.id,
            name: product.name,
            price: product.price,
        }
    }
}

/// An order line with its product reference resolved (`null` if dangling).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemWithProduct {
    pub product_id: Option<ProductSummary>,
    pub qty: i32,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
}

/// An order with its user and product references resolved.
///
/// Keys match the stored order, so `userId` holds the user summary (or
/// `null` when the user no longer exists).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderWithRelations {
    #[serde(rename = "_id")]
    pub id: OrderId,
    pub user_id: Option<UserSummary>,
    pub cart_items: Vec<OrderItemWithProduct>,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_amount: Decimal,
    pub order_date: DateTime<Utc>,
    pub order_status: OrderStatus,
}

impl OrderWithRelations {
    /// Resolve an order's references against pre-fetched lookups.
    #[must_use]
    pub fn resolve(
        order: Order,
        users: &HashMap<UserId, UserSummary>,
        products: &HashMap<ProductId, ProductSummary>,
    ) -> Self {
        let cart_items = order
            .cart_items
            .into_iter()
            .map(|item| OrderItemWithProduct {
                product_id: products.get(&item.product_id).cloned(),
                qty: item.qty,
                price: item.price,
            })
            .collect();

        Self {
            id: order.id,
            user_id: users.get(&order.user_id).cloned(),
            cart_items,
            total_amount: order.total_amount,
            order_date: order.order_date,
            order_status: order.order_status,
        }
    }
}
