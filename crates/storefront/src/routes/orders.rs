//! Order route handlers.
//!
//! An item with `qty < 1` is a 400 with the validation message rather than
//! a store failure.

use axum::{Json, extract::State, http::StatusCode};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::instrument;

use bazaar_core::{OrderId, UserId};

use crate::db::RepositoryError;
use crate::error::{AppError, JsonBody, Result, StoreContext};
use crate::models::{NewOrder, OrderItem, OrderWithRelations};
use crate::state::AppState;

/// Order request body. Every field is optional here so that absence maps
/// to `Missing fields` instead of a deserialization error.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRequest {
    #[serde(default, deserialize_with = "blank_as_none")]
    pub user_id: Option<UserId>,
    pub cart_items: Option<Vec<OrderItem>>,
    /// Number or numeric string.
    #[serde(default)]
    pub total_amount: Option<Decimal>,
}

/// An empty `userId` counts as absent; anything else must be a valid id.
fn blank_as_none<'de, D>(deserializer: D) -> std::result::Result<Option<UserId>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(id) if !id.is_empty() => id.parse().map(Some).map_err(serde::de::Error::custom),
        _ => Ok(None),
    }
}

impl OrderRequest {
    /// `None` when any field is absent, the cart is empty or the total is zero.
    fn into_new_order(self) -> Option<NewOrder> {
        let user_id = self.user_id?;
        let cart_items = self.cart_items.filter(|items| !items.is_empty())?;
        let total_amount = self.total_amount.filter(|total| !total.is_zero())?;

        Some(NewOrder {
            user_id,
            cart_items,
            total_amount,
        })
    }
}

/// Response for a created order.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderCreated {
    pub message: &'static str,
    pub order_id: OrderId,
}

/// Place an order.
///
/// POST /order
#[instrument(skip(state, request), fields(user_id = ?request.user_id))]
pub async fn create(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<OrderRequest>,
) -> Result<(StatusCode, Json<OrderCreated>)> {
    let Some(new_order) = request.into_new_order() else {
        return Err(AppError::BadRequest("Missing fields".to_string()));
    };

    match state.records().place_order(new_order).await {
        Ok(order) => {
            tracing::info!(order_id = %order.id, total = %order.total_amount, "Order created");
            Ok((
                StatusCode::CREATED,
                Json(OrderCreated {
                    message: "Order created",
                    order_id: order.id,
                }),
            ))
        }
        Err(RepositoryError::Validation(e)) => Err(AppError::BadRequest(e.to_string())),
        Err(source) => Err(AppError::store(source, "Order creation failed")),
    }
}

/// List orders with the user and each item's product resolved.
///
/// GET /orders
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Result<Json<Vec<OrderWithRelations>>> {
    let orders = state
        .records()
        .list_orders_with_relations()
        .await
        .or_store_error_keyed("error", "Failed to fetch orders")?;

    Ok(Json(orders))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn parse(body: &str) -> OrderRequest {
        serde_json::from_str(body).unwrap()
    }

    #[test]
    fn test_complete_request() {
        let user_id = UserId::generate();
        let product_id = bazaar_core::ProductId::generate();
        let order = parse(&format!(
            r#"{{"userId": "{user_id}", "cartItems": [{{"productId": "{product_id}", "qty": 2, "price": 500}}], "totalAmount": 1000}}"#
        ))
        .into_new_order()
        .unwrap();

        assert_eq!(order.user_id, user_id);
        assert_eq!(order.cart_items.len(), 1);
        assert_eq!(order.total_amount, Decimal::new(1000, 0));
    }

    #[test]
    fn test_missing_fields() {
        let user_id = UserId::generate();
        assert!(parse("{}").into_new_order().is_none());
        assert!(
            parse(&format!(r#"{{"userId": "{user_id}", "totalAmount": 10}}"#))
                .into_new_order()
                .is_none()
        );
        assert!(
            parse(&format!(
                r#"{{"userId": "{user_id}", "cartItems": [], "totalAmount": 10}}"#
            ))
            .into_new_order()
            .is_none()
        );
        assert!(
            parse(r#"{"cartItems": [], "totalAmount": null}"#)
                .into_new_order()
                .is_none()
        );
    }

    #[test]
    fn test_empty_user_id_counts_as_missing() {
        let product_id = bazaar_core::ProductId::generate();
        let request = parse(&format!(
            r#"{{"userId": "", "cartItems": [{{"productId": "{product_id}", "qty": 1, "price": 5}}], "totalAmount": 5}}"#
        ));
        assert!(request.user_id.is_none());
        assert!(request.into_new_order().is_none());
        assert!(serde_json::from_str::<OrderRequest>(r#"{"userId": "64f0c0ffee"}"#).is_err());
    }

    #[test]
    fn test_numeric_strings_are_accepted() {
        let user_id = UserId::generate();
        let product_id = bazaar_core::ProductId::generate();
        let order = parse(&format!(
            r#"{{"userId": "{user_id}", "cartItems": [{{"productId": "{product_id}", "qty": 2, "price": "499.50"}}], "totalAmount": "999"}}"#
        ))
        .into_new_order()
        .unwrap();

        assert_eq!(order.cart_items[0].price, Decimal::new(49_950, 2));
        assert_eq!(order.total_amount, Decimal::new(999, 0));
    }

    #[test]
    fn test_zero_total_counts_as_missing() {
        let user_id = UserId::generate();
        let product_id = bazaar_core::ProductId::generate();
        let request = parse(&format!(
            r#"{{"userId": "{user_id}", "cartItems": [{{"productId": "{product_id}", "qty": 1, "price": 5}}], "totalAmount": 0}}"#
        ));
        assert!(request.into_new_order().is_none());
    }
}
