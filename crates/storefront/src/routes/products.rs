//! Catalog route handlers.

use axum::{
    Json,
    extract::{Path, State},
};
use tracing::instrument;

use bazaar_core::ProductId;

use super::responses::MessageResponse;
use crate::error::{AppError, JsonBody, Result, StoreContext};
use crate::models::{NewProduct, Product};
use crate::state::AppState;

/// Add a product to the catalog.
///
/// POST /uploadProduct
#[instrument(skip(state, new_product), fields(name = %new_product.name))]
pub async fn upload(
    State(state): State<AppState>,
    JsonBody(new_product): JsonBody<NewProduct>,
) -> Result<Json<MessageResponse>> {
    let product = state
        .records()
        .upload_product(new_product)
        .await
        .or_store_error("Error uploading product")?;

    tracing::info!(product_id = %product.id, "Product uploaded");
    Ok(Json(MessageResponse::new("Product uploaded successfully")))
}

/// List the catalog in upload order.
///
/// GET /product
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Result<Json<Vec<Product>>> {
    let products = state
        .records()
        .list_products()
        .await
        .or_store_error("Error retrieving products")?;

    Ok(Json(products))
}

/// Product detail.
///
/// GET /product/{id}
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<Product>> {
    // Ids that don't parse can't exist
    let Ok(id) = id.parse::<ProductId>() else {
        return Err(AppError::NotFound("Product not found".to_string()));
    };

    state
        .records()
        .find_product(id)
        .await
        .or_store_error("Error retrieving products")?
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Product not found".to_string()))
}
