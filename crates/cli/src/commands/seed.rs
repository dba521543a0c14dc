//! Seed the catalog from a YAML file.
//!
//! The file is a list of products in the same shape `POST /uploadProduct`
//! accepts:
//!
//! ```yaml
//! - name: Linen Shirt
//!   category: shirts
//!   price: "1499"
//!   description: Breathable summer shirt
//!   image: https://cdn.example.in/linen.jpg
//! ```
//!
//! The whole file is parsed and validated before connecting to the
//! database. Products are inserted in file order, so the catalog listing
//! follows it.

use std::path::Path;
use std::sync::Arc;

use tracing::{error, info};

use bazaar_storefront::db::{self, PgStore, Records};
use bazaar_storefront::models::NewProduct;

/// Parse a catalog file's contents.
///
/// # Errors
///
/// Returns an error if the YAML is malformed or not a list of products.
pub fn parse_catalog(content: &str) -> Result<Vec<NewProduct>, serde_yaml::Error> {
    serde_yaml::from_str(content)
}

/// Problems that would make a product useless in the storefront.
#[must_use]
pub fn validate_catalog(products: &[NewProduct]) -> Vec<String> {
    products
        .iter()
        .enumerate()
        .flat_map(|(index, product)| {
            let mut errors = Vec::new();
            if product.name.trim().is_empty() {
                errors.push(format!("product {index}: name is empty"));
            }
            if product.price.trim().is_empty() {
                errors.push(format!("product {index} ({}): price is empty", product.name));
            }
            errors
        })
        .collect()
}

/// Insert every product from `file_path`.
///
/// # Errors
///
/// Returns an error if the file cannot be read or validated, the database
/// URL is missing, or an insert fails.
pub async fn catalog(file_path: &str) -> Result<(), Box<dyn std::error::Error>> {
    let path = Path::new(file_path);
    if !path.exists() {
        return Err(format!("File not found: {file_path}").into());
    }

    info!(path = %file_path, "Loading catalog from file");
    let content = tokio::fs::read_to_string(path).await?;
    let products = parse_catalog(&content)?;
    info!(products = products.len(), "Parsed catalog");

    let errors = validate_catalog(&products);
    if !errors.is_empty() {
        error!("Catalog validation failed:");
        for err in &errors {
            error!("  - {err}");
        }
        return Err(format!("{} validation errors found", errors.len()).into());
    }

    let database_url = super::database_url()?;
    let pool = db::create_pool(&database_url).await?;
    info!("Connected to database");

    let records = Records::new(Arc::new(PgStore::new(pool.clone())));
    let mut inserted = 0_usize;
    for product in products {
        let product = records.upload_product(product).await?;
        info!(product_id = %product.id, name = %product.name, "Inserted product");
        inserted += 1;
    }

    pool.close().await;
    info!(inserted, "Seeding complete");
    Ok(())
}
