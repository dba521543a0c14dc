//! Record storage for the storefront.
//!
//! # Collections (schema `shop`)
//!
//! - `users` - Registered users (unique email)
//! - `products` - Catalog
//! - `contacts` - Contact form submissions
//! - `addresses` - Shipping addresses (many per email)
//! - `orders` - Orders, cart items embedded as JSONB
//! - `feedback` - Product reviews (write-only)
//!
//! [`Store`] is the document-store seam: one async method per single
//! collection read or write. [`PgStore`] is the production backend and
//! [`MemoryStore`] backs tests and local runs. The existence and uniqueness
//! rules that span collections live in [`Records`].
//!
//! # Migrations
//!
//! Migrations are stored in `crates/storefront/migrations/` and run via:
//! ```bash
//! cargo run -p bazaar-cli -- migrate
//! ```

mod memory;
mod postgres;
mod records;

pub use memory::MemoryStore;
pub use postgres::PgStore;
pub use records::Records;

use std::time::Duration;

use async_trait::async_trait;
use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use bazaar_core::{Email, ProductId, UserId};

use crate::models::{
    Address, Contact, Feedback, NewAddress, NewContact, NewFeedback, NewOrder, NewProduct,
    NewUser, Order, OrderValidationError, Product, User,
};

/// Errors from the record layer.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Unique field already taken (e.g., user email).
    #[error("constraint violation: {0}")]
    Conflict(String),

    /// A record this one depends on does not exist.
    #[error("precondition failed: {0}")]
    PreconditionFailed(String),

    /// Record failed validation before being written.
    #[error("validation failed: {0}")]
    Validation(#[from] OrderValidationError),
}

/// Single-collection operations over the six record kinds.
///
/// Implementations generate ids and timestamps on insert. List methods
/// return records in insertion order and never mutate.
#[async_trait]
pub trait Store: Send + Sync {
    /// Cheap connectivity check for readiness probes.
    async fn ping(&self) -> Result<(), RepositoryError>;

    /// Insert a user.
    ///
    /// Must return [`RepositoryError::Conflict`] if the email is taken.
    async fn insert_user(&self, new_user: NewUser) -> Result<User, RepositoryError>;
    async fn find_user_by_email(&self, email: &Email) -> Result<Option<User>, RepositoryError>;
    async fn find_users(&self, ids: &[UserId]) -> Result<Vec<User>, RepositoryError>;
    async fn list_users(&self) -> Result<Vec<User>, RepositoryError>;

    async fn insert_product(&self, new_product: NewProduct) -> Result<Product, RepositoryError>;
    async fn find_product(&self, id: ProductId) -> Result<Option<Product>, RepositoryError>;
    async fn find_products(&self, ids: &[ProductId]) -> Result<Vec<Product>, RepositoryError>;
    async fn list_products(&self) -> Result<Vec<Product>, RepositoryError>;

    async fn insert_contact(&self, new_contact: NewContact) -> Result<Contact, RepositoryError>;
    async fn list_contacts(&self) -> Result<Vec<Contact>, RepositoryError>;

    async fn insert_address(&self, new_address: NewAddress) -> Result<Address, RepositoryError>;
    /// Earliest stored address for `email`, if any.
    async fn find_address_by_email(
        &self,
        email: &Email,
    ) -> Result<Option<Address>, RepositoryError>;
    async fn list_addresses(&self) -> Result<Vec<Address>, RepositoryError>;

    async fn insert_order(&self, new_order: NewOrder) -> Result<Order, RepositoryError>;
    async fn list_orders(&self) -> Result<Vec<Order>, RepositoryError>;

    async fn insert_feedback(&self, new_feedback: NewFeedback)
    -> Result<Feedback, RepositoryError>;
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(1)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
