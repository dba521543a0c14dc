//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                        - Liveness text
//!
//! # Users
//! POST /signup                  - Register a user
//! POST /login                   - Look up a user by email
//! GET  /allusers                - List users
//!
//! # Catalog
//! POST /uploadProduct           - Add a product
//! GET  /product                 - List products
//! GET  /product/{id}            - Product detail
//!
//! # Contact & feedback
//! POST /contact                 - Contact form (registered emails only)
//! GET  /allcontacts             - List contact submissions
//! POST /feedback                - Product review
//!
//! # Addresses
//! POST /address                 - Store a shipping address
//! GET  /address?email=          - First address for an email
//! GET  /addresses               - List addresses
//!
//! # Orders & checkout
//! POST /order                   - Place an order
//! GET  /orders                  - List orders with user/products resolved
//! POST /create-checkout-session - Start a hosted payment session
//! ```

pub mod addresses;
pub mod checkout;
pub mod contact;
pub mod feedback;
pub mod health;
pub mod home;
pub mod orders;
pub mod products;
pub mod responses;
pub mod users;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the user routes router.
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/signup", post(users::signup))
        .route("/login", post(users::login))
        .route("/allusers", get(users::index))
}

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/uploadProduct", post(products::upload))
        .route("/product", get(products::index))
        .route("/product/{id}", get(products::show))
}

/// Create the order and checkout routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/order", post(orders::create))
        .route("/orders", get(orders::index))
        .route("/create-checkout-session", post(checkout::create_session))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .merge(user_routes())
        .merge(product_routes())
        .route("/contact", post(contact::submit))
        .route("/allcontacts", get(contact::index))
        .route("/feedback", post(feedback::submit))
        .route("/address", post(addresses::submit).get(addresses::show))
        .route("/addresses", get(addresses::index))
        .merge(order_routes())
}
