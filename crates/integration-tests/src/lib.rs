//! Integration tests for the Bazaar storefront.
//!
//! # Running Tests
//!
//! ```bash
//! # In-process tests (no external services)
//! cargo test -p bazaar-integration-tests
//!
//! # PostgreSQL-backed tests (needs STOREFRONT_DATABASE_URL)
//! cargo test -p bazaar-integration-tests -- --ignored
//! ```
//!
//! The in-process tests drive the full router built by
//! [`bazaar_storefront::app`] with `tower::ServiceExt::oneshot`, backed by
//! [`MemoryStore`] and a [`RecordingGateway`] in place of Stripe.

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{HeaderMap, Method, Request, StatusCode, header},
};
use serde_json::Value;
use tower::ServiceExt;

use bazaar_core::{CurrencyCode, Email, ProductId, UserId};
use bazaar_storefront::db::{MemoryStore, RepositoryError, Store};
use bazaar_storefront::models::{
    Address, Contact, Feedback, NewAddress, NewContact, NewFeedback, NewOrder, NewProduct,
    NewUser, Order, Product, User,
};
use bazaar_storefront::services::payments::line_items;
use bazaar_storefront::services::{
    CheckoutItem, CheckoutSession, GatewayError, LineItem, PaymentGateway,
};
use bazaar_storefront::state::AppState;

/// A response with its body decoded as JSON, or as a JSON string when the
/// body is plain text.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

/// The full application wired to in-memory doubles.
pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryStore>,
    pub gateway: Arc<RecordingGateway>,
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}

impl TestApp {
    #[must_use]
    pub fn new() -> Self {
        Self::with_gateway(RecordingGateway::default())
    }

    #[must_use]
    pub fn with_gateway(gateway: RecordingGateway) -> Self {
        let store = Arc::new(MemoryStore::new());
        let gateway = Arc::new(gateway);
        let router = bazaar_storefront::app(AppState::new(store.clone(), gateway.clone()));
        Self {
            router,
            store,
            gateway,
        }
    }

    pub async fn get(&self, uri: &str) -> TestResponse {
        self.send(Method::GET, uri, None).await
    }

    pub async fn post_json(&self, uri: &str, body: &Value) -> TestResponse {
        self.send(Method::POST, uri, Some(body.to_string())).await
    }

    /// POST a raw body labelled as JSON (for malformed-input tests).
    pub async fn post_raw(&self, uri: &str, body: &str) -> TestResponse {
        self.send(Method::POST, uri, Some(body.to_string())).await
    }

    async fn send(&self, method: Method, uri: &str, body: Option<String>) -> TestResponse {
        send(&self.router, method, uri, body).await
    }

    /// Register a user through the API and return its email.
    pub async fn register(&self, email: &str) -> String {
        let response = self
            .post_json(
                "/signup",
                &serde_json::json!({
                    "firstName": "Asha",
                    "lastName": "Rao",
                    "email": email,
                    "password": "hunter22",
                    "confirmPassword": "hunter22",
                }),
            )
            .await;
        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.body["alert"], true);
        email.to_string()
    }
}

/// Send one request through `router`.
pub async fn send(router: &Router, method: Method, uri: &str, body: Option<String>) -> TestResponse {
    let mut builder = Request::builder().method(method).uri(uri);
    if body.is_some() {
        builder = builder.header(header::CONTENT_TYPE, "application/json");
    }
    let request = builder
        .body(body.map_or_else(Body::empty, Body::from))
        .unwrap();

    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));

    TestResponse {
        status,
        headers,
        body,
    }
}

/// Payment gateway double that prices carts like the real client and
/// records the resulting line items.
#[derive(Default)]
pub struct RecordingGateway {
    calls: Mutex<Vec<Vec<LineItem>>>,
    refusal: Option<(u16, String)>,
}

impl RecordingGateway {
    /// A gateway that refuses every valid cart with `status` and `message`.
    #[must_use]
    pub fn refusing(status: u16, message: &str) -> Self {
        Self {
            calls: Mutex::default(),
            refusal: Some((status, message.to_string())),
        }
    }

    /// Line items of every cart that reached the provider, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<Vec<LineItem>> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl PaymentGateway for RecordingGateway {
    async fn create_checkout_session(
        &self,
        items: &[CheckoutItem],
    ) -> Result<CheckoutSession, GatewayError> {
        let items = line_items(items, CurrencyCode::INR)?;
        let mut calls = self.calls.lock().unwrap();
        calls.push(items);

        if let Some((status, message)) = &self.refusal {
            return Err(GatewayError::Api {
                status: *status,
                message: message.clone(),
            });
        }
        Ok(CheckoutSession {
            id: format!("cs_test_{}", calls.len()),
        })
    }
}

/// Store whose every operation fails, for 5xx paths.
pub struct FailingStore;

fn offline() -> RepositoryError {
    RepositoryError::DataCorruption("store offline".to_string())
}

#[async_trait]
impl Store for FailingStore {
    async fn ping(&self) -> Result<(), RepositoryError> {
        Err(offline())
    }
    async fn insert_user(&self, _: NewUser) -> Result<User, RepositoryError> {
        Err(offline())
    }
    async fn find_user_by_email(&self, _: &Email) -> Result<Option<User>, RepositoryError> {
        Err(offline())
    }
    async fn find_users(&self, _: &[UserId]) -> Result<Vec<User>, RepositoryError> {
        Err(offline())
    }
    async fn list_users(&self) -> Result<Vec<User>, RepositoryError> {
        Err(offline())
    }
    async fn insert_product(&self, _: NewProduct) -> Result<Product, RepositoryError> {
        Err(offline())
    }
    async fn find_product(&self, _: ProductId) -> Result<Option<Product>, RepositoryError> {
        Err(offline())
    }
    async fn find_products(&self, _: &[ProductId]) -> Result<Vec<Product>, RepositoryError> {
        Err(offline())
    }
    async fn list_products(&self) -> Result<Vec<Product>, RepositoryError> {
        Err(offline())
    }
    async fn insert_contact(&self, _: NewContact) -> Result<Contact, RepositoryError> {
        Err(offline())
    }
    async fn list_contacts(&self) -> Result<Vec<Contact>, RepositoryError> {
        Err(offline())
    }
    async fn insert_address(&self, _: NewAddress) -> Result<Address, RepositoryError> {
        Err(offline())
    }
    async fn find_address_by_email(&self, _: &Email) -> Result<Option<Address>, RepositoryError> {
        Err(offline())
    }
    async fn list_addresses(&self) -> Result<Vec<Address>, RepositoryError> {
        Err(offline())
    }
    async fn insert_order(&self, _: NewOrder) -> Result<Order, RepositoryError> {
        Err(offline())
    }
    async fn list_orders(&self) -> Result<Vec<Order>, RepositoryError> {
        Err(offline())
    }
    async fn insert_feedback(&self, _: NewFeedback) -> Result<Feedback, RepositoryError> {
        Err(offline())
    }
}

/// Router over a [`FailingStore`].
#[must_use]
pub fn failing_app() -> Router {
    bazaar_storefront::app(AppState::new(
        Arc::new(FailingStore),
        Arc::new(RecordingGateway::default()),
    ))
}
