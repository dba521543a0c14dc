//! Checkout session creation, against the recording double and against a
//! local HTTP stand-in for the Stripe API.

use std::sync::{Arc, Mutex};

use axum::{Form, Json, Router, extract::State, http::StatusCode, routing::post};
use secrecy::SecretString;
use serde_json::json;

use bazaar_core::CurrencyCode;
use bazaar_integration_tests::{RecordingGateway, TestApp};
use bazaar_storefront::config::StripeConfig;
use bazaar_storefront::services::{
    CheckoutItem, GatewayError, LineItem, PaymentGateway, StripeClient,
};

#[tokio::test]
async fn checkout_returns_session_id_and_prices_in_paise() {
    let app = TestApp::new();

    let response = app
        .post_json(
            "/create-checkout-session",
            &json!([{"name": "Shirt", "price": 500, "qty": 2}]),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, json!("cs_test_1"));
    assert_eq!(
        app.gateway.calls(),
        vec![vec![LineItem {
            name: "Shirt".to_string(),
            currency: CurrencyCode::INR,
            unit_amount: 50_000,
            quantity: 2,
        }]]
    );
}

#[tokio::test]
async fn provider_refusal_keeps_status_and_message() {
    let app = TestApp::with_gateway(RecordingGateway::refusing(
        402,
        "Your card was declined.",
    ));

    let response = app
        .post_json(
            "/create-checkout-session",
            &json!([{"name": "Shirt", "price": 500, "qty": 1}]),
        )
        .await;

    assert_eq!(response.status, StatusCode::PAYMENT_REQUIRED);
    assert_eq!(response.body, json!("Your card was declined."));
}

#[tokio::test]
async fn invalid_carts_never_reach_the_provider() {
    let app = TestApp::new();

    for cart in [
        json!([]),
        json!([{"name": "Shirt", "price": 500, "qty": 0}]),
        json!([{"name": "Shirt", "price": -1, "qty": 1}]),
    ] {
        let response = app.post_json("/create-checkout-session", &cart).await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST, "{cart}");
        assert!(response.body.is_string());
    }

    let response = app
        .post_json("/create-checkout-session", &json!({"name": "Shirt"}))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    assert!(app.gateway.calls().is_empty());
}

// =============================================================================
// StripeClient against a local stand-in
// =============================================================================

type Captured = Arc<Mutex<Vec<(String, String)>>>;

async fn sessions(
    State(captured): State<Captured>,
    Form(form): Form<Vec<(String, String)>>,
) -> (StatusCode, Json<serde_json::Value>) {
    let declined = form
        .iter()
        .any(|(k, v)| k.ends_with("[product_data][name]") && v == "Declined");
    captured.lock().unwrap().extend(form);

    if declined {
        return (
            StatusCode::PAYMENT_REQUIRED,
            Json(json!({"error": {"message": "Your card was declined.", "type": "card_error"}})),
        );
    }
    (
        StatusCode::OK,
        Json(json!({"id": "cs_test_a1b2c3", "object": "checkout.session"})),
    )
}

async fn stripe_stub() -> (StripeClient, Captured) {
    let captured = Captured::default();
    let router = Router::new()
        .route("/v1/checkout/sessions", post(sessions))
        .with_state(captured.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    let client = StripeClient::new(&StripeConfig {
        secret_key: SecretString::from("sk_test_51PqRsTuVwXyZ9aBcDeFgHiJk"),
        api_base: format!("http://{addr}"),
        shipping_rate: "shr_test_rate".to_string(),
        frontend_url: "http://localhost:3000".to_string(),
    })
    .unwrap();

    (client, captured)
}

fn field<'a>(form: &'a [(String, String)], key: &str) -> Option<&'a str> {
    form.iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
}

#[tokio::test]
async fn stripe_client_sends_form_and_reads_session() {
    let (client, captured) = stripe_stub().await;

    let session = client
        .create_checkout_session(&[CheckoutItem {
            name: "Shirt".to_string(),
            price: "500".parse().unwrap(),
            qty: 2,
        }])
        .await
        .unwrap();
    assert_eq!(session.id, "cs_test_a1b2c3");

    let form = captured.lock().unwrap().clone();
    assert_eq!(field(&form, "mode"), Some("payment"));
    assert_eq!(field(&form, "line_items[0][price_data][unit_amount]"), Some("50000"));
    assert_eq!(field(&form, "line_items[0][price_data][currency]"), Some("inr"));
    assert_eq!(field(&form, "line_items[0][quantity]"), Some("2"));
    assert_eq!(
        field(&form, "success_url"),
        Some("http://localhost:3000/success")
    );
    assert_eq!(
        field(&form, "cancel_url"),
        Some("http://localhost:3000/cancel")
    );
}

#[tokio::test]
async fn stripe_client_surfaces_api_errors() {
    let (client, _) = stripe_stub().await;

    let err = client
        .create_checkout_session(&[CheckoutItem {
            name: "Declined".to_string(),
            price: "10".parse().unwrap(),
            qty: 1,
        }])
        .await
        .unwrap_err();

    match err {
        GatewayError::Api { status, message } => {
            assert_eq!(status, 402);
            assert_eq!(message, "Your card was declined.");
        }
        other => panic!("unexpected error: {other}"),
    }
}
