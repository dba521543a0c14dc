//! Contact form, shipping addresses and feedback.

use axum::http::{Method, StatusCode};
use serde_json::{Value, json};

use bazaar_integration_tests::{TestApp, failing_app, send};

fn contact(email: &str) -> Value {
    json!({"name": "Asha", "email": email, "phone": 9_876_543_210_u64, "message": "Where is my parcel?"})
}

fn address(email: &str, street: &str) -> Value {
    json!({
        "name": "Asha Rao",
        "email": email,
        "phone": "9876543210",
        "street": street,
        "city": "Bengaluru",
        "state": "KA",
        "postalCode": "560001"
    })
}

#[tokio::test]
async fn contact_requires_registered_email() {
    let app = TestApp::new();

    let response = app.post_json("/contact", &contact("stranger@example.in")).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body, json!({"message": "User not found"}));

    let contacts = app.get("/allcontacts").await;
    assert_eq!(contacts.body["data"], json!([]));
}

#[tokio::test]
async fn contact_from_registered_user() {
    let app = TestApp::new();
    app.register("asha@example.in").await;

    let response = app.post_json("/contact", &contact("asha@example.in")).await;
    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(
        response.body,
        json!({"message": "Contact submitted successfully"})
    );

    let contacts = app.get("/allcontacts").await;
    assert_eq!(contacts.status, StatusCode::OK);
    assert_eq!(contacts.body["message"], "Data fetched");
    assert_eq!(contacts.body["alert"], true);

    let data = contacts.body["data"].as_array().unwrap();
    assert_eq!(data.len(), 1);
    assert_eq!(data[0]["phone"], "9876543210");
    assert!(data[0]["date"].is_string());
}

#[tokio::test]
async fn address_lookup_without_addresses_is_404() {
    let app = TestApp::new();

    for uri in ["/address?email=asha@example.in", "/address", "/address?email=bogus"] {
        let response = app.get(uri).await;
        assert_eq!(response.status, StatusCode::NOT_FOUND, "{uri}");
        assert_eq!(response.body, json!({"message": "Address not found"}));
    }
}

#[tokio::test]
async fn address_requires_registered_email() {
    let app = TestApp::new();

    let response = app
        .post_json("/address", &address("stranger@example.in", "1 MG Road"))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body, json!({"message": "User not found"}));
    assert_eq!(app.get("/addresses").await.body, json!([]));
}

#[tokio::test]
async fn address_lookup_returns_first_submitted() {
    let app = TestApp::new();
    app.register("asha@example.in").await;

    for street in ["1 MG Road", "22 Brigade Road"] {
        let response = app
            .post_json("/address", &address("asha@example.in", street))
            .await;
        assert_eq!(response.status, StatusCode::CREATED);
        assert_eq!(response.body, json!({"message": "Address submitted"}));
    }

    let response = app.get("/address?email=asha@example.in").await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["street"], "1 MG Road");
    assert_eq!(response.body["postalCode"], "560001");

    let all = app.get("/addresses").await;
    assert_eq!(all.body.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn feedback_is_stored_without_checks() {
    let app = TestApp::new();

    let response = app
        .post_json(
            "/feedback",
            &json!({
                "name": "Ravi",
                "email": "anything",
                "productName": "Linen Shirt",
                "rating": 5,
                "comment": "Fits well"
            }),
        )
        .await;

    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.body, json!({"message": "Feedback submitted"}));
    assert_eq!(app.store.feedback_count().await, 1);
}

#[tokio::test]
async fn store_failures_use_endpoint_messages() {
    let router = failing_app();
    let server_error = json!({"message": "Server error"});

    let cases = [
        (Method::POST, "/contact", Some(contact("asha@example.in")), server_error.clone()),
        (
            Method::POST,
            "/address",
            Some(address("asha@example.in", "12 MG Road")),
            server_error.clone(),
        ),
        (
            Method::POST,
            "/feedback",
            Some(json!({"name": "Ravi", "rating": 4})),
            server_error.clone(),
        ),
        (Method::GET, "/address?email=asha@example.in", None, server_error),
        (
            Method::GET,
            "/allcontacts",
            None,
            json!({"message": "Error fetching data"}),
        ),
        (
            Method::GET,
            "/addresses",
            None,
            json!({"message": "Error fetching addresses"}),
        ),
    ];

    for (method, uri, body, expected) in cases {
        let response = send(&router, method, uri, body.map(|b| b.to_string())).await;
        assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR, "{uri}");
        assert_eq!(response.body, expected, "{uri}");
    }
}
