//! `PgStore` against a live database.
//!
//! These tests require:
//! - A running `PostgreSQL` database
//! - `STOREFRONT_DATABASE_URL` pointing at a scratch database
//!
//! Run with: cargo test -p bazaar-integration-tests -- --ignored

use std::sync::Arc;

use rust_decimal::Decimal;
use secrecy::SecretString;
use sqlx::PgPool;
use uuid::Uuid;

use bazaar_core::{Email, OrderStatus, ProductId};
use bazaar_storefront::db::{PgStore, Records, RepositoryError, Store, create_pool};
use bazaar_storefront::models::{NewAddress, NewOrder, NewProduct, NewUser, OrderItem};

async fn pool() -> PgPool {
    let url = std::env::var("STOREFRONT_DATABASE_URL")
        .expect("STOREFRONT_DATABASE_URL must be set for database tests");
    let pool = create_pool(&SecretString::from(url))
        .await
        .expect("Failed to connect to database");
    sqlx::migrate!("../storefront/migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");
    pool
}

/// Unique address so tests can share one database.
fn unique_email() -> Email {
    Email::parse(&format!("test-{}@example.in", Uuid::new_v4().simple())).unwrap()
}

fn new_user(email: &Email) -> NewUser {
    NewUser {
        first_name: "Asha".to_string(),
        last_name: "Rao".to_string(),
        email: email.clone(),
        password: "hunter22".to_string(),
        confirm_password: "hunter22".to_string(),
        image: None,
    }
}

#[tokio::test]
#[ignore = "requires PostgreSQL"]
async fn duplicate_email_hits_unique_index() {
    let store = PgStore::new(pool().await);
    let email = unique_email();

    let user = store.insert_user(new_user(&email)).await.unwrap();
    assert_eq!(user.email, email);

    let err = store.insert_user(new_user(&email)).await.unwrap_err();
    assert!(matches!(err, RepositoryError::Conflict(_)));

    let found = store.find_user_by_email(&email).await.unwrap().unwrap();
    assert_eq!(found.id, user.id);
}

#[tokio::test]
#[ignore = "requires PostgreSQL"]
async fn order_round_trips_cart_items() {
    let store = PgStore::new(pool().await);
    let user = store.insert_user(new_user(&unique_email())).await.unwrap();
    let product = store
        .insert_product(NewProduct {
            name: "Linen Shirt".to_string(),
            category: "shirts".to_string(),
            image: None,
            price: "1499".to_string(),
            description: String::new(),
        })
        .await
        .unwrap();

    let order = store
        .insert_order(NewOrder {
            user_id: user.id,
            cart_items: vec![OrderItem {
                product_id: product.id,
                qty: 2,
                price: Decimal::new(149_950, 2),
            }],
            total_amount: Decimal::new(299_900, 2),
        })
        .await
        .unwrap();

    assert_eq!(order.order_status, OrderStatus::Pending);

    let stored = store
        .list_orders()
        .await
        .unwrap()
        .into_iter()
        .find(|o| o.id == order.id)
        .unwrap();
    assert_eq!(stored.cart_items, order.cart_items);
    assert_eq!(stored.total_amount, Decimal::new(299_900, 2));

    let missing = store.find_products(&[ProductId::generate()]).await.unwrap();
    assert!(missing.is_empty());
}

#[tokio::test]
#[ignore = "requires PostgreSQL"]
async fn address_lookup_returns_earliest() {
    let records = Records::new(Arc::new(PgStore::new(pool().await)));
    let email = unique_email();
    records.register_user(new_user(&email)).await.unwrap();

    for street in ["1 MG Road", "22 Brigade Road"] {
        records
            .submit_address(NewAddress {
                name: "Asha Rao".to_string(),
                email: email.clone(),
                phone: String::new(),
                street: street.to_string(),
                city: "Bengaluru".to_string(),
                state: "KA".to_string(),
                postal_code: "560001".to_string(),
            })
            .await
            .unwrap();
    }

    let address = records.find_address_by_email(&email).await.unwrap().unwrap();
    assert_eq!(address.street, "1 MG Road");
}
