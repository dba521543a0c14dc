//! `PostgreSQL` backend for [`Store`].
//!
//! Queries are built at runtime (`query_as` + `FromRow`) rather than with the
//! checked macros, so the crate builds without a live database.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use sqlx::types::Json;
use tracing::instrument;
use uuid::Uuid;

use bazaar_core::{
    AddressId, ContactId, Email, FeedbackId, OrderId, OrderStatus, ProductId, UserId,
};

use super::{RepositoryError, Store};
use crate::models::{
    Address, Contact, Feedback, NewAddress, NewContact, NewFeedback, NewOrder, NewProduct,
    NewUser, Order, OrderItem, Product, User,
};

const USER_COLUMNS: &str = "id, first_name, last_name, email, image";
const PRODUCT_COLUMNS: &str = "id, name, category, image, price, description";
const CONTACT_COLUMNS: &str = "id, name, email, phone, message, date";
const ADDRESS_COLUMNS: &str = "id, name, email, phone, street, city, state, postal_code, date";
const ORDER_COLUMNS: &str = "id, user_id, cart_items, total_amount, order_date, order_status";
const FEEDBACK_COLUMNS: &str =
    "id, name, email, phone, product_name, rating, comment, date";

/// [`Store`] over a shared `PgPool`.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

/// Row shape of `shop.orders`; cart items are embedded as JSONB.
#[derive(sqlx::FromRow)]
struct OrderRow {
    id: OrderId,
    user_id: UserId,
    cart_items: Json<Vec<OrderItem>>,
    total_amount: Decimal,
    order_date: DateTime<Utc>,
    order_status: OrderStatus,
}

impl From<OrderRow> for Order {
    fn from(row: OrderRow) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            cart_items: row.cart_items.0,
            total_amount: row.total_amount,
            order_date: row.order_date,
            order_status: row.order_status,
        }
    }
}

impl PgStore {
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn map_unique_violation(e: sqlx::Error, what: &str) -> RepositoryError {
    if let sqlx::Error::Database(ref db_err) = e
        && db_err.is_unique_violation()
    {
        return RepositoryError::Conflict(format!("{what} already exists"));
    }
    RepositoryError::Database(e)
}

#[async_trait]
impl Store for PgStore {
    async fn ping(&self) -> Result<(), RepositoryError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    #[instrument(skip(self, new_user), fields(email = %new_user.email))]
    async fn insert_user(&self, new_user: NewUser) -> Result<User, RepositoryError> {
        let sql = format!(
            "INSERT INTO shop.users \
                 (id, first_name, last_name, email, password, confirm_password, image) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING {USER_COLUMNS}"
        );

        sqlx::query_as::<_, User>(&sql)
            .bind(UserId::generate())
            .bind(&new_user.first_name)
            .bind(&new_user.last_name)
            .bind(&new_user.email)
            .bind(&new_user.password)
            .bind(&new_user.confirm_password)
            .bind(&new_user.image)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_unique_violation(e, "email"))
    }

    async fn find_user_by_email(&self, email: &Email) -> Result<Option<User>, RepositoryError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM shop.users WHERE email = $1");
        Ok(sqlx::query_as::<_, User>(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn find_users(&self, ids: &[UserId]) -> Result<Vec<User>, RepositoryError> {
        let ids: Vec<Uuid> = ids.iter().map(UserId::as_uuid).collect();
        let sql = format!("SELECT {USER_COLUMNS} FROM shop.users WHERE id = ANY($1)");
        Ok(sqlx::query_as::<_, User>(&sql)
            .bind(ids)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn list_users(&self) -> Result<Vec<User>, RepositoryError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM shop.users ORDER BY created_at, id");
        Ok(sqlx::query_as::<_, User>(&sql).fetch_all(&self.pool).await?)
    }

    async fn insert_product(&self, new_product: NewProduct) -> Result<Product, RepositoryError> {
        let sql = format!(
            "INSERT INTO shop.products (id, name, category, image, price, description) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {PRODUCT_COLUMNS}"
        );

        Ok(sqlx::query_as::<_, Product>(&sql)
            .bind(ProductId::generate())
            .bind(&new_product.name)
            .bind(&new_product.category)
            .bind(&new_product.image)
            .bind(&new_product.price)
            .bind(&new_product.description)
            .fetch_one(&self.pool)
            .await?)
    }

    async fn find_product(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM shop.products WHERE id = $1");
        Ok(sqlx::query_as::<_, Product>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn find_products(&self, ids: &[ProductId]) -> Result<Vec<Product>, RepositoryError> {
        let ids: Vec<Uuid> = ids.iter().map(ProductId::as_uuid).collect();
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM shop.products WHERE id = ANY($1)");
        Ok(sqlx::query_as::<_, Product>(&sql)
            .bind(ids)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn list_products(&self) -> Result<Vec<Product>, RepositoryError> {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM shop.products ORDER BY created_at, id");
        Ok(sqlx::query_as::<_, Product>(&sql)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn insert_contact(&self, new_contact: NewContact) -> Result<Contact, RepositoryError> {
        let sql = format!(
            "INSERT INTO shop.contacts (id, name, email, phone, message, date) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {CONTACT_COLUMNS}"
        );

        Ok(sqlx::query_as::<_, Contact>(&sql)
            .bind(ContactId::generate())
            .bind(&new_contact.name)
            .bind(&new_contact.email)
            .bind(&new_contact.phone)
            .bind(&new_contact.message)
            .bind(Utc::now())
            .fetch_one(&self.pool)
            .await?)
    }

    async fn list_contacts(&self) -> Result<Vec<Contact>, RepositoryError> {
        let sql = format!("SELECT {CONTACT_COLUMNS} FROM shop.contacts ORDER BY date, id");
        Ok(sqlx::query_as::<_, Contact>(&sql)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn insert_address(&self, new_address: NewAddress) -> Result<Address, RepositoryError> {
        let sql = format!(
            "INSERT INTO shop.addresses \
                 (id, name, email, phone, street, city, state, postal_code, date) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
             RETURNING {ADDRESS_COLUMNS}"
        );

        Ok(sqlx::query_as::<_, Address>(&sql)
            .bind(AddressId::generate())
            .bind(&new_address.name)
            .bind(&new_address.email)
            .bind(&new_address.phone)
            .bind(&new_address.street)
            .bind(&new_address.city)
            .bind(&new_address.state)
            .bind(&new_address.postal_code)
            .bind(Utc::now())
            .fetch_one(&self.pool)
            .await?)
    }

    async fn find_address_by_email(
        &self,
        email: &Email,
    ) -> Result<Option<Address>, RepositoryError> {
        let sql = format!(
            "SELECT {ADDRESS_COLUMNS} FROM shop.addresses \
             WHERE email = $1 ORDER BY date, id LIMIT 1"
        );
        Ok(sqlx::query_as::<_, Address>(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn list_addresses(&self) -> Result<Vec<Address>, RepositoryError> {
        let sql = format!("SELECT {ADDRESS_COLUMNS} FROM shop.addresses ORDER BY date, id");
        Ok(sqlx::query_as::<_, Address>(&sql)
            .fetch_all(&self.pool)
            .await?)
    }

    #[instrument(skip(self, new_order), fields(user_id = %new_order.user_id))]
    async fn insert_order(&self, new_order: NewOrder) -> Result<Order, RepositoryError> {
        let order = new_order.into_order(OrderId::generate(), Utc::now());
        let sql = format!(
            "INSERT INTO shop.orders \
                 (id, user_id, cart_items, total_amount, order_date, order_status) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {ORDER_COLUMNS}"
        );

        let row = sqlx::query_as::<_, OrderRow>(&sql)
            .bind(order.id)
            .bind(order.user_id)
            .bind(Json(&order.cart_items))
            .bind(order.total_amount)
            .bind(order.order_date)
            .bind(order.order_status)
            .fetch_one(&self.pool)
            .await?;

        Ok(row.into())
    }

    async fn list_orders(&self) -> Result<Vec<Order>, RepositoryError> {
        let sql = format!("SELECT {ORDER_COLUMNS} FROM shop.orders ORDER BY order_date, id");
        let rows = sqlx::query_as::<_, OrderRow>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(Order::from).collect())
    }

    async fn insert_feedback(
        &self,
        new_feedback: NewFeedback,
    ) -> Result<Feedback, RepositoryError> {
        let sql = format!(
            "INSERT INTO shop.feedback \
                 (id, name, email, phone, product_name, rating, comment, date) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             RETURNING {FEEDBACK_COLUMNS}"
        );

        Ok(sqlx::query_as::<_, Feedback>(&sql)
            .bind(FeedbackId::generate())
            .bind(&new_feedback.name)
            .bind(&new_feedback.email)
            .bind(&new_feedback.phone)
            .bind(&new_feedback.product_name)
            .bind(&new_feedback.rating)
            .bind(&new_feedback.comment)
            .bind(Utc::now())
            .fetch_one(&self.pool)
            .await?)
    }
}
