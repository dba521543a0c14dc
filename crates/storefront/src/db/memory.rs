//! In-process [`Store`] used by tests in place of `PostgreSQL`.

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use bazaar_core::{
    AddressId, ContactId, Email, FeedbackId, OrderId, ProductId, UserId,
};

use super::{RepositoryError, Store};
use crate::models::{
    Address, Contact, Feedback, NewAddress, NewContact, NewFeedback, NewOrder, NewProduct,
    NewUser, Order, Product, User,
};

/// A user plus the opaque credentials that never leave the store.
struct StoredUser {
    user: User,
    password: String,
    confirm_password: String,
}

#[derive(Default)]
struct Collections {
    users: Vec<StoredUser>,
    products: Vec<Product>,
    contacts: Vec<Contact>,
    addresses: Vec<Address>,
    orders: Vec<Order>,
    feedback: Vec<Feedback>,
}

/// [`Store`] holding every collection in memory, in insertion order.
///
/// Enforces the same unique email index as the `PostgreSQL` schema.
#[derive(Default)]
pub struct MemoryStore {
    collections: RwLock<Collections>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored feedback records (feedback has no read operation).
    pub async fn feedback_count(&self) -> usize {
        self.collections.read().await.feedback.len()
    }

    /// Stored `(password, confirm_password)` for `email`.
    pub async fn credentials(&self, email: &Email) -> Option<(String, String)> {
        self.collections
            .read()
            .await
            .users
            .iter()
            .find(|stored| &stored.user.email == email)
            .map(|stored| (stored.password.clone(), stored.confirm_password.clone()))
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn ping(&self) -> Result<(), RepositoryError> {
        Ok(())
    }

    async fn insert_user(&self, new_user: NewUser) -> Result<User, RepositoryError> {
        let mut collections = self.collections.write().await;
        if collections
            .users
            .iter()
            .any(|stored| stored.user.email == new_user.email)
        {
            return Err(RepositoryError::Conflict("email already exists".to_owned()));
        }

        let user = new_user.to_user(UserId::generate());
        collections.users.push(StoredUser {
            user: user.clone(),
            password: new_user.password,
            confirm_password: new_user.confirm_password,
        });
        Ok(user)
    }

    async fn find_user_by_email(&self, email: &Email) -> Result<Option<User>, RepositoryError> {
        let collections = self.collections.read().await;
        Ok(collections
            .users
            .iter()
            .find(|stored| &stored.user.email == email)
            .map(|stored| stored.user.clone()))
    }

    async fn find_users(&self, ids: &[UserId]) -> Result<Vec<User>, RepositoryError> {
        let collections = self.collections.read().await;
        Ok(collections
            .users
            .iter()
            .filter(|stored| ids.contains(&stored.user.id))
            .map(|stored| stored.user.clone())
            .collect())
    }

    async fn list_users(&self) -> Result<Vec<User>, RepositoryError> {
        let collections = self.collections.read().await;
        Ok(collections
            .users
            .iter()
            .map(|stored| stored.user.clone())
            .collect())
    }

    async fn insert_product(&self, new_product: NewProduct) -> Result<Product, RepositoryError> {
        let product = new_product.into_product(ProductId::generate());
        self.collections.write().await.products.push(product.clone());
        Ok(product)
    }

    async fn find_product(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let collections = self.collections.read().await;
        Ok(collections.products.iter().find(|p| p.id == id).cloned())
    }

    async fn find_products(&self, ids: &[ProductId]) -> Result<Vec<Product>, RepositoryError> {
        let collections = self.collections.read().await;
        Ok(collections
            .products
            .iter()
            .filter(|p| ids.contains(&p.id))
            .cloned()
            .collect())
    }

    async fn list_products(&self) -> Result<Vec<Product>, RepositoryError> {
        Ok(self.collections.read().await.products.clone())
    }

    async fn insert_contact(&self, new_contact: NewContact) -> Result<Contact, RepositoryError> {
        let contact = new_contact.into_contact(ContactId::generate(), Utc::now());
        self.collections.write().await.contacts.push(contact.clone());
        Ok(contact)
    }

    async fn list_contacts(&self) -> Result<Vec<Contact>, RepositoryError> {
        Ok(self.collections.read().await.contacts.clone())
    }

    async fn insert_address(&self, new_address: NewAddress) -> Result<Address, RepositoryError> {
        let address = new_address.into_address(AddressId::generate(), Utc::now());
        self.collections.write().await.addresses.push(address.clone());
        Ok(address)
    }

    async fn find_address_by_email(
        &self,
        email: &Email,
    ) -> Result<Option<Address>, RepositoryError> {
        let collections = self.collections.read().await;
        Ok(collections
            .addresses
            .iter()
            .find(|a| &a.email == email)
            .cloned())
    }

    async fn list_addresses(&self) -> Result<Vec<Address>, RepositoryError> {
        Ok(self.collections.read().await.addresses.clone())
    }

    async fn insert_order(&self, new_order: NewOrder) -> Result<Order, RepositoryError> {
        let order = new_order.into_order(OrderId::generate(), Utc::now());
        self.collections.write().await.orders.push(order.clone());
        Ok(order)
    }

    async fn list_orders(&self) -> Result<Vec<Order>, RepositoryError> {
        Ok(self.collections.read().await.orders.clone())
    }

    async fn insert_feedback(
        &self,
        new_feedback: NewFeedback,
    ) -> Result<Feedback, RepositoryError> {
        let feedback = new_feedback.into_feedback(FeedbackId::generate(), Utc::now());
        self.collections.write().await.feedback.push(feedback.clone());
        Ok(feedback)
    }
}
