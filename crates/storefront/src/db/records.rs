//! Record access layer: cross-collection rules on top of a [`Store`].
//!
//! Every existence check here is a point read followed by a write, with no
//! transaction around the pair. Two concurrent submissions can both pass the
//! check. For users the store's unique email index still rejects the loser
//! with [`RepositoryError::Conflict`]; contacts and addresses have no such
//! backstop.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use tracing::instrument;

use bazaar_core::{Email, ProductId, UserId};

use super::{RepositoryError, Store};
use crate::models::{
    Address, Contact, Feedback, NewAddress, NewContact, NewFeedback, NewOrder, NewProduct,
    NewUser, Order, OrderWithRelations, Product, ProductSummary, User, UserSummary,
};

/// Record operations shared by all handlers. Cheap to clone.
#[derive(Clone)]
pub struct Records {
    store: Arc<dyn Store>,
}

impl Records {
    #[must_use]
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Connectivity check against the underlying store.
    ///
    /// # Errors
    ///
    /// Returns the store's error if it cannot be reached.
    pub async fn ping(&self) -> Result<(), RepositoryError> {
        self.store.ping().await
    }

    /// Register a user.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::Conflict`] if a user with this email exists.
    #[instrument(skip(self, new_user), fields(email = %new_user.email))]
    pub async fn register_user(&self, new_user: NewUser) -> Result<User, RepositoryError> {
        if self
            .store
            .find_user_by_email(&new_user.email)
            .await?
            .is_some()
        {
            return Err(RepositoryError::Conflict("email already exists".to_owned()));
        }

        self.store.insert_user(new_user).await
    }

    /// Look up a user by email (login).
    ///
    /// # Errors
    ///
    /// Returns an error if the store query fails.
    pub async fn find_user_by_email(&self, email: &Email) -> Result<Option<User>, RepositoryError> {
        self.store.find_user_by_email(email).await
    }

    /// # Errors
    ///
    /// Returns an error if the store query fails.
    pub async fn list_users(&self) -> Result<Vec<User>, RepositoryError> {
        self.store.list_users().await
    }

    /// # Errors
    ///
    /// Returns an error if the store write fails.
    pub async fn upload_product(&self, new_product: NewProduct) -> Result<Product, RepositoryError> {
        self.store.insert_product(new_product).await
    }

    /// # Errors
    ///
    /// Returns an error if the store query fails.
    pub async fn find_product(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        self.store.find_product(id).await
    }

    /// # Errors
    ///
    /// Returns an error if the store query fails.
    pub async fn list_products(&self) -> Result<Vec<Product>, RepositoryError> {
        self.store.list_products().await
    }

    /// Store a contact submission from a registered user.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::PreconditionFailed`] if no user has this
    /// email.
    #[instrument(skip(self, new_contact), fields(email = %new_contact.email))]
    pub async fn submit_contact(&self, new_contact: NewContact) -> Result<Contact, RepositoryError> {
        self.require_user(&new_contact.email).await?;
        self.store.insert_contact(new_contact).await
    }

    /// # Errors
    ///
    /// Returns an error if the store query fails.
    pub async fn list_contacts(&self) -> Result<Vec<Contact>, RepositoryError> {
        self.store.list_contacts().await
    }

    /// Store a shipping address for a registered user.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::PreconditionFailed`] if no user has this
    /// email.
    #[instrument(skip(self, new_address), fields(email = %new_address.email))]
    pub async fn submit_address(&self, new_address: NewAddress) -> Result<Address, RepositoryError> {
        self.require_user(&new_address.email).await?;
        self.store.insert_address(new_address).await
    }

    /// First address stored for `email`.
    ///
    /// # Errors
    ///
    /// Returns an error if the store query fails.
    pub async fn find_address_by_email(
        &self,
        email: &Email,
    ) -> Result<Option<Address>, RepositoryError> {
        self.store.find_address_by_email(email).await
    }

    /// # Errors
    ///
    /// Returns an error if the store query fails.
    pub async fn list_addresses(&self) -> Result<Vec<Address>, RepositoryError> {
        self.store.list_addresses().await
    }

    /// Validate and store an order.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::Validation`] for an empty cart or a
    /// quantity below 1.
    #[instrument(skip(self, new_order), fields(user_id = %new_order.user_id, items = new_order.cart_items.len()))]
    pub async fn place_order(&self, new_order: NewOrder) -> Result<Order, RepositoryError> {
        new_order.validate()?;
        self.store.insert_order(new_order).await
    }

    /// All orders with `userId` and each item's `productId` resolved.
    ///
    /// References to records that no longer exist resolve to `None`
    /// instead of failing the listing.
    ///
    /// # Errors
    ///
    /// Returns an error if any of the store queries fail.
    pub async fn list_orders_with_relations(
        &self,
    ) -> Result<Vec<OrderWithRelations>, RepositoryError> {
        let orders = self.store.list_orders().await?;
        if orders.is_empty() {
            return Ok(Vec::new());
        }

        let user_ids: Vec<UserId> = orders
            .iter()
            .map(|order| order.user_id)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let product_ids: Vec<ProductId> = orders
            .iter()
            .flat_map(|order| order.cart_items.iter().map(|item| item.product_id))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let users: HashMap<UserId, UserSummary> = self
            .store
            .find_users(&user_ids)
            .await?
            .into_iter()
            .map(|user| (user.id, UserSummary::from(user)))
            .collect();
        let products: HashMap<ProductId, ProductSummary> = self
            .store
            .find_products(&product_ids)
            .await?
            .into_iter()
            .map(|product| (product.id, ProductSummary::from(product)))
            .collect();

        Ok(orders
            .into_iter()
            .map(|order| OrderWithRelations::resolve(order, &users, &products))
            .collect())
    }

    /// Store product feedback. No existence checks apply.
    ///
    /// # Errors
    ///
    /// Returns an error if the store write fails.
    pub async fn submit_feedback(
        &self,
        new_feedback: NewFeedback,
    ) -> Result<Feedback, RepositoryError> {
        self.store.insert_feedback(new_feedback).await
    }

    async fn require_user(&self, email: &Email) -> Result<(), RepositoryError> {
        match self.store.find_user_by_email(email).await? {
            Some(_) => Ok(()),
            None => Err(RepositoryError::PreconditionFailed(format!(
                "no user registered with {email}"
            ))),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;
    use crate::db::MemoryStore;
    use crate::models::OrderItem;

    fn records() -> (Records, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        (Records::new(store.clone()), store)
    }

    fn email(s: &str) -> Email {
        Email::parse(s).unwrap()
    }

    fn new_user(address: &str) -> NewUser {
        NewUser {
            first_name: "Asha".to_string(),
            last_name: "Rao".to_string(),
            email: email(address),
            password: "hunter22".to_string(),
            confirm_password: "hunter22".to_string(),
            image: None,
        }
    }

    fn new_contact(address: &str) -> NewContact {
        NewContact {
            name: "Asha".to_string(),
            email: email(address),
            phone: "9876543210".to_string(),
            message: "Where is my parcel?".to_string(),
        }
    }

    fn new_address(address: &str, street: &str) -> NewAddress {
        NewAddress {
            name: "Asha Rao".to_string(),
            email: email(address),
            phone: String::new(),
            street: street.to_string(),
            city: "Bengaluru".to_string(),
            state: "KA".to_string(),
            postal_code: "560001".to_string(),
        }
    }

    #[tokio::test]
    async fn test_register_user_rejects_duplicate_email() {
        let (records, _) = records();
        records.register_user(new_user("asha@example.com")).await.unwrap();

        let err = records
            .register_user(new_user("asha@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(_)));
        assert_eq!(records.list_users().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_contact_requires_registered_user() {
        let (records, _) = records();

        let err = records
            .submit_contact(new_contact("ghost@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::PreconditionFailed(_)));
        assert!(records.list_contacts().await.unwrap().is_empty());

        records.register_user(new_user("asha@example.com")).await.unwrap();
        records
            .submit_contact(new_contact("asha@example.com"))
            .await
            .unwrap();
        assert_eq!(records.list_contacts().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_address_lookup_returns_first_match() {
        let (records, _) = records();
        records.register_user(new_user("asha@example.com")).await.unwrap();

        records
            .submit_address(new_address("asha@example.com", "12 MG Road"))
            .await
            .unwrap();
        records
            .submit_address(new_address("asha@example.com", "7 Brigade Road"))
            .await
            .unwrap();

        let found = records
            .find_address_by_email(&email("asha@example.com"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.street, "12 MG Road");
        assert_eq!(records.list_addresses().await.unwrap().len(), 2);

        assert!(
            records
                .find_address_by_email(&email("nobody@example.com"))
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_address_requires_registered_user() {
        let (records, _) = records();
        let err = records
            .submit_address(new_address("ghost@example.com", "Nowhere"))
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::PreconditionFailed(_)));
    }

    #[tokio::test]
    async fn test_place_order_validates_quantities() {
        let (records, _) = records();
        let order = NewOrder {
            user_id: UserId::generate(),
            cart_items: vec![OrderItem {
                product_id: ProductId::generate(),
                qty: 0,
                price: Decimal::new(500, 0),
            }],
            total_amount: Decimal::new(500, 0),
        };

        let err = records.place_order(order).await.unwrap_err();
        assert!(matches!(err, RepositoryError::Validation(_)));
        assert!(records.list_orders_with_relations().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_orders_resolve_users_and_products() {
        let (records, _) = records();
        let user = records.register_user(new_user("asha@example.com")).await.unwrap();
        let product = records
            .upload_product(NewProduct {
                name: "Kurta".to_string(),
                category: "apparel".to_string(),
                image: None,
                price: "799".to_string(),
                description: String::new(),
            })
            .await
            .unwrap();

        let placed = records
            .place_order(NewOrder {
                user_id: user.id,
                cart_items: vec![
                    OrderItem {
                        product_id: product.id,
                        qty: 2,
                        price: Decimal::new(799, 0),
                    },
                    OrderItem {
                        product_id: ProductId::generate(),
                        qty: 1,
                        price: Decimal::new(100, 0),
                    },
                ],
                total_amount: Decimal::new(1698, 0),
            })
            .await
            .unwrap();

        let orders = records.list_orders_with_relations().await.unwrap();
        assert_eq!(orders.len(), 1);
        let order = &orders[0];
        assert_eq!(order.id, placed.id);

        let owner = order.user_id.as_ref().unwrap();
        assert_eq!(owner.first_name, "Asha");
        assert_eq!(owner.email.as_str(), "asha@example.com");

        assert_eq!(order.cart_items[0].product_id.as_ref().unwrap().name, "Kurta");
        assert!(order.cart_items[1].product_id.is_none());
    }

    #[tokio::test]
    async fn test_orders_with_unknown_user_resolve_to_none() {
        let (records, _) = records();
        records
            .place_order(NewOrder {
                user_id: UserId::generate(),
                cart_items: vec![OrderItem {
                    product_id: ProductId::generate(),
                    qty: 1,
                    price: Decimal::ONE,
                }],
                total_amount: Decimal::ONE,
            })
            .await
            .unwrap();

        let orders = records.list_orders_with_relations().await.unwrap();
        assert!(orders[0].user_id.is_none());
    }

    #[tokio::test]
    async fn test_feedback_is_stored_without_checks() {
        let (records, store) = records();
        records
            .submit_feedback(NewFeedback {
                product_name: "Kurta".to_string(),
                rating: "5".to_string(),
                ..NewFeedback::default()
            })
            .await
            .unwrap();
        assert_eq!(store.feedback_count().await, 1);
    }
}
