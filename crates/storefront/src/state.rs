//! Application state shared across handlers.

use std::sync::Arc;

use crate::db::{Records, Store};
use crate::services::PaymentGateway;

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`. Holds the record layer and the payment
/// gateway; both are trait objects so tests can swap in doubles.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    records: Records,
    payments: Arc<dyn PaymentGateway>,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(store: Arc<dyn Store>, payments: Arc<dyn PaymentGateway>) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                records: Records::new(store),
                payments,
            }),
        }
    }

    /// Record access layer.
    #[must_use]
    pub fn records(&self) -> &Records {
        &self.inner.records
    }

    /// Payment session gateway.
    #[must_use]
    pub fn payments(&self) -> &dyn PaymentGateway {
        self.inner.payments.as_ref()
    }
}
