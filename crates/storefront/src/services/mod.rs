//! External service clients.

pub mod payments;
pub mod stripe;

pub use payments::{CheckoutItem, CheckoutSession, GatewayError, LineItem, PaymentGateway};
pub use stripe::StripeClient;
