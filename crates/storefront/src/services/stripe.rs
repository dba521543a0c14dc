//! Stripe Checkout client.
//!
//! Creates hosted checkout sessions through the REST API
//! (`POST /v1/checkout/sessions`, form encoded).

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use serde::Deserialize;
use tracing::instrument;

use bazaar_core::CurrencyCode;

use super::payments::{CheckoutItem, CheckoutSession, GatewayError, LineItem, PaymentGateway};
use crate::config::StripeConfig;

/// Stripe API version pinned for request/response shapes.
const API_VERSION: &str = "2024-06-20";

/// Error envelope returned by Stripe on non-2xx responses.
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// Stripe Checkout client.
#[derive(Clone)]
pub struct StripeClient {
    client: reqwest::Client,
    sessions_url: String,
    shipping_rate: String,
    success_url: String,
    cancel_url: String,
    currency: CurrencyCode,
}

impl StripeClient {
    /// Create a new Stripe client.
    ///
    /// # Errors
    ///
    /// Returns error if the secret key is not a valid header value or the
    /// HTTP client fails to build.
    pub fn new(config: &StripeConfig) -> Result<Self, GatewayError> {
        let mut headers = HeaderMap::new();

        let auth_value = format!("Bearer {}", config.secret_key.expose_secret());
        let mut auth_header = HeaderValue::from_str(&auth_value)
            .map_err(|e| GatewayError::Parse(format!("Invalid secret key format: {e}")))?;
        auth_header.set_sensitive(true);
        headers.insert("Authorization", auth_header);
        headers.insert("Stripe-Version", HeaderValue::from_static(API_VERSION));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        let frontend = config.frontend_url.trim_end_matches('/');

        Ok(Self {
            client,
            sessions_url: format!(
                "{}/v1/checkout/sessions",
                config.api_base.trim_end_matches('/')
            ),
            shipping_rate: config.shipping_rate.clone(),
            success_url: format!("{frontend}/success"),
            cancel_url: format!("{frontend}/cancel"),
            currency: CurrencyCode::INR,
        })
    }

    /// Form fields for a checkout session request.
    fn session_form(&self, line_items: &[LineItem]) -> Vec<(String, String)> {
        let mut form: Vec<(String, String)> = vec![
            ("submit_type".into(), "pay".into()),
            ("mode".into(), "payment".into()),
            ("payment_method_types[0]".into(), "card".into()),
            ("billing_address_collection".into(), "auto".into()),
            (
                "shipping_options[0][shipping_rate]".into(),
                self.shipping_rate.clone(),
            ),
        ];

        for (i, item) in line_items.iter().enumerate() {
            let key = |suffix: &str| format!("line_items[{i}]{suffix}");
            form.extend([
                (
                    key("[price_data][currency]"),
                    item.currency.as_str().to_string(),
                ),
                (key("[price_data][product_data][name]"), item.name.clone()),
                (
                    key("[price_data][unit_amount]"),
                    item.unit_amount.to_string(),
                ),
                (key("[adjustable_quantity][enabled]"), "true".to_string()),
                (key("[adjustable_quantity][minimum]"), "1".to_string()),
                (key("[quantity]"), item.quantity.to_string()),
            ]);
        }

        form.push(("success_url".into(), self.success_url.clone()));
        form.push(("cancel_url".into(), self.cancel_url.clone()));
        form
    }
}

#[async_trait]
impl PaymentGateway for StripeClient {
    #[instrument(skip(self, items), fields(items = items.len()))]
    async fn create_checkout_session(
        &self,
        items: &[CheckoutItem],
    ) -> Result<CheckoutSession, GatewayError> {
        let line_items = super::payments::line_items(items, self.currency)?;
        let form = self.session_form(&line_items);

        let response = self
            .client
            .post(&self.sessions_url)
            .form(&form)
            .send()
            .await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorEnvelope>(&body)
                .ok()
                .and_then(|envelope| envelope.error.message)
                .unwrap_or(body);
            tracing::warn!(status = status.as_u16(), %message, "Stripe rejected checkout session");
            return Err(GatewayError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let session: CheckoutSession = response
            .json()
            .await
            .map_err(|e| GatewayError::Parse(e.to_string()))?;

        tracing::info!(session_id = %session.id, "Checkout session created");
        Ok(session)
    }
}
