//! Payment gateway client.
//!
//! Checkout happens on the gateway's hosted page: the subscribe route
//! redirects there with `successUrl`/`failUrl` return points, and the
//! success route makes a best-effort server-side confirm call before the
//! plan flip. The gateway remains the source of truth for the payment
//! itself; nothing here stores card data or settlement state.

use std::sync::Arc;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use rand::Rng;
use rand::distr::Alphanumeric;
use secrecy::ExposeSecret;
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;
use tracing::instrument;
use url::Url;

use crate::config::TossConfig;

/// Monthly subscription price in won.
pub const MONTHLY_PRICE_WON: i64 = 9900;

/// Display name of the subscription order.
pub const ORDER_NAME: &str = "Utility Hub Pro (monthly)";

/// Errors from the payment gateway.
#[derive(Debug, Error)]
pub enum TossError {
    /// HTTP transport failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The gateway rejected the request.
    #[error("gateway error ({code}): {message}")]
    Api {
        /// Gateway error code, e.g. `NOT_FOUND_PAYMENT`.
        code: String,
        /// Human-readable message.
        message: String,
    },

    /// A URL could not be constructed.
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

/// Query parameters the gateway appends on the success return.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuccessParams {
    pub payment_key: String,
    pub order_id: String,
    pub amount: i64,
}

/// Query parameters the gateway appends on the failure return.
#[derive(Debug, Clone, Deserialize)]
pub struct FailParams {
    pub code: Option<String>,
    pub message: Option<String>,
}

/// A checkout to hand off to the hosted page.
#[derive(Debug, Clone)]
pub struct CheckoutRequest {
    pub amount: i64,
    pub order_id: String,
    pub order_name: String,
    pub customer_name: String,
    pub customer_email: String,
}

/// Payment gateway client.
#[derive(Clone)]
pub struct TossClient {
    inner: Arc<TossClientInner>,
}

struct TossClientInner {
    client: reqwest::Client,
    api_url: String,
    client_key: String,
    secret_key: String,
}

impl TossClient {
    /// Create a new gateway client.
    #[must_use]
    pub fn new(config: &TossConfig) -> Self {
        Self {
            inner: Arc::new(TossClientInner {
                client: reqwest::Client::new(),
                api_url: config.api_url.trim_end_matches('/').to_owned(),
                client_key: config.client_key.clone(),
                secret_key: config.secret_key.expose_secret().to_owned(),
            }),
        }
    }

    /// Build the hosted checkout URL for a card payment.
    ///
    /// `base_url` is this application's public URL; the gateway returns the
    /// customer to `{base_url}/payment/success` or `/payment/fail`.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured URLs do not parse.
    pub fn checkout_url(
        &self,
        base_url: &str,
        request: &CheckoutRequest,
    ) -> Result<Url, TossError> {
        let base = base_url.trim_end_matches('/');
        let mut url = Url::parse(&format!("{}/v1/payments/checkout", self.inner.api_url))?;

        url.query_pairs_mut()
            .append_pair("clientKey", &self.inner.client_key)
            .append_pair("method", "card")
            .append_pair("amount", &request.amount.to_string())
            .append_pair("orderId", &request.order_id)
            .append_pair("orderName", &request.order_name)
            .append_pair("customerName", &request.customer_name)
            .append_pair("customerEmail", &request.customer_email)
            .append_pair("successUrl", &format!("{base}/payment/success"))
            .append_pair("failUrl", &format!("{base}/payment/fail"));

        Ok(url)
    }

    /// Confirm a payment after the success return. Best-effort: callers log
    /// a failure and keep going, matching the lenient success path the
    /// product shipped with.
    ///
    /// # Errors
    ///
    /// Returns [`TossError::Api`] when the gateway rejects the confirmation.
    #[instrument(skip(self, params), fields(order_id = %params.order_id))]
    pub async fn confirm(&self, params: &SuccessParams) -> Result<(), TossError> {
        let url = format!("{}/v1/payments/confirm", self.inner.api_url);
        let credentials = BASE64.encode(format!("{}:", self.inner.secret_key));

        let response = self
            .inner
            .client
            .post(url)
            .header("Authorization", format!("Basic {credentials}"))
            .json(&json!({
                "paymentKey": params.payment_key,
                "orderId": params.order_id,
                "amount": params.amount,
            }))
            .send()
            .await?;

        if response.status().is_success() {
            return Ok(());
        }

        let body = response.text().await?;
        #[derive(Deserialize)]
        struct GatewayError {
            code: Option<String>,
            message: Option<String>,
        }
        let parsed: GatewayError = serde_json::from_str(&body).unwrap_or(GatewayError {
            code: None,
            message: None,
        });

        Err(TossError::Api {
            code: parsed.code.unwrap_or_else(|| "UNKNOWN".to_owned()),
            message: parsed
                .message
                .unwrap_or_else(|| body.chars().take(200).collect()),
        })
    }
}

/// A fresh order id, unique enough for the gateway's per-merchant scope.
#[must_use]
pub fn generate_order_id() -> String {
    let suffix: String = rand::rng()
        .sample_iter(&Alphanumeric)
        .take(16)
        .map(char::from)
        .collect();
    format!("order_{suffix}")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use secrecy::SecretString;

    use super::*;

    fn client() -> TossClient {
        TossClient::new(&TossConfig {
            api_url: "https://api.tosspayments.com/".to_owned(),
            client_key: "test_ck_abc".to_owned(),
            secret_key: SecretString::from("test_sk_xyz"),
        })
    }

    fn request() -> CheckoutRequest {
        CheckoutRequest {
            amount: MONTHLY_PRICE_WON,
            order_id: "order_0123456789abcdef".to_owned(),
            order_name: ORDER_NAME.to_owned(),
            customer_name: "jane".to_owned(),
            customer_email: "jane@example.com".to_owned(),
        }
    }

    #[test]
    fn test_checkout_url_carries_return_points() {
        let url = client()
            .checkout_url("https://hub.example.com/", &request())
            .unwrap();
        let query: std::collections::HashMap<_, _> = url.query_pairs().into_owned().collect();

        assert_eq!(url.host_str(), Some("api.tosspayments.com"));
        assert_eq!(query["clientKey"], "test_ck_abc");
        assert_eq!(query["amount"], "9900");
        assert_eq!(query["orderId"], "order_0123456789abcdef");
        assert_eq!(query["successUrl"], "https://hub.example.com/payment/success");
        assert_eq!(query["failUrl"], "https://hub.example.com/payment/fail");
    }

    #[test]
    fn test_checkout_url_never_leaks_secret_key() {
        let url = client()
            .checkout_url("https://hub.example.com", &request())
            .unwrap();
        assert!(!url.as_str().contains("test_sk_xyz"));
    }

    #[test]
    fn test_generate_order_id_shape() {
        let id = generate_order_id();
        assert!(id.starts_with("order_"));
        assert_eq!(id.len(), "order_".len() + 16);
        assert_ne!(generate_order_id(), id);
    }

    #[test]
    fn test_success_params_deserialize_from_query_names() {
        let params: SuccessParams = serde_json::from_str(
            r#"{"paymentKey":"pk","orderId":"order_1","amount":9900}"#,
        )
        .unwrap();
        assert_eq!(params.payment_key, "pk");
        assert_eq!(params.amount, 9900);
    }
}
