//! Thin PayPal Orders API client.
//!
//! Covers exactly the two calls the checkout flow needs: create an order for
//! a listing and capture an approved order. Request and response shapes are
//! vendor-defined; only the fields the flow reads are modeled.

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;

use pixelmart_core::Price;

/// PayPal API configuration.
///
/// Implements `Debug` manually to redact the client secret.
#[derive(Clone)]
pub struct PayPalConfig {
    /// REST API base URL (sandbox or live).
    pub base_url: String,
    /// OAuth client ID.
    pub client_id: String,
    /// OAuth client secret.
    pub client_secret: SecretString,
}

impl std::fmt::Debug for PayPalConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PayPalConfig")
            .field("base_url", &self.base_url)
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .finish()
    }
}

/// Errors from PayPal API calls.
#[derive(Debug, Error)]
pub enum PayPalError {
    /// Transport-level failure.
    #[error("paypal request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// PayPal returned a non-success status.
    #[error("paypal api error: status {status}")]
    Api {
        /// HTTP status code returned.
        status: u16,
        /// Response body, logged server-side only.
        body: String,
    },

    /// A field the flow depends on was missing from the response.
    #[error("paypal response missing field: {0}")]
    MissingField(&'static str),
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// An order created with PayPal, awaiting buyer approval.
#[derive(Debug, Deserialize)]
pub struct CreatedOrder {
    /// PayPal order ID.
    pub id: String,
    /// Order status (e.g., `CREATED`).
    pub status: String,
}

/// Result of capturing an approved order.
#[derive(Debug, Deserialize)]
pub struct CapturedOrder {
    /// PayPal order ID.
    pub id: String,
    /// Order status; `COMPLETED` on success.
    pub status: String,
    #[serde(default)]
    purchase_units: Vec<PurchaseUnit>,
}

#[derive(Debug, Deserialize)]
struct PurchaseUnit {
    reference_id: Option<String>,
}

impl CapturedOrder {
    /// Whether the capture completed.
    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.status == "COMPLETED"
    }

    /// The `reference_id` set at order creation (our product id).
    #[must_use]
    pub fn reference_id(&self) -> Option<&str> {
        self.purchase_units
            .first()
            .and_then(|unit| unit.reference_id.as_deref())
    }
}

/// PayPal Orders API client.
pub struct PayPalClient {
    http: reqwest::Client,
    config: PayPalConfig,
}

impl PayPalClient {
    /// Create a new client.
    #[must_use]
    pub fn new(config: PayPalConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    /// Fetch an OAuth access token via client credentials.
    async fn access_token(&self) -> Result<String, PayPalError> {
        let response = self
            .http
            .post(format!("{}/v1/oauth2/token", self.config.base_url))
            .basic_auth(
                &self.config.client_id,
                Some(self.config.client_secret.expose_secret()),
            )
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await?;

        let response = check_status(response).await?;
        let token: TokenResponse = response.json().await?;
        Ok(token.access_token)
    }

    /// Create an order for a single listing.
    ///
    /// The product id is carried as the purchase unit's `reference_id` so
    /// the capture response identifies what was bought.
    ///
    /// # Errors
    ///
    /// Returns `PayPalError` if the token fetch or order creation fails.
    pub async fn create_order(
        &self,
        reference_id: &str,
        price: Price,
    ) -> Result<CreatedOrder, PayPalError> {
        let token = self.access_token().await?;

        let body = json!({
            "intent": "CAPTURE",
            "purchase_units": [{
                "reference_id": reference_id,
                "amount": {
                    "currency_code": price.currency_code.code(),
                    "value": format!("{:.2}", price.amount),
                },
            }],
        });

        let response = self
            .http
            .post(format!("{}/v2/checkout/orders", self.config.base_url))
            .bearer_auth(token)
            .json(&body)
            .send()
            .await?;

        let response = check_status(response).await?;
        Ok(response.json().await?)
    }

    /// Capture an approved order.
    ///
    /// # Errors
    ///
    /// Returns `PayPalError` if the token fetch or capture fails.
    pub async fn capture_order(&self, order_id: &str) -> Result<CapturedOrder, PayPalError> {
        let token = self.access_token().await?;

        let response = self
            .http
            .post(format!(
                "{}/v2/checkout/orders/{order_id}/capture",
                self.config.base_url
            ))
            .bearer_auth(token)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .send()
            .await?;

        let response = check_status(response).await?;
        Ok(response.json().await?)
    }
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, PayPalError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    tracing::warn!(status = %status, body = %body, "PayPal API error");
    Err(PayPalError::Api {
        status: status.as_u16(),
        body,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_captured_order_parsing() {
        let json = r#"{
            "id": "5O190127TN364715T",
            "status": "COMPLETED",
            "purchase_units": [{"reference_id": "42"}]
        }"#;

        let order: CapturedOrder = serde_json::from_str(json).unwrap();
        assert!(order.is_completed());
        assert_eq!(order.reference_id(), Some("42"));
    }

    #[test]
    fn test_captured_order_without_units() {
        let json = r#"{"id": "X", "status": "DECLINED"}"#;
        let order: CapturedOrder = serde_json::from_str(json).unwrap();
        assert!(!order.is_completed());
        assert_eq!(order.reference_id(), None);
    }

    #[test]
    fn test_config_debug_redacts_secret() {
        let config = PayPalConfig {
            base_url: "https://api-m.sandbox.paypal.com".to_owned(),
            client_id: "client-id".to_owned(),
            client_secret: SecretString::from("super-secret".to_owned()),
        };

        let debug = format!("{config:?}");
        assert!(debug.contains("client-id"));
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("super-secret"));
    }
}
