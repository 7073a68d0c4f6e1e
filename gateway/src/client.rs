//! Telr gateway client
//!
//! This module reshapes storefront payment requests into Telr's order API
//! format and relays the responses. The remote body is passed back
//! verbatim; callers wrap it in their own envelope.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;

use stayhub_core::TelrConfig;

/// Production Telr order endpoint
pub const TELR_API_URL: &str = "https://secure.telr.com/gateway/order.json";

/// Fixed timeout for gateway calls
const GATEWAY_TIMEOUT: Duration = Duration::from_secs(30);

/// Error type for gateway operations
#[derive(Error, Debug)]
pub enum GatewayError {
    /// Credentials for the active mode are not configured
    #[error("Configuration error: {0}")]
    Config(String),

    /// The inbound request is missing a required value
    #[error("Validation error: {0}")]
    Validation(String),

    /// Network-level failure talking to Telr
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Telr answered with a non-success status
    #[error("Gateway returned status {status}: {body}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body, for logs
        body: String,
    },
}

/// Result type for gateway operations
pub type Result<T> = std::result::Result<T, GatewayError>;

/// Inbound order-creation request from the storefront
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateOrderRequest {
    /// Cart / booking identifier
    pub cart_id: Option<Value>,

    /// Order amount
    pub amount: Option<Value>,

    /// Order currency
    pub currency: Option<String>,

    /// Order description shown on the payment page
    pub description: Option<String>,

    /// Customer details
    pub customer: CustomerInfo,

    /// Redirect URLs after payment
    pub return_urls: ReturnUrls,
}

/// Customer block of an order-creation request
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CustomerInfo {
    /// Customer reference
    #[serde(rename = "ref")]
    pub reference: Option<String>,

    /// Email address
    pub email: Option<String>,

    /// First name(s)
    pub forenames: Option<String>,

    /// Last name
    pub surname: Option<String>,

    /// First address line
    pub address_line1: Option<String>,

    /// City
    pub city: Option<String>,

    /// Country
    pub country: Option<String>,

    /// Phone number
    pub phone: Option<String>,
}

/// Redirect URLs after the hosted payment page finishes
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ReturnUrls {
    /// Landing page after an authorised payment
    pub authorised: Option<String>,

    /// Landing page after a declined payment
    pub declined: Option<String>,

    /// Landing page after a cancelled payment
    pub cancelled: Option<String>,
}

/// Client for the Telr order API
pub struct TelrClient {
    /// Gateway configuration (mode + credentials)
    config: TelrConfig,

    /// Order endpoint URL
    endpoint: String,

    /// HTTP client
    client: Client,

    /// Timeout for requests
    timeout: Duration,
}

impl TelrClient {
    /// Create a client against the production Telr endpoint
    pub fn new(config: TelrConfig) -> Self {
        Self::with_endpoint(config, TELR_API_URL)
    }

    /// Create a client against a custom endpoint
    pub fn with_endpoint(config: TelrConfig, endpoint: &str) -> Self {
        TelrClient {
            config,
            endpoint: endpoint.to_string(),
            client: Client::new(),
            timeout: GATEWAY_TIMEOUT,
        }
    }

    /// Create a payment order
    ///
    /// Fails before any network I/O when credentials for the active mode
    /// are not configured. On success the remote JSON body is returned
    /// verbatim.
    pub async fn create_order(&self, request: CreateOrderRequest) -> Result<Value> {
        let creds = self
            .config
            .credentials()
            .map_err(|e| GatewayError::Config(e.to_string()))?;

        tracing::info!(
            cart_id = %request.cart_id.as_ref().unwrap_or(&serde_json::Value::Null),
            test_mode = self.config.is_test_mode(),
            "creating payment order"
        );

        let payload = json!({
            "method": "create",
            "store": creds.store_id,
            "authkey": creds.auth_key,
            "framed": 0,
            "language": "en",
            "order": {
                "cartid": request.cart_id,
                "test": if self.config.is_test_mode() { "1" } else { "0" },
                "amount": request.amount,
                "currency": request.currency,
                "description": request.description,
                "trantype": "sale"
            },
            "customer": {
                "ref": request.customer.reference,
                "email": request.customer.email,
                "name": {
                    "forenames": request.customer.forenames,
                    "surname": request.customer.surname
                },
                "address": {
                    "line1": request.customer.address_line1,
                    "city": request.customer.city,
                    "country": request.customer.country
                },
                "phone": request.customer.phone
            },
            "return": {
                "authorised": request.return_urls.authorised,
                "declined": request.return_urls.declined,
                "cancelled": request.return_urls.cancelled
            }
        });

        let body = self.forward(&payload).await?;
        tracing::info!(
            order_ref = %body.pointer("/order/ref").unwrap_or(&serde_json::Value::Null),
            "payment order created"
        );
        Ok(body)
    }

    /// Check the status of an existing order by its Telr reference
    ///
    /// The status fields are logged but not restructured; the remote body
    /// is relayed as-is.
    pub async fn check_status(&self, order_ref: &str) -> Result<Value> {
        if order_ref.is_empty() {
            return Err(GatewayError::Validation(
                "Order reference is required".to_string(),
            ));
        }

        let creds = self
            .config
            .credentials()
            .map_err(|e| GatewayError::Config(e.to_string()))?;

        tracing::info!(order_ref, "checking payment order status");

        let payload = json!({
            "method": "check",
            "store": creds.store_id,
            "authkey": creds.auth_key,
            "order": {
                "ref": order_ref
            }
        });

        let body = self.forward(&payload).await?;
        tracing::info!(
            order_ref,
            status_code = %body.pointer("/order/status/code").unwrap_or(&serde_json::Value::Null),
            status_text = %body.pointer("/order/status/text").unwrap_or(&serde_json::Value::Null),
            "order status retrieved"
        );
        Ok(body)
    }

    /// POST a payload to the gateway and decode the JSON body
    async fn forward(&self, payload: &Value) -> Result<Value> {
        let response = self
            .client
            .post(&self.endpoint)
            .timeout(self.timeout)
            .json(payload)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await?;
            return Err(GatewayError::Status { status, body });
        }

        let body: Value = response.json().await?;
        Ok(body)
    }
}
