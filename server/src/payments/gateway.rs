//! Payment gateway client
//!
//! The gateway is an external collaborator consumed through the
//! [`PaymentGateway`] trait; the production implementation speaks the
//! Cashfree order-creation contract over HTTPS. Tests substitute a mock.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use crate::core::config::GatewayConfig;

/// Everything the gateway needs to open a payment session.
#[derive(Debug, Clone)]
pub struct GatewayOrderRequest {
    pub order_id: String,
    pub amount_paise: i64,
    pub currency: String,
    pub customer_id: String,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: Option<String>,
    pub return_url: String,
    pub notify_url: String,
    pub event_ids: Vec<i64>,
}

/// Session handle returned by a successful order creation.
#[derive(Debug, Clone)]
pub struct GatewaySession {
    pub payment_session_id: String,
}

#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("gateway unreachable: {0}")]
    Transport(String),

    #[error("gateway rejected order ({status}): {body}")]
    Rejected { status: u16, body: String },

    #[error("gateway response missing payment_session_id")]
    MalformedResponse,
}

#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Open a payment session for a pre-persisted order.
    async fn create_order(&self, req: GatewayOrderRequest) -> Result<GatewaySession, GatewayError>;
}

/// HTTPS client for the Cashfree order-creation API.
pub struct CashfreeGateway {
    client: reqwest::Client,
    base_url: String,
    app_id: String,
    secret_key: String,
    api_version: String,
}

#[derive(Debug, Deserialize)]
struct CreateOrderResponse {
    payment_session_id: Option<String>,
}

impl CashfreeGateway {
    /// Build the client with a bounded timeout so a slow gateway cannot
    /// stall the registration critical path.
    pub fn new(config: &GatewayConfig, timeout: std::time::Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_default();
        Self {
            client,
            base_url: config.base_url.clone(),
            app_id: config.app_id.clone(),
            secret_key: config.secret_key.clone(),
            api_version: config.api_version.clone(),
        }
    }
}

#[async_trait]
impl PaymentGateway for CashfreeGateway {
    async fn create_order(&self, req: GatewayOrderRequest) -> Result<GatewaySession, GatewayError> {
        // Wire amounts are decimal currency units, internal amounts paise.
        let order_amount = req.amount_paise as f64 / 100.0;

        let payload = json!({
            "order_amount": order_amount,
            "order_currency": req.currency,
            "order_id": req.order_id,
            "customer_details": {
                "customer_id": req.customer_id,
                "customer_name": req.customer_name,
                "customer_email": req.customer_email,
                "customer_phone": req.customer_phone.as_deref().unwrap_or("9999999999"),
            },
            "order_meta": {
                "return_url": req.return_url,
                "notify_url": req.notify_url,
            },
            "order_tags": {
                "event_ids": format!("{:?}", req.event_ids),
            },
        });

        let response = self
            .client
            .post(format!("{}/orders", self.base_url))
            .header("x-client-id", &self.app_id)
            .header("x-client-secret", &self.secret_key)
            .header("x-api-version", &self.api_version)
            .json(&payload)
            .send()
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GatewayError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: CreateOrderResponse = response
            .json()
            .await
            .map_err(|_| GatewayError::MalformedResponse)?;

        let payment_session_id = parsed
            .payment_session_id
            .ok_or(GatewayError::MalformedResponse)?;

        Ok(GatewaySession { payment_session_id })
    }
}
