//! Payment order model
//!
//! One row per settlement attempt. Online orders track the gateway
//! session; cash settlements are materialized here too at token
//! redemption so both rails share one reference type.

use serde::{Deserialize, Serialize};

use super::enums::{OrderStatus, PaymentMode};

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct PaymentOrder {
    pub order_id: String,
    pub user_id: i64,
    pub amount_paise: i64,
    pub currency: String,
    pub payment_mode: PaymentMode,
    pub status: OrderStatus,
    /// JSON-encoded list of event ids the order covers
    pub event_ids_json: String,
    pub payment_session_id: Option<String>,
    /// Gateway-side payment id (`cf_payment_id`)
    pub gateway_reference_id: Option<String>,
    /// Raw gateway payload, kept for audit
    pub gateway_response: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl PaymentOrder {
    pub fn event_ids(&self) -> Vec<i64> {
        serde_json::from_str(&self.event_ids_json).unwrap_or_default()
    }
}
