//! Registration model, the central join entity
//!
//! At most one live registration per (user, event); a retry deletes the
//! prior non-PAID row before inserting. `attended` may only flip to true
//! once `payment_status == PAID`.

use serde::{Deserialize, Serialize};

use super::enums::PaymentStatus;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Registration {
    pub id: i64,
    pub user_id: i64,
    pub event_id: i64,
    pub team_id: Option<i64>,
    /// Settlement reference: `payment_order.order_id`, shared by every
    /// registration the order covers
    pub order_id: Option<String>,
    pub payment_status: PaymentStatus,
    pub attended: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Registration joined with its event, for profile views
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct RegisteredEvent {
    pub event_id: i64,
    pub event_name: String,
    pub fee_paise: i64,
    pub payment_status: PaymentStatus,
    pub attended: bool,
    pub team_name: Option<String>,
}
