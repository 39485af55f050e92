//! Cash token model
//!
//! A staff-issued, single-use code representing a pre-authorized cash
//! amount. Redemption is irreversible and must exactly match the total
//! due.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct CashToken {
    pub id: i64,
    pub token: String,
    pub amount_paise: i64,
    pub issued_by: i64,
    pub is_used: bool,
    /// Settlement record created when the token was redeemed
    pub redeemed_order_id: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}
