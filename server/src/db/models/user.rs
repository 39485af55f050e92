//! User model
//!
//! A User is created on first registration, or as a "shadow" identity
//! when a team leader invites a teammate who has never logged in. Shadow
//! profiles stay incomplete until the invitee logs in with their mailed
//! uid.

use serde::{Deserialize, Serialize};

use super::enums::PaymentStatus;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    /// Globally unique public code, e.g. `EVT-8X29A`
    pub uid: String,
    pub email: String,
    pub name: String,
    pub phone: Option<String>,
    pub college: Option<String>,
    pub is_shadow: bool,
    /// Legacy coarse flag, superseded by `registration.payment_status`
    pub payment_status: PaymentStatus,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserCreate {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub college: Option<String>,
}
