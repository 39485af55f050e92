//! Domain enums, stored as TEXT in SQLite

use serde::{Deserialize, Serialize};

/// Event kind: solo participation or team participation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "UPPERCASE")]
#[sqlx(rename_all = "UPPERCASE")]
pub enum EventType {
    Solo,
    Group,
}

/// Per-registration payment status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "UPPERCASE")]
#[sqlx(rename_all = "UPPERCASE")]
pub enum PaymentStatus {
    Unpaid,
    Pending,
    Paid,
}

/// Payment order lifecycle
///
/// CREATED → PENDING → exactly one of {PAID, FAILED, CANCELLED, EXPIRED}.
/// Terminal states are final; PAID in particular is immutable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "UPPERCASE")]
#[sqlx(rename_all = "UPPERCASE")]
pub enum OrderStatus {
    Created,
    Pending,
    Paid,
    Failed,
    Cancelled,
    Expired,
}

impl OrderStatus {
    /// Whether this status accepts no further transitions
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            OrderStatus::Paid | OrderStatus::Failed | OrderStatus::Cancelled | OrderStatus::Expired
        )
    }
}

/// Settlement rail an order was created on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "UPPERCASE")]
#[sqlx(rename_all = "UPPERCASE")]
pub enum PaymentMode {
    Online,
    Cash,
}

/// Staff roles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "UPPERCASE")]
#[sqlx(rename_all = "UPPERCASE")]
pub enum StaffRole {
    Admin,
    Cashier,
    Guard,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_status_terminality() {
        assert!(!OrderStatus::Created.is_terminal());
        assert!(!OrderStatus::Pending.is_terminal());
        assert!(OrderStatus::Paid.is_terminal());
        assert!(OrderStatus::Failed.is_terminal());
        assert!(OrderStatus::Cancelled.is_terminal());
        assert!(OrderStatus::Expired.is_terminal());
    }

    #[test]
    fn enums_serialize_uppercase() {
        assert_eq!(serde_json::to_string(&EventType::Group).unwrap(), "\"GROUP\"");
        assert_eq!(serde_json::to_string(&PaymentStatus::Paid).unwrap(), "\"PAID\"");
        assert_eq!(serde_json::to_string(&OrderStatus::Cancelled).unwrap(), "\"CANCELLED\"");
        assert_eq!(serde_json::to_string(&PaymentMode::Cash).unwrap(), "\"CASH\"");
    }
}
