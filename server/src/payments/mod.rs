//! Payment settlement
//!
//! - [`gateway`] - external gateway client (trait + HTTPS impl)
//! - [`orders`] - Payment Order Manager (create/track gateway orders)
//! - [`webhook`] - Webhook Reconciliation Engine
//! - [`tokens`] - Cash Token Ledger

pub mod gateway;
pub mod orders;
pub mod tokens;
pub mod webhook;

pub use gateway::{CashfreeGateway, GatewayError, GatewayOrderRequest, GatewaySession, PaymentGateway};
pub use orders::{CreatedOrder, OrderStatusView};
pub use tokens::TokenError;
