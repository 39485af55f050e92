//! Payment API module
//!
//! Gateway webhook intake and order status polling.

mod handler;

use axum::{Router, routing::get, routing::post};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/webhooks/cashfree", post(handler::cashfree_webhook))
        .route("/api/payment/status/{order_id}", get(handler::order_status))
}
