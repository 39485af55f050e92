//! Payment API handlers

use axum::{
    Json,
    extract::{Path, State},
    http::HeaderMap,
};
use serde::Serialize;
use tracing::{error, warn};

use crate::core::ServerState;
use crate::payments::orders::{self, OrderStatusView};
use crate::payments::webhook::{self, WebhookPayload};
use crate::utils::AppResult;

#[derive(Debug, Serialize)]
pub struct WebhookAck {
    pub status: &'static str,
}

/// POST /api/webhooks/cashfree - gateway notification intake
///
/// Always acknowledges with 200: the gateway retries anything else
/// indefinitely, and a malformed or unverifiable delivery will not get
/// better on retry. Failures are logged and dropped.
pub async fn cashfree_webhook(
    State(state): State<ServerState>,
    headers: HeaderMap,
    raw_body: String,
) -> Json<WebhookAck> {
    let signature = headers
        .get("x-webhook-signature")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    let timestamp = headers
        .get("x-webhook-timestamp")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();

    if !webhook::verify_signature(
        &state.config.gateway.secret_key,
        timestamp,
        &raw_body,
        signature,
    ) {
        warn!("Webhook signature verification failed, dropping");
        return Json(WebhookAck { status: "error" });
    }

    let payload: WebhookPayload = match serde_json::from_str(&raw_body) {
        Ok(p) => p,
        Err(e) => {
            warn!(error = %e, "Webhook body is not valid JSON, dropping");
            return Json(WebhookAck { status: "error" });
        }
    };

    match webhook::process_notification(&state.pool, &payload, &raw_body).await {
        Ok(()) => Json(WebhookAck { status: "ok" }),
        Err(e) => {
            error!(error = %e, "Webhook processing failed");
            Json(WebhookAck { status: "error" })
        }
    }
}

/// GET /api/payment/status/:order_id - poll a settlement
pub async fn order_status(
    State(state): State<ServerState>,
    Path(order_id): Path<String>,
) -> AppResult<Json<OrderStatusView>> {
    let view = orders::check_status(&state.pool, &order_id).await?;
    Ok(Json(view))
}
