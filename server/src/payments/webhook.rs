//! Webhook Reconciliation Engine
//!
//! Consumes asynchronous gateway notifications: verifies the HMAC
//! signature, transitions the order, and fans PAID out to every
//! registration sharing the settlement reference, all in one
//! transaction, so the handler can be re-invoked with the same payload
//! after a mid-fan-out failure.
//!
//! The sender retries indefinitely on anything but a 200, so nothing in
//! here escalates: unknown orders are logged and dropped, duplicates are
//! no-ops.

use base64::Engine;
use ring::hmac;
use serde::Deserialize;
use sqlx::SqlitePool;
use tracing::{info, warn};

use crate::db::models::OrderStatus;
use crate::db::repository::{payment_order, registration};
use crate::utils::{AppError, AppResult};

/// Gateway notification body: `{data: {order: {...}, payment: {...}}}`.
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookPayload {
    #[serde(default)]
    pub data: WebhookData,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WebhookData {
    #[serde(default)]
    pub order: WebhookOrder,
    #[serde(default)]
    pub payment: WebhookPayment,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WebhookOrder {
    pub order_id: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WebhookPayment {
    pub cf_payment_id: Option<serde_json::Value>,
    /// SUCCESS | FAILED | USER_DROPPED | anything else
    pub payment_status: Option<String>,
}

/// Verify the gateway signature: HMAC-SHA256 over `timestamp + raw_body`,
/// base64-encoded. Constant-time comparison via `ring`.
pub fn verify_signature(secret: &str, timestamp: &str, raw_body: &str, signature: &str) -> bool {
    let Ok(expected_tag) = base64::engine::general_purpose::STANDARD.decode(signature) else {
        return false;
    };
    let key = hmac::Key::new(hmac::HMAC_SHA256, secret.as_bytes());
    let message = format!("{timestamp}{raw_body}");
    hmac::verify(&key, message.as_bytes(), &expected_tag).is_ok()
}

/// Map a gateway status marker to the internal order lifecycle.
///
/// Unrecognized markers stay PENDING, awaiting a later definitive
/// callback.
pub fn map_gateway_status(payment_status: Option<&str>) -> OrderStatus {
    match payment_status {
        Some("SUCCESS") => OrderStatus::Paid,
        Some("FAILED") => OrderStatus::Failed,
        Some("USER_DROPPED") => OrderStatus::Cancelled,
        _ => OrderStatus::Pending,
    }
}

/// Apply one notification idempotently.
///
/// Order update and registration fan-out commit together; duplicate
/// deliveries (same payload, any order) leave the store unchanged.
pub async fn process_notification(
    pool: &SqlitePool,
    payload: &WebhookPayload,
    raw_body: &str,
) -> AppResult<()> {
    let Some(order_id) = payload.data.order.order_id.as_deref() else {
        warn!("Webhook payload missing order_id, dropping");
        return Ok(());
    };
    let payment_status = payload.data.payment.payment_status.as_deref();
    info!(order_id = %order_id, status = ?payment_status, "Webhook received");

    let Some(order) = payment_order::find_by_id(pool, order_id).await? else {
        // Never escalate: the sender would retry an unknown order forever.
        warn!(order_id = %order_id, "Webhook for unknown order, dropping");
        return Ok(());
    };

    if order.status == OrderStatus::Paid {
        info!(order_id = %order_id, "Order already PAID, skipping duplicate notification");
        return Ok(());
    }

    let new_status = map_gateway_status(payment_status);
    let gateway_reference_id = payload
        .data
        .payment
        .cf_payment_id
        .as_ref()
        .map(|v| match v {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        });

    let mut tx = pool.begin().await.map_err(AppError::from)?;

    let transitioned = payment_order::transition(
        &mut *tx,
        order_id,
        new_status,
        gateway_reference_id.as_deref(),
        Some(raw_body),
    )
    .await?;

    if !transitioned {
        // Lost a race against another delivery that reached a terminal
        // state first; their transaction owns the fan-out.
        info!(order_id = %order_id, "Order already terminal, skipping");
        return Ok(());
    }

    if new_status == OrderStatus::Paid {
        let count = registration::mark_paid_by_order(&mut *tx, order_id).await?;
        if count == 0 {
            warn!(order_id = %order_id, "No registrations found for paid order");
        }
        // Legacy coarse flag on the users covered by this order
        sqlx::query(
            "UPDATE user SET payment_status = 'PAID' \
             WHERE id IN (SELECT user_id FROM registration WHERE order_id = ?)",
        )
        .bind(order_id)
        .execute(&mut *tx)
        .await
        .map_err(AppError::from)?;
        info!(order_id = %order_id, registrations = count, "Fan-out complete, order PAID");
    }

    tx.commit().await.map_err(AppError::from)?;
    info!(order_id = %order_id, status = ?new_status, "Order updated");
    Ok(())
}
