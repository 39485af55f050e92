//! Payment Order Manager
//!
//! Creates and tracks gateway-backed orders. The order row is persisted
//! BEFORE the gateway call (audit-first), so a crashed or rejected call
//! always leaves a traceable row behind.

use serde::Serialize;
use sqlx::SqlitePool;
use tracing::{error, info};

use crate::db::models::{OrderStatus, PaymentMode, User};
use crate::db::repository::{payment_order, registration, user as user_repo};
use crate::payments::gateway::{GatewayOrderRequest, PaymentGateway};
use crate::utils::id::generate_order_id;
use crate::utils::{AppError, AppResult};

/// Result of creating an online order: the settlement reference plus the
/// session handle the client uses to open the gateway's checkout.
#[derive(Debug, Clone, Serialize)]
pub struct CreatedOrder {
    pub order_id: String,
    pub payment_session_id: String,
}

/// Create a payment order against the gateway.
///
/// 1. Persists a CREATED row (audit-first)
/// 2. Calls the gateway with a bounded timeout
/// 3. On success stores the session handle (row becomes PENDING)
/// 4. On failure marks the row FAILED and surfaces a gateway error;
///    the caller must not write registrations for a failed order
pub async fn create_order(
    pool: &SqlitePool,
    gateway: &dyn PaymentGateway,
    user: &User,
    amount_paise: i64,
    event_ids: &[i64],
    return_url: &str,
    notify_url: &str,
) -> AppResult<CreatedOrder> {
    let order_id = generate_order_id();
    let event_ids_json =
        serde_json::to_string(event_ids).map_err(|e| AppError::internal(e.to_string()))?;

    payment_order::insert(
        pool,
        &order_id,
        user.id,
        amount_paise,
        PaymentMode::Online,
        OrderStatus::Created,
        &event_ids_json,
    )
    .await?;

    let request = GatewayOrderRequest {
        order_id: order_id.clone(),
        amount_paise,
        currency: "INR".to_string(),
        customer_id: user.uid.clone(),
        customer_name: user.name.clone(),
        customer_email: user.email.clone(),
        customer_phone: user.phone.clone(),
        return_url: return_url.to_string(),
        notify_url: notify_url.to_string(),
        event_ids: event_ids.to_vec(),
    };

    match gateway.create_order(request).await {
        Ok(session) => {
            payment_order::set_session(pool, &order_id, &session.payment_session_id).await?;
            info!(order_id = %order_id, uid = %user.uid, "Payment order created");
            Ok(CreatedOrder {
                order_id,
                payment_session_id: session.payment_session_id,
            })
        }
        Err(e) => {
            error!(order_id = %order_id, error = %e, "Gateway order creation failed");
            payment_order::transition(
                pool,
                &order_id,
                OrderStatus::Failed,
                None,
                Some(&e.to_string()),
            )
            .await?;
            Err(AppError::Gateway(e.to_string()))
        }
    }
}

/// Client polling view of an order.
#[derive(Debug, Clone, Serialize)]
pub struct OrderStatusView {
    pub order_id: String,
    pub status: OrderStatus,
    pub amount_paise: i64,
    /// Public code of a user holding a registration on this order, for
    /// post-payment redirect
    pub uid: Option<String>,
}

/// Pure read for client polling. Never calls the gateway.
pub async fn check_status(pool: &SqlitePool, order_id: &str) -> AppResult<OrderStatusView> {
    let order = payment_order::find_by_id(pool, order_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Order {order_id}")))?;

    let uid = match registration::find_by_order(pool, order_id).await?.first() {
        Some(reg) => user_repo::find_by_id(pool, reg.user_id).await?.map(|u| u.uid),
        None => None,
    };

    Ok(OrderStatusView {
        order_id: order.order_id,
        status: order.status,
        amount_paise: order.amount_paise,
        uid,
    })
}
