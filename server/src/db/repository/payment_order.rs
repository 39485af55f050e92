//! Payment Order Repository
//!
//! `order_id` is the primary key and the settlement reference that
//! registrations point to. Status updates guard terminal states so a
//! PAID order can never be overwritten.

use sqlx::{Executor, Sqlite};

use super::RepoResult;
use crate::db::models::{OrderStatus, PaymentMode, PaymentOrder};
use crate::utils::time::now_millis;

const ORDER_SELECT: &str = "SELECT order_id, user_id, amount_paise, currency, payment_mode, status, event_ids_json, payment_session_id, gateway_reference_id, gateway_response, created_at, updated_at FROM payment_order";

pub async fn find_by_id<'e, E>(ex: E, order_id: &str) -> RepoResult<Option<PaymentOrder>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let sql = format!("{ORDER_SELECT} WHERE order_id = ?");
    let row = sqlx::query_as::<_, PaymentOrder>(&sql)
        .bind(order_id)
        .fetch_optional(ex)
        .await?;
    Ok(row)
}

pub async fn insert<'e, E>(
    ex: E,
    order_id: &str,
    user_id: i64,
    amount_paise: i64,
    payment_mode: PaymentMode,
    status: OrderStatus,
    event_ids_json: &str,
) -> RepoResult<()>
where
    E: Executor<'e, Database = Sqlite>,
{
    let now = now_millis();
    sqlx::query(
        "INSERT INTO payment_order (order_id, user_id, amount_paise, currency, payment_mode, status, event_ids_json, created_at, updated_at) \
         VALUES (?1, ?2, ?3, 'INR', ?4, ?5, ?6, ?7, ?7)",
    )
    .bind(order_id)
    .bind(user_id)
    .bind(amount_paise)
    .bind(payment_mode)
    .bind(status)
    .bind(event_ids_json)
    .bind(now)
    .execute(ex)
    .await?;
    Ok(())
}

/// Store the gateway session handle and promote CREATED → PENDING.
pub async fn set_session<'e, E>(ex: E, order_id: &str, session_id: &str) -> RepoResult<()>
where
    E: Executor<'e, Database = Sqlite>,
{
    let now = now_millis();
    sqlx::query(
        "UPDATE payment_order SET payment_session_id = ?1, status = 'PENDING', updated_at = ?2 WHERE order_id = ?3",
    )
    .bind(session_id)
    .bind(now)
    .bind(order_id)
    .execute(ex)
    .await?;
    Ok(())
}

/// Transition to a new status, refusing to leave a terminal state.
///
/// The `NOT IN (...)` guard makes duplicate webhook deliveries a no-op at
/// the SQL level even if two arrive concurrently.
pub async fn transition<'e, E>(
    ex: E,
    order_id: &str,
    status: OrderStatus,
    gateway_reference_id: Option<&str>,
    gateway_response: Option<&str>,
) -> RepoResult<bool>
where
    E: Executor<'e, Database = Sqlite>,
{
    let now = now_millis();
    let rows = sqlx::query(
        "UPDATE payment_order SET status = ?1, \
         gateway_reference_id = COALESCE(?2, gateway_reference_id), \
         gateway_response = COALESCE(?3, gateway_response), \
         updated_at = ?4 \
         WHERE order_id = ?5 AND status NOT IN ('PAID', 'FAILED', 'CANCELLED', 'EXPIRED')",
    )
    .bind(status)
    .bind(gateway_reference_id)
    .bind(gateway_response)
    .bind(now)
    .bind(order_id)
    .execute(ex)
    .await?;
    Ok(rows.rows_affected() > 0)
}
