//! Registration Repository

use sqlx::{Executor, Sqlite, SqlitePool};

use super::RepoResult;
use crate::db::models::{PaymentStatus, RegisteredEvent, Registration};
use crate::utils::id::snowflake_id;
use crate::utils::time::now_millis;

const REG_SELECT: &str = "SELECT id, user_id, event_id, team_id, order_id, payment_status, attended, created_at, updated_at FROM registration";

pub async fn find_by_user_event<'e, E>(
    ex: E,
    user_id: i64,
    event_id: i64,
) -> RepoResult<Option<Registration>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let sql = format!("{REG_SELECT} WHERE user_id = ? AND event_id = ?");
    let row = sqlx::query_as::<_, Registration>(&sql)
        .bind(user_id)
        .bind(event_id)
        .fetch_optional(ex)
        .await?;
    Ok(row)
}

/// Every registration sharing a settlement reference (fan-out set).
pub async fn find_by_order<'e, E>(ex: E, order_id: &str) -> RepoResult<Vec<Registration>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let sql = format!("{REG_SELECT} WHERE order_id = ?");
    let rows = sqlx::query_as::<_, Registration>(&sql)
        .bind(order_id)
        .fetch_all(ex)
        .await?;
    Ok(rows)
}

/// A user's registrations joined with event and team, for profile views.
pub async fn find_registered_events(pool: &SqlitePool, user_id: i64) -> RepoResult<Vec<RegisteredEvent>> {
    let rows = sqlx::query_as::<_, RegisteredEvent>(
        "SELECT r.event_id, e.name AS event_name, e.fee_paise, r.payment_status, r.attended, t.name AS team_name \
         FROM registration r \
         JOIN event e ON e.id = r.event_id \
         LEFT JOIN team t ON t.id = r.team_id \
         WHERE r.user_id = ? \
         ORDER BY r.created_at ASC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn insert<'e, E>(
    ex: E,
    user_id: i64,
    event_id: i64,
    team_id: Option<i64>,
    order_id: &str,
    payment_status: PaymentStatus,
) -> RepoResult<i64>
where
    E: Executor<'e, Database = Sqlite>,
{
    let id = snowflake_id();
    let now = now_millis();
    sqlx::query(
        "INSERT INTO registration (id, user_id, event_id, team_id, order_id, payment_status, attended, created_at, updated_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, 0, ?7, ?7)",
    )
    .bind(id)
    .bind(user_id)
    .bind(event_id)
    .bind(team_id)
    .bind(order_id)
    .bind(payment_status)
    .bind(now)
    .execute(ex)
    .await?;
    Ok(id)
}

/// Retry path: drop the prior non-PAID row for (user, event) so a fresh
/// one can be written. PAID rows are never touched here.
pub async fn delete_non_paid<'e, E>(ex: E, user_id: i64, event_id: i64) -> RepoResult<bool>
where
    E: Executor<'e, Database = Sqlite>,
{
    let rows = sqlx::query(
        "DELETE FROM registration WHERE user_id = ? AND event_id = ? AND payment_status != 'PAID'",
    )
    .bind(user_id)
    .bind(event_id)
    .execute(ex)
    .await?;
    Ok(rows.rows_affected() > 0)
}

/// Fan-out: mark every registration holding this settlement reference
/// PAID, regardless of which user holds it.
pub async fn mark_paid_by_order<'e, E>(ex: E, order_id: &str) -> RepoResult<u64>
where
    E: Executor<'e, Database = Sqlite>,
{
    let now = now_millis();
    let rows = sqlx::query(
        "UPDATE registration SET payment_status = 'PAID', updated_at = ?1 WHERE order_id = ?2",
    )
    .bind(now)
    .bind(order_id)
    .execute(ex)
    .await?;
    Ok(rows.rows_affected())
}

/// Flip the attended flag. Callers enforce the PAID precondition.
pub async fn mark_attended<'e, E>(ex: E, registration_id: i64) -> RepoResult<()>
where
    E: Executor<'e, Database = Sqlite>,
{
    let now = now_millis();
    sqlx::query("UPDATE registration SET attended = 1, updated_at = ?1 WHERE id = ?2")
        .bind(now)
        .bind(registration_id)
        .execute(ex)
        .await?;
    Ok(())
}

/// Count of live rows for (user, event); the unique index keeps this at
/// most 1, tests assert on it.
pub async fn count_for_user_event(pool: &SqlitePool, user_id: i64, event_id: i64) -> RepoResult<i64> {
    let count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM registration WHERE user_id = ? AND event_id = ?")
            .bind(user_id)
            .bind(event_id)
            .fetch_one(pool)
            .await?;
    Ok(count)
}
