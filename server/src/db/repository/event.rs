//! Event Repository

use sqlx::{Executor, Sqlite, SqlitePool};

use super::RepoResult;
use crate::db::models::{Event, EventCreate};
use crate::utils::id::snowflake_id;
use crate::utils::time::now_millis;

const EVENT_SELECT: &str = "SELECT id, name, event_type, fee_paise, min_team_size, max_team_size, description, event_date, start_time, end_time, created_at, updated_at FROM event";

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<Event>> {
    let sql = format!("{EVENT_SELECT} ORDER BY created_at ASC");
    let rows = sqlx::query_as::<_, Event>(&sql).fetch_all(pool).await?;
    Ok(rows)
}

pub async fn find_by_id<'e, E>(ex: E, id: i64) -> RepoResult<Option<Event>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let sql = format!("{EVENT_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, Event>(&sql).bind(id).fetch_optional(ex).await?;
    Ok(row)
}

pub async fn create(pool: &SqlitePool, data: EventCreate) -> RepoResult<i64> {
    let id = snowflake_id();
    let now = now_millis();
    sqlx::query(
        "INSERT INTO event (id, name, event_type, fee_paise, min_team_size, max_team_size, description, event_date, start_time, end_time, created_at, updated_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?11)",
    )
    .bind(id)
    .bind(&data.name)
    .bind(data.event_type)
    .bind(data.fee_paise)
    .bind(data.min_team_size)
    .bind(data.max_team_size)
    .bind(&data.description)
    .bind(&data.event_date)
    .bind(&data.start_time)
    .bind(&data.end_time)
    .bind(now)
    .execute(pool)
    .await?;
    Ok(id)
}

/// Delete an event and its teams/registrations in one transaction.
///
/// Explicit cascade policy for the aggregate root, never left to ad hoc
/// loops in handlers.
pub async fn delete_cascade(pool: &SqlitePool, event_id: i64) -> RepoResult<bool> {
    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM registration WHERE event_id = ?")
        .bind(event_id)
        .execute(&mut *tx)
        .await?;
    sqlx::query("DELETE FROM team WHERE event_id = ?")
        .bind(event_id)
        .execute(&mut *tx)
        .await?;
    let rows = sqlx::query("DELETE FROM event WHERE id = ?")
        .bind(event_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(rows.rows_affected() > 0)
}
