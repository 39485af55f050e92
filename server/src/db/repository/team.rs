//! Team Repository

use sqlx::{Executor, Sqlite};

use super::RepoResult;
use crate::db::models::Team;
use crate::utils::id::snowflake_id;
use crate::utils::time::now_millis;

pub async fn find_by_id<'e, E>(ex: E, id: i64) -> RepoResult<Option<Team>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let row = sqlx::query_as::<_, Team>(
        "SELECT id, name, leader_id, event_id, created_at FROM team WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(ex)
    .await?;
    Ok(row)
}

/// A leader holds at most one team per event (unique pair), so this is
/// the retry lookup for cart resubmission.
pub async fn find_by_leader_event<'e, E>(
    ex: E,
    leader_id: i64,
    event_id: i64,
) -> RepoResult<Option<Team>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let row = sqlx::query_as::<_, Team>(
        "SELECT id, name, leader_id, event_id, created_at FROM team WHERE leader_id = ? AND event_id = ?",
    )
    .bind(leader_id)
    .bind(event_id)
    .fetch_optional(ex)
    .await?;
    Ok(row)
}

pub async fn rename<'e, E>(ex: E, team_id: i64, name: &str) -> RepoResult<()>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query("UPDATE team SET name = ?1 WHERE id = ?2")
        .bind(name)
        .bind(team_id)
        .execute(ex)
        .await?;
    Ok(())
}

/// Current team count for an event; feeds auto-naming ("Team #<count+1>",
/// monotonic but not gap-free once teams are deleted).
pub async fn count_for_event<'e, E>(ex: E, event_id: i64) -> RepoResult<i64>
where
    E: Executor<'e, Database = Sqlite>,
{
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM team WHERE event_id = ?")
        .bind(event_id)
        .fetch_one(ex)
        .await?;
    Ok(count)
}

pub async fn insert<'e, E>(ex: E, name: &str, leader_id: i64, event_id: i64) -> RepoResult<i64>
where
    E: Executor<'e, Database = Sqlite>,
{
    let id = snowflake_id();
    let now = now_millis();
    sqlx::query(
        "INSERT INTO team (id, name, leader_id, event_id, created_at) VALUES (?1, ?2, ?3, ?4, ?5)",
    )
    .bind(id)
    .bind(name)
    .bind(leader_id)
    .bind(event_id)
    .bind(now)
    .execute(ex)
    .await?;
    Ok(id)
}

/// Remove a leader's existing team for an event (retry path: the prior
/// attempt's team goes away with its non-PAID registrations).
pub async fn delete_for_leader_event<'e, E>(ex: E, leader_id: i64, event_id: i64) -> RepoResult<bool>
where
    E: Executor<'e, Database = Sqlite>,
{
    let rows = sqlx::query("DELETE FROM team WHERE leader_id = ? AND event_id = ?")
        .bind(leader_id)
        .bind(event_id)
        .execute(ex)
        .await?;
    Ok(rows.rows_affected() > 0)
}
