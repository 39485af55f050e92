//! Staff Repository

use sqlx::SqlitePool;

use super::{RepoError, RepoResult};
use crate::db::models::{Staff, StaffRole};
use crate::utils::id::snowflake_id;
use crate::utils::time::now_millis;

const STAFF_SELECT: &str = "SELECT id, username, password_hash, role, assigned_event_id, created_at, updated_at FROM staff";

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Staff>> {
    let sql = format!("{STAFF_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, Staff>(&sql).bind(id).fetch_optional(pool).await?;
    Ok(row)
}

pub async fn find_by_username(pool: &SqlitePool, username: &str) -> RepoResult<Option<Staff>> {
    let sql = format!("{STAFF_SELECT} WHERE username = ?");
    let row = sqlx::query_as::<_, Staff>(&sql)
        .bind(username)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<Staff>> {
    let sql = format!("{STAFF_SELECT} ORDER BY username ASC");
    let rows = sqlx::query_as::<_, Staff>(&sql).fetch_all(pool).await?;
    Ok(rows)
}

pub async fn insert(
    pool: &SqlitePool,
    username: &str,
    password_hash: &str,
    role: StaffRole,
    assigned_event_id: Option<i64>,
) -> RepoResult<i64> {
    let id = snowflake_id();
    let now = now_millis();
    sqlx::query(
        "INSERT INTO staff (id, username, password_hash, role, assigned_event_id, created_at, updated_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)",
    )
    .bind(id)
    .bind(username)
    .bind(password_hash)
    .bind(role)
    .bind(assigned_event_id)
    .bind(now)
    .execute(pool)
    .await
    .map_err(|e| match e {
        sqlx::Error::Database(ref db) if db.is_unique_violation() => {
            RepoError::Duplicate(format!("staff {username}"))
        }
        other => RepoError::from(other),
    })?;
    Ok(id)
}
