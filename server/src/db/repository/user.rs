//! User Repository

use sqlx::{Executor, Sqlite, SqlitePool};

use super::{RepoError, RepoResult};
use crate::db::models::{PaymentStatus, User};
use crate::utils::id::{generate_uid, snowflake_id};
use crate::utils::time::now_millis;

const USER_SELECT: &str = "SELECT id, uid, email, name, phone, college, is_shadow, payment_status, created_at, updated_at FROM user";

pub async fn find_by_id<'e, E>(ex: E, id: i64) -> RepoResult<Option<User>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let sql = format!("{USER_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, User>(&sql).bind(id).fetch_optional(ex).await?;
    Ok(row)
}

pub async fn find_by_uid<'e, E>(ex: E, uid: &str) -> RepoResult<Option<User>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let sql = format!("{USER_SELECT} WHERE uid = ?");
    let row = sqlx::query_as::<_, User>(&sql).bind(uid).fetch_optional(ex).await?;
    Ok(row)
}

/// Emails are matched case-insensitively; callers store them trimmed.
pub async fn find_by_email<'e, E>(ex: E, email: &str) -> RepoResult<Option<User>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let sql = format!("{USER_SELECT} WHERE email = ? COLLATE NOCASE");
    let row = sqlx::query_as::<_, User>(&sql)
        .bind(email)
        .fetch_optional(ex)
        .await?;
    Ok(row)
}

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<User>> {
    let sql = format!("{USER_SELECT} ORDER BY created_at DESC");
    let rows = sqlx::query_as::<_, User>(&sql).fetch_all(pool).await?;
    Ok(rows)
}

/// Allocate a public uid that does not collide with an existing user.
pub async fn allocate_uid(pool: &SqlitePool) -> RepoResult<String> {
    loop {
        let uid = generate_uid();
        if find_by_uid(pool, &uid).await?.is_none() {
            return Ok(uid);
        }
    }
}

/// Insert a user row. `is_shadow` marks invited teammates whose profile
/// is incomplete until first login.
#[allow(clippy::too_many_arguments)]
pub async fn insert<'e, E>(
    ex: E,
    uid: &str,
    email: &str,
    name: &str,
    phone: Option<&str>,
    college: Option<&str>,
    is_shadow: bool,
    payment_status: PaymentStatus,
) -> RepoResult<i64>
where
    E: Executor<'e, Database = Sqlite>,
{
    let id = snowflake_id();
    let now = now_millis();
    sqlx::query(
        "INSERT INTO user (id, uid, email, name, phone, college, is_shadow, payment_status, created_at, updated_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?9)",
    )
    .bind(id)
    .bind(uid)
    .bind(email)
    .bind(name)
    .bind(phone)
    .bind(college)
    .bind(is_shadow)
    .bind(payment_status)
    .bind(now)
    .execute(ex)
    .await
    .map_err(|e| match e {
        sqlx::Error::Database(ref db) if db.is_unique_violation() => {
            RepoError::Duplicate(format!("user {email}"))
        }
        other => RepoError::from(other),
    })?;
    Ok(id)
}

/// Complete a shadow profile at first signup with the invitee's own
/// details, clearing the shadow flag.
pub async fn claim_shadow<'e, E>(
    ex: E,
    user_id: i64,
    name: &str,
    phone: Option<&str>,
    college: Option<&str>,
) -> RepoResult<()>
where
    E: Executor<'e, Database = Sqlite>,
{
    let now = now_millis();
    sqlx::query(
        "UPDATE user SET name = ?1, phone = ?2, college = ?3, is_shadow = 0, updated_at = ?4 WHERE id = ?5",
    )
    .bind(name)
    .bind(phone)
    .bind(college)
    .bind(now)
    .bind(user_id)
    .execute(ex)
    .await?;
    Ok(())
}

/// Update the legacy coarse payment flag.
pub async fn set_payment_status<'e, E>(
    ex: E,
    user_id: i64,
    status: PaymentStatus,
) -> RepoResult<()>
where
    E: Executor<'e, Database = Sqlite>,
{
    let now = now_millis();
    sqlx::query("UPDATE user SET payment_status = ?1, updated_at = ?2 WHERE id = ?3")
        .bind(status)
        .bind(now)
        .bind(user_id)
        .execute(ex)
        .await?;
    Ok(())
}

/// Delete a user and everything hanging off them, in one transaction.
///
/// Explicit cascade policy for the aggregate root: registrations, led
/// teams (and those teams' registrations) go with the user.
pub async fn delete_cascade(pool: &SqlitePool, user_id: i64) -> RepoResult<bool> {
    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM registration WHERE team_id IN (SELECT id FROM team WHERE leader_id = ?)")
        .bind(user_id)
        .execute(&mut *tx)
        .await?;
    sqlx::query("DELETE FROM registration WHERE user_id = ?")
        .bind(user_id)
        .execute(&mut *tx)
        .await?;
    sqlx::query("DELETE FROM team WHERE leader_id = ?")
        .bind(user_id)
        .execute(&mut *tx)
        .await?;
    let rows = sqlx::query("DELETE FROM user WHERE id = ?")
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(rows.rows_affected() > 0)
}
