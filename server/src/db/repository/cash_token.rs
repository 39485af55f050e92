//! Cash Token Repository
//!
//! The single-use flag is flipped with a compare-and-set UPDATE; two
//! simultaneous redemptions of the same token cannot both win.

use sqlx::{Executor, Sqlite, SqlitePool};

use super::{RepoError, RepoResult};
use crate::db::models::CashToken;
use crate::utils::id::{generate_token_code, snowflake_id};
use crate::utils::time::now_millis;

const TOKEN_SELECT: &str = "SELECT id, token, amount_paise, issued_by, is_used, redeemed_order_id, created_at, updated_at FROM cash_token";

pub async fn find_by_code<'e, E>(ex: E, code: &str) -> RepoResult<Option<CashToken>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let sql = format!("{TOKEN_SELECT} WHERE token = ?");
    let row = sqlx::query_as::<_, CashToken>(&sql)
        .bind(code)
        .fetch_optional(ex)
        .await?;
    Ok(row)
}

/// Insert a freshly issued token, generating a collision-checked code.
pub async fn insert(pool: &SqlitePool, amount_paise: i64, issued_by: i64) -> RepoResult<String> {
    let now = now_millis();
    // The code space is small (36^5); collide-and-retry instead of
    // trusting the generator.
    loop {
        let code = generate_token_code();
        let result = sqlx::query(
            "INSERT INTO cash_token (id, token, amount_paise, issued_by, is_used, created_at, updated_at) \
             VALUES (?1, ?2, ?3, ?4, 0, ?5, ?5)",
        )
        .bind(snowflake_id())
        .bind(&code)
        .bind(amount_paise)
        .bind(issued_by)
        .bind(now)
        .execute(pool)
        .await;

        match result {
            Ok(_) => return Ok(code),
            Err(sqlx::Error::Database(ref db)) if db.is_unique_violation() => continue,
            Err(e) => return Err(RepoError::from(e)),
        }
    }
}

/// Atomically consume the token: flips `is_used` only if it is still
/// unset. Returns false when another redemption already won.
pub async fn consume<'e, E>(ex: E, code: &str, redeemed_order_id: &str) -> RepoResult<bool>
where
    E: Executor<'e, Database = Sqlite>,
{
    let now = now_millis();
    let rows = sqlx::query(
        "UPDATE cash_token SET is_used = 1, redeemed_order_id = ?1, updated_at = ?2 \
         WHERE token = ?3 AND is_used = 0",
    )
    .bind(redeemed_order_id)
    .bind(now)
    .bind(code)
    .execute(ex)
    .await?;
    Ok(rows.rows_affected() > 0)
}
