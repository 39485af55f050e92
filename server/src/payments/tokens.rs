//! Cash Token Ledger
//!
//! Staff issue single-use tokens ahead of a cash transaction; the
//! orchestrator redeems one when the cart total exactly matches. On
//! redemption the ledger materializes a PAID payment_order row so cash
//! settlements carry the same reference type as online ones.

use sqlx::SqlitePool;
use tracing::info;

use crate::db::models::{OrderStatus, PaymentMode};
use crate::db::repository::{cash_token, payment_order, RepoError};
use crate::utils::id::cash_order_id;
use crate::utils::AppError;

#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("Invalid token")]
    InvalidToken,

    #[error("Token already used")]
    AlreadyUsed,

    #[error("Token amount does not match the total due")]
    AmountMismatch { token_paise: i64, required_paise: i64 },

    #[error(transparent)]
    Repo(#[from] RepoError),
}

impl From<TokenError> for AppError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Repo(repo) => repo.into(),
            other => AppError::Token(other.to_string()),
        }
    }
}

/// Issue a new token for a pre-authorized cash amount.
pub async fn issue(pool: &SqlitePool, amount_paise: i64, staff_id: i64) -> Result<String, AppError> {
    if amount_paise <= 0 {
        return Err(AppError::validation("token amount must be positive"));
    }
    let code = cash_token::insert(pool, amount_paise, staff_id).await?;
    info!(token = %code, amount_paise, staff_id, "Cash token issued");
    Ok(code)
}

/// Redeem a token against a required total.
///
/// The settlement record and the used-flag flip commit together; the
/// compare-and-set on `is_used` is what prevents two simultaneous
/// redemptions from both succeeding. Returns the settlement reference
/// for the orchestrator to attach to new registrations.
pub async fn redeem(
    pool: &SqlitePool,
    code: &str,
    required_paise: i64,
    user_id: i64,
    event_ids: &[i64],
) -> Result<String, TokenError> {
    let token = cash_token::find_by_code(pool, code)
        .await?
        .ok_or(TokenError::InvalidToken)?;

    if token.is_used {
        return Err(TokenError::AlreadyUsed);
    }
    if token.amount_paise != required_paise {
        return Err(TokenError::AmountMismatch {
            token_paise: token.amount_paise,
            required_paise,
        });
    }

    let order_id = cash_order_id(code);
    let event_ids_json = serde_json::to_string(event_ids)
        .map_err(|e| RepoError::Database(e.to_string()))?;

    let mut tx = pool.begin().await.map_err(RepoError::from)?;

    // CAS: only the first redemption flips the flag
    let consumed = cash_token::consume(&mut *tx, code, &order_id).await?;
    if !consumed {
        return Err(TokenError::AlreadyUsed);
    }

    payment_order::insert(
        &mut *tx,
        &order_id,
        user_id,
        required_paise,
        PaymentMode::Cash,
        OrderStatus::Paid,
        &event_ids_json,
    )
    .await?;

    tx.commit().await.map_err(RepoError::from)?;
    info!(token = %code, order_id = %order_id, "Cash token redeemed");
    Ok(order_id)
}
