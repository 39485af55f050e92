//! Cart types and validation
//!
//! Pure composition rules, checked before anything touches the store or
//! the gateway. Validation is fail-fast: the first violation aborts the
//! whole cart.

use serde::Deserialize;

use crate::db::models::{Event, EventType, PaymentMode};
use crate::utils::{AppError, AppResult};

#[derive(Debug, Clone, Deserialize)]
pub struct TeammateInput {
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CartItem {
    pub event_id: i64,
    pub team_name: Option<String>,
    #[serde(default)]
    pub teammates: Vec<TeammateInput>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BulkRegisterRequest {
    pub leader_uid: String,
    pub items: Vec<CartItem>,
    pub payment_mode: PaymentMode,
    pub cash_token: Option<String>,
    pub return_url: Option<String>,
}

/// Normalize an email for comparison: trimmed, lowercased.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Validate one cart item against its event.
///
/// Checks run in a fixed order so error messages are stable:
/// 1. no teammate equals the leader
/// 2. no teammate repeated within the item
/// 3. team size within the event's bounds
pub fn validate_item(leader_email: &str, event: &Event, item: &CartItem) -> AppResult<()> {
    let leader_norm = normalize_email(leader_email);

    for tm in &item.teammates {
        if normalize_email(&tm.email) == leader_norm {
            return Err(AppError::validation(format!(
                "{}: you cannot be added as a teammate to your own team",
                event.name
            )));
        }
    }

    let mut seen = std::collections::HashSet::new();
    for tm in &item.teammates {
        if !seen.insert(normalize_email(&tm.email)) {
            return Err(AppError::validation(format!(
                "{}: duplicate teammate {}",
                event.name,
                tm.email.trim()
            )));
        }
    }

    match event.event_type {
        EventType::Solo => {
            if !item.teammates.is_empty() {
                return Err(AppError::validation(format!(
                    "{} is a solo event and takes no teammates",
                    event.name
                )));
            }
        }
        EventType::Group => {
            let team_size = 1 + item.teammates.len() as i64;
            if team_size < event.min_team_size || team_size > event.max_team_size {
                return Err(AppError::validation(format!(
                    "{}: team size {} is outside the allowed range {}-{}",
                    event.name, team_size, event.min_team_size, event.max_team_size
                )));
            }
        }
    }

    Ok(())
}

/// Cart total: each item contributes its event's fee once, flat
/// regardless of teammate count (per-team for GROUP, per-registration
/// for SOLO).
pub fn total_fee_paise(events: &[Event]) -> i64 {
    events.iter().map(|e| e.fee_paise).sum()
}
