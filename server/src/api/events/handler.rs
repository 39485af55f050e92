//! Event API handlers

use axum::{
    Json,
    extract::{Path, State},
};
use serde::{Deserialize, Serialize};

use crate::core::ServerState;
use crate::db::models::{Event, PaymentStatus};
use crate::db::repository::{event as event_repo, registration as reg_repo, user as user_repo};
use crate::registration::cart::{self, normalize_email, CartItem, TeammateInput};
use crate::registration::orchestrator::RegistrationOutcome;
use crate::registration::{register_cart, BulkRegisterRequest};
use crate::utils::{AppError, AppResult};

/// GET /api/events - full catalogue
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Event>>> {
    let events = event_repo::find_all(&state.pool).await?;
    Ok(Json(events))
}

/// GET /api/events/:id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Event>> {
    let event = event_repo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Event {id}")))?;
    Ok(Json(event))
}

#[derive(Debug, Deserialize)]
pub struct ValidateTeamRequest {
    pub leader_uid: String,
    pub event_id: i64,
    pub team_name: Option<String>,
    #[serde(default)]
    pub teammates: Vec<TeammateInput>,
}

#[derive(Debug, Serialize)]
pub struct TeamMemberCheck {
    pub email: String,
    /// Whether an account (shadow or full) already exists
    pub known: bool,
    /// Existing PAID registration for this event; the member would be
    /// skipped by a later cart submission, not rejected
    pub already_paid: bool,
}

#[derive(Debug, Serialize)]
pub struct ValidateTeamResponse {
    pub valid: bool,
    pub team_size: usize,
    pub members: Vec<TeamMemberCheck>,
}

/// POST /api/events/validate-team - dry-run composition check
///
/// Applies the same rules as the cart write path (self-add, duplicates,
/// size bounds) without touching any state. Already-paid members are
/// reported informationally and do not fail validation.
pub async fn validate_team(
    State(state): State<ServerState>,
    Json(payload): Json<ValidateTeamRequest>,
) -> AppResult<Json<ValidateTeamResponse>> {
    let leader = user_repo::find_by_uid(&state.pool, &payload.leader_uid)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Leader {}", payload.leader_uid)))?;
    let event = event_repo::find_by_id(&state.pool, payload.event_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Event {}", payload.event_id)))?;

    let item = CartItem {
        event_id: payload.event_id,
        team_name: payload.team_name,
        teammates: payload.teammates,
    };
    cart::validate_item(&leader.email, &event, &item)?;

    let mut members = Vec::with_capacity(item.teammates.len());
    for tm in &item.teammates {
        let email = normalize_email(&tm.email);
        let (known, already_paid) = match user_repo::find_by_email(&state.pool, &email).await? {
            Some(user) => {
                let existing =
                    reg_repo::find_by_user_event(&state.pool, user.id, event.id).await?;
                let paid =
                    matches!(existing, Some(r) if r.payment_status == PaymentStatus::Paid);
                (true, paid)
            }
            None => (false, false),
        };
        members.push(TeamMemberCheck {
            email,
            known,
            already_paid,
        });
    }

    Ok(Json(ValidateTeamResponse {
        valid: true,
        team_size: 1 + members.len(),
        members,
    }))
}

/// POST /api/events/register-bulk - submit a whole cart
///
/// Validates every item, settles (gateway order or cash token), then
/// writes teams and registrations tagged with the settlement reference.
pub async fn register_bulk(
    State(state): State<ServerState>,
    Json(payload): Json<BulkRegisterRequest>,
) -> AppResult<Json<RegistrationOutcome>> {
    let outcome = register_cart(
        &state.pool,
        state.gateway.as_ref(),
        &state.notifier,
        &state.config,
        payload,
    )
    .await?;
    Ok(Json(outcome))
}
