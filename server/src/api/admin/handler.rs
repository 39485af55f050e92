//! Admin API handlers
//!
//! Destructive operations cascade explicitly (see the repository layer)
//! and log the operator for traceability.

use axum::{
    Json,
    extract::{Extension, Path, State},
};
use tracing::info;

use crate::auth::{password, CurrentStaff};
use crate::core::ServerState;
use crate::db::models::{Event, EventCreate, EventType, Staff, StaffCreate, User};
use crate::db::repository::{event as event_repo, staff as staff_repo, user as user_repo};
use crate::utils::validation::{validate_required_text, MAX_NAME_LEN};
use crate::utils::{ok_with_message, AppError, AppResponse, AppResult};

/// POST /api/admin/events - add to the catalogue
pub async fn create_event(
    State(state): State<ServerState>,
    Extension(staff): Extension<CurrentStaff>,
    Json(payload): Json<EventCreate>,
) -> AppResult<Json<Event>> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    if payload.fee_paise < 0 {
        return Err(AppError::validation("fee_paise must not be negative"));
    }
    match payload.event_type {
        EventType::Solo => {
            if payload.min_team_size != 1 || payload.max_team_size != 1 {
                return Err(AppError::validation("SOLO events have team size 1"));
            }
        }
        EventType::Group => {
            if payload.min_team_size < 1 || payload.max_team_size < payload.min_team_size {
                return Err(AppError::validation(
                    "team size bounds must satisfy 1 <= min <= max",
                ));
            }
        }
    }

    let id = event_repo::create(&state.pool, payload).await?;
    let event = event_repo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::internal("created event vanished"))?;

    info!(event_id = id, operator = %staff.username, "Event created");
    Ok(Json(event))
}

/// DELETE /api/admin/events/:id - remove an event and its registrations
pub async fn delete_event(
    State(state): State<ServerState>,
    Extension(staff): Extension<CurrentStaff>,
    Path(id): Path<i64>,
) -> AppResult<Json<AppResponse<bool>>> {
    let deleted = event_repo::delete_cascade(&state.pool, id).await?;
    if !deleted {
        return Err(AppError::not_found(format!("Event {id}")));
    }
    info!(event_id = id, operator = %staff.username, "Event deleted");
    Ok(ok_with_message(true, "Event and its registrations deleted"))
}

/// GET /api/admin/users
pub async fn list_users(State(state): State<ServerState>) -> AppResult<Json<Vec<User>>> {
    let users = user_repo::find_all(&state.pool).await?;
    Ok(Json(users))
}

/// DELETE /api/admin/users/:id - remove a user, their registrations and
/// led teams
pub async fn delete_user(
    State(state): State<ServerState>,
    Extension(staff): Extension<CurrentStaff>,
    Path(id): Path<i64>,
) -> AppResult<Json<AppResponse<bool>>> {
    let deleted = user_repo::delete_cascade(&state.pool, id).await?;
    if !deleted {
        return Err(AppError::not_found(format!("User {id}")));
    }
    info!(user_id = id, operator = %staff.username, "User deleted");
    Ok(ok_with_message(true, "User, their registrations and led teams deleted"))
}

/// GET /api/admin/staff
pub async fn list_staff(State(state): State<ServerState>) -> AppResult<Json<Vec<Staff>>> {
    let staff = staff_repo::find_all(&state.pool).await?;
    Ok(Json(staff))
}

/// POST /api/admin/staff - create a staff account
pub async fn create_staff(
    State(state): State<ServerState>,
    Extension(operator): Extension<CurrentStaff>,
    Json(payload): Json<StaffCreate>,
) -> AppResult<Json<Staff>> {
    validate_required_text(&payload.username, "username", MAX_NAME_LEN)?;
    if payload.password.len() < 8 {
        return Err(AppError::validation("password must be at least 8 characters"));
    }

    let hash = password::hash_password(&payload.password)?;
    let id = staff_repo::insert(
        &state.pool,
        payload.username.trim(),
        &hash,
        payload.role,
        payload.assigned_event_id,
    )
    .await?;

    let staff = staff_repo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::internal("created staff vanished"))?;

    info!(username = %staff.username, role = ?staff.role, operator = %operator.username, "Staff created");
    Ok(Json(staff))
}
