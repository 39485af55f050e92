//! User API handlers

use axum::{
    Json,
    extract::{Path, State},
};
use tracing::info;

use crate::core::ServerState;
use crate::db::models::{RegisteredEvent, User, UserCreate};
use crate::db::repository::{registration, user as user_repo};
use crate::registration::cart::normalize_email;
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_TEXT_LEN, validate_email, validate_optional_text, validate_required_text,
};
use crate::utils::{AppError, AppResult};

/// POST /api/users - sign up, or claim a shadow profile
///
/// An email that already belongs to a shadow identity (created when a
/// leader invited this person) completes that profile instead of
/// creating a second account. A non-shadow duplicate is a conflict.
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<UserCreate>,
) -> AppResult<Json<User>> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_email(&payload.email)?;
    validate_optional_text(&payload.phone, "phone", MAX_NAME_LEN)?;
    validate_optional_text(&payload.college, "college", MAX_TEXT_LEN)?;

    let email = normalize_email(&payload.email);
    let name = payload.name.trim();

    let user = match user_repo::find_by_email(&state.pool, &email).await? {
        Some(existing) if existing.is_shadow => {
            user_repo::claim_shadow(
                &state.pool,
                existing.id,
                name,
                payload.phone.as_deref(),
                payload.college.as_deref(),
            )
            .await?;
            info!(uid = %existing.uid, "Shadow profile claimed");
            user_repo::find_by_id(&state.pool, existing.id)
                .await?
                .ok_or_else(|| AppError::internal("claimed user vanished"))?
        }
        Some(_) => {
            return Err(AppError::Conflict(format!(
                "An account with email {email} already exists"
            )));
        }
        None => {
            let uid = user_repo::allocate_uid(&state.pool).await?;
            let id = user_repo::insert(
                &state.pool,
                &uid,
                &email,
                name,
                payload.phone.as_deref(),
                payload.college.as_deref(),
                false,
                crate::db::models::PaymentStatus::Unpaid,
            )
            .await?;
            info!(uid = %uid, "User created");
            user_repo::find_by_id(&state.pool, id)
                .await?
                .ok_or_else(|| AppError::internal("created user vanished"))?
        }
    };

    state
        .notifier
        .notify_welcome(user.email.clone(), user.name.clone(), user.uid.clone());

    Ok(Json(user))
}

/// GET /api/users/check-uid/:uid - resolve a public uid
pub async fn check_uid(
    State(state): State<ServerState>,
    Path(uid): Path<String>,
) -> AppResult<Json<User>> {
    let user = user_repo::find_by_uid(&state.pool, &uid)
        .await?
        .ok_or_else(|| AppError::not_found(format!("User {uid}")))?;
    Ok(Json(user))
}

/// GET /api/users/:uid/events - a user's registrations with event and
/// team details
pub async fn registered_events(
    State(state): State<ServerState>,
    Path(uid): Path<String>,
) -> AppResult<Json<Vec<RegisteredEvent>>> {
    let user = user_repo::find_by_uid(&state.pool, &uid)
        .await?
        .ok_or_else(|| AppError::not_found(format!("User {uid}")))?;
    let events = registration::find_registered_events(&state.pool, user.id).await?;
    Ok(Json(events))
}
