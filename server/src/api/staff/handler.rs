//! Staff API handlers

use axum::{
    Json,
    extract::{Extension, State},
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::auth::{password, CurrentStaff};
use crate::core::ServerState;
use crate::db::models::{PaymentStatus, StaffRole};
use crate::db::repository::{registration as reg_repo, staff as staff_repo, user as user_repo};
use crate::payments::tokens;
use crate::utils::{ok, AppError, AppResponse, AppResult};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub username: String,
    pub role: StaffRole,
    pub assigned_event_id: Option<i64>,
}

/// POST /api/staff/login
///
/// Unknown usernames and wrong passwords return the same error, so the
/// endpoint does not leak which usernames exist.
pub async fn login(
    State(state): State<ServerState>,
    Json(payload): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let staff = staff_repo::find_by_username(&state.pool, payload.username.trim())
        .await?
        .ok_or(AppError::InvalidCredentials)?;

    if !password::verify_password(&payload.password, &staff.password_hash) {
        return Err(AppError::InvalidCredentials);
    }

    let token = state
        .jwt
        .issue(&staff)
        .map_err(|e| AppError::internal(format!("Token issue failed: {e}")))?;

    info!(username = %staff.username, role = ?staff.role, "Staff login");

    Ok(Json(LoginResponse {
        token,
        username: staff.username,
        role: staff.role,
        assigned_event_id: staff.assigned_event_id,
    }))
}

#[derive(Debug, Deserialize)]
pub struct GenerateTokenRequest {
    pub amount_paise: i64,
}

#[derive(Debug, Serialize)]
pub struct GenerateTokenResponse {
    /// Short printable code handed to the attendee at the cash desk
    pub token: String,
    pub amount_paise: i64,
}

/// POST /api/staff/generate-token - mint a single-use cash token
/// (CASHIER or ADMIN)
pub async fn generate_token(
    State(state): State<ServerState>,
    Extension(staff): Extension<CurrentStaff>,
    Json(payload): Json<GenerateTokenRequest>,
) -> AppResult<Json<AppResponse<GenerateTokenResponse>>> {
    let token = tokens::issue(&state.pool, payload.amount_paise, staff.id).await?;
    Ok(ok(GenerateTokenResponse {
        token,
        amount_paise: payload.amount_paise,
    }))
}

#[derive(Debug, Deserialize)]
pub struct MarkAttendanceRequest {
    pub uid: String,
    /// Only honored for staff without an assigned event (e.g. ADMIN)
    pub event_id: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct AttendanceResult {
    pub uid: String,
    pub event_id: i64,
    pub attended: bool,
    /// True when this was a repeat scan of an already-admitted attendee
    pub already_checked_in: bool,
}

/// POST /api/staff/mark-attendance - gate check-in (GUARD or ADMIN)
///
/// Admission requires a PAID registration for the gate's event. Repeat
/// scans are idempotent and flagged, not rejected.
pub async fn mark_attendance(
    State(state): State<ServerState>,
    Extension(staff): Extension<CurrentStaff>,
    Json(payload): Json<MarkAttendanceRequest>,
) -> AppResult<Json<AttendanceResult>> {
    let event_id = staff
        .assigned_event_id
        .or(payload.event_id)
        .ok_or_else(|| AppError::validation("No event assigned and no event_id given"))?;

    let user = user_repo::find_by_uid(&state.pool, &payload.uid)
        .await?
        .ok_or_else(|| AppError::not_found(format!("User {}", payload.uid)))?;

    let registration = reg_repo::find_by_user_event(&state.pool, user.id, event_id)
        .await?
        .ok_or_else(|| {
            AppError::not_found(format!("Registration for {} in event {event_id}", payload.uid))
        })?;

    if registration.payment_status != PaymentStatus::Paid {
        return Err(AppError::PaymentRequired(format!(
            "Registration for {} is {:?}, not PAID",
            payload.uid, registration.payment_status
        )));
    }

    if registration.attended {
        return Ok(Json(AttendanceResult {
            uid: payload.uid,
            event_id,
            attended: true,
            already_checked_in: true,
        }));
    }

    reg_repo::mark_attended(&state.pool, registration.id).await?;
    info!(uid = %payload.uid, event_id, guard = %staff.username, "Attendance marked");

    Ok(Json(AttendanceResult {
        uid: payload.uid,
        event_id,
        attended: true,
        already_checked_in: false,
    }))
}
