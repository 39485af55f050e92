//! Authentication middleware
//!
//! Axum middleware for staff JWT authentication and role gates.
//! Attendee-facing routes (users, events, registration, webhooks) are
//! unauthenticated and never pass through these layers.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use tracing::warn;

use crate::auth::jwt::{CurrentStaff, JwtService};
use crate::core::ServerState;
use crate::db::models::StaffRole;
use crate::utils::AppError;

/// Require a valid staff bearer token.
///
/// Extracts and validates the JWT from `Authorization: Bearer <token>`,
/// then injects [`CurrentStaff`] into the request extensions.
pub async fn require_staff(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let header = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let token = match header {
        Some(value) => JwtService::extract_from_header(value)
            .ok_or(AppError::InvalidAuthToken)?,
        None => {
            warn!(uri = %req.uri(), "Missing authorization header");
            return Err(AppError::Unauthorized);
        }
    };

    match state.jwt.validate(token) {
        Ok(claims) => {
            req.extensions_mut().insert(CurrentStaff::from(claims));
            Ok(next.run(req).await)
        }
        Err(e) => {
            warn!(uri = %req.uri(), error = %e, "Token validation failed");
            Err(AppError::InvalidAuthToken)
        }
    }
}

/// Require one of the given roles. ADMIN passes every gate.
///
/// ```ignore
/// Router::new()
///     .route("/generate-token", post(handler::generate_token))
///     .layer(middleware::from_fn(require_role(&[StaffRole::Cashier])));
/// ```
pub fn require_role(
    roles: &'static [StaffRole],
) -> impl Fn(
    Request,
    Next,
) -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<Response, AppError>> + Send>>
+ Clone {
    move |req: Request, next: Next| {
        Box::pin(async move {
            let staff = req
                .extensions()
                .get::<CurrentStaff>()
                .ok_or(AppError::Unauthorized)?;

            if !staff.has_role(roles) {
                warn!(
                    staff = %staff.username,
                    role = ?staff.role,
                    required = ?roles,
                    "Role gate denied"
                );
                return Err(AppError::Forbidden(format!(
                    "Requires one of: {roles:?}"
                )));
            }

            Ok(next.run(req).await)
        })
    }
}
