//! Staff API module
//!
//! Login is public; everything else sits behind the JWT middleware with
//! per-route role gates (ADMIN passes all of them).

mod handler;

use axum::{Router, middleware, routing::post};

use crate::auth::{require_role, require_staff};
use crate::core::ServerState;
use crate::db::models::StaffRole;

pub fn router(state: ServerState) -> Router<ServerState> {
    Router::new().nest("/api/staff", routes(state))
}

fn routes(state: ServerState) -> Router<ServerState> {
    let public = Router::new().route("/login", post(handler::login));

    let cashier = Router::new()
        .route("/generate-token", post(handler::generate_token))
        .layer(middleware::from_fn(require_role(&[StaffRole::Cashier])));

    let guard = Router::new()
        .route("/mark-attendance", post(handler::mark_attendance))
        .layer(middleware::from_fn(require_role(&[StaffRole::Guard])));

    let protected = cashier
        .merge(guard)
        .layer(middleware::from_fn_with_state(state, require_staff));

    public.merge(protected)
}
