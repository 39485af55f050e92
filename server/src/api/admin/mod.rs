//! Admin API module (ADMIN role only)

mod handler;

use axum::{Router, middleware, routing::delete, routing::get, routing::post};

use crate::auth::{require_role, require_staff};
use crate::core::ServerState;
use crate::db::models::StaffRole;

pub fn router(state: ServerState) -> Router<ServerState> {
    Router::new().nest("/api/admin", routes(state))
}

fn routes(state: ServerState) -> Router<ServerState> {
    Router::new()
        .route("/events", post(handler::create_event))
        .route("/events/{id}", delete(handler::delete_event))
        .route("/users", get(handler::list_users))
        .route("/users/{id}", delete(handler::delete_user))
        .route("/staff", get(handler::list_staff).post(handler::create_staff))
        .layer(middleware::from_fn(require_role(&[StaffRole::Admin])))
        .layer(middleware::from_fn_with_state(state, require_staff))
}
