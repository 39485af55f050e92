//! Event API module
//!
//! Public catalogue plus the registration entry points: dry-run team
//! validation and the bulk cart submission.

mod handler;

use axum::{Router, routing::get, routing::post};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/events", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list))
        .route("/{id}", get(handler::get_by_id))
        .route("/validate-team", post(handler::validate_team))
        .route("/register-bulk", post(handler::register_bulk))
}
