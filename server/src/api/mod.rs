//! API route modules
//!
//! # Structure
//!
//! - [`health`] - liveness probe
//! - [`users`] - signup, uid lookup, registered events
//! - [`events`] - catalogue, team validation, bulk registration
//! - [`payments`] - gateway webhook and order status polling
//! - [`staff`] - staff login, cash tokens, attendance
//! - [`admin`] - catalogue and account administration

pub mod admin;
pub mod events;
pub mod health;
pub mod payments;
pub mod staff;
pub mod users;

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::core::ServerState;

/// Assemble the full application router.
pub fn router(state: ServerState) -> Router {
    Router::<ServerState>::new()
        .merge(health::router())
        .merge(users::router())
        .merge(events::router())
        .merge(payments::router())
        .merge(staff::router(state.clone()))
        .merge(admin::router(state.clone()))
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
