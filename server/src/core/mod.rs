//! Core server components
//!
//! - [`Config`] - environment-driven configuration
//! - [`ServerState`] - shared application state
//! - [`Server`] - HTTP server lifecycle

pub mod config;
pub mod server;
pub mod state;

pub use config::{Config, GatewayConfig};
pub use server::Server;
pub use state::ServerState;
