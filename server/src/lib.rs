//! EventFlow Server - registration and payment settlement engine for a
//! multi-event fest
//!
//! # Architecture
//!
//! - **registration** (`registration`): cart validation and the bulk
//!   registration orchestrator
//! - **payments** (`payments`): gateway orders, webhook reconciliation,
//!   single-use cash tokens
//! - **auth** (`auth`): staff JWT + Argon2 authentication
//! - **api** (`api`): RESTful HTTP interface
//! - **db** (`db`): embedded SQLite storage
//!
//! # Module layout
//!
//! ```text
//! server/src/
//! ├── core/          # config, state, server lifecycle
//! ├── auth/          # staff JWT, role gates, password hashing
//! ├── api/           # HTTP routes and handlers
//! ├── registration/  # cart rules and the write pass
//! ├── payments/      # gateway client, orders, webhooks, cash tokens
//! ├── notify/        # fire-and-forget notification sink
//! ├── db/            # pool, models, repositories, migrations
//! └── utils/         # errors, ids, time, validation, logging
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod notify;
pub mod payments;
pub mod registration;
pub mod utils;

pub use auth::{CurrentStaff, JwtService};
pub use core::{Config, Server, ServerState};
pub use utils::{AppError, AppResponse, AppResult};

pub use utils::logger::{init_logger, init_logger_with_file};
