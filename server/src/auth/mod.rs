//! Authentication and authorization
//!
//! - [`JwtService`] - staff token issuing and validation
//! - [`CurrentStaff`] - authenticated staff context
//! - [`require_staff`] / [`require_role`] - route middleware
//! - [`password`] - Argon2 password hashing

pub mod jwt;
pub mod middleware;
pub mod password;

pub use jwt::{Claims, CurrentStaff, JwtConfig, JwtError, JwtService};
pub use middleware::{require_role, require_staff};
