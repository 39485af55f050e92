//! Utility module - shared helpers and types
//!
//! # Contents
//!
//! - [`AppError`] / [`AppResult`] - application error type
//! - [`AppResponse`] - API response envelope
//! - ID/code generation, time, logging, validation helpers

pub mod error;
pub mod id;
pub mod logger;
pub mod time;
pub mod validation;

pub use error::{ok, ok_with_message, AppError, AppResponse, AppResult};
