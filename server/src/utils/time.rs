//! Time helpers
//!
//! All timestamps cross the repository layer as `i64` Unix millis.

/// Current UTC timestamp in milliseconds
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
