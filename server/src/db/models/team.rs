//! Team model
//!
//! One team per leader per event; a leader may lead different teams in
//! different events. Names are auto-generated ("Team #N") unless the
//! leader supplies one.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Team {
    pub id: i64,
    pub name: String,
    pub leader_id: i64,
    pub event_id: i64,
    pub created_at: i64,
}
