//! Event model

use serde::{Deserialize, Serialize};

use super::enums::EventType;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Event {
    pub id: i64,
    pub name: String,
    pub event_type: EventType,
    /// Flat fee per cart item: per team for GROUP, per registration for SOLO
    pub fee_paise: i64,
    pub min_team_size: i64,
    pub max_team_size: i64,
    pub description: Option<String>,
    /// Schedule metadata, kept as plain strings (YYYY-MM-DD / HH:MM)
    pub event_date: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EventCreate {
    pub name: String,
    pub event_type: EventType,
    pub fee_paise: i64,
    #[serde(default = "default_min_team_size")]
    pub min_team_size: i64,
    #[serde(default = "default_max_team_size")]
    pub max_team_size: i64,
    pub description: Option<String>,
    pub event_date: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
}

fn default_min_team_size() -> i64 {
    1
}

fn default_max_team_size() -> i64 {
    1
}
