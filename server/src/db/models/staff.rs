//! Staff model

use serde::{Deserialize, Serialize};

use super::enums::StaffRole;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Staff {
    pub id: i64,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: StaffRole,
    pub assigned_event_id: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StaffCreate {
    pub username: String,
    pub password: String,
    pub role: StaffRole,
    pub assigned_event_id: Option<i64>,
}
