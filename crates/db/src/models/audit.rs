//! Audit log rows. Append-only.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use vantage_core::audit::AuditEntry;
use vantage_core::types::{DbId, Timestamp};

/// A single audit log entry.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AuditLog {
    pub id: DbId,
    pub timestamp: Timestamp,
    pub user_id: Option<DbId>,
    pub action_type: String,
    pub event_type: String,
    pub entity_type: Option<String>,
    pub entity_id: Option<String>,
    pub message: Option<String>,
    pub details_json: Option<serde_json::Value>,
    pub created_at: Timestamp,
}

/// DTO for inserting an audit log entry.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateAuditLog {
    pub user_id: Option<DbId>,
    pub action_type: String,
    pub event_type: String,
    pub entity_type: Option<String>,
    pub entity_id: Option<String>,
    pub message: Option<String>,
    pub details_json: Option<serde_json::Value>,
}

impl From<AuditEntry> for CreateAuditLog {
    fn from(entry: AuditEntry) -> Self {
        let event_type = entry.event_type().to_string();
        Self {
            user_id: Some(entry.actor_id),
            action_type: entry.action,
            event_type,
            entity_type: Some(entry.entity_type),
            entity_id: Some(entry.target_id),
            message: Some(entry.message),
            details_json: Some(entry.input),
        }
    }
}
