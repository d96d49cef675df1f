//! Audit trail vocabulary for public-dashboard lifecycle mutations.

use serde::{Deserialize, Serialize};

use crate::types::DbId;

// ---------------------------------------------------------------------------
// Vocabulary
// ---------------------------------------------------------------------------

/// Audit actions.
pub mod action_types {
    pub const CREATE: &str = "create";
    pub const UPDATE: &str = "update";
    pub const DELETE: &str = "delete";
}

/// Event families used for retention grouping.
pub mod event_types {
    pub const MUTATION: &str = "mutation";
    pub const ACCESS: &str = "access";
}

/// Map an action to its event family. Unknown actions count as access.
pub fn action_to_event_type(action: &str) -> &'static str {
    match action {
        action_types::CREATE | action_types::UPDATE | action_types::DELETE => event_types::MUTATION,
        _ => event_types::ACCESS,
    }
}

// ---------------------------------------------------------------------------
// Entry
// ---------------------------------------------------------------------------

/// Audit record of one successful mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEntry {
    pub actor_id: DbId,
    pub action: String,
    pub entity_type: String,
    pub target_id: String,
    /// Raw request input, redacted.
    pub input: serde_json::Value,
    /// Human-readable summary, e.g. `creates public dashboard "x"`.
    pub message: String,
}

impl AuditEntry {
    pub fn new(
        actor_id: DbId,
        action: &str,
        entity_type: &str,
        target_id: impl ToString,
        input: &serde_json::Value,
        message: impl Into<String>,
    ) -> Self {
        Self {
            actor_id,
            action: action.to_string(),
            entity_type: entity_type.to_string(),
            target_id: target_id.to_string(),
            input: redact_sensitive_fields(input),
            message: message.into(),
        }
    }

    pub fn event_type(&self) -> &'static str {
        action_to_event_type(&self.action)
    }
}

// ---------------------------------------------------------------------------
// Redaction
// ---------------------------------------------------------------------------

/// Key fragments whose values never reach the audit store.
pub const SENSITIVE_FIELDS: &[&str] = &[
    "password",
    "token",
    "secret",
    "api_key",
    "private_key",
    "authorization",
    "credential",
];

const REDACTED: &str = "[REDACTED]";

/// Recursively replace values of sensitive keys with `"[REDACTED]"`.
pub fn redact_sensitive_fields(value: &serde_json::Value) -> serde_json::Value {
    use serde_json::Value;

    match value {
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(key, val)| {
                    let lower = key.to_lowercase();
                    let redacted = if SENSITIVE_FIELDS.iter().any(|f| lower.contains(f)) {
                        Value::String(REDACTED.to_string())
                    } else {
                        redact_sensitive_fields(val)
                    };
                    (key.clone(), redacted)
                })
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.iter().map(redact_sensitive_fields).collect()),
        other => other.clone(),
    }
}
