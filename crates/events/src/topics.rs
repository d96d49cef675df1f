//! Event type names published on the bus.

pub const PUBLIC_DASHBOARD_ADDED: &str = "public_dashboard.added";
pub const PUBLIC_DASHBOARD_EDITED: &str = "public_dashboard.edited";
pub const PUBLIC_DASHBOARD_DELETED: &str = "public_dashboard.deleted";

pub const MARKING_DEFINITION_ADDED: &str = "marking_definition.added";
pub const MARKING_DEFINITION_EDITED: &str = "marking_definition.edited";
pub const MARKING_DEFINITION_DELETED: &str = "marking_definition.deleted";

/// Carries an [`AuditEntry`](vantage_core::audit::AuditEntry) payload.
pub const AUDIT_RECORDED: &str = "audit.recorded";

const MARKING_DEFINITION_PREFIX: &str = "marking_definition.";

/// Whether a change to the marking catalog is announced by `event_type`.
pub fn is_marking_change(event_type: &str) -> bool {
    event_type.starts_with(MARKING_DEFINITION_PREFIX)
}
