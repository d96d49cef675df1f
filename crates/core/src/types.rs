/// Primary keys of platform users (PostgreSQL BIGSERIAL).
pub type DbId = i64;

/// Opaque identifiers of knowledge entities (dashboards, markings, workspaces).
pub type EntityId = uuid::Uuid;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
