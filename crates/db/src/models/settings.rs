//! Platform-wide settings row.

use serde::Serialize;
use sqlx::FromRow;
use vantage_core::types::{EntityId, Timestamp};

/// The single row of `platform_settings`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PlatformSettings {
    pub id: i16,
    /// Ceiling markings of the data-sharing policy. Empty means no ceiling
    /// is configured.
    pub data_sharing_max_markings: Vec<EntityId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
