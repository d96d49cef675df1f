use async_trait::async_trait;
use vantage_core::error::CoreError;
use vantage_core::markings::{MarkingDefinition, SharingCeiling};
use vantage_db::repositories::{MarkingDefinitionRepo, SettingsRepo};
use vantage_db::DbPool;
use vantage_widgets::SharingPolicy;

use super::storage_error;

/// Sharing ceiling stored in `platform_settings.data_sharing_max_markings`.
pub struct PgSharingPolicy {
    pool: DbPool,
}

impl PgSharingPolicy {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SharingPolicy for PgSharingPolicy {
    async fn max_markings(&self) -> Result<SharingCeiling, CoreError> {
        let ids = SettingsRepo::max_markings(&self.pool)
            .await
            .map_err(storage_error)?;
        if ids.is_empty() {
            return Ok(SharingCeiling::Unrestricted);
        }
        // Ceiling ids whose definition was deleted drop out here; the
        // ceiling stays configured and caps whatever still resolves.
        let rows = MarkingDefinitionRepo::find_by_standard_ids(&self.pool, &ids)
            .await
            .map_err(storage_error)?;
        if rows.len() < ids.len() {
            tracing::warn!(
                configured = ids.len(),
                resolved = rows.len(),
                "Sharing ceiling references deleted marking definitions"
            );
        }
        Ok(SharingCeiling::Markings(
            rows.into_iter().map(MarkingDefinition::from).collect(),
        ))
    }
}
