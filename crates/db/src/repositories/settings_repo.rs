//! Repository for the single-row `platform_settings` table.

use sqlx::PgPool;
use vantage_core::types::EntityId;

use crate::models::settings::PlatformSettings;

const COLUMNS: &str = "id, data_sharing_max_markings, created_at, updated_at";

/// Reads and updates platform settings.
pub struct SettingsRepo;

impl SettingsRepo {
    pub async fn get(pool: &PgPool) -> Result<PlatformSettings, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM platform_settings WHERE id = 1");
        sqlx::query_as::<_, PlatformSettings>(&query)
            .fetch_one(pool)
            .await
    }

    /// Current sharing ceiling ids. Empty means no ceiling.
    pub async fn max_markings(pool: &PgPool) -> Result<Vec<EntityId>, sqlx::Error> {
        sqlx::query_scalar::<_, Vec<EntityId>>(
            "SELECT data_sharing_max_markings FROM platform_settings WHERE id = 1",
        )
        .fetch_one(pool)
        .await
    }

    pub async fn set_max_markings(
        pool: &PgPool,
        ids: &[EntityId],
    ) -> Result<PlatformSettings, sqlx::Error> {
        let query = format!(
            "UPDATE platform_settings SET data_sharing_max_markings = $1 WHERE id = 1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, PlatformSettings>(&query)
            .bind(ids)
            .fetch_one(pool)
            .await
    }
}
