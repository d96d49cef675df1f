use async_trait::async_trait;
use vantage_core::error::CoreError;
use vantage_db::models::public_dashboard::PublicDashboard;
use vantage_db::repositories::PublicDashboardRepo;
use vantage_db::DbPool;
use vantage_widgets::{DashboardLookup, PublishedDashboard};

use super::storage_error;

/// Looks up published dashboards directly, without member checks.
pub struct PgDashboardLookup {
    pool: DbPool,
}

impl PgDashboardLookup {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DashboardLookup for PgDashboardLookup {
    async fn find_by_uri_key(
        &self,
        uri_key: &str,
    ) -> Result<Option<PublishedDashboard>, CoreError> {
        let row = PublicDashboardRepo::find_by_uri_key(&self.pool, uri_key)
            .await
            .map_err(storage_error)?;
        Ok(row.map(published))
    }
}

fn published(row: PublicDashboard) -> PublishedDashboard {
    PublishedDashboard {
        id: row.id,
        uri_key: row.uri_key,
        name: row.name,
        description: row.description,
        public_manifest: row.public_manifest,
        allowed_markings_ids: row.allowed_markings_ids,
    }
}
