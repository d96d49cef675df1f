//! Read-through cache of the marking catalog.

use async_trait::async_trait;
use tokio::sync::{broadcast, RwLock};
use vantage_core::error::CoreError;
use vantage_core::markings::{MarkingDefinition, MarkingMap};
use vantage_db::repositories::MarkingDefinitionRepo;
use vantage_db::DbPool;
use vantage_events::{topics, PlatformEvent};
use vantage_widgets::MarkingCatalog;

use super::storage_error;

/// Caches every marking definition until a `marking_definition.*` event
/// arrives on the bus.
pub struct CachedMarkingCatalog {
    pool: DbPool,
    cache: RwLock<Option<MarkingMap>>,
}

impl CachedMarkingCatalog {
    pub fn new(pool: DbPool) -> Self {
        Self {
            pool,
            cache: RwLock::new(None),
        }
    }

    /// Drop the cached catalog; the next read reloads it.
    pub async fn invalidate(&self) {
        *self.cache.write().await = None;
    }

    /// Load the catalog now so the first widget request does not pay for it.
    pub async fn warm(&self) -> Result<usize, CoreError> {
        Ok(self.get_all().await?.len())
    }

    /// Invalidate on marking changes until the bus is dropped.
    pub async fn run_invalidation(&self, mut receiver: broadcast::Receiver<PlatformEvent>) {
        loop {
            match receiver.recv().await {
                Ok(event) if topics::is_marking_change(&event.event_type) => {
                    tracing::debug!(event_type = %event.event_type, "Marking catalog invalidated");
                    self.invalidate().await;
                }
                Ok(_) => {}
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    // A missed event may have been a marking change.
                    tracing::warn!(skipped = n, "Marking cache listener lagged");
                    self.invalidate().await;
                }
                Err(broadcast::error::RecvError::Closed) => {
                    tracing::info!("Event bus closed, marking cache listener shutting down");
                    break;
                }
            }
        }
    }

    async fn load(&self) -> Result<MarkingMap, CoreError> {
        let rows = MarkingDefinitionRepo::list_all(&self.pool)
            .await
            .map_err(storage_error)?;
        Ok(rows
            .into_iter()
            .map(MarkingDefinition::from)
            .map(|m| (m.id, m))
            .collect())
    }
}

#[async_trait]
impl MarkingCatalog for CachedMarkingCatalog {
    async fn get_all(&self) -> Result<MarkingMap, CoreError> {
        if let Some(cached) = self.cache.read().await.as_ref() {
            return Ok(cached.clone());
        }

        let mut guard = self.cache.write().await;
        if let Some(cached) = guard.as_ref() {
            return Ok(cached.clone());
        }
        let loaded = self.load().await?;
        *guard = Some(loaded.clone());
        Ok(loaded)
    }
}
