//! Durable audit persistence.
//!
//! [`AuditPersistence`] subscribes to the bus and writes every
//! [`topics::AUDIT_RECORDED`] event to `audit_logs`. Writes happen after the
//! audited mutation has already committed, so a failed write is logged and
//! never reaches the caller of that mutation.

use tokio::sync::broadcast;
use vantage_core::audit::AuditEntry;
use vantage_db::models::audit::{AuditLog, CreateAuditLog};
use vantage_db::repositories::AuditLogRepo;
use vantage_db::DbPool;

use crate::bus::PlatformEvent;
use crate::topics;

/// Background service that persists audit events.
pub struct AuditPersistence;

impl AuditPersistence {
    /// Run until the bus is dropped.
    pub async fn run(pool: DbPool, mut receiver: broadcast::Receiver<PlatformEvent>) {
        loop {
            match receiver.recv().await {
                Ok(event) if event.event_type == topics::AUDIT_RECORDED => {
                    if let Err(e) = Self::persist(&pool, &event).await {
                        tracing::error!(
                            error = %e,
                            entity_id = ?event.source_entity_id,
                            "Failed to persist audit event"
                        );
                    }
                }
                Ok(_) => {}
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!(skipped = n, "Audit persistence lagged, entries were lost");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    tracing::info!("Event bus closed, audit persistence shutting down");
                    break;
                }
            }
        }
    }

    async fn persist(pool: &DbPool, event: &PlatformEvent) -> Result<AuditLog, sqlx::Error> {
        let entry: AuditEntry = serde_json::from_value(event.payload.clone())
            .map_err(|e| sqlx::Error::Decode(Box::new(e)))?;
        AuditLogRepo::insert(pool, &CreateAuditLog::from(entry)).await
    }
}
