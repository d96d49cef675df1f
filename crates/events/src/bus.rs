//! In-process event bus backed by a `tokio::sync::broadcast` channel.
//!
//! [`EventBus`] is shared via `Arc<EventBus>` across the application.
//! Lifecycle handlers publish change notifications and audit records on it;
//! the marking cache and [`AuditPersistence`](crate::AuditPersistence)
//! subscribe.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use vantage_core::audit::AuditEntry;
use vantage_core::types::DbId;

use crate::topics;

// ---------------------------------------------------------------------------
// PlatformEvent
// ---------------------------------------------------------------------------

/// A change that occurred on the platform.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformEvent {
    /// One of the [`topics`] names.
    pub event_type: String,

    /// Entity kind, e.g. `"Public-Dashboard"`.
    pub source_entity_type: Option<String>,

    /// Entity id as text (numeric ids and UUIDs alike).
    pub source_entity_id: Option<String>,

    pub actor_user_id: Option<DbId>,

    /// Event-specific data: the changed entity, or an audit entry.
    pub payload: serde_json::Value,

    pub timestamp: DateTime<Utc>,
}

impl PlatformEvent {
    pub fn new(event_type: impl Into<String>) -> Self {
        Self {
            event_type: event_type.into(),
            source_entity_type: None,
            source_entity_id: None,
            actor_user_id: None,
            payload: serde_json::Value::Object(Default::default()),
            timestamp: Utc::now(),
        }
    }

    /// Event carrying an audit record.
    pub fn audit(entry: &AuditEntry) -> Self {
        let payload = serde_json::to_value(entry).unwrap_or_default();
        Self::new(topics::AUDIT_RECORDED)
            .with_source(entry.entity_type.clone(), entry.target_id.clone())
            .with_actor(entry.actor_id)
            .with_payload(payload)
    }

    pub fn with_source(mut self, entity_type: impl Into<String>, entity_id: impl ToString) -> Self {
        self.source_entity_type = Some(entity_type.into());
        self.source_entity_id = Some(entity_id.to_string());
        self
    }

    pub fn with_actor(mut self, user_id: DbId) -> Self {
        self.actor_user_id = Some(user_id);
        self
    }

    pub fn with_payload(mut self, payload: serde_json::Value) -> Self {
        self.payload = payload;
        self
    }
}

// ---------------------------------------------------------------------------
// EventBus
// ---------------------------------------------------------------------------

const DEFAULT_CAPACITY: usize = 1024;

/// In-process fan-out event bus.
///
/// ```rust
/// use vantage_events::bus::{EventBus, PlatformEvent};
///
/// let bus = EventBus::default();
/// let mut rx = bus.subscribe();
///
/// bus.publish(PlatformEvent::new("public_dashboard.added"));
/// ```
pub struct EventBus {
    sender: broadcast::Sender<PlatformEvent>,
}

impl EventBus {
    /// Create a bus with a specific channel capacity.
    ///
    /// Slow receivers observe `RecvError::Lagged` once the buffer is full.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish to all current subscribers. Dropped when nobody listens.
    pub fn publish(&self, event: PlatformEvent) {
        let _ = self.sender.send(event);
    }

    /// Announce a changed entity on `topic` to its subscribers.
    pub fn notify<T: Serialize>(
        &self,
        topic: &str,
        entity_type: &str,
        entity_id: impl ToString,
        actor: DbId,
        entity: &T,
    ) {
        let payload = match serde_json::to_value(entity) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(error = %e, topic, "Failed to serialize notification payload");
                serde_json::Value::Null
            }
        };
        self.publish(
            PlatformEvent::new(topic)
                .with_source(entity_type, entity_id)
                .with_actor(actor)
                .with_payload(payload),
        );
    }

    /// Publish an audit record for [`AuditPersistence`](crate::AuditPersistence).
    pub fn record_audit(&self, entry: &AuditEntry) {
        self.publish(PlatformEvent::audit(entry));
    }

    pub fn subscribe(&self) -> broadcast::Receiver<PlatformEvent> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
