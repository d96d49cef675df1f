use std::sync::Arc;

use vantage_widgets::{MarkingCatalog, SharingPolicy, WidgetEngine};

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: vantage_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Centralized event bus for publishing platform events.
    pub event_bus: Arc<vantage_events::EventBus>,
    /// Marking catalog, shared with the widget engine.
    pub markings: Arc<dyn MarkingCatalog>,
    /// Platform sharing ceiling, shared with the widget engine.
    pub policy: Arc<dyn SharingPolicy>,
    /// Public widget resolution engine.
    pub widgets: WidgetEngine,
}
