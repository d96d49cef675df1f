//! Production implementations of the widget engine's collaborator traits.
//!
//! - [`PgDashboardLookup`] -- published dashboards from Postgres.
//! - [`CachedMarkingCatalog`] -- read-through marking cache, invalidated by bus events.
//! - [`PgSharingPolicy`] -- sharing ceiling from `platform_settings`.
//! - [`HttpQueryEngine`] -- REST client for the external query engine.

pub mod dashboards;
pub mod markings;
pub mod policy;
pub mod query_engine;

pub use dashboards::PgDashboardLookup;
pub use markings::CachedMarkingCatalog;
pub use policy::PgSharingPolicy;
pub use query_engine::HttpQueryEngine;

use std::sync::Arc;

use vantage_core::error::CoreError;
use vantage_db::DbPool;
use vantage_widgets::{
    MarkingCatalog, QueryBudget, QueryEngine, SharingPolicy, WidgetEngine, WidgetResolver,
};

/// Storage failures behind a collaborator seam surface as internal errors.
pub(crate) fn storage_error(err: sqlx::Error) -> CoreError {
    CoreError::Internal(format!("Database error: {err}"))
}

/// Wire the Postgres-backed dashboard lookup with the shared catalog and
/// policy around `engine`.
///
/// `markings` and `policy` are the same instances the publication path
/// uses, so both paths see one ceiling.
pub fn build_widget_engine(
    pool: &DbPool,
    markings: Arc<dyn MarkingCatalog>,
    policy: Arc<dyn SharingPolicy>,
    engine: Arc<dyn QueryEngine>,
    max_concurrency: usize,
) -> WidgetEngine {
    let resolver = WidgetResolver::new(
        Arc::new(PgDashboardLookup::new(pool.clone())),
        markings,
        policy,
    );
    WidgetEngine::new(Arc::new(resolver), engine, QueryBudget::new(max_concurrency))
}
