//! Seams to the systems the engine depends on.
//!
//! Production adapters live in the API crate; in-memory versions are in
//! `memory`, behind the `test-util` feature.

use async_trait::async_trait;
use vantage_core::error::CoreError;
use vantage_core::identity::ScopedIdentity;
use vantage_core::markings::{
    compute_available_markings, MarkingDefinition, MarkingMap, SharingCeiling,
};
use vantage_core::query::{
    BookmarkQuery, CountQuery, DistributionItem, DistributionQuery, ElementPage, ListQuery,
    NumberResult, TimeSeries, TimeSeriesQuery,
};
use vantage_core::types::{DbId, EntityId};

/// The parts of a public dashboard the resolver needs.
#[derive(Debug, Clone, PartialEq)]
pub struct PublishedDashboard {
    pub id: DbId,
    pub uri_key: String,
    pub name: String,
    pub description: Option<String>,
    pub public_manifest: String,
    pub allowed_markings_ids: Vec<EntityId>,
}

/// Lookup of published dashboards with system privilege.
#[async_trait]
pub trait DashboardLookup: Send + Sync {
    async fn find_by_uri_key(&self, uri_key: &str)
        -> Result<Option<PublishedDashboard>, CoreError>;
}

/// Current marking catalog.
#[async_trait]
pub trait MarkingCatalog: Send + Sync {
    async fn get_all(&self) -> Result<MarkingMap, CoreError>;
}

/// Platform data-sharing policy.
#[async_trait]
pub trait SharingPolicy: Send + Sync {
    /// The configured ceiling, with its markings resolved.
    async fn max_markings(&self) -> Result<SharingCeiling, CoreError>;
}

/// Every marking the current ceiling allows to be shared.
///
/// Publication checks and widget scoping both read the ceiling through
/// here, fresh on every call.
pub async fn shareable_markings(
    catalog: &dyn MarkingCatalog,
    policy: &dyn SharingPolicy,
) -> Result<Vec<MarkingDefinition>, CoreError> {
    let (catalog, ceiling) = tokio::try_join!(catalog.get_all(), policy.max_markings())?;
    let all: Vec<MarkingDefinition> = catalog.into_values().collect();
    Ok(compute_available_markings(&ceiling, &all))
}

/// Generic object-graph query engine.
///
/// Implementations execute each query as `identity` and must only return
/// elements that identity may see. Returned elements carry their
/// `objectMarking` ids so results can be re-checked.
#[async_trait]
pub trait QueryEngine: Send + Sync {
    async fn stix_core_objects_number(
        &self,
        identity: &ScopedIdentity,
        query: &CountQuery,
    ) -> Result<NumberResult, CoreError>;

    async fn stix_relationships_number(
        &self,
        identity: &ScopedIdentity,
        query: &CountQuery,
    ) -> Result<NumberResult, CoreError>;

    async fn stix_core_objects_distribution(
        &self,
        identity: &ScopedIdentity,
        query: &DistributionQuery,
    ) -> Result<Vec<DistributionItem>, CoreError>;

    /// Distribution of the objects related to `query.object_id`.
    async fn stix_core_objects_distribution_by_entity(
        &self,
        identity: &ScopedIdentity,
        query: &DistributionQuery,
    ) -> Result<Vec<DistributionItem>, CoreError>;

    async fn stix_relationships_distribution(
        &self,
        identity: &ScopedIdentity,
        query: &DistributionQuery,
    ) -> Result<Vec<DistributionItem>, CoreError>;

    async fn stix_core_objects_multi_time_series(
        &self,
        identity: &ScopedIdentity,
        query: &TimeSeriesQuery,
    ) -> Result<Vec<TimeSeries>, CoreError>;

    async fn stix_relationships_multi_time_series(
        &self,
        identity: &ScopedIdentity,
        query: &TimeSeriesQuery,
    ) -> Result<Vec<TimeSeries>, CoreError>;

    async fn stix_core_objects(
        &self,
        identity: &ScopedIdentity,
        query: &ListQuery,
    ) -> Result<ElementPage, CoreError>;

    async fn stix_relationships(
        &self,
        identity: &ScopedIdentity,
        query: &ListQuery,
    ) -> Result<ElementPage, CoreError>;

    async fn bookmarks(
        &self,
        identity: &ScopedIdentity,
        query: &BookmarkQuery,
    ) -> Result<ElementPage, CoreError>;
}
