//! In-memory collaborators for tests and local development.
//!
//! [`MemoryQueryEngine`] evaluates equality predicates, the date window and
//! the identity's marking scope over a fixed set of elements. It is not a
//! search engine: operators other than `eq`/`not_eq` match everything.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, RwLock};

use async_trait::async_trait;
use chrono::{DateTime, Datelike, TimeZone, Utc};
use serde::Serialize;
use vantage_core::error::CoreError;
use vantage_core::filters::{Filter, FilterGroup, FilterMode, FilterNode, FilterOperator};
use vantage_core::identity::ScopedIdentity;
use vantage_core::markings::{MarkingDefinition, MarkingMap, SharingCeiling};
use vantage_core::query::{
    BookmarkQuery, CountQuery, DistributionItem, DistributionQuery, ElementPage, Interval,
    KnowledgeElement, ListQuery, NumberResult, OrderMode, TimeSeries, TimeSeriesPoint,
    TimeSeriesQuery, DEFAULT_DATE_ATTRIBUTE,
};
use vantage_core::types::{EntityId, Timestamp};

use crate::collaborators::{
    DashboardLookup, MarkingCatalog, PublishedDashboard, QueryEngine, SharingPolicy,
};

// ---------------------------------------------------------------------------
// Dashboards, markings, policy
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct MemoryDashboards {
    by_key: RwLock<HashMap<String, PublishedDashboard>>,
}

impl MemoryDashboards {
    pub fn insert(&self, dashboard: PublishedDashboard) {
        write(&self.by_key).insert(dashboard.uri_key.clone(), dashboard);
    }

    pub fn remove(&self, uri_key: &str) {
        write(&self.by_key).remove(uri_key);
    }
}

#[async_trait]
impl DashboardLookup for MemoryDashboards {
    async fn find_by_uri_key(
        &self,
        uri_key: &str,
    ) -> Result<Option<PublishedDashboard>, CoreError> {
        Ok(read(&self.by_key).get(uri_key).cloned())
    }
}

#[derive(Default)]
pub struct StaticMarkings {
    catalog: RwLock<MarkingMap>,
}

impl StaticMarkings {
    pub fn new(markings: impl IntoIterator<Item = MarkingDefinition>) -> Self {
        Self {
            catalog: RwLock::new(markings.into_iter().map(|m| (m.id, m)).collect()),
        }
    }

    pub fn insert(&self, marking: MarkingDefinition) {
        write(&self.catalog).insert(marking.id, marking);
    }

    pub fn remove(&self, id: EntityId) {
        write(&self.catalog).remove(&id);
    }
}

#[async_trait]
impl MarkingCatalog for StaticMarkings {
    async fn get_all(&self) -> Result<MarkingMap, CoreError> {
        Ok(read(&self.catalog).clone())
    }
}

/// Sharing ceiling held in memory. Unrestricted by default.
#[derive(Default)]
pub struct StaticPolicy {
    ceiling: RwLock<SharingCeiling>,
}

impl StaticPolicy {
    /// Configure a ceiling that resolves to `max`.
    pub fn set(&self, max: Vec<MarkingDefinition>) {
        *write(&self.ceiling) = SharingCeiling::Markings(max);
    }
}

#[async_trait]
impl SharingPolicy for StaticPolicy {
    async fn max_markings(&self) -> Result<SharingCeiling, CoreError> {
        Ok(read(&self.ceiling).clone())
    }
}

fn read<T>(lock: &RwLock<T>) -> std::sync::RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(|e| e.into_inner())
}

fn write<T>(lock: &RwLock<T>) -> std::sync::RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(|e| e.into_inner())
}

// ---------------------------------------------------------------------------
// Query engine
// ---------------------------------------------------------------------------

/// One engine invocation, as seen by the engine.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub primitive: &'static str,
    pub allowed_markings: Vec<EntityId>,
    pub query: serde_json::Value,
}

/// Elements with relationship ends set (`fromId`/`toId` attributes) are
/// relationships; everything else is an object.
#[derive(Default)]
pub struct MemoryQueryEngine {
    elements: RwLock<Vec<KnowledgeElement>>,
    calls: Mutex<Vec<RecordedCall>>,
    failing_pivot: Mutex<Option<String>>,
    ignore_scope: AtomicBool,
}

impl MemoryQueryEngine {
    pub fn insert(&self, element: KnowledgeElement) {
        write(&self.elements).push(element);
    }

    /// Replace the markings of a stored element.
    pub fn remark(&self, id: &str, markings: Vec<EntityId>) {
        if let Some(e) = write(&self.elements).iter_mut().find(|e| e.id == id) {
            e.object_marking = markings;
        }
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Fail every query pivoting on `id` with an upstream error.
    pub fn fail_on_pivot(&self, id: &str) {
        *self.failing_pivot.lock().unwrap_or_else(|e| e.into_inner()) = Some(id.to_string());
    }

    /// Return elements regardless of the identity, as a faulty engine would.
    pub fn ignore_scope(&self, ignore: bool) {
        self.ignore_scope.store(ignore, Ordering::SeqCst);
    }

    fn record<Q: Serialize>(
        &self,
        primitive: &'static str,
        identity: &ScopedIdentity,
        query: &Q,
    ) -> Result<(), CoreError> {
        let query = serde_json::to_value(query).map_err(|e| CoreError::Internal(e.to_string()))?;

        let failing = self.failing_pivot.lock().unwrap_or_else(|e| e.into_inner()).clone();
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(RecordedCall {
                primitive,
                allowed_markings: identity.allowed_marking_ids(),
                query: query.clone(),
            });

        if let Some(id) = failing {
            if query.to_string().contains(&format!("\"{id}\"")) {
                return Err(CoreError::Upstream(format!("{primitive} failed for {id}")));
            }
        }
        Ok(())
    }

    fn visible(&self, identity: &ScopedIdentity, relationships: bool) -> Vec<KnowledgeElement> {
        let ignore = self.ignore_scope.load(Ordering::SeqCst);
        read(&self.elements)
            .iter()
            .filter(|e| is_relationship(e) == relationships)
            .filter(|e| {
                ignore
                    || (identity.can_see(&e.object_marking)
                        && identity.can_see_entity_type(&e.entity_type))
            })
            .cloned()
            .collect()
    }

    fn find(&self, id: &str) -> Option<KnowledgeElement> {
        read(&self.elements).iter().find(|e| e.id == id).cloned()
    }

    /// Relationship whose ends satisfy the pivot filters.
    fn ends_match(
        &self,
        rel: &KnowledgeElement,
        dynamic_from: Option<&FilterGroup>,
        dynamic_to: Option<&FilterGroup>,
    ) -> bool {
        let side_matches = |key: &str, filters: Option<&FilterGroup>| match filters {
            None => true,
            Some(f) => attr(rel, key)
                .and_then(|id| self.find(&id))
                .is_some_and(|end| matches_group(&end, f)),
        };
        side_matches("fromId", dynamic_from) && side_matches("toId", dynamic_to)
    }

    fn count(
        &self,
        identity: &ScopedIdentity,
        query: &CountQuery,
        relationships: bool,
    ) -> NumberResult {
        let field = query.date_attribute.as_deref().unwrap_or(DEFAULT_DATE_ATTRIBUTE);
        let matching: Vec<_> = self
            .visible(identity, relationships)
            .into_iter()
            .filter(|e| type_matches(e, &query.types))
            .filter(|e| query.filters.as_ref().is_none_or(|f| matches_group(e, f)))
            .filter(|e| self.ends_match(e, query.dynamic_from.as_ref(), query.dynamic_to.as_ref()))
            .collect();

        let count = matching
            .iter()
            .filter(|e| in_window(e, field, query.start_date, query.end_date))
            .count();
        NumberResult {
            total: matching.len() as i64,
            count: count as i64,
        }
    }

    fn distribution(
        &self,
        candidates: Vec<KnowledgeElement>,
        query: &DistributionQuery,
    ) -> Vec<DistributionItem> {
        let field = query.date_attribute.as_deref().unwrap_or(DEFAULT_DATE_ATTRIBUTE);
        let mut groups: BTreeMap<String, i64> = BTreeMap::new();

        for e in candidates
            .iter()
            .filter(|e| type_matches(e, &query.types))
            .filter(|e| query.filters.as_ref().is_none_or(|f| matches_group(e, f)))
            .filter(|e| self.ends_match(e, query.dynamic_from.as_ref(), query.dynamic_to.as_ref()))
            .filter(|e| in_window(e, field, query.start_date, query.end_date))
        {
            let key = if query.field == "internal_id" && is_relationship(e) {
                let side = if query.is_to == Some(false) { "fromId" } else { "toId" };
                attr(e, side)
            } else {
                attr(e, &query.field)
            };
            if let Some(key) = key {
                *groups.entry(key).or_default() += 1;
            }
        }

        let mut items: Vec<DistributionItem> = groups
            .into_iter()
            .map(|(key, value)| {
                let entity = self.find(&key);
                let label = entity
                    .as_ref()
                    .and_then(|e| attr(e, "name"))
                    .unwrap_or_else(|| key.clone());
                DistributionItem {
                    label,
                    value,
                    entity,
                    breakdown_distribution: None,
                }
            })
            .collect();
        items.sort_by(|a, b| b.value.cmp(&a.value).then_with(|| a.label.cmp(&b.label)));
        items.truncate(query.limit as usize);
        items
    }

    fn series(&self, candidates: Vec<KnowledgeElement>, query: &TimeSeriesQuery) -> Vec<TimeSeries> {
        query
            .time_series_parameters
            .iter()
            .map(|spec| {
                let field = spec.field.as_deref().unwrap_or(DEFAULT_DATE_ATTRIBUTE);
                let mut buckets: BTreeMap<Timestamp, i64> = BTreeMap::new();
                for e in candidates.iter().filter(|e| matches_group(e, &spec.filters)) {
                    if let Some(date) = date_attr(e, field) {
                        if in_bounds(date, query.start_date, query.end_date) {
                            *buckets.entry(truncate(date, query.interval)).or_default() += 1;
                        }
                    }
                }
                TimeSeries {
                    data: buckets
                        .into_iter()
                        .map(|(date, value)| TimeSeriesPoint { date, value })
                        .collect(),
                }
            })
            .collect()
    }

    fn list(&self, candidates: Vec<KnowledgeElement>, query: &ListQuery) -> ElementPage {
        let order_by = query.order_by.as_deref().unwrap_or(DEFAULT_DATE_ATTRIBUTE);
        let mut matching: Vec<_> = candidates
            .into_iter()
            .filter(|e| type_matches(e, &query.types))
            .filter(|e| query.filters.as_ref().is_none_or(|f| matches_group(e, f)))
            .filter(|e| self.ends_match(e, query.dynamic_from.as_ref(), query.dynamic_to.as_ref()))
            .filter(|e| in_window(e, order_by, query.start_date, query.end_date))
            .collect();

        matching.sort_by_key(|e| date_attr(e, order_by));
        if query.order_mode == OrderMode::Desc {
            matching.reverse();
        }

        let global_count = matching.len() as i64;
        matching.truncate(query.first as usize);
        ElementPage {
            has_next_page: global_count > matching.len() as i64,
            items: matching,
            global_count,
        }
    }
}

#[async_trait]
impl QueryEngine for MemoryQueryEngine {
    async fn stix_core_objects_number(
        &self,
        identity: &ScopedIdentity,
        query: &CountQuery,
    ) -> Result<NumberResult, CoreError> {
        self.record("stixCoreObjectsNumber", identity, query)?;
        Ok(self.count(identity, query, false))
    }

    async fn stix_relationships_number(
        &self,
        identity: &ScopedIdentity,
        query: &CountQuery,
    ) -> Result<NumberResult, CoreError> {
        self.record("stixRelationshipsNumber", identity, query)?;
        Ok(self.count(identity, query, true))
    }

    async fn stix_core_objects_distribution(
        &self,
        identity: &ScopedIdentity,
        query: &DistributionQuery,
    ) -> Result<Vec<DistributionItem>, CoreError> {
        self.record("stixCoreObjectsDistribution", identity, query)?;
        Ok(self.distribution(self.visible(identity, false), query))
    }

    async fn stix_core_objects_distribution_by_entity(
        &self,
        identity: &ScopedIdentity,
        query: &DistributionQuery,
    ) -> Result<Vec<DistributionItem>, CoreError> {
        self.record("stixCoreObjectsDistributionByEntity", identity, query)?;
        let Some(pivot) = query.object_id.as_deref() else {
            return Err(CoreError::Validation("objectId is required".to_string()));
        };

        let related: Vec<String> = self
            .visible(identity, true)
            .iter()
            .filter_map(|rel| match (attr(rel, "fromId"), attr(rel, "toId")) {
                (Some(from), Some(to)) if from == pivot => Some(to),
                (Some(from), Some(to)) if to == pivot => Some(from),
                _ => None,
            })
            .collect();
        let candidates = self
            .visible(identity, false)
            .into_iter()
            .filter(|e| related.contains(&e.id))
            .collect();
        Ok(self.distribution(candidates, query))
    }

    async fn stix_relationships_distribution(
        &self,
        identity: &ScopedIdentity,
        query: &DistributionQuery,
    ) -> Result<Vec<DistributionItem>, CoreError> {
        self.record("stixRelationshipsDistribution", identity, query)?;
        let candidates = self
            .visible(identity, true)
            .into_iter()
            .filter(|rel| {
                query.from_or_to_id.as_deref().is_none_or(|id| {
                    attr(rel, "fromId").as_deref() == Some(id) || attr(rel, "toId").as_deref() == Some(id)
                })
            })
            .collect();
        Ok(self.distribution(candidates, query))
    }

    async fn stix_core_objects_multi_time_series(
        &self,
        identity: &ScopedIdentity,
        query: &TimeSeriesQuery,
    ) -> Result<Vec<TimeSeries>, CoreError> {
        self.record("stixCoreObjectsMultiTimeSeries", identity, query)?;
        Ok(self.series(self.visible(identity, false), query))
    }

    async fn stix_relationships_multi_time_series(
        &self,
        identity: &ScopedIdentity,
        query: &TimeSeriesQuery,
    ) -> Result<Vec<TimeSeries>, CoreError> {
        self.record("stixRelationshipsMultiTimeSeries", identity, query)?;
        Ok(self.series(self.visible(identity, true), query))
    }

    async fn stix_core_objects(
        &self,
        identity: &ScopedIdentity,
        query: &ListQuery,
    ) -> Result<ElementPage, CoreError> {
        self.record("stixCoreObjects", identity, query)?;
        Ok(self.list(self.visible(identity, false), query))
    }

    async fn stix_relationships(
        &self,
        identity: &ScopedIdentity,
        query: &ListQuery,
    ) -> Result<ElementPage, CoreError> {
        self.record("stixRelationships", identity, query)?;
        Ok(self.list(self.visible(identity, true), query))
    }

    async fn bookmarks(
        &self,
        identity: &ScopedIdentity,
        query: &BookmarkQuery,
    ) -> Result<ElementPage, CoreError> {
        self.record("bookmarks", identity, query)?;
        let items: Vec<_> = self
            .visible(identity, false)
            .into_iter()
            .filter(|e| e.attributes.get("bookmarked") == Some(&serde_json::Value::Bool(true)))
            .filter(|e| query.filters.as_ref().is_none_or(|f| matches_group(e, f)))
            .collect();
        Ok(ElementPage {
            global_count: items.len() as i64,
            items,
            has_next_page: false,
        })
    }
}

// ---------------------------------------------------------------------------
// Evaluation helpers
// ---------------------------------------------------------------------------

fn is_relationship(e: &KnowledgeElement) -> bool {
    e.attributes.contains_key("fromId") && e.attributes.contains_key("toId")
}

fn attr(e: &KnowledgeElement, key: &str) -> Option<String> {
    match key {
        "entity_type" | "relationship_type" => Some(e.entity_type.clone()),
        "id" | "internal_id" => Some(e.id.clone()),
        _ => match e.attributes.get(key)? {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Null => None,
            other => Some(other.to_string()),
        },
    }
}

fn date_attr(e: &KnowledgeElement, key: &str) -> Option<Timestamp> {
    let raw = attr(e, key)?;
    DateTime::parse_from_rfc3339(&raw)
        .ok()
        .map(|d| d.with_timezone(&Utc))
}

fn in_bounds(date: Timestamp, start: Option<Timestamp>, end: Option<Timestamp>) -> bool {
    start.is_none_or(|s| date >= s) && end.is_none_or(|e| date <= e)
}

fn in_window(e: &KnowledgeElement, field: &str, start: Option<Timestamp>, end: Option<Timestamp>) -> bool {
    if start.is_none() && end.is_none() {
        return true;
    }
    date_attr(e, field).is_some_and(|d| in_bounds(d, start, end))
}

/// The abstract core-object type matches every object.
fn type_matches(e: &KnowledgeElement, types: &[String]) -> bool {
    types.is_empty()
        || types.iter().any(|t| {
            t == &e.entity_type || t == vantage_core::stix::ABSTRACT_STIX_CORE_OBJECT
        })
}

fn matches_filter(e: &KnowledgeElement, filter: &Filter) -> bool {
    let hit = |value: &String| filter.key.iter().any(|k| attr(e, k).as_ref() == Some(value));
    let any_or_all = |f: &dyn Fn(&String) -> bool| match filter.mode {
        FilterMode::Or => filter.values.iter().any(f),
        FilterMode::And => filter.values.iter().all(f),
    };
    match filter.operator {
        FilterOperator::Eq => any_or_all(&hit),
        FilterOperator::NotEq => any_or_all(&|v| !hit(v)),
        _ => true,
    }
}

fn matches_group(e: &KnowledgeElement, group: &FilterGroup) -> bool {
    let node_matches = |node: &FilterNode| match node {
        FilterNode::Predicate(f) => matches_filter(e, f),
        FilterNode::Group(g) => matches_group(e, g),
    };
    match group.mode {
        FilterMode::And => group.nodes.iter().all(node_matches),
        FilterMode::Or => group.nodes.is_empty() || group.nodes.iter().any(node_matches),
    }
}

fn truncate(date: Timestamp, interval: Interval) -> Timestamp {
    let (year, month, day) = match interval {
        Interval::Year => (date.year(), 1, 1),
        Interval::Quarter => (date.year(), (date.month0() / 3) * 3 + 1, 1),
        Interval::Month => (date.year(), date.month(), 1),
        _ => (date.year(), date.month(), date.day()),
    };
    Utc.with_ymd_and_hms(year, month, day, 0, 0, 0)
        .single()
        .unwrap_or(date)
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

pub mod fixtures {
    //! Builders shared by the engine's tests and the API tests.

    use super::*;
    use serde_json::json;
    use uuid::Uuid;
    use vantage_core::manifest::Manifest;
    use vantage_core::types::DbId;

    /// Number widget counting malware objects.
    pub const NUMBER_WIDGET: &str = "ebb25410-7048-4de7-9288-704e962215f6";
    /// Object distribution by author with an object breakdown.
    pub const OBJECTS_BREAKDOWN_WIDGET: &str = "0a471055-7426-4840-9501-33770b845f92";
    /// Relationship distribution with an entity-perspective breakdown.
    pub const ENTITY_BREAKDOWN_WIDGET: &str = "9e6afa7e-0db7-424c-8951-16b867245583";
    pub const OBJECTS_TIME_SERIES_WIDGET: &str = "bec879df-4da2-46c0-994a-e0b3e3b5c8b1";
    pub const RELATIONSHIPS_LIST_WIDGET: &str = "6dbb6564-3e4d-4a42-a0ca-d1e5fbe9cd22";
    pub const BOOKMARK_WIDGET: &str = "1d2e8d53-4c22-4e2b-9a36-1f8b5c4d3a77";

    /// TLP markings, lowest to highest.
    pub struct Tlp {
        pub clear: MarkingDefinition,
        pub green: MarkingDefinition,
        pub red: MarkingDefinition,
    }

    impl Tlp {
        pub fn catalog(&self) -> StaticMarkings {
            StaticMarkings::new([self.clear.clone(), self.green.clone(), self.red.clone()])
        }

        pub fn map(&self) -> MarkingMap {
            [&self.clear, &self.green, &self.red]
                .into_iter()
                .map(|m| (m.id, m.clone()))
                .collect()
        }
    }

    pub fn marking(definition: &str, order: i32) -> MarkingDefinition {
        MarkingDefinition {
            id: Uuid::new_v4(),
            definition_type: "TLP".to_string(),
            definition: definition.to_string(),
            order,
        }
    }

    pub fn tlp() -> Tlp {
        Tlp {
            clear: marking("TLP:CLEAR", 1),
            green: marking("TLP:GREEN", 2),
            red: marking("TLP:RED", 4),
        }
    }

    pub fn identity(tlp: &Tlp, allowed: &[EntityId]) -> ScopedIdentity {
        ScopedIdentity::build(
            1,
            "fixture-key",
            allowed,
            &tlp.map(),
            &SharingCeiling::Unrestricted,
        )
    }

    pub fn dashboard(
        id: DbId,
        uri_key: &str,
        allowed: &[EntityId],
        public_manifest: String,
    ) -> PublishedDashboard {
        PublishedDashboard {
            id,
            uri_key: uri_key.to_string(),
            name: format!("Dashboard {id}"),
            description: None,
            public_manifest,
            allowed_markings_ids: allowed.to_vec(),
        }
    }

    pub fn element(id: &str, entity_type: &str, markings: &[EntityId]) -> KnowledgeElement {
        KnowledgeElement {
            id: id.to_string(),
            entity_type: entity_type.to_string(),
            object_marking: markings.to_vec(),
            attributes: serde_json::Map::new(),
        }
    }

    /// Object with a name and a `created_at` date.
    pub fn object(
        id: &str,
        entity_type: &str,
        markings: &[EntityId],
        created_at: Timestamp,
    ) -> KnowledgeElement {
        let mut e = element(id, entity_type, markings);
        e.attributes.insert("name".into(), json!(id));
        e.attributes.insert("created_at".into(), json!(created_at.to_rfc3339()));
        e
    }

    pub fn relationship(
        id: &str,
        relationship_type: &str,
        from: &str,
        to: &str,
        markings: &[EntityId],
        created_at: Timestamp,
    ) -> KnowledgeElement {
        let mut e = element(id, relationship_type, markings);
        e.attributes.insert("fromId".into(), json!(from));
        e.attributes.insert("toId".into(), json!(to));
        e.attributes.insert("created_at".into(), json!(created_at.to_rfc3339()));
        e
    }

    pub fn bucket(label: &str, value: i64, entity: Option<KnowledgeElement>) -> DistributionItem {
        DistributionItem {
            label: label.to_string(),
            value,
            entity,
            breakdown_distribution: None,
        }
    }

    fn eq_filter(key: &str, value: &str) -> serde_json::Value {
        json!({
            "mode": "and",
            "filters": [{ "key": key, "values": [value], "operator": "eq", "mode": "or" }],
            "filterGroups": []
        })
    }

    /// Manifest JSON carrying every fixture widget.
    pub fn manifest_json() -> serde_json::Value {
        json!({
            "widgets": {
                NUMBER_WIDGET: {
                    "id": NUMBER_WIDGET,
                    "type": "number",
                    "perspective": "entities",
                    "dataSelection": [{
                        "label": "malwares",
                        "date_attribute": "created_at",
                        "perspective": "entities",
                        "filters": eq_filter("entity_type", "Malware")
                    }],
                    "parameters": { "title": "malwares number" },
                    "layout": { "w": 4, "h": 2, "x": 4, "y": 0 }
                },
                OBJECTS_BREAKDOWN_WIDGET: {
                    "id": OBJECTS_BREAKDOWN_WIDGET,
                    "type": "horizontal-bar",
                    "perspective": "entities",
                    "dataSelection": [
                        {
                            "label": "by author",
                            "attribute": "createdBy",
                            "date_attribute": "created_at",
                            "perspective": "entities",
                            "filters": eq_filter("entity_type", "Malware")
                        },
                        {
                            "label": "by type",
                            "attribute": "entity_type",
                            "perspective": "entities"
                        }
                    ],
                    "parameters": { "title": "malwares by author" }
                },
                ENTITY_BREAKDOWN_WIDGET: {
                    "id": ENTITY_BREAKDOWN_WIDGET,
                    "type": "horizontal-bar",
                    "perspective": "relationships",
                    "dataSelection": [
                        {
                            "label": "targets",
                            "attribute": "internal_id",
                            "isTo": true,
                            "perspective": "relationships",
                            "filters": eq_filter("relationship_type", "targets")
                        },
                        {
                            "label": "related",
                            "attribute": "entity_type",
                            "perspective": "entities"
                        }
                    ],
                    "parameters": { "title": "targets" }
                },
                OBJECTS_TIME_SERIES_WIDGET: {
                    "id": OBJECTS_TIME_SERIES_WIDGET,
                    "type": "line",
                    "perspective": "entities",
                    "dataSelection": [
                        { "label": "malwares", "date_attribute": "created_at", "filters": eq_filter("entity_type", "Malware") },
                        { "label": "campaigns", "date_attribute": "created_at", "filters": eq_filter("entity_type", "Campaign") }
                    ],
                    "parameters": { "title": "activity" }
                },
                RELATIONSHIPS_LIST_WIDGET: {
                    "id": RELATIONSHIPS_LIST_WIDGET,
                    "type": "list",
                    "perspective": "relationships",
                    "dataSelection": [{ "label": "latest", "date_attribute": "created_at", "number": 2 }],
                    "parameters": { "title": "latest relationships" }
                },
                BOOKMARK_WIDGET: {
                    "id": BOOKMARK_WIDGET,
                    "type": "bookmark",
                    "perspective": "entities",
                    "dataSelection": [{ "label": "bookmarks" }],
                    "parameters": { "title": "bookmarks" }
                }
            },
            "config": {}
        })
    }

    /// Encoded manifest carrying every fixture widget.
    pub fn manifest() -> String {
        let manifest: Manifest =
            serde_json::from_value(manifest_json()).expect("fixture manifest is valid");
        manifest.encode().expect("fixture manifest encodes")
    }
}
