//! Scoped execution principal for anonymous public-dashboard reads.

use std::collections::HashSet;

use serde::Serialize;

use crate::markings::{
    compute_available_markings, intersect_markings, resolve_markings, MarkingDefinition,
    MarkingMap, SharingCeiling,
};
use crate::stix::NON_PUBLIC_ENTITY_TYPES;
use crate::types::{DbId, EntityId};

/// Ephemeral principal used to execute public widget queries.
///
/// Its visibility is the intersection of the dashboard's allowed markings
/// and the platform ceiling computed at request time. It carries no other
/// privilege: mutating operations require an authenticated user and have no
/// way to accept it.
#[derive(Debug, Clone, Serialize)]
pub struct ScopedIdentity {
    pub dashboard_id: DbId,
    pub uri_key: String,
    allowed_markings: Vec<MarkingDefinition>,
    #[serde(skip)]
    allowed_ids: HashSet<EntityId>,
}

impl ScopedIdentity {
    /// Build the identity from the dashboard's stored marking ids.
    ///
    /// `catalog` and `ceiling` must be fetched for the current request;
    /// a ceiling tightened after publication narrows the identity at once.
    pub fn build(
        dashboard_id: DbId,
        uri_key: impl Into<String>,
        allowed_marking_ids: &[EntityId],
        catalog: &MarkingMap,
        ceiling: &SharingCeiling,
    ) -> Self {
        let allowed = resolve_markings(allowed_marking_ids, catalog);
        let all: Vec<MarkingDefinition> = catalog.values().cloned().collect();
        let available = compute_available_markings(ceiling, &all);
        let scoped = intersect_markings(&allowed, &available);
        let allowed_ids = scoped.iter().map(|m| m.id).collect();

        Self {
            dashboard_id,
            uri_key: uri_key.into(),
            allowed_markings: scoped,
            allowed_ids,
        }
    }

    pub fn allowed_markings(&self) -> &[MarkingDefinition] {
        &self.allowed_markings
    }

    pub fn allowed_marking_ids(&self) -> Vec<EntityId> {
        self.allowed_markings.iter().map(|m| m.id).collect()
    }

    /// Whether an element carrying `object_markings` is visible.
    ///
    /// Unmarked elements and elements carrying any marking outside the
    /// scope are hidden.
    pub fn can_see(&self, object_markings: &[EntityId]) -> bool {
        !object_markings.is_empty() && object_markings.iter().all(|m| self.allowed_ids.contains(m))
    }

    pub fn can_see_entity_type(&self, entity_type: &str) -> bool {
        !NON_PUBLIC_ENTITY_TYPES.contains(&entity_type)
    }
}
