//! Marking definitions and the platform data-sharing ceiling.
//!
//! A marking definition is a classification label (`TLP:GREEN`, `PAP:AMBER`,
//! ...) attached to knowledge entities. Markings of the same
//! `definition_type` are totally ordered by `order`: a higher order is more
//! restrictive.
//!
//! The platform may configure at most one "maximum shareable" marking per
//! definition type. Public dashboards can never expose data classified above
//! that ceiling.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::types::EntityId;

/// A marking-definition record as held by the marking catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkingDefinition {
    pub id: EntityId,
    /// Family of the marking, e.g. `"TLP"` or `"PAP"`.
    pub definition_type: String,
    /// Display value, e.g. `"TLP:GREEN"`.
    pub definition: String,
    /// Rank inside the family; higher is more restrictive.
    pub order: i32,
}

/// Catalog snapshot keyed by marking id.
pub type MarkingMap = HashMap<EntityId, MarkingDefinition>;

/// Resolve marking ids into full records.
///
/// Ids unknown to the catalog (deleted markings) are dropped. Duplicates are
/// removed and the caller's order is preserved.
pub fn resolve_markings(ids: &[EntityId], catalog: &MarkingMap) -> Vec<MarkingDefinition> {
    let mut seen = HashSet::with_capacity(ids.len());
    ids.iter()
        .filter(|id| seen.insert(**id))
        .filter_map(|id| catalog.get(id).cloned())
        .collect()
}

/// The platform data-sharing ceiling, as configured.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SharingCeiling {
    /// No ceiling configured: every marking is shareable.
    #[default]
    Unrestricted,
    /// Resolved ceiling markings (one per definition type).
    ///
    /// Configured ids whose definition no longer exists are absent, so a
    /// ceiling that resolves to nothing shares nothing.
    Markings(Vec<MarkingDefinition>),
}

/// Compute every marking shareable under the platform ceiling.
///
/// With no ceiling configured the whole catalog is shareable. Otherwise
/// only markings of a capped type whose `order` does not exceed the ceiling
/// of that type are returned; markings of uncapped types are excluded.
pub fn compute_available_markings(
    ceiling: &SharingCeiling,
    all: &[MarkingDefinition],
) -> Vec<MarkingDefinition> {
    let max_markings = match ceiling {
        SharingCeiling::Unrestricted => return all.to_vec(),
        SharingCeiling::Markings(markings) => markings,
    };

    let mut ceilings: HashMap<&str, i32> = HashMap::new();
    for max in max_markings {
        ceilings
            .entry(max.definition_type.as_str())
            .and_modify(|order| *order = (*order).max(max.order))
            .or_insert(max.order);
    }

    all.iter()
        .filter(|m| {
            ceilings
                .get(m.definition_type.as_str())
                .is_some_and(|ceiling| m.order <= *ceiling)
        })
        .cloned()
        .collect()
}

/// Keep only the `allowed` markings that are also `available`.
///
/// Order of `allowed` is preserved.
pub fn intersect_markings(
    allowed: &[MarkingDefinition],
    available: &[MarkingDefinition],
) -> Vec<MarkingDefinition> {
    let available_ids: HashSet<EntityId> = available.iter().map(|m| m.id).collect();
    allowed
        .iter()
        .filter(|m| available_ids.contains(&m.id))
        .cloned()
        .collect()
}

/// Return the requested ids that are not in the available set.
pub fn ceiling_violations(
    requested: &[EntityId],
    available: &[MarkingDefinition],
) -> Vec<EntityId> {
    let available_ids: HashSet<EntityId> = available.iter().map(|m| m.id).collect();
    requested
        .iter()
        .filter(|id| !available_ids.contains(id))
        .copied()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn marking(definition_type: &str, definition: &str, order: i32) -> MarkingDefinition {
        MarkingDefinition {
            id: Uuid::new_v4(),
            definition_type: definition_type.to_string(),
            definition: definition.to_string(),
            order,
        }
    }

    fn tlp_catalog() -> Vec<MarkingDefinition> {
        vec![
            marking("TLP", "TLP:CLEAR", 1),
            marking("TLP", "TLP:GREEN", 2),
            marking("TLP", "TLP:AMBER", 3),
            marking("TLP", "TLP:RED", 4),
            marking("PAP", "PAP:GREEN", 2),
        ]
    }

    #[test]
    fn resolve_drops_unknown_and_duplicate_ids() {
        let all = tlp_catalog();
        let map: MarkingMap = all.iter().map(|m| (m.id, m.clone())).collect();
        let ids = vec![all[2].id, Uuid::new_v4(), all[0].id, all[2].id];

        let resolved = resolve_markings(&ids, &map);

        let names: Vec<_> = resolved.iter().map(|m| m.definition.as_str()).collect();
        assert_eq!(names, vec!["TLP:AMBER", "TLP:CLEAR"]);
    }

    #[test]
    fn no_ceiling_makes_everything_available() {
        let all = tlp_catalog();
        assert_eq!(
            compute_available_markings(&SharingCeiling::Unrestricted, &all),
            all
        );
    }

    #[test]
    fn unresolved_ceiling_makes_nothing_available() {
        let all = tlp_catalog();
        let ceiling = SharingCeiling::Markings(Vec::new());

        assert!(compute_available_markings(&ceiling, &all).is_empty());
    }

    #[test]
    fn ceiling_keeps_lower_orders_of_capped_type_only() {
        let all = tlp_catalog();
        let green = all[1].clone();

        let available = compute_available_markings(&SharingCeiling::Markings(vec![green]), &all);

        let names: Vec<_> = available.iter().map(|m| m.definition.as_str()).collect();
        assert_eq!(names, vec!["TLP:CLEAR", "TLP:GREEN"]);
    }

    #[test]
    fn intersection_preserves_allowed_order() {
        let all = tlp_catalog();
        let allowed = vec![all[3].clone(), all[1].clone(), all[0].clone()];
        let ceiling = SharingCeiling::Markings(vec![all[1].clone()]);
        let available = compute_available_markings(&ceiling, &all);

        let scoped = intersect_markings(&allowed, &available);

        let names: Vec<_> = scoped.iter().map(|m| m.definition.as_str()).collect();
        assert_eq!(names, vec!["TLP:GREEN", "TLP:CLEAR"]);
    }

    #[test]
    fn violations_list_ids_above_ceiling() {
        let all = tlp_catalog();
        let ceiling = SharingCeiling::Markings(vec![all[1].clone()]);
        let available = compute_available_markings(&ceiling, &all);

        let violations = ceiling_violations(&[all[0].id, all[3].id], &available);

        assert_eq!(violations, vec![all[3].id]);
    }
}
