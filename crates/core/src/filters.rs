//! Closed filter-tree model used by widget data selections.
//!
//! Filter trees arrive inside persisted manifests, so they are untrusted.
//! They are decoded into [`FilterGroup`] / [`FilterNode`] and validated at
//! decode time: unknown filter keys, non-scalar values, oversized value lists
//! and excessive nesting are all rejected before any query is built.
//!
//! The wire format is the platform's `{ mode, filters, filterGroups }` shape,
//! which is also what the query engine consumes.

use serde::{Deserialize, Serialize};

/// Maximum nesting depth of filter groups (the root group is depth 1).
pub const MAX_FILTER_DEPTH: usize = 8;

/// Maximum number of values carried by a single predicate.
pub const MAX_FILTER_VALUES: usize = 100;

/// Filter keys a public widget may reference.
pub const ALLOWED_FILTER_KEYS: &[&str] = &[
    "entity_type",
    "relationship_type",
    "fromId",
    "toId",
    "fromTypes",
    "toTypes",
    "elementId",
    "elementWithTargetTypes",
    "objectMarking",
    "objectLabel",
    "createdBy",
    "creator_id",
    "objectAssignee",
    "objects",
    "name",
    "created",
    "created_at",
    "updated_at",
    "modified",
    "published",
    "first_seen",
    "last_seen",
    "start_time",
    "stop_time",
    "valid_from",
    "valid_until",
    "confidence",
    "x_opencti_score",
    "x_opencti_main_observable_type",
    "x_opencti_workflow_id",
    "pattern_type",
    "indicator_types",
    "malware_types",
    "report_types",
    "incident_type",
    "severity",
    "priority",
    "revoked",
    "is_family",
    "killChainPhases",
    "source_reliability",
];

/// Check whether a filter key is on the allow-list.
pub fn is_allowed_filter_key(key: &str) -> bool {
    ALLOWED_FILTER_KEYS.contains(&key)
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Reasons a filter tree is rejected at decode time.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FilterError {
    #[error("Filter key must not be empty")]
    EmptyKey,

    #[error("Unsupported filter key: {0}")]
    UnknownKey(String),

    #[error("Filter on {key} carries more than {max} values", max = MAX_FILTER_VALUES)]
    TooManyValues { key: String },

    #[error("Filter on {key} carries a non-scalar value")]
    NonScalarValue { key: String },

    #[error("Filter groups nested deeper than {max} levels", max = MAX_FILTER_DEPTH)]
    TooDeep,
}

// ---------------------------------------------------------------------------
// Modes and operators
// ---------------------------------------------------------------------------

/// Boolean combinator of a group, or of the values inside one predicate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterMode {
    #[default]
    And,
    Or,
}

/// Comparison applied by a predicate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterOperator {
    #[default]
    Eq,
    NotEq,
    Lt,
    Lte,
    Gt,
    Gte,
    Nil,
    NotNil,
    Contains,
    NotContains,
    StartsWith,
    NotStartsWith,
    EndsWith,
    NotEndsWith,
    Search,
    Within,
}

// ---------------------------------------------------------------------------
// Predicate
// ---------------------------------------------------------------------------

/// A leaf predicate: `key <operator> values`, values combined with `mode`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawFilter")]
pub struct Filter {
    pub key: Vec<String>,
    pub values: Vec<String>,
    pub operator: FilterOperator,
    pub mode: FilterMode,
}

impl Filter {
    /// Equality predicate on a single key and value.
    pub fn eq(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: vec![key.into()],
            values: vec![value.into()],
            operator: FilterOperator::Eq,
            mode: FilterMode::Or,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawKey {
    One(String),
    Many(Vec<String>),
}

#[derive(Deserialize)]
struct RawFilter {
    key: RawKey,
    #[serde(default)]
    values: Vec<serde_json::Value>,
    #[serde(default)]
    operator: FilterOperator,
    #[serde(default)]
    mode: FilterMode,
}

impl TryFrom<RawFilter> for Filter {
    type Error = FilterError;

    fn try_from(raw: RawFilter) -> Result<Self, Self::Error> {
        let key = match raw.key {
            RawKey::One(k) => vec![k],
            RawKey::Many(keys) => keys,
        };
        if key.is_empty() || key.iter().any(|k| k.is_empty()) {
            return Err(FilterError::EmptyKey);
        }
        if let Some(unknown) = key.iter().find(|k| !is_allowed_filter_key(k)) {
            return Err(FilterError::UnknownKey(unknown.clone()));
        }

        let key_label = key.join(",");
        if raw.values.len() > MAX_FILTER_VALUES {
            return Err(FilterError::TooManyValues { key: key_label });
        }

        let mut values = Vec::with_capacity(raw.values.len());
        for value in raw.values {
            match value {
                serde_json::Value::String(s) => values.push(s),
                serde_json::Value::Number(n) => values.push(n.to_string()),
                serde_json::Value::Bool(b) => values.push(b.to_string()),
                _ => return Err(FilterError::NonScalarValue { key: key_label }),
            }
        }

        Ok(Self {
            key,
            values,
            operator: raw.operator,
            mode: raw.mode,
        })
    }
}

// ---------------------------------------------------------------------------
// Tree
// ---------------------------------------------------------------------------

/// One child of a [`FilterGroup`]: a leaf predicate or a nested group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterNode {
    Predicate(Filter),
    Group(FilterGroup),
}

/// A boolean group of predicates and nested groups.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawFilterGroup", into = "RawFilterGroup")]
pub struct FilterGroup {
    pub mode: FilterMode,
    pub nodes: Vec<FilterNode>,
}

impl FilterGroup {
    /// An AND group over the given children.
    pub fn and(nodes: Vec<FilterNode>) -> Self {
        Self {
            mode: FilterMode::And,
            nodes,
        }
    }

    /// AND of an optional existing tree with extra predicates.
    ///
    /// Used to pin derived constraints (e.g. `fromId`) onto a stored selection
    /// without altering the stored tree itself.
    pub fn and_with(base: Option<&FilterGroup>, extra: Vec<Filter>) -> Self {
        let mut nodes: Vec<FilterNode> = extra.into_iter().map(FilterNode::Predicate).collect();
        if let Some(base) = base {
            nodes.push(FilterNode::Group(base.clone()));
        }
        Self::and(nodes)
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Depth of the tree; a flat group has depth 1.
    pub fn depth(&self) -> usize {
        1 + self
            .nodes
            .iter()
            .filter_map(|n| match n {
                FilterNode::Group(g) => Some(g.depth()),
                FilterNode::Predicate(_) => None,
            })
            .max()
            .unwrap_or(0)
    }

    /// All predicates of the tree, depth first.
    pub fn predicates(&self) -> Vec<&Filter> {
        let mut out = Vec::new();
        for node in &self.nodes {
            match node {
                FilterNode::Predicate(f) => out.push(f),
                FilterNode::Group(g) => out.extend(g.predicates()),
            }
        }
        out
    }
}

#[derive(Serialize, Deserialize)]
struct RawFilterGroup {
    #[serde(default)]
    mode: FilterMode,
    #[serde(default)]
    filters: Vec<Filter>,
    #[serde(default, rename = "filterGroups")]
    filter_groups: Vec<RawFilterGroup>,
}

fn build_group(raw: RawFilterGroup, depth: usize) -> Result<FilterGroup, FilterError> {
    if depth > MAX_FILTER_DEPTH {
        return Err(FilterError::TooDeep);
    }
    let mut nodes: Vec<FilterNode> = raw.filters.into_iter().map(FilterNode::Predicate).collect();
    for child in raw.filter_groups {
        nodes.push(FilterNode::Group(build_group(child, depth + 1)?));
    }
    Ok(FilterGroup {
        mode: raw.mode,
        nodes,
    })
}

impl TryFrom<RawFilterGroup> for FilterGroup {
    type Error = FilterError;

    fn try_from(raw: RawFilterGroup) -> Result<Self, Self::Error> {
        build_group(raw, 1)
    }
}

impl From<FilterGroup> for RawFilterGroup {
    fn from(group: FilterGroup) -> Self {
        let mut filters = Vec::new();
        let mut filter_groups = Vec::new();
        for node in group.nodes {
            match node {
                FilterNode::Predicate(f) => filters.push(f),
                FilterNode::Group(g) => filter_groups.push(g.into()),
            }
        }
        Self {
            mode: group.mode,
            filters,
            filter_groups,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
