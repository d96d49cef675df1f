//! Parameter and result shapes of the generic query engine.
//!
//! Widget translators build these values from a data selection plus the
//! caller's date window; the engine adapter serializes them verbatim
//! (camelCase) to the backing search service.

use std::fmt;
use std::str::FromStr;

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::filters::FilterGroup;
use crate::types::{EntityId, Timestamp};

// ---------------------------------------------------------------------------
// Limits
// ---------------------------------------------------------------------------

/// Bucket count used when a distribution selection sets no `number`.
pub const DEFAULT_DISTRIBUTION_LIMIT: u32 = 10;

/// Upper bound for distribution bucket counts.
pub const MAX_DISTRIBUTION_LIMIT: u32 = 100;

/// Page size of object lists when the selection sets no `number`.
pub const DEFAULT_OBJECTS_LIST_SIZE: u32 = 10;

/// Page size of relationship lists.
pub const DEFAULT_RELATIONSHIPS_LIST_SIZE: u32 = 50;

/// Upper bound for list page sizes.
pub const MAX_LIST_SIZE: u32 = 500;

/// Date attribute used by object distributions when none is configured.
pub const DEFAULT_DATE_ATTRIBUTE: &str = "created_at";

/// Grouping field of relationship distributions when none is configured.
pub const DEFAULT_RELATIONSHIP_FIELD: &str = "entity_type";

/// Clamp a requested limit into `1..=max`, falling back to `default`.
pub fn clamp_limit(requested: Option<u32>, default: u32, max: u32) -> u32 {
    requested.unwrap_or(default).clamp(1, max)
}

/// Fixed upper bound of number widgets: one day before `now`.
///
/// Counting up to yesterday keeps figures stable while the most recent
/// data is still being indexed.
pub fn number_end_date(now: Timestamp) -> Timestamp {
    now - Duration::days(1)
}

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Bucket width of a time series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Interval {
    Minute,
    Hour,
    Day,
    Week,
    Month,
    Quarter,
    Year,
}

impl Interval {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Minute => "minute",
            Self::Hour => "hour",
            Self::Day => "day",
            Self::Week => "week",
            Self::Month => "month",
            Self::Quarter => "quarter",
            Self::Year => "year",
        }
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Interval {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "minute" => Ok(Self::Minute),
            "hour" => Ok(Self::Hour),
            "day" => Ok(Self::Day),
            "week" => Ok(Self::Week),
            "month" => Ok(Self::Month),
            "quarter" => Ok(Self::Quarter),
            "year" => Ok(Self::Year),
            other => Err(CoreError::Validation(format!("Unknown interval '{other}'"))),
        }
    }
}

/// Aggregation applied by distributions and time series.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    #[default]
    Count,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderMode {
    Asc,
    #[default]
    Desc,
}

// ---------------------------------------------------------------------------
// Date window
// ---------------------------------------------------------------------------

/// Optional date bounds supplied by an anonymous caller.
///
/// The bounds only narrow a query; they are combined with the stored
/// selection filters and never replace them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateWindow {
    pub start_date: Option<Timestamp>,
    pub end_date: Option<Timestamp>,
}

impl DateWindow {
    pub fn new(start_date: Option<Timestamp>, end_date: Option<Timestamp>) -> Self {
        Self { start_date, end_date }
    }

    /// Reject inverted windows before any query is issued.
    pub fn validate(&self) -> Result<(), CoreError> {
        if let (Some(start), Some(end)) = (self.start_date, self.end_date) {
            if start > end {
                return Err(CoreError::Validation(format!(
                    "startDate {start} is after endDate {end}"
                )));
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Engine parameters
// ---------------------------------------------------------------------------

/// Count of matching elements, overall and inside the date window.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CountQuery {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub types: Vec<String>,
    pub filters: Option<FilterGroup>,
    pub date_attribute: Option<String>,
    pub start_date: Option<Timestamp>,
    pub end_date: Option<Timestamp>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_to: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dynamic_from: Option<FilterGroup>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dynamic_to: Option<FilterGroup>,
}

/// Grouped count over one field.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DistributionQuery {
    pub operation: Operation,
    pub field: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub types: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to_types: Option<Vec<String>>,
    pub filters: Option<FilterGroup>,
    pub date_attribute: Option<String>,
    pub start_date: Option<Timestamp>,
    pub end_date: Option<Timestamp>,
    pub limit: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_to: Option<bool>,
    /// Restricts relationship distributions to edges touching this element.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_or_to_id: Option<String>,
    /// Pivot element of entity distributions.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub object_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dynamic_from: Option<FilterGroup>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dynamic_to: Option<FilterGroup>,
}

/// One series of a multi time series query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesSpec {
    /// Date attribute the series is bucketed on.
    pub field: Option<String>,
    pub filters: FilterGroup,
    #[serde(rename = "isTo", skip_serializing_if = "Option::is_none")]
    pub is_to: Option<bool>,
    #[serde(rename = "dynamicFrom", skip_serializing_if = "Option::is_none")]
    pub dynamic_from: Option<FilterGroup>,
    #[serde(rename = "dynamicTo", skip_serializing_if = "Option::is_none")]
    pub dynamic_to: Option<FilterGroup>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSeriesQuery {
    pub operation: Operation,
    pub start_date: Option<Timestamp>,
    pub end_date: Option<Timestamp>,
    pub interval: Interval,
    pub time_series_parameters: Vec<SeriesSpec>,
}

/// Bounded, sorted fetch of elements.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub types: Vec<String>,
    pub filters: Option<FilterGroup>,
    pub start_date: Option<Timestamp>,
    pub end_date: Option<Timestamp>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_to: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dynamic_from: Option<FilterGroup>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dynamic_to: Option<FilterGroup>,
    pub order_by: Option<String>,
    pub order_mode: OrderMode,
    pub first: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BookmarkQuery {
    pub filters: Option<FilterGroup>,
}

// ---------------------------------------------------------------------------
// Results
// ---------------------------------------------------------------------------

/// Result of a number widget.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NumberResult {
    /// Matching elements regardless of the date window.
    pub total: i64,
    /// Matching elements inside the date window.
    pub count: i64,
}

/// A knowledge element as returned by the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeElement {
    pub id: String,
    pub entity_type: String,
    #[serde(rename = "objectMarking", default)]
    pub object_marking: Vec<EntityId>,
    #[serde(flatten)]
    pub attributes: serde_json::Map<String, serde_json::Value>,
}

/// One bucket of a distribution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistributionItem {
    pub label: String,
    pub value: i64,
    /// Resolved element when the grouping field references one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity: Option<KnowledgeElement>,
    #[serde(
        rename = "breakdownDistribution",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub breakdown_distribution: Option<Vec<DistributionItem>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSeriesPoint {
    pub date: Timestamp,
    pub value: i64,
}

/// One series per data selection, in selection order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSeries {
    pub data: Vec<TimeSeriesPoint>,
}

/// A page of elements.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementPage {
    pub items: Vec<KnowledgeElement>,
    pub global_count: i64,
    pub has_next_page: bool,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
