//! Data selection to engine parameter translation.
//!
//! Pure functions, one per widget family and perspective. The caller's date
//! window is passed as separate bounds next to the stored filter tree, so
//! the engine applies both; the window never replaces stored filters.
//! Relationship pivot flags (`dynamicFrom`, `dynamicTo`, `isTo`) are
//! forwarded untouched.

use vantage_core::filters::{Filter, FilterGroup};
use vantage_core::manifest::{DataSelection, Perspective, WidgetParameters};
use vantage_core::query::{
    clamp_limit, number_end_date, BookmarkQuery, CountQuery, DateWindow, DistributionQuery,
    Interval, ListQuery, Operation, OrderMode, SeriesSpec, TimeSeriesQuery,
    DEFAULT_DATE_ATTRIBUTE, DEFAULT_DISTRIBUTION_LIMIT, DEFAULT_OBJECTS_LIST_SIZE,
    DEFAULT_RELATIONSHIPS_LIST_SIZE, DEFAULT_RELATIONSHIP_FIELD, MAX_DISTRIBUTION_LIMIT,
    MAX_LIST_SIZE,
};
use vantage_core::stix::ABSTRACT_STIX_CORE_OBJECT;
use vantage_core::types::Timestamp;

/// Key pinned onto relationship breakdowns.
const FROM_ID_KEY: &str = "fromId";

fn core_object_types() -> Vec<String> {
    vec![ABSTRACT_STIX_CORE_OBJECT.to_string()]
}

fn distribution_limit(selection: &DataSelection) -> u32 {
    clamp_limit(selection.number, DEFAULT_DISTRIBUTION_LIMIT, MAX_DISTRIBUTION_LIMIT)
}

// ---------------------------------------------------------------------------
// Number
// ---------------------------------------------------------------------------

/// Count of core objects up to one day before `now`.
pub fn objects_number(selection: &DataSelection, window: &DateWindow, now: Timestamp) -> CountQuery {
    CountQuery {
        types: core_object_types(),
        filters: selection.filters.clone(),
        date_attribute: selection.date_attribute.clone(),
        start_date: window.start_date,
        end_date: Some(number_end_date(now)),
        ..Default::default()
    }
}

/// Count of relationships up to one day before `now`.
pub fn relationships_number(
    selection: &DataSelection,
    window: &DateWindow,
    now: Timestamp,
) -> CountQuery {
    CountQuery {
        types: Vec::new(),
        filters: selection.filters.clone(),
        date_attribute: selection.date_attribute.clone(),
        start_date: window.start_date,
        end_date: Some(number_end_date(now)),
        is_to: selection.is_to,
        dynamic_from: selection.dynamic_from.clone(),
        dynamic_to: selection.dynamic_to.clone(),
    }
}

// ---------------------------------------------------------------------------
// Distribution
// ---------------------------------------------------------------------------

pub fn objects_distribution(selection: &DataSelection, window: &DateWindow) -> DistributionQuery {
    DistributionQuery {
        operation: Operation::Count,
        field: selection.attribute.clone().unwrap_or_default(),
        types: core_object_types(),
        to_types: selection.to_types.clone(),
        filters: selection.filters.clone(),
        date_attribute: Some(
            selection
                .date_attribute
                .clone()
                .unwrap_or_else(|| DEFAULT_DATE_ATTRIBUTE.to_string()),
        ),
        start_date: window.start_date,
        end_date: window.end_date,
        limit: distribution_limit(selection),
        ..Default::default()
    }
}

pub fn relationships_distribution(
    selection: &DataSelection,
    window: &DateWindow,
) -> DistributionQuery {
    DistributionQuery {
        operation: Operation::Count,
        field: selection
            .attribute
            .clone()
            .unwrap_or_else(|| DEFAULT_RELATIONSHIP_FIELD.to_string()),
        filters: selection.filters.clone(),
        date_attribute: selection.date_attribute.clone(),
        start_date: window.start_date,
        end_date: window.end_date,
        limit: distribution_limit(selection),
        is_to: selection.is_to,
        dynamic_from: selection.dynamic_from.clone(),
        dynamic_to: selection.dynamic_to.clone(),
        ..Default::default()
    }
}

/// Second-level object distribution for the bucket element `bucket_id`.
///
/// The breakdown filters are ANDed with a `fromId` pin on the bucket.
pub fn objects_breakdown(
    breakdown: &DataSelection,
    window: &DateWindow,
    bucket_id: &str,
) -> DistributionQuery {
    DistributionQuery {
        filters: Some(FilterGroup::and_with(
            breakdown.filters.as_ref(),
            vec![Filter::eq(FROM_ID_KEY, bucket_id)],
        )),
        ..objects_distribution(breakdown, window)
    }
}

/// Engine primitive a relationship breakdown runs on.
#[derive(Debug, Clone, PartialEq)]
pub enum RelationshipBreakdown {
    /// Objects related to the bucket element (breakdown perspective
    /// `entities`). No pin filter.
    ByEntity(DistributionQuery),
    /// Relationships touching the bucket element, pinned on `fromId`.
    Relationships(DistributionQuery),
}

/// Second-level relationship distribution for the bucket element `bucket_id`.
pub fn relationships_breakdown(
    breakdown: &DataSelection,
    window: &DateWindow,
    bucket_id: &str,
) -> RelationshipBreakdown {
    let base = relationships_distribution(breakdown, window);

    if breakdown.perspective == Some(Perspective::Entities) {
        RelationshipBreakdown::ByEntity(DistributionQuery {
            types: core_object_types(),
            filters: Some(FilterGroup::and_with(breakdown.filters.as_ref(), Vec::new())),
            object_id: Some(bucket_id.to_string()),
            is_to: None,
            ..base
        })
    } else {
        RelationshipBreakdown::Relationships(DistributionQuery {
            filters: Some(FilterGroup::and_with(
                breakdown.filters.as_ref(),
                vec![Filter::eq(FROM_ID_KEY, bucket_id)],
            )),
            from_or_to_id: Some(bucket_id.to_string()),
            ..base
        })
    }
}

// ---------------------------------------------------------------------------
// Multi time series
// ---------------------------------------------------------------------------

fn series(selection: &DataSelection) -> SeriesSpec {
    SeriesSpec {
        field: selection.date_attribute.clone(),
        filters: FilterGroup::and_with(selection.filters.as_ref(), Vec::new()),
        is_to: None,
        dynamic_from: None,
        dynamic_to: None,
    }
}

fn relationship_series(selection: &DataSelection) -> SeriesSpec {
    SeriesSpec {
        is_to: selection.is_to,
        dynamic_from: selection.dynamic_from.clone(),
        dynamic_to: selection.dynamic_to.clone(),
        ..series(selection)
    }
}

/// One series per selection; interval defaults to `day`.
pub fn objects_time_series(
    selections: &[DataSelection],
    parameters: &WidgetParameters,
    window: &DateWindow,
) -> TimeSeriesQuery {
    TimeSeriesQuery {
        operation: Operation::Count,
        start_date: window.start_date,
        end_date: window.end_date,
        interval: parameters.interval.unwrap_or(Interval::Day),
        time_series_parameters: selections.iter().map(series).collect(),
    }
}

/// One series per selection; interval defaults to `month`.
pub fn relationships_time_series(
    selections: &[DataSelection],
    parameters: &WidgetParameters,
    window: &DateWindow,
) -> TimeSeriesQuery {
    TimeSeriesQuery {
        operation: Operation::Count,
        start_date: window.start_date,
        end_date: window.end_date,
        interval: parameters.interval.unwrap_or(Interval::Month),
        time_series_parameters: selections.iter().map(relationship_series).collect(),
    }
}

// ---------------------------------------------------------------------------
// Lists
// ---------------------------------------------------------------------------

/// Newest-first page of core objects.
pub fn objects_list(selection: &DataSelection, window: &DateWindow) -> ListQuery {
    ListQuery {
        types: core_object_types(),
        filters: selection.filters.clone(),
        start_date: window.start_date,
        end_date: window.end_date,
        order_by: selection.date_attribute.clone(),
        order_mode: OrderMode::Desc,
        first: clamp_limit(selection.number, DEFAULT_OBJECTS_LIST_SIZE, MAX_LIST_SIZE),
        ..Default::default()
    }
}

/// Newest-first page of relationships.
pub fn relationships_list(selection: &DataSelection, window: &DateWindow) -> ListQuery {
    ListQuery {
        types: Vec::new(),
        filters: selection.filters.clone(),
        start_date: window.start_date,
        end_date: window.end_date,
        is_to: selection.is_to,
        dynamic_from: selection.dynamic_from.clone(),
        dynamic_to: selection.dynamic_to.clone(),
        order_by: selection.date_attribute.clone(),
        order_mode: OrderMode::Desc,
        first: clamp_limit(selection.number, DEFAULT_RELATIONSHIPS_LIST_SIZE, MAX_LIST_SIZE),
    }
}

// ---------------------------------------------------------------------------
// Bookmarks
// ---------------------------------------------------------------------------

/// Bookmarks take the stored filters only; no date bounds apply.
pub fn bookmarks(selection: &DataSelection) -> BookmarkQuery {
    BookmarkQuery {
        filters: selection.filters.clone(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
