use axum::routing::get;
use axum::Router;

use crate::handlers::public_widgets;
use crate::state::AppState;

/// Anonymous dashboard layout.
///
/// ```text
/// GET /{uri_key}      display manifest
/// ```
pub fn dashboards_router() -> Router<AppState> {
    Router::new().route("/{uri_key}", get(public_widgets::get_display))
}

/// Anonymous widget queries, all taking `?uriKey&widgetId&startDate&endDate`.
///
/// ```text
/// GET /stix-core-objects/number
/// GET /stix-core-objects/distribution
/// GET /stix-core-objects/multi-time-series
/// GET /stix-core-objects/list
/// GET /stix-relationships/number
/// GET /stix-relationships/distribution
/// GET /stix-relationships/multi-time-series
/// GET /stix-relationships/list
/// GET /bookmarks
/// ```
pub fn widgets_router() -> Router<AppState> {
    Router::new()
        .route(
            "/stix-core-objects/number",
            get(public_widgets::stix_core_objects_number),
        )
        .route(
            "/stix-core-objects/distribution",
            get(public_widgets::stix_core_objects_distribution),
        )
        .route(
            "/stix-core-objects/multi-time-series",
            get(public_widgets::stix_core_objects_multi_time_series),
        )
        .route(
            "/stix-core-objects/list",
            get(public_widgets::stix_core_objects),
        )
        .route(
            "/stix-relationships/number",
            get(public_widgets::stix_relationships_number),
        )
        .route(
            "/stix-relationships/distribution",
            get(public_widgets::stix_relationships_distribution),
        )
        .route(
            "/stix-relationships/multi-time-series",
            get(public_widgets::stix_relationships_multi_time_series),
        )
        .route(
            "/stix-relationships/list",
            get(public_widgets::stix_relationships),
        )
        .route("/bookmarks", get(public_widgets::bookmarks))
}
