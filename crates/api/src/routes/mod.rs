pub mod health;
pub mod public_dashboard;
pub mod public_widgets;

use axum::Router;

use crate::state::AppState;

/// Anonymous, read-only routes keyed by `uri_key`.
///
/// ```text
/// /public/dashboards/{uri_key}                         display manifest
/// /public/widgets/stix-core-objects/number             widget queries
/// /public/widgets/stix-core-objects/distribution
/// /public/widgets/stix-core-objects/multi-time-series
/// /public/widgets/stix-core-objects/list
/// /public/widgets/stix-relationships/number
/// /public/widgets/stix-relationships/distribution
/// /public/widgets/stix-relationships/multi-time-series
/// /public/widgets/stix-relationships/list
/// /public/widgets/bookmarks
/// ```
pub fn public_routes() -> Router<AppState> {
    Router::new()
        .nest("/public/dashboards", public_widgets::dashboards_router())
        .nest("/public/widgets", public_widgets::widgets_router())
}

/// Authenticated public-dashboard lifecycle.
///
/// ```text
/// /public-dashboards                                   list, publish
/// /public-dashboards/by-uri-key/{uri_key}              read by key
/// /public-dashboards/{id}                              read, edit, delete
/// ```
pub fn lifecycle_routes() -> Router<AppState> {
    Router::new().nest("/public-dashboards", public_dashboard::router())
}
