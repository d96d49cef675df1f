//! Anonymous public dashboard endpoints.
//!
//! Every widget endpoint takes `?uriKey=&widgetId=&startDate=&endDate=` and
//! runs its query as the dashboard's scoped identity. No authentication:
//! knowing the uri key is the capability.

use axum::extract::{Path, Query, State};
use axum::Json;
use tokio_util::sync::{CancellationToken, DropGuard};
use vantage_core::query::{DistributionItem, ElementPage, NumberResult, TimeSeries};
use vantage_widgets::{DashboardDisplay, WidgetRequest};

use crate::error::AppResult;
use crate::query::WidgetQueryParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// Token cancelled when the handler future is dropped (client abort or
/// request timeout), so in-flight fan-out stops issuing sub-queries.
fn request_token() -> (CancellationToken, DropGuard) {
    let cancel = CancellationToken::new();
    let guard = cancel.clone().drop_guard();
    (cancel, guard)
}

/// GET /public/dashboards/{uri_key}
pub async fn get_display(
    State(state): State<AppState>,
    Path(uri_key): Path<String>,
) -> AppResult<Json<DataResponse<DashboardDisplay>>> {
    let display = state.widgets.display(&uri_key).await?;
    Ok(Json(DataResponse { data: display }))
}

/// GET /public/widgets/stix-core-objects/number
pub async fn stix_core_objects_number(
    State(state): State<AppState>,
    Query(params): Query<WidgetQueryParams>,
) -> AppResult<Json<DataResponse<NumberResult>>> {
    let (cancel, _guard) = request_token();
    let request = WidgetRequest::from(params);
    let data = state
        .widgets
        .stix_core_objects_number(&request, &cancel)
        .await?;
    Ok(Json(DataResponse { data }))
}

/// GET /public/widgets/stix-relationships/number
pub async fn stix_relationships_number(
    State(state): State<AppState>,
    Query(params): Query<WidgetQueryParams>,
) -> AppResult<Json<DataResponse<NumberResult>>> {
    let (cancel, _guard) = request_token();
    let request = WidgetRequest::from(params);
    let data = state
        .widgets
        .stix_relationships_number(&request, &cancel)
        .await?;
    Ok(Json(DataResponse { data }))
}

/// GET /public/widgets/stix-core-objects/distribution
pub async fn stix_core_objects_distribution(
    State(state): State<AppState>,
    Query(params): Query<WidgetQueryParams>,
) -> AppResult<Json<DataResponse<Vec<DistributionItem>>>> {
    let (cancel, _guard) = request_token();
    let request = WidgetRequest::from(params);
    let data = state
        .widgets
        .stix_core_objects_distribution(&request, &cancel)
        .await?;
    Ok(Json(DataResponse { data }))
}

/// GET /public/widgets/stix-relationships/distribution
pub async fn stix_relationships_distribution(
    State(state): State<AppState>,
    Query(params): Query<WidgetQueryParams>,
) -> AppResult<Json<DataResponse<Vec<DistributionItem>>>> {
    let (cancel, _guard) = request_token();
    let request = WidgetRequest::from(params);
    let data = state
        .widgets
        .stix_relationships_distribution(&request, &cancel)
        .await?;
    Ok(Json(DataResponse { data }))
}

/// GET /public/widgets/stix-core-objects/multi-time-series
pub async fn stix_core_objects_multi_time_series(
    State(state): State<AppState>,
    Query(params): Query<WidgetQueryParams>,
) -> AppResult<Json<DataResponse<Vec<TimeSeries>>>> {
    let (cancel, _guard) = request_token();
    let request = WidgetRequest::from(params);
    let data = state
        .widgets
        .stix_core_objects_multi_time_series(&request, &cancel)
        .await?;
    Ok(Json(DataResponse { data }))
}

/// GET /public/widgets/stix-relationships/multi-time-series
pub async fn stix_relationships_multi_time_series(
    State(state): State<AppState>,
    Query(params): Query<WidgetQueryParams>,
) -> AppResult<Json<DataResponse<Vec<TimeSeries>>>> {
    let (cancel, _guard) = request_token();
    let request = WidgetRequest::from(params);
    let data = state
        .widgets
        .stix_relationships_multi_time_series(&request, &cancel)
        .await?;
    Ok(Json(DataResponse { data }))
}

/// GET /public/widgets/stix-core-objects/list
pub async fn stix_core_objects(
    State(state): State<AppState>,
    Query(params): Query<WidgetQueryParams>,
) -> AppResult<Json<DataResponse<ElementPage>>> {
    let (cancel, _guard) = request_token();
    let request = WidgetRequest::from(params);
    let data = state.widgets.stix_core_objects(&request, &cancel).await?;
    Ok(Json(DataResponse { data }))
}

/// GET /public/widgets/stix-relationships/list
pub async fn stix_relationships(
    State(state): State<AppState>,
    Query(params): Query<WidgetQueryParams>,
) -> AppResult<Json<DataResponse<ElementPage>>> {
    let (cancel, _guard) = request_token();
    let request = WidgetRequest::from(params);
    let data = state.widgets.stix_relationships(&request, &cancel).await?;
    Ok(Json(DataResponse { data }))
}

/// GET /public/widgets/bookmarks
pub async fn bookmarks(
    State(state): State<AppState>,
    Query(params): Query<WidgetQueryParams>,
) -> AppResult<Json<DataResponse<ElementPage>>> {
    let (cancel, _guard) = request_token();
    let request = WidgetRequest::from(params);
    let data = state.widgets.bookmarks(&request, &cancel).await?;
    Ok(Json(DataResponse { data }))
}
