//! Query string types for the public widget endpoints.

use serde::Deserialize;
use vantage_core::query::DateWindow;
use vantage_core::types::Timestamp;
use vantage_widgets::WidgetRequest;

/// Arguments shared by every public widget endpoint
/// (`?uriKey=&widgetId=&startDate=&endDate=`).
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WidgetQueryParams {
    pub uri_key: String,
    pub widget_id: String,
    pub start_date: Option<Timestamp>,
    pub end_date: Option<Timestamp>,
}

impl From<WidgetQueryParams> for WidgetRequest {
    fn from(params: WidgetQueryParams) -> Self {
        WidgetRequest::new(params.uri_key, params.widget_id)
            .with_window(DateWindow::new(params.start_date, params.end_date))
    }
}
