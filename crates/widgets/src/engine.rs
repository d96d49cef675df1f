//! Public widget operations.
//!
//! One method per widget family and perspective. Each call validates the
//! date window, resolves the widget through [`WidgetResolver`], translates
//! the data selection, runs the engine query under the shared
//! [`QueryBudget`] and re-checks the result against the scoped identity.

use std::future::Future;
use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use vantage_core::error::CoreError;
use vantage_core::manifest::Manifest;
use vantage_core::query::{DateWindow, DistributionItem, ElementPage, NumberResult, TimeSeries};

use crate::breakdown;
use crate::budget::QueryBudget;
use crate::collaborators::QueryEngine;
use crate::resolver::{ResolvedWidget, WidgetResolver};
use crate::scope::{retain_visible_buckets, retain_visible_page};
use crate::translate::{self, RelationshipBreakdown};

/// Arguments of every public widget query.
#[derive(Debug, Clone, PartialEq)]
pub struct WidgetRequest {
    pub uri_key: String,
    pub widget_id: String,
    pub window: DateWindow,
}

impl WidgetRequest {
    pub fn new(uri_key: impl Into<String>, widget_id: impl Into<String>) -> Self {
        Self {
            uri_key: uri_key.into(),
            widget_id: widget_id.into(),
            window: DateWindow::default(),
        }
    }

    pub fn with_window(mut self, window: DateWindow) -> Self {
        self.window = window;
        self
    }
}

/// What an anonymous client needs to lay a dashboard out.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardDisplay {
    pub uri_key: String,
    pub name: String,
    pub description: Option<String>,
    pub manifest: Manifest,
}

#[derive(Clone)]
pub struct WidgetEngine {
    resolver: Arc<WidgetResolver>,
    engine: Arc<dyn QueryEngine>,
    budget: QueryBudget,
}

impl WidgetEngine {
    pub fn new(resolver: Arc<WidgetResolver>, engine: Arc<dyn QueryEngine>, budget: QueryBudget) -> Self {
        Self {
            resolver,
            engine,
            budget,
        }
    }

    pub fn budget(&self) -> &QueryBudget {
        &self.budget
    }

    async fn prepare(&self, request: &WidgetRequest) -> Result<ResolvedWidget, CoreError> {
        request.window.validate()?;
        self.resolver.resolve(&request.uri_key, &request.widget_id).await
    }

    async fn run<T, F>(&self, cancel: &CancellationToken, query: F) -> Result<T, CoreError>
    where
        F: Future<Output = Result<T, CoreError>>,
    {
        self.budget.run(cancel, query).await.inspect_err(|e| {
            if let CoreError::Upstream(message) = e {
                tracing::error!(error = %message, "Query engine failed");
            }
        })
    }

    /// Layout-only view of a published dashboard.
    pub async fn display(&self, uri_key: &str) -> Result<DashboardDisplay, CoreError> {
        let (dashboard, manifest) = self.resolver.load(uri_key).await?;
        Ok(DashboardDisplay {
            uri_key: dashboard.uri_key,
            name: dashboard.name,
            description: dashboard.description,
            manifest: manifest.display_view(),
        })
    }

    // -----------------------------------------------------------------------
    // Number
    // -----------------------------------------------------------------------

    pub async fn stix_core_objects_number(
        &self,
        request: &WidgetRequest,
        cancel: &CancellationToken,
    ) -> Result<NumberResult, CoreError> {
        let resolved = self.prepare(request).await?;
        let query = translate::objects_number(resolved.main_selection()?, &request.window, Utc::now());
        self.run(cancel, self.engine.stix_core_objects_number(&resolved.identity, &query))
            .await
    }

    pub async fn stix_relationships_number(
        &self,
        request: &WidgetRequest,
        cancel: &CancellationToken,
    ) -> Result<NumberResult, CoreError> {
        let resolved = self.prepare(request).await?;
        let query =
            translate::relationships_number(resolved.main_selection()?, &request.window, Utc::now());
        self.run(cancel, self.engine.stix_relationships_number(&resolved.identity, &query))
            .await
    }

    // -----------------------------------------------------------------------
    // Distribution
    // -----------------------------------------------------------------------

    pub async fn stix_core_objects_distribution(
        &self,
        request: &WidgetRequest,
        cancel: &CancellationToken,
    ) -> Result<Vec<DistributionItem>, CoreError> {
        let resolved = self.prepare(request).await?;
        let identity = &resolved.identity;
        let query = translate::objects_distribution(resolved.main_selection()?, &request.window);

        let buckets = self
            .run(cancel, self.engine.stix_core_objects_distribution(identity, &query))
            .await?;
        let buckets = retain_visible_buckets(identity, buckets);

        let Some(selection) = resolved.breakdown_selection() else {
            return Ok(buckets);
        };
        let window = &request.window;

        breakdown::fan_out(buckets, self.budget.limit(), |bucket_id| async move {
            let query = translate::objects_breakdown(selection, window, &bucket_id);
            let sub = self
                .run(cancel, self.engine.stix_core_objects_distribution(identity, &query))
                .await?;
            Ok(retain_visible_buckets(identity, sub))
        })
        .await
    }

    pub async fn stix_relationships_distribution(
        &self,
        request: &WidgetRequest,
        cancel: &CancellationToken,
    ) -> Result<Vec<DistributionItem>, CoreError> {
        let resolved = self.prepare(request).await?;
        let identity = &resolved.identity;
        let query =
            translate::relationships_distribution(resolved.main_selection()?, &request.window);

        let buckets = self
            .run(cancel, self.engine.stix_relationships_distribution(identity, &query))
            .await?;
        let buckets = retain_visible_buckets(identity, buckets);

        let Some(selection) = resolved.breakdown_selection() else {
            return Ok(buckets);
        };
        let window = &request.window;

        breakdown::fan_out(buckets, self.budget.limit(), |bucket_id| async move {
            let sub = match translate::relationships_breakdown(selection, window, &bucket_id) {
                RelationshipBreakdown::ByEntity(query) => {
                    self.run(
                        cancel,
                        self.engine.stix_core_objects_distribution_by_entity(identity, &query),
                    )
                    .await?
                }
                RelationshipBreakdown::Relationships(query) => {
                    self.run(cancel, self.engine.stix_relationships_distribution(identity, &query))
                        .await?
                }
            };
            Ok(retain_visible_buckets(identity, sub))
        })
        .await
    }

    // -----------------------------------------------------------------------
    // Multi time series
    // -----------------------------------------------------------------------

    pub async fn stix_core_objects_multi_time_series(
        &self,
        request: &WidgetRequest,
        cancel: &CancellationToken,
    ) -> Result<Vec<TimeSeries>, CoreError> {
        let resolved = self.prepare(request).await?;
        let query = translate::objects_time_series(
            resolved.selections(),
            resolved.parameters(),
            &request.window,
        );
        self.run(
            cancel,
            self.engine.stix_core_objects_multi_time_series(&resolved.identity, &query),
        )
        .await
    }

    pub async fn stix_relationships_multi_time_series(
        &self,
        request: &WidgetRequest,
        cancel: &CancellationToken,
    ) -> Result<Vec<TimeSeries>, CoreError> {
        let resolved = self.prepare(request).await?;
        let query = translate::relationships_time_series(
            resolved.selections(),
            resolved.parameters(),
            &request.window,
        );
        self.run(
            cancel,
            self.engine.stix_relationships_multi_time_series(&resolved.identity, &query),
        )
        .await
    }

    // -----------------------------------------------------------------------
    // Lists
    // -----------------------------------------------------------------------

    pub async fn stix_core_objects(
        &self,
        request: &WidgetRequest,
        cancel: &CancellationToken,
    ) -> Result<ElementPage, CoreError> {
        let resolved = self.prepare(request).await?;
        let query = translate::objects_list(resolved.main_selection()?, &request.window);
        let page = self
            .run(cancel, self.engine.stix_core_objects(&resolved.identity, &query))
            .await?;
        Ok(retain_visible_page(&resolved.identity, page))
    }

    pub async fn stix_relationships(
        &self,
        request: &WidgetRequest,
        cancel: &CancellationToken,
    ) -> Result<ElementPage, CoreError> {
        let resolved = self.prepare(request).await?;
        let query = translate::relationships_list(resolved.main_selection()?, &request.window);
        let page = self
            .run(cancel, self.engine.stix_relationships(&resolved.identity, &query))
            .await?;
        Ok(retain_visible_page(&resolved.identity, page))
    }

    pub async fn bookmarks(
        &self,
        request: &WidgetRequest,
        cancel: &CancellationToken,
    ) -> Result<ElementPage, CoreError> {
        let resolved = self.prepare(request).await?;
        let query = translate::bookmarks(resolved.main_selection()?);
        let page = self
            .run(cancel, self.engine.bookmarks(&resolved.identity, &query))
            .await?;
        Ok(retain_visible_page(&resolved.identity, page))
    }
}
