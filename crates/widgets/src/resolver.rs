//! Widget argument resolution: the single entry point that turns a public
//! key and widget id into a scoped identity plus the widget's stored
//! configuration.

use std::sync::Arc;

use vantage_core::error::CoreError;
use vantage_core::identity::ScopedIdentity;
use vantage_core::manifest::{DataSelection, Manifest, Widget, WidgetParameters};

use crate::collaborators::{DashboardLookup, MarkingCatalog, PublishedDashboard, SharingPolicy};

/// Entity names used in `NotFound` errors.
const DASHBOARD_ENTITY: &str = "Public dashboard";
const WIDGET_ENTITY: &str = "Widget";

/// A widget ready to be translated into queries.
#[derive(Debug, Clone)]
pub struct ResolvedWidget {
    pub identity: ScopedIdentity,
    pub widget: Widget,
}

impl ResolvedWidget {
    pub fn parameters(&self) -> &WidgetParameters {
        &self.widget.parameters
    }

    pub fn selections(&self) -> &[DataSelection] {
        &self.widget.data_selection
    }

    /// Selection at index 0.
    pub fn main_selection(&self) -> Result<&DataSelection, CoreError> {
        self.widget.data_selection.first().ok_or_else(|| {
            CoreError::Validation(format!("Widget {} has no data selection", self.widget.id))
        })
    }

    /// Selection at index 1, when the widget has a breakdown.
    pub fn breakdown_selection(&self) -> Option<&DataSelection> {
        self.widget.data_selection.get(1)
    }
}

/// Loads dashboards and builds scoped identities.
///
/// Holds no marking state of its own: the catalog and the ceiling are
/// fetched on every call.
pub struct WidgetResolver {
    dashboards: Arc<dyn DashboardLookup>,
    markings: Arc<dyn MarkingCatalog>,
    policy: Arc<dyn SharingPolicy>,
}

impl WidgetResolver {
    pub fn new(
        dashboards: Arc<dyn DashboardLookup>,
        markings: Arc<dyn MarkingCatalog>,
        policy: Arc<dyn SharingPolicy>,
    ) -> Self {
        Self {
            dashboards,
            markings,
            policy,
        }
    }

    /// Load a dashboard by public key and decode its manifest.
    pub async fn load(&self, uri_key: &str) -> Result<(PublishedDashboard, Manifest), CoreError> {
        let dashboard = self
            .dashboards
            .find_by_uri_key(uri_key)
            .await?
            .ok_or_else(|| CoreError::not_found(DASHBOARD_ENTITY, uri_key))?;

        let manifest = Manifest::decode(&dashboard.public_manifest).map_err(|e| {
            tracing::error!(
                dashboard_id = dashboard.id,
                error = %e,
                "Stored public manifest failed to decode"
            );
            CoreError::CorruptManifest(e.to_string())
        })?;

        Ok((dashboard, manifest))
    }

    /// Resolve `(identity, widget)` for one public widget query.
    pub async fn resolve(&self, uri_key: &str, widget_id: &str) -> Result<ResolvedWidget, CoreError> {
        let (dashboard, manifest) = self.load(uri_key).await?;

        let widget = manifest
            .widget(widget_id)
            .cloned()
            .ok_or_else(|| CoreError::not_found(WIDGET_ENTITY, widget_id))?;

        let (catalog, ceiling) =
            tokio::try_join!(self.markings.get_all(), self.policy.max_markings())?;

        let identity = ScopedIdentity::build(
            dashboard.id,
            dashboard.uri_key.as_str(),
            &dashboard.allowed_markings_ids,
            &catalog,
            &ceiling,
        );

        tracing::debug!(
            dashboard_id = dashboard.id,
            widget_id,
            widget_type = %widget.widget_type,
            markings = identity.allowed_markings().len(),
            "Resolved public widget"
        );

        Ok(ResolvedWidget { identity, widget })
    }
}
