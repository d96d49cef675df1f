//! Public dashboard entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use vantage_core::access::AuthorizedMember;
use vantage_core::types::{DbId, EntityId, Timestamp};

/// A row from the `public_dashboards` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PublicDashboard {
    pub id: DbId,
    pub uri_key: String,
    pub name: String,
    pub description: Option<String>,
    /// Source workspace; `None` once the source has been deleted.
    pub dashboard_id: Option<DbId>,
    pub private_manifest: String,
    pub public_manifest: String,
    pub allowed_markings_ids: Vec<EntityId>,
    pub authorized_members: Json<Vec<AuthorizedMember>>,
    /// Publishing user. Audit only.
    pub user_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Fully prepared insert. Built by the publish handler after validation.
#[derive(Debug, Clone)]
pub struct CreatePublicDashboard {
    pub uri_key: String,
    pub name: String,
    pub description: Option<String>,
    pub dashboard_id: DbId,
    pub private_manifest: String,
    pub public_manifest: String,
    pub allowed_markings_ids: Vec<EntityId>,
    pub authorized_members: Vec<AuthorizedMember>,
    pub user_id: DbId,
}

/// The only mutable fields. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default)]
pub struct UpdatePublicDashboard {
    pub name: Option<String>,
    pub uri_key: Option<String>,
}

/// Listing parameters.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PublicDashboardListQuery {
    pub search: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
