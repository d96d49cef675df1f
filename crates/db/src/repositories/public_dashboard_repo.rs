//! Repository for the `public_dashboards` table.

use sqlx::types::Json;
use sqlx::PgPool;
use vantage_core::access::ALL_MEMBERS;
use vantage_core::types::DbId;

use crate::models::public_dashboard::{
    CreatePublicDashboard, PublicDashboard, PublicDashboardListQuery, UpdatePublicDashboard,
};

const COLUMNS: &str = "\
    id, uri_key, name, description, dashboard_id, private_manifest, \
    public_manifest, allowed_markings_ids, authorized_members, user_id, \
    created_at, updated_at";

/// Visibility predicate over `authorized_members`.
///
/// `$1` is the platform-admin bypass flag, `$2` the caller's user id as text.
const ACCESS_CLAUSE: &str = "\
    ($1 OR authorized_members @> jsonb_build_array(jsonb_build_object('id', $2::text)) \
     OR authorized_members @> jsonb_build_array(jsonb_build_object('id', $3::text)))";

/// Provides CRUD operations for public dashboards.
pub struct PublicDashboardRepo;

impl PublicDashboardRepo {
    /// Insert a prepared dashboard, returning the created row.
    ///
    /// A duplicate `uri_key` fails on `uq_public_dashboards_uri_key`.
    pub async fn create(
        pool: &PgPool,
        input: &CreatePublicDashboard,
    ) -> Result<PublicDashboard, sqlx::Error> {
        let query = format!(
            "INSERT INTO public_dashboards
                (uri_key, name, description, dashboard_id, private_manifest,
                 public_manifest, allowed_markings_ids, authorized_members, user_id)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, PublicDashboard>(&query)
            .bind(&input.uri_key)
            .bind(&input.name)
            .bind(&input.description)
            .bind(input.dashboard_id)
            .bind(&input.private_manifest)
            .bind(&input.public_manifest)
            .bind(&input.allowed_markings_ids)
            .bind(Json(&input.authorized_members))
            .bind(input.user_id)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<PublicDashboard>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM public_dashboards WHERE id = $1");
        sqlx::query_as::<_, PublicDashboard>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Exact match on the public key. No access filtering: this lookup is
    /// the entry point of anonymous reads.
    pub async fn find_by_uri_key(
        pool: &PgPool,
        uri_key: &str,
    ) -> Result<Option<PublicDashboard>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM public_dashboards WHERE uri_key = $1");
        sqlx::query_as::<_, PublicDashboard>(&query)
            .bind(uri_key)
            .fetch_optional(pool)
            .await
    }

    /// Dashboards the caller may view, newest first.
    pub async fn list_accessible(
        pool: &PgPool,
        user_id: DbId,
        is_admin: bool,
        params: &PublicDashboardListQuery,
    ) -> Result<Vec<PublicDashboard>, sqlx::Error> {
        let limit = params.limit.unwrap_or(50).clamp(1, 500);
        let offset = params.offset.unwrap_or(0).max(0);
        let query = format!(
            "SELECT {COLUMNS} FROM public_dashboards
             WHERE {ACCESS_CLAUSE}
               AND ($4::text IS NULL OR name ILIKE '%' || $4 || '%')
             ORDER BY created_at DESC, id DESC
             LIMIT $5 OFFSET $6"
        );
        sqlx::query_as::<_, PublicDashboard>(&query)
            .bind(is_admin)
            .bind(user_id.to_string())
            .bind(ALL_MEMBERS)
            .bind(&params.search)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Total for [`Self::list_accessible`] ignoring pagination.
    pub async fn count_accessible(
        pool: &PgPool,
        user_id: DbId,
        is_admin: bool,
        search: Option<&str>,
    ) -> Result<i64, sqlx::Error> {
        let query = format!(
            "SELECT COUNT(*)::BIGINT FROM public_dashboards
             WHERE {ACCESS_CLAUSE}
               AND ($4::text IS NULL OR name ILIKE '%' || $4 || '%')"
        );
        sqlx::query_scalar::<_, i64>(&query)
            .bind(is_admin)
            .bind(user_id.to_string())
            .bind(ALL_MEMBERS)
            .bind(search)
            .fetch_one(pool)
            .await
    }

    /// Apply name/uri_key changes. Returns `None` if no row with `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdatePublicDashboard,
    ) -> Result<Option<PublicDashboard>, sqlx::Error> {
        let query = format!(
            "UPDATE public_dashboards SET
                name = COALESCE($2, name),
                uri_key = COALESCE($3, uri_key)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, PublicDashboard>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.uri_key)
            .fetch_optional(pool)
            .await
    }

    /// Permanently delete. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM public_dashboards WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
