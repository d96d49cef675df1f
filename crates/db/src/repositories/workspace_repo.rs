//! Repository for the `workspaces` table (source dashboards).

use sqlx::PgPool;
use vantage_core::types::DbId;

use crate::models::workspace::{CreateWorkspace, Workspace};

const COLUMNS: &str = "id, name, description, manifest, owner_id, created_at, updated_at";

/// Provides CRUD operations for source dashboards.
pub struct WorkspaceRepo;

impl WorkspaceRepo {
    pub async fn create(pool: &PgPool, input: &CreateWorkspace) -> Result<Workspace, sqlx::Error> {
        let query = format!(
            "INSERT INTO workspaces (name, description, manifest, owner_id)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Workspace>(&query)
            .bind(&input.name)
            .bind(&input.description)
            .bind(&input.manifest)
            .bind(input.owner_id)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Workspace>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM workspaces WHERE id = $1");
        sqlx::query_as::<_, Workspace>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM workspaces WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
