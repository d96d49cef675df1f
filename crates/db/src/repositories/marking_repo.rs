//! Repository for the `marking_definitions` table.

use sqlx::PgPool;
use vantage_core::types::EntityId;

use crate::models::marking::{CreateMarkingDefinition, MarkingDefinitionRow};

const COLUMNS: &str =
    "id, standard_id, definition_type, definition, marking_order, created_at, updated_at";

/// Provides read and insert operations for the marking catalog.
pub struct MarkingDefinitionRepo;

impl MarkingDefinitionRepo {
    pub async fn create(
        pool: &PgPool,
        input: &CreateMarkingDefinition,
    ) -> Result<MarkingDefinitionRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO marking_definitions (standard_id, definition_type, definition, marking_order)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, MarkingDefinitionRow>(&query)
            .bind(input.standard_id)
            .bind(&input.definition_type)
            .bind(&input.definition)
            .bind(input.marking_order)
            .fetch_one(pool)
            .await
    }

    /// The whole catalog, grouped by type and ordered by rank.
    pub async fn list_all(pool: &PgPool) -> Result<Vec<MarkingDefinitionRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM marking_definitions ORDER BY definition_type, marking_order"
        );
        sqlx::query_as::<_, MarkingDefinitionRow>(&query)
            .fetch_all(pool)
            .await
    }

    /// Markings whose `standard_id` is in `ids`. Unknown ids are skipped.
    pub async fn find_by_standard_ids(
        pool: &PgPool,
        ids: &[EntityId],
    ) -> Result<Vec<MarkingDefinitionRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM marking_definitions WHERE standard_id = ANY($1)
             ORDER BY definition_type, marking_order"
        );
        sqlx::query_as::<_, MarkingDefinitionRow>(&query)
            .bind(ids)
            .fetch_all(pool)
            .await
    }

    /// Remove a marking. Returns `true` if a row was deleted.
    pub async fn delete(pool: &PgPool, standard_id: EntityId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM marking_definitions WHERE standard_id = $1")
            .bind(standard_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
