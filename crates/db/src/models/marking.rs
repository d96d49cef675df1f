//! Marking definition rows.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use vantage_core::markings::MarkingDefinition;
use vantage_core::types::{DbId, EntityId, Timestamp};

/// A row from the `marking_definitions` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct MarkingDefinitionRow {
    pub id: DbId,
    pub standard_id: EntityId,
    pub definition_type: String,
    pub definition: String,
    pub marking_order: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<MarkingDefinitionRow> for MarkingDefinition {
    fn from(row: MarkingDefinitionRow) -> Self {
        Self {
            id: row.standard_id,
            definition_type: row.definition_type,
            definition: row.definition,
            order: row.marking_order,
        }
    }
}

/// DTO for registering a marking definition.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateMarkingDefinition {
    pub standard_id: EntityId,
    pub definition_type: String,
    pub definition: String,
    pub marking_order: i32,
}
