//! Integration tests for the marking catalog and sharing ceiling.

use sqlx::PgPool;
use uuid::Uuid;
use vantage_core::markings::MarkingDefinition;
use vantage_db::models::audit::CreateAuditLog;
use vantage_db::models::marking::CreateMarkingDefinition;
use vantage_db::repositories::{AuditLogRepo, MarkingDefinitionRepo, SettingsRepo};

fn tlp(definition: &str, order: i32) -> CreateMarkingDefinition {
    CreateMarkingDefinition {
        standard_id: Uuid::new_v4(),
        definition_type: "TLP".to_string(),
        definition: definition.to_string(),
        marking_order: order,
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_catalog_is_ordered_and_converts(pool: PgPool) {
    let red = MarkingDefinitionRepo::create(&pool, &tlp("TLP:RED", 4)).await.unwrap();
    let green = MarkingDefinitionRepo::create(&pool, &tlp("TLP:GREEN", 2)).await.unwrap();

    let all = MarkingDefinitionRepo::list_all(&pool).await.unwrap();
    let names: Vec<_> = all.iter().map(|m| m.definition.as_str()).collect();
    assert_eq!(names, vec!["TLP:GREEN", "TLP:RED"]);

    let domain: MarkingDefinition = green.clone().into();
    assert_eq!(domain.id, green.standard_id);
    assert_eq!(domain.order, 2);

    let subset = MarkingDefinitionRepo::find_by_standard_ids(&pool, &[red.standard_id, Uuid::new_v4()])
        .await
        .unwrap();
    assert_eq!(subset.len(), 1);
    assert_eq!(subset[0].standard_id, red.standard_id);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_sharing_ceiling_round_trip(pool: PgPool) {
    let green = MarkingDefinitionRepo::create(&pool, &tlp("TLP:GREEN", 2)).await.unwrap();

    assert!(SettingsRepo::max_markings(&pool).await.unwrap().is_empty());
    SettingsRepo::set_max_markings(&pool, &[green.standard_id]).await.unwrap();
    assert_eq!(SettingsRepo::max_markings(&pool).await.unwrap(), vec![green.standard_id]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_audit_entries_are_listed_per_entity(pool: PgPool) {
    for action in ["create", "update"] {
        AuditLogRepo::insert(
            &pool,
            &CreateAuditLog {
                user_id: Some(1),
                action_type: action.to_string(),
                event_type: "mutation".to_string(),
                entity_type: Some("Public-Dashboard".to_string()),
                entity_id: Some("42".to_string()),
                message: None,
                details_json: Some(serde_json::json!({ "name": "x" })),
            },
        )
        .await
        .unwrap();
    }

    let rows = AuditLogRepo::list_for_entity(&pool, "Public-Dashboard", "42").await.unwrap();
    let actions: Vec<_> = rows.iter().map(|r| r.action_type.as_str()).collect();
    assert_eq!(actions, vec!["create", "update"]);
}
