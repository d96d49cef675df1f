//! HTTP-level integration tests for the `/public-dashboards` lifecycle.

mod common;

use axum::http::StatusCode;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use common::{
    body_json, build_test_app, build_test_app_with_events, delete, drain, get_auth, patch_json,
    post_json, seed_tlp, seed_user, seed_workspace, token_for,
};
use serde_json::json;
use sqlx::PgPool;
use vantage_core::audit::action_types;
use vantage_core::roles::{ROLE_ADMIN, ROLE_PUBLISHER, ROLE_VIEWER};
use vantage_core::types::DbId;
use vantage_db::repositories::{PublicDashboardRepo, SettingsRepo};
use vantage_events::{topics, PlatformEvent};
use vantage_widgets::memory::fixtures;

/// Publish the fixture manifest and return the response body.
async fn publish(pool: &PgPool, token: &str, workspace_id: i64, markings: &[uuid::Uuid]) -> serde_json::Value {
    let response = post_json(
        build_test_app(pool.clone()),
        "/api/v1/public-dashboards",
        token,
        json!({
            "dashboard_id": workspace_id,
            "name": "Malware overview",
            "allowed_markings_ids": markings,
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn publish_creates_dashboard_with_initial_members(pool: PgPool) {
    let tlp = seed_tlp(&pool).await;
    let publisher = seed_user(&pool, "publisher", ROLE_PUBLISHER).await;
    let workspace = seed_workspace(&pool, publisher.id, Some(fixtures::manifest())).await;

    let json = publish(&pool, &token_for(&publisher), workspace.id, &[tlp.green.id]).await;
    let data = &json["data"];

    assert_eq!(data["name"], "Malware overview");
    assert_eq!(data["dashboard_id"], workspace.id);
    assert_eq!(data["uri_key"].as_str().unwrap().len(), 36);
    assert_eq!(data["allowed_markings_ids"], json!([tlp.green.id]));
    assert_eq!(
        data["authorized_members"],
        json!([
            { "id": publisher.id.to_string(), "access_right": "admin" },
            { "id": "ALL", "access_right": "view" }
        ])
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn publishing_an_empty_dashboard_is_rejected(pool: PgPool) {
    let publisher = seed_user(&pool, "publisher", ROLE_PUBLISHER).await;
    let workspace = seed_workspace(&pool, publisher.id, None).await;

    let response = post_json(
        build_test_app(pool.clone()),
        "/api/v1/public-dashboards",
        &token_for(&publisher),
        json!({ "dashboard_id": workspace.id, "name": "Empty" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert_eq!(json["error"], "Cannot publish empty dashboard");

    let count = PublicDashboardRepo::count_accessible(&pool, publisher.id, true, None)
        .await
        .unwrap();
    assert_eq!(count, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn publishing_a_manifest_with_an_unsupported_filter_key_names_the_key(pool: PgPool) {
    let publisher = seed_user(&pool, "publisher", ROLE_PUBLISHER).await;
    let manifest = STANDARD.encode(
        json!({
            "widgets": {
                "w1": {
                    "id": "w1",
                    "type": "number",
                    "perspective": "entities",
                    "dataSelection": [{
                        "label": "pivoted",
                        "perspective": "entities",
                        "filters": {
                            "mode": "and",
                            "filters": [{ "key": "regardingOf", "values": ["x"] }],
                            "filterGroups": []
                        }
                    }]
                }
            }
        })
        .to_string(),
    );
    let workspace = seed_workspace(&pool, publisher.id, Some(manifest)).await;

    let response = post_json(
        build_test_app(pool.clone()),
        "/api/v1/public-dashboards",
        &token_for(&publisher),
        json!({ "dashboard_id": workspace.id, "name": "Pivoted" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert!(json["error"].as_str().unwrap().contains("regardingOf"));

    let count = PublicDashboardRepo::count_accessible(&pool, publisher.id, true, None)
        .await
        .unwrap();
    assert_eq!(count, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn publishing_from_a_missing_source_is_a_validation_error(pool: PgPool) {
    let publisher = seed_user(&pool, "publisher", ROLE_PUBLISHER).await;

    let response = post_json(
        build_test_app(pool),
        "/api/v1/public-dashboards",
        &token_for(&publisher),
        json!({ "dashboard_id": 999_999, "name": "Ghost" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn viewers_cannot_publish(pool: PgPool) {
    let viewer = seed_user(&pool, "viewer", ROLE_VIEWER).await;
    let workspace = seed_workspace(&pool, viewer.id, Some(fixtures::manifest())).await;

    let response = post_json(
        build_test_app(pool),
        "/api/v1/public-dashboards",
        &token_for(&viewer),
        json!({ "dashboard_id": workspace.id, "name": "Nope" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn markings_above_the_ceiling_are_a_policy_violation(pool: PgPool) {
    let tlp = seed_tlp(&pool).await;
    SettingsRepo::set_max_markings(&pool, &[tlp.green.id]).await.unwrap();
    let publisher = seed_user(&pool, "publisher", ROLE_PUBLISHER).await;
    let workspace = seed_workspace(&pool, publisher.id, Some(fixtures::manifest())).await;

    let response = post_json(
        build_test_app(pool.clone()),
        "/api/v1/public-dashboards",
        &token_for(&publisher),
        json!({
            "dashboard_id": workspace.id,
            "name": "Too open",
            "allowed_markings_ids": [tlp.green.id, tlp.red.id],
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let json = body_json(response).await;
    assert_eq!(json["code"], "POLICY_VIOLATION");
    assert!(json["error"].as_str().unwrap().contains(&tlp.red.id.to_string()));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn read_by_id_and_by_uri_key_return_the_same_dashboard(pool: PgPool) {
    let tlp = seed_tlp(&pool).await;
    let publisher = seed_user(&pool, "publisher", ROLE_PUBLISHER).await;
    let viewer = seed_user(&pool, "viewer", ROLE_VIEWER).await;
    let workspace = seed_workspace(&pool, publisher.id, Some(fixtures::manifest())).await;
    let created = publish(&pool, &token_for(&publisher), workspace.id, &[tlp.clear.id]).await;
    let id = created["data"]["id"].as_i64().unwrap();
    let uri_key = created["data"]["uri_key"].as_str().unwrap().to_string();

    let app = build_test_app(pool);
    let by_id = body_json(
        get_auth(app.clone(), &format!("/api/v1/public-dashboards/{id}"), &token_for(&viewer)).await,
    )
    .await;
    let by_key = body_json(
        get_auth(
            app,
            &format!("/api/v1/public-dashboards/by-uri-key/{uri_key}"),
            &token_for(&viewer),
        )
        .await,
    )
    .await;

    assert_eq!(by_id["data"]["id"], id);
    assert_eq!(by_key["data"]["id"], id);
    assert_eq!(by_id["data"]["uri_key"], uri_key.as_str());
    assert_eq!(by_key["data"]["uri_key"], uri_key.as_str());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn editing_a_frozen_field_is_rejected_without_changes(pool: PgPool) {
    let publisher = seed_user(&pool, "publisher", ROLE_PUBLISHER).await;
    let workspace = seed_workspace(&pool, publisher.id, Some(fixtures::manifest())).await;
    let token = token_for(&publisher);
    let created = publish(&pool, &token, workspace.id, &[]).await;
    let id = created["data"]["id"].as_i64().unwrap();

    let response = patch_json(
        build_test_app(pool.clone()),
        &format!("/api/v1/public-dashboards/{id}"),
        &token,
        json!([
            { "key": "name", "value": ["Renamed"] },
            { "key": "allowed_markings_ids", "value": ["anything"] }
        ]),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "UNSUPPORTED_OPERATION");
    assert_eq!(json["error"], "Only name and uri_key can be updated");

    let stored = PublicDashboardRepo::find_by_id(&pool, id).await.unwrap().unwrap();
    assert_eq!(stored.name, "Malware overview");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn admins_of_the_dashboard_can_rename_and_rekey(pool: PgPool) {
    let publisher = seed_user(&pool, "publisher", ROLE_PUBLISHER).await;
    let workspace = seed_workspace(&pool, publisher.id, Some(fixtures::manifest())).await;
    let token = token_for(&publisher);
    let created = publish(&pool, &token, workspace.id, &[]).await;
    let id = created["data"]["id"].as_i64().unwrap();

    let response = patch_json(
        build_test_app(pool),
        &format!("/api/v1/public-dashboards/{id}"),
        &token,
        json!([
            { "key": "name", "value": ["Renamed"] },
            { "key": "uri_key", "value": ["malware-board"] }
        ]),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["name"], "Renamed");
    assert_eq!(json["data"]["uri_key"], "malware-board");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn view_access_cannot_edit(pool: PgPool) {
    let publisher = seed_user(&pool, "publisher", ROLE_PUBLISHER).await;
    let viewer = seed_user(&pool, "viewer", ROLE_VIEWER).await;
    let workspace = seed_workspace(&pool, publisher.id, Some(fixtures::manifest())).await;
    let created = publish(&pool, &token_for(&publisher), workspace.id, &[]).await;
    let id = created["data"]["id"].as_i64().unwrap();

    let response = patch_json(
        build_test_app(pool),
        &format!("/api/v1/public-dashboards/{id}"),
        &token_for(&viewer),
        json!([{ "key": "name", "value": ["Hijacked"] }]),
    )
    .await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn platform_admins_bypass_member_lists(pool: PgPool) {
    let publisher = seed_user(&pool, "publisher", ROLE_PUBLISHER).await;
    let admin = seed_user(&pool, "admin", ROLE_ADMIN).await;
    let workspace = seed_workspace(&pool, publisher.id, Some(fixtures::manifest())).await;
    let created = publish(&pool, &token_for(&publisher), workspace.id, &[]).await;
    let id = created["data"]["id"].as_i64().unwrap();

    let response = delete(
        build_test_app(pool),
        &format!("/api/v1/public-dashboards/{id}"),
        &token_for(&admin),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn deleted_dashboards_disappear_and_second_delete_is_not_found(pool: PgPool) {
    let publisher = seed_user(&pool, "publisher", ROLE_PUBLISHER).await;
    let workspace = seed_workspace(&pool, publisher.id, Some(fixtures::manifest())).await;
    let token = token_for(&publisher);
    let created = publish(&pool, &token, workspace.id, &[]).await;
    let id = created["data"]["id"].as_i64().unwrap();
    let uri = format!("/api/v1/public-dashboards/{id}");
    let app = build_test_app(pool);

    let first = delete(app.clone(), &uri, &token).await;
    assert_eq!(first.status(), StatusCode::OK);
    assert_eq!(body_json(first).await["data"], id);

    let list = body_json(get_auth(app.clone(), "/api/v1/public-dashboards", &token).await).await;
    assert_eq!(list["total"], 0);
    assert!(list["data"].as_array().unwrap().is_empty());

    let read = get_auth(app.clone(), &uri, &token).await;
    assert_eq!(read.status(), StatusCode::NOT_FOUND);

    let second = delete(app, &uri, &token).await;
    assert_eq!(second.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn list_filters_by_search(pool: PgPool) {
    let publisher = seed_user(&pool, "publisher", ROLE_PUBLISHER).await;
    let workspace = seed_workspace(&pool, publisher.id, Some(fixtures::manifest())).await;
    let token = token_for(&publisher);
    publish(&pool, &token, workspace.id, &[]).await;

    let app = build_test_app(pool);
    let hit = body_json(get_auth(app.clone(), "/api/v1/public-dashboards?search=malware", &token).await).await;
    let miss = body_json(get_auth(app, "/api/v1/public-dashboards?search=ransom", &token).await).await;

    assert_eq!(hit["total"], 1);
    assert_eq!(miss["total"], 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn lifecycle_requires_a_token(pool: PgPool) {
    let app = build_test_app(pool);
    let response = common::get(app, "/api/v1/public-dashboards").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

/// Check that `events` is one audit record followed by one notification.
fn assert_audited_then_notified(
    events: &[PlatformEvent],
    action: &str,
    topic: &str,
    id: DbId,
    actor: DbId,
) {
    assert_eq!(events.len(), 2, "unexpected events: {events:?}");
    let (audit, notification) = (&events[0], &events[1]);

    assert_eq!(audit.event_type, topics::AUDIT_RECORDED);
    assert_eq!(audit.actor_user_id, Some(actor));
    assert_eq!(audit.payload["action"], action);
    assert_eq!(audit.payload["entity_type"], "Public-Dashboard");
    assert_eq!(audit.payload["target_id"], id.to_string());
    assert_eq!(audit.payload["actor_id"], actor);
    assert!(!audit.payload["input"].is_null());

    assert_eq!(notification.event_type, topic);
    assert_eq!(notification.source_entity_type.as_deref(), Some("Public-Dashboard"));
    assert_eq!(notification.source_entity_id, Some(id.to_string()));
    assert_eq!(notification.actor_user_id, Some(actor));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn each_mutation_is_audited_before_it_is_announced(pool: PgPool) {
    let publisher = seed_user(&pool, "publisher", ROLE_PUBLISHER).await;
    let workspace = seed_workspace(&pool, publisher.id, Some(fixtures::manifest())).await;
    let token = token_for(&publisher);
    let (app, mut events) = build_test_app_with_events(pool);

    let created = post_json(
        app.clone(),
        "/api/v1/public-dashboards",
        &token,
        json!({ "dashboard_id": workspace.id, "name": "Malware overview" }),
    )
    .await;
    assert_eq!(created.status(), StatusCode::CREATED);
    let id = body_json(created).await["data"]["id"].as_i64().unwrap();
    let published = drain(&mut events);
    assert_audited_then_notified(
        &published,
        action_types::CREATE,
        topics::PUBLIC_DASHBOARD_ADDED,
        id,
        publisher.id,
    );
    assert_eq!(published[0].payload["input"]["name"], "Malware overview");
    assert_eq!(published[1].payload["name"], "Malware overview");

    let uri = format!("/api/v1/public-dashboards/{id}");
    let edited = patch_json(
        app.clone(),
        &uri,
        &token,
        json!([{ "key": "name", "value": ["Renamed"] }]),
    )
    .await;
    assert_eq!(edited.status(), StatusCode::OK);
    let renamed = drain(&mut events);
    assert_audited_then_notified(
        &renamed,
        action_types::UPDATE,
        topics::PUBLIC_DASHBOARD_EDITED,
        id,
        publisher.id,
    );
    assert_eq!(renamed[1].payload["name"], "Renamed");

    let deleted = delete(app, &uri, &token).await;
    assert_eq!(deleted.status(), StatusCode::OK);
    assert_audited_then_notified(
        &drain(&mut events),
        action_types::DELETE,
        topics::PUBLIC_DASHBOARD_DELETED,
        id,
        publisher.id,
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn rejected_mutations_emit_nothing(pool: PgPool) {
    let publisher = seed_user(&pool, "publisher", ROLE_PUBLISHER).await;
    let viewer = seed_user(&pool, "viewer", ROLE_VIEWER).await;
    let empty = seed_workspace(&pool, publisher.id, None).await;
    let workspace = seed_workspace(&pool, publisher.id, Some(fixtures::manifest())).await;
    let token = token_for(&publisher);
    let id = publish(&pool, &token, workspace.id, &[]).await["data"]["id"].as_i64().unwrap();
    let uri = format!("/api/v1/public-dashboards/{id}");
    let (app, mut events) = build_test_app_with_events(pool);

    let empty_publish = post_json(
        app.clone(),
        "/api/v1/public-dashboards",
        &token,
        json!({ "dashboard_id": empty.id, "name": "Empty" }),
    )
    .await;
    assert_eq!(empty_publish.status(), StatusCode::BAD_REQUEST);

    let frozen_edit = patch_json(
        app.clone(),
        &uri,
        &token,
        json!([{ "key": "allowed_markings_ids", "value": ["anything"] }]),
    )
    .await;
    assert_eq!(frozen_edit.status(), StatusCode::BAD_REQUEST);

    let foreign_delete = delete(app, &uri, &token_for(&viewer)).await;
    assert_eq!(foreign_delete.status(), StatusCode::FORBIDDEN);

    assert!(drain(&mut events).is_empty());
}
