//! Integration tests for public dashboard persistence.

use sqlx::PgPool;
use uuid::Uuid;
use vantage_core::access::{initial_members, AccessRight, AuthorizedMember};
use vantage_db::models::public_dashboard::{
    CreatePublicDashboard, PublicDashboardListQuery, UpdatePublicDashboard,
};
use vantage_db::models::user::CreateUser;
use vantage_db::models::workspace::CreateWorkspace;
use vantage_db::repositories::{PublicDashboardRepo, UserRepo, WorkspaceRepo};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn seed_user(pool: &PgPool, username: &str) -> i64 {
    UserRepo::create(
        pool,
        &CreateUser {
            username: username.to_string(),
            role: "publisher".to_string(),
        },
    )
    .await
    .unwrap()
    .id
}

async fn seed_workspace(pool: &PgPool, owner_id: i64) -> i64 {
    WorkspaceRepo::create(
        pool,
        &CreateWorkspace {
            name: "source".to_string(),
            description: None,
            manifest: Some("e30=".to_string()),
            owner_id: Some(owner_id),
        },
    )
    .await
    .unwrap()
    .id
}

fn new_dashboard(
    uri_key: &str,
    dashboard_id: i64,
    user_id: i64,
    members: Vec<AuthorizedMember>,
) -> CreatePublicDashboard {
    CreatePublicDashboard {
        uri_key: uri_key.to_string(),
        name: format!("public {uri_key}"),
        description: None,
        dashboard_id,
        private_manifest: "e30=".to_string(),
        public_manifest: "e30=".to_string(),
        allowed_markings_ids: vec![Uuid::new_v4()],
        authorized_members: members,
        user_id,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_and_read_back(pool: PgPool) {
    let user = seed_user(&pool, "alice").await;
    let source = seed_workspace(&pool, user).await;

    let created = PublicDashboardRepo::create(
        &pool,
        &new_dashboard("key-0001-abcd", source, user, initial_members(user)),
    )
    .await
    .unwrap();

    let by_id = PublicDashboardRepo::find_by_id(&pool, created.id).await.unwrap().unwrap();
    let by_key = PublicDashboardRepo::find_by_uri_key(&pool, "key-0001-abcd")
        .await
        .unwrap()
        .unwrap();

    assert_eq!(by_id.id, by_key.id);
    assert_eq!(by_id.uri_key, by_key.uri_key);
    assert_eq!(by_id.allowed_markings_ids, created.allowed_markings_ids);
    assert_eq!(by_id.authorized_members.0, initial_members(user));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_duplicate_uri_key_violates_unique(pool: PgPool) {
    let user = seed_user(&pool, "alice").await;
    let source = seed_workspace(&pool, user).await;
    let input = new_dashboard("key-dup-00001", source, user, initial_members(user));

    PublicDashboardRepo::create(&pool, &input).await.unwrap();
    let err = PublicDashboardRepo::create(&pool, &input).await.unwrap_err();

    let constraint = err
        .as_database_error()
        .and_then(|e| e.constraint())
        .map(str::to_string);
    assert_eq!(constraint.as_deref(), Some("uq_public_dashboards_uri_key"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_touches_only_name_and_key(pool: PgPool) {
    let user = seed_user(&pool, "alice").await;
    let source = seed_workspace(&pool, user).await;
    let created = PublicDashboardRepo::create(
        &pool,
        &new_dashboard("key-upd-00001", source, user, initial_members(user)),
    )
    .await
    .unwrap();

    let updated = PublicDashboardRepo::update(
        &pool,
        created.id,
        &UpdatePublicDashboard {
            name: Some("renamed".to_string()),
            uri_key: None,
        },
    )
    .await
    .unwrap()
    .unwrap();

    assert_eq!(updated.name, "renamed");
    assert_eq!(updated.uri_key, "key-upd-00001");
    assert_eq!(updated.public_manifest, created.public_manifest);

    let missing = PublicDashboardRepo::update(&pool, 9999, &UpdatePublicDashboard::default())
        .await
        .unwrap();
    assert!(missing.is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_delete_is_terminal(pool: PgPool) {
    let user = seed_user(&pool, "alice").await;
    let source = seed_workspace(&pool, user).await;
    let created = PublicDashboardRepo::create(
        &pool,
        &new_dashboard("key-del-00001", source, user, initial_members(user)),
    )
    .await
    .unwrap();

    assert!(PublicDashboardRepo::delete(&pool, created.id).await.unwrap());
    assert!(!PublicDashboardRepo::delete(&pool, created.id).await.unwrap());
    assert!(PublicDashboardRepo::find_by_id(&pool, created.id).await.unwrap().is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_respects_authorized_members(pool: PgPool) {
    let alice = seed_user(&pool, "alice").await;
    let bob = seed_user(&pool, "bob").await;
    let source = seed_workspace(&pool, alice).await;

    let private_members = vec![AuthorizedMember {
        id: alice.to_string(),
        access_right: AccessRight::Admin,
    }];
    PublicDashboardRepo::create(&pool, &new_dashboard("key-shared-01", source, alice, initial_members(alice)))
        .await
        .unwrap();
    PublicDashboardRepo::create(&pool, &new_dashboard("key-private-1", source, alice, private_members))
        .await
        .unwrap();

    let params = PublicDashboardListQuery::default();
    let for_alice = PublicDashboardRepo::list_accessible(&pool, alice, false, &params).await.unwrap();
    let for_bob = PublicDashboardRepo::list_accessible(&pool, bob, false, &params).await.unwrap();
    let for_admin = PublicDashboardRepo::list_accessible(&pool, bob, true, &params).await.unwrap();

    assert_eq!(for_alice.len(), 2);
    assert_eq!(for_bob.len(), 1);
    assert_eq!(for_bob[0].uri_key, "key-shared-01");
    assert_eq!(for_admin.len(), 2);
    assert_eq!(
        PublicDashboardRepo::count_accessible(&pool, bob, false, None).await.unwrap(),
        1
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_search_filters_by_name(pool: PgPool) {
    let alice = seed_user(&pool, "alice").await;
    let source = seed_workspace(&pool, alice).await;
    for key in ["key-alpha-001", "key-beta-0001"] {
        PublicDashboardRepo::create(&pool, &new_dashboard(key, source, alice, initial_members(alice)))
            .await
            .unwrap();
    }

    let params = PublicDashboardListQuery {
        search: Some("ALPHA".to_string()),
        ..Default::default()
    };
    let found = PublicDashboardRepo::list_accessible(&pool, alice, false, &params).await.unwrap();

    assert_eq!(found.len(), 1);
    assert_eq!(found[0].uri_key, "key-alpha-001");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_source_deletion_keeps_public_copy(pool: PgPool) {
    let alice = seed_user(&pool, "alice").await;
    let source = seed_workspace(&pool, alice).await;
    let created = PublicDashboardRepo::create(
        &pool,
        &new_dashboard("key-orphan-01", source, alice, initial_members(alice)),
    )
    .await
    .unwrap();

    assert!(WorkspaceRepo::delete(&pool, source).await.unwrap());

    let kept = PublicDashboardRepo::find_by_id(&pool, created.id).await.unwrap().unwrap();
    assert_eq!(kept.dashboard_id, None);
    assert_eq!(kept.private_manifest, "e30=");
}
