//! Handlers for the `/public-dashboards` resource (administrative path).
//!
//! Publishing needs the publisher role. Reads need at least `view` on the
//! dashboard's authorized members; edit and delete need `admin`. Every
//! successful mutation records an audit entry and notifies subscribers.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use validator::Validate;
use vantage_core::access::{has_access, initial_members, AccessRight};
use vantage_core::audit::{action_types, AuditEntry};
use vantage_core::error::CoreError;
use vantage_core::public_dashboard::{
    build_patch, check_marking_ceiling, generate_uri_key, prepare_publication, validate_name,
    EditInput, ENTITY_TYPE,
};
use vantage_core::types::{DbId, EntityId};
use vantage_db::models::public_dashboard::{
    CreatePublicDashboard, PublicDashboard, PublicDashboardListQuery, UpdatePublicDashboard,
};
use vantage_db::repositories::{PublicDashboardRepo, WorkspaceRepo};
use vantage_events::topics;
use vantage_widgets::shareable_markings;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::{RequireAuth, RequirePublisher};
use crate::response::{DataResponse, PageResponse};
use crate::state::AppState;

/// Request body for `POST /public-dashboards`.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct PublishDashboard {
    /// Source workspace whose manifest is published.
    pub dashboard_id: DbId,
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[validate(length(max = 5000))]
    pub description: Option<String>,
    #[serde(default)]
    pub allowed_markings_ids: Vec<EntityId>,
}

async fn find_or_404(state: &AppState, id: DbId) -> AppResult<PublicDashboard> {
    PublicDashboardRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found("Public dashboard", id)))
}

fn ensure_access(
    dashboard: &PublicDashboard,
    user: &AuthUser,
    required: AccessRight,
) -> AppResult<()> {
    if has_access(
        &dashboard.authorized_members,
        user.user_id,
        user.is_admin(),
        required,
    ) {
        return Ok(());
    }
    // Dashboards the caller cannot even view are reported as absent.
    if required == AccessRight::View
        || !has_access(
            &dashboard.authorized_members,
            user.user_id,
            user.is_admin(),
            AccessRight::View,
        )
    {
        return Err(AppError::Core(CoreError::not_found(
            "Public dashboard",
            dashboard.id,
        )));
    }
    Err(AppError::Core(CoreError::Forbidden(
        "Admin access on this dashboard required".into(),
    )))
}

/// POST /api/v1/public-dashboards
pub async fn create(
    State(state): State<AppState>,
    RequirePublisher(user): RequirePublisher,
    Json(input): Json<PublishDashboard>,
) -> AppResult<(StatusCode, Json<DataResponse<PublicDashboard>>)> {
    input
        .validate()
        .map_err(|e| AppError::Core(CoreError::Validation(e.to_string())))?;
    validate_name(&input.name)?;

    let source = WorkspaceRepo::find_by_id(&state.pool, input.dashboard_id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Validation(format!(
                "Source dashboard {} does not exist",
                input.dashboard_id
            )))
        })?;
    let private_manifest = source.manifest.clone().unwrap_or_default();
    let manifest = prepare_publication(source.manifest.as_deref())?;
    let public_manifest = manifest
        .encode()
        .map_err(|e| AppError::InternalError(format!("Failed to encode manifest: {e}")))?;

    let available = shareable_markings(state.markings.as_ref(), state.policy.as_ref()).await?;
    let violations = check_marking_ceiling(
        &input.allowed_markings_ids,
        &available,
        state.config.marking_ceiling_mode,
    )?;
    if !violations.is_empty() {
        tracing::warn!(
            user_id = user.user_id,
            violations = ?violations,
            "Publishing with markings above the sharing ceiling"
        );
    }

    let create = CreatePublicDashboard {
        uri_key: generate_uri_key(),
        name: input.name.trim().to_string(),
        description: input.description.clone(),
        dashboard_id: source.id,
        private_manifest,
        public_manifest,
        allowed_markings_ids: input.allowed_markings_ids.clone(),
        authorized_members: initial_members(user.user_id),
        user_id: user.user_id,
    };
    let dashboard = PublicDashboardRepo::create(&state.pool, &create).await?;

    tracing::info!(
        public_dashboard_id = dashboard.id,
        source_id = source.id,
        user_id = user.user_id,
        "Public dashboard published"
    );
    let input_json = serde_json::to_value(&input).unwrap_or_default();
    state.event_bus.record_audit(&AuditEntry::new(
        user.user_id,
        action_types::CREATE,
        ENTITY_TYPE,
        dashboard.id,
        &input_json,
        format!("creates public dashboard `{}`", dashboard.name),
    ));
    state.event_bus.notify(
        topics::PUBLIC_DASHBOARD_ADDED,
        ENTITY_TYPE,
        dashboard.id,
        user.user_id,
        &dashboard,
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: dashboard })))
}

/// GET /api/v1/public-dashboards
pub async fn list(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Query(params): Query<PublicDashboardListQuery>,
) -> AppResult<Json<PageResponse<PublicDashboard>>> {
    let data =
        PublicDashboardRepo::list_accessible(&state.pool, user.user_id, user.is_admin(), &params)
            .await?;
    let total = PublicDashboardRepo::count_accessible(
        &state.pool,
        user.user_id,
        user.is_admin(),
        params.search.as_deref(),
    )
    .await?;
    Ok(Json(PageResponse { data, total }))
}

/// GET /api/v1/public-dashboards/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<PublicDashboard>>> {
    let dashboard = find_or_404(&state, id).await?;
    ensure_access(&dashboard, &user, AccessRight::View)?;
    Ok(Json(DataResponse { data: dashboard }))
}

/// GET /api/v1/public-dashboards/by-uri-key/{uri_key}
pub async fn get_by_uri_key(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(uri_key): Path<String>,
) -> AppResult<Json<DataResponse<PublicDashboard>>> {
    let dashboard = PublicDashboardRepo::find_by_uri_key(&state.pool, &uri_key)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found("Public dashboard", &uri_key)))?;
    ensure_access(&dashboard, &user, AccessRight::View)?;
    Ok(Json(DataResponse { data: dashboard }))
}

/// PATCH /api/v1/public-dashboards/{id}
///
/// Body: `[{ "key": "name", "value": ["new name"] }, ...]`. Only `name`
/// and `uri_key` are editable; a batch touching anything else is rejected
/// as a whole.
pub async fn edit(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<DbId>,
    Json(inputs): Json<Vec<EditInput>>,
) -> AppResult<Json<DataResponse<PublicDashboard>>> {
    let dashboard = find_or_404(&state, id).await?;
    ensure_access(&dashboard, &user, AccessRight::Admin)?;
    let patch = build_patch(&inputs)?;

    let update = UpdatePublicDashboard {
        name: patch.name,
        uri_key: patch.uri_key,
    };
    let updated = PublicDashboardRepo::update(&state.pool, id, &update)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found("Public dashboard", id)))?;

    tracing::info!(public_dashboard_id = id, user_id = user.user_id, "Public dashboard edited");
    let input_json = serde_json::to_value(&inputs).unwrap_or_default();
    state.event_bus.record_audit(&AuditEntry::new(
        user.user_id,
        action_types::UPDATE,
        ENTITY_TYPE,
        id,
        &input_json,
        format!("updates public dashboard `{}`", updated.name),
    ));
    state.event_bus.notify(
        topics::PUBLIC_DASHBOARD_EDITED,
        ENTITY_TYPE,
        id,
        user.user_id,
        &updated,
    );

    Ok(Json(DataResponse { data: updated }))
}

/// DELETE /api/v1/public-dashboards/{id}
pub async fn delete(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<DbId>>> {
    let dashboard = find_or_404(&state, id).await?;
    ensure_access(&dashboard, &user, AccessRight::Admin)?;

    if !PublicDashboardRepo::delete(&state.pool, id).await? {
        return Err(AppError::Core(CoreError::not_found("Public dashboard", id)));
    }

    tracing::info!(public_dashboard_id = id, user_id = user.user_id, "Public dashboard deleted");
    state.event_bus.record_audit(&AuditEntry::new(
        user.user_id,
        action_types::DELETE,
        ENTITY_TYPE,
        id,
        &serde_json::json!({ "id": id }),
        format!("deletes public dashboard `{}`", dashboard.name),
    ));
    state.event_bus.notify(
        topics::PUBLIC_DASHBOARD_DELETED,
        ENTITY_TYPE,
        id,
        user.user_id,
        &dashboard,
    );

    Ok(Json(DataResponse { data: id }))
}
