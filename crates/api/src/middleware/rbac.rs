//! Role-based access control (RBAC) extractors.
//!
//! Each extractor wraps [`AuthUser`] and rejects requests whose role does not
//! meet the minimum requirement. Per-dashboard rights (authorized members)
//! are checked in the handlers on top of these.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use vantage_core::error::CoreError;
use vantage_core::roles::{ROLE_ADMIN, ROLE_PUBLISHER};

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

impl AuthUser {
    /// Platform administrators bypass authorized-member lists.
    pub fn is_admin(&self) -> bool {
        self.role == ROLE_ADMIN
    }
}

/// Requires `publisher` or `admin` role. Rejects with 403 Forbidden otherwise.
///
/// ```ignore
/// async fn publish(RequirePublisher(user): RequirePublisher) -> AppResult<Json<()>> {
///     Ok(Json(()))
/// }
/// ```
pub struct RequirePublisher(pub AuthUser);

impl FromRequestParts<AppState> for RequirePublisher {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if !user.is_admin() && user.role != ROLE_PUBLISHER {
            return Err(AppError::Core(CoreError::Forbidden(
                "Publisher or Admin role required".into(),
            )));
        }
        Ok(RequirePublisher(user))
    }
}

/// Requires any authenticated user (any valid role).
pub struct RequireAuth(pub AuthUser);

impl FromRequestParts<AppState> for RequireAuth {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        Ok(RequireAuth(user))
    }
}
