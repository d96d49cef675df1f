use axum::routing::get;
use axum::Router;

use crate::handlers::public_dashboard;
use crate::state::AppState;

/// Routes mounted at `/public-dashboards`.
///
/// ```text
/// GET    /                       list (view access)
/// POST   /                       publish (publisher role)
/// GET    /by-uri-key/{uri_key}   read by key (view access)
/// GET    /{id}                   read (view access)
/// PATCH  /{id}                   edit name / uri_key (admin access)
/// DELETE /{id}                   delete (admin access)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(public_dashboard::list).post(public_dashboard::create),
        )
        .route(
            "/by-uri-key/{uri_key}",
            get(public_dashboard::get_by_uri_key),
        )
        .route(
            "/{id}",
            get(public_dashboard::get_by_id)
                .patch(public_dashboard::edit)
                .delete(public_dashboard::delete),
        )
}
