//! Route definitions for the `/applications` resource.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::applications;
use crate::state::AppState;

/// Routes mounted at `/applications`.
///
/// ```text
/// POST   /                  -> submit_application
/// GET    /                  -> list_applications  (?status, ?service_type, ?limit, ?offset)
/// GET    /{id}              -> get_application
/// PUT    /{id}/status       -> change_status
/// POST   /{id}/remarks      -> add_remark
/// POST   /{id}/files/check  -> check_file
/// POST   /{id}/files        -> attach_file
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(applications::list_applications).post(applications::submit_application),
        )
        .route("/{id}", get(applications::get_application))
        .route("/{id}/status", put(applications::change_status))
        .route("/{id}/remarks", post(applications::add_remark))
        .route("/{id}/files/check", post(applications::check_file))
        .route("/{id}/files", post(applications::attach_file))
}
