//! Route definitions for the `/services` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::services;
use crate::state::AppState;

/// Routes mounted at `/services`.
///
/// ```text
/// GET    /                                -> list_services
/// GET    /{service}/form                  -> get_form
/// POST   /{service}/validate              -> validate_record
/// POST   /{service}/steps/{index}/validate -> validate_step
/// POST   /{service}/steps/transition      -> check_transition
/// POST   /{service}/documents             -> required_documents
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(services::list_services))
        .route("/{service}/form", get(services::get_form))
        .route("/{service}/validate", post(services::validate_record))
        .route(
            "/{service}/steps/{index}/validate",
            post(services::validate_step),
        )
        .route(
            "/{service}/steps/transition",
            post(services::check_transition),
        )
        .route("/{service}/documents", post(services::required_documents))
}
