//! Route definitions for citizen document uploads.

use axum::routing::post;
use axum::Router;

use crate::handlers::documents;
use crate::state::AppState;

/// Routes mounted at `/documents`.
///
/// ```text
/// POST   /check  -> check_document
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/check", post(documents::check_document))
}
