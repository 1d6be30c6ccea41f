//! Route definitions for the stateless `/validation` helpers.

use axum::routing::post;
use axum::Router;

use crate::handlers::validation;
use crate::state::AppState;

/// Routes mounted at `/validation`.
///
/// ```text
/// POST   /field        -> validate_field
/// POST   /autocorrect  -> auto_correct
/// POST   /age          -> calculate_age
/// POST   /dates        -> validate_dates
/// POST   /file         -> validate_file
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/field", post(validation::validate_field))
        .route("/autocorrect", post(validation::auto_correct))
        .route("/age", post(validation::calculate_age))
        .route("/dates", post(validation::validate_dates))
        .route("/file", post(validation::validate_file))
}
