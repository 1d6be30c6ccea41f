pub mod applications;
pub mod documents;
pub mod health;
pub mod services;
pub mod validation;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /services                                   list service types
/// /services/{service}/form                    form definition (steps + rules)
/// /services/{service}/validate                validate a whole record (dry run)
/// /services/{service}/steps/{index}/validate  validate one wizard step
/// /services/{service}/steps/transition        check a wizard step move
/// /services/{service}/documents               required documents for a record
///
/// /validation/field                           validate one value
/// /validation/autocorrect                     normalize one value
/// /validation/age                             calendar age
/// /validation/dates                           life-event date consistency
/// /validation/file                            file metadata against limits
///
/// /applications                               submit (POST), list (GET)
/// /applications/{id}                          fetch
/// /applications/{id}/status                   change status (PUT, privileged)
/// /applications/{id}/remarks                  add remark (POST, privileged)
/// /applications/{id}/files/check              plan an upload (POST, applicant)
/// /applications/{id}/files                    record an upload (POST, applicant)
///
/// /documents/check                            plan a citizen document upload (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/services", services::router())
        .nest("/validation", validation::router())
        .nest("/applications", applications::router())
        .nest("/documents", documents::router())
}
