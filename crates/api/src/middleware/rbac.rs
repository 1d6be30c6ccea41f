//! Role-based access control (RBAC) extractors.
//!
//! Each extractor wraps [`AuthUser`] and rejects requests whose role does not
//! meet the minimum requirement. Finer rules (which status moves a role may
//! make) are enforced by the domain layer.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use panchayat_core::error::CoreError;

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// Requires `staff`, `officer` or `admin`. Rejects with 403 Forbidden otherwise.
///
/// ```ignore
/// async fn review(RequirePrivileged(user): RequirePrivileged) -> AppResult<Json<()>> {
///     Ok(Json(()))
/// }
/// ```
pub struct RequirePrivileged(pub AuthUser);

impl FromRequestParts<AppState> for RequirePrivileged {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if !user.role.is_privileged() {
            return Err(AppError::Core(CoreError::Forbidden(
                "Staff, officer or admin role required".into(),
            )));
        }
        Ok(RequirePrivileged(user))
    }
}
