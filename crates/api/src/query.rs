//! Shared query parameter types for API handlers.

use serde::Deserialize;

/// Default number of applications per page.
pub const DEFAULT_LIST_LIMIT: i64 = 20;

/// Maximum number of applications per page.
pub const MAX_LIST_LIMIT: i64 = 100;

/// Query parameters for `GET /applications`.
///
/// `status` and `service_type` are parsed by the handler so unknown values
/// produce a validation error instead of a generic deserialization failure.
#[derive(Debug, Default, Deserialize)]
pub struct ListApplicationsParams {
    pub status: Option<String>,
    pub service_type: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Clamp a user-provided limit to `1..=max`, defaulting to `default`.
pub fn clamp_limit(limit: Option<i64>, default: i64, max: i64) -> i64 {
    limit.unwrap_or(default).max(1).min(max)
}

/// Clamp a user-provided offset to non-negative.
pub fn clamp_offset(offset: Option<i64>) -> i64 {
    offset.unwrap_or(0).max(0)
}
