//! Authentication and authorization middleware extractors.
//!
//! - [`auth::AuthUser`] -- Extracts the authenticated user from a JWT Bearer token.
//! - [`rbac::RequirePrivileged`] -- Requires `staff`, `officer` or `admin`.

pub mod auth;
pub mod rbac;
