//! Authentication primitives.
//!
//! Tokens are issued by the panchayat identity service; this server only
//! verifies them.
//!
//! - [`jwt`] -- HS256 access-token validation (and generation for tooling and tests).

pub mod jwt;
