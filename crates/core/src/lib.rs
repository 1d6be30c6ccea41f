//! Panchayat e-services core.
//!
//! Pure domain logic shared by the HTTP service and any future tooling:
//! the declarative form validation engine, the multi-step wizard, the
//! service catalogue, and the application status lifecycle. Nothing in this
//! crate performs I/O.

pub mod application;
pub mod error;
pub mod roles;
pub mod services;
pub mod storage;
pub mod types;
pub mod validation;
pub mod wizard;
