//! Form validation engine.
//!
//! Field kinds, rule types, a pure-logic evaluator, auto-correction,
//! date/age checks and upload checks. All functions are total and free of
//! side effects; failures are plain return values.

pub mod autocorrect;
pub mod dates;
pub mod evaluator;
pub mod field_types;
pub mod files;
pub mod rules;
