//! Validation rule and result types.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::field_types::FieldType;

/// Message for a required field left empty.
pub const REQUIRED_MESSAGE: &str = "This field is required";

/// A statically declared rule for one form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldRule {
    pub field_type: FieldType,
    #[serde(default)]
    pub required: bool,
}

impl FieldRule {
    pub const fn required(field_type: FieldType) -> Self {
        Self {
            field_type,
            required: true,
        }
    }

    pub const fn optional(field_type: FieldType) -> Self {
        Self {
            field_type,
            required: false,
        }
    }
}

/// The rule set of a form, keyed by field name.
pub type FormRules = BTreeMap<String, FieldRule>;

/// Why a single field failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldError {
    /// A required field was empty or whitespace.
    Required,
    /// The value failed the predicate of its declared kind.
    Invalid(FieldType),
}

impl FieldError {
    pub fn message(self) -> &'static str {
        match self {
            Self::Required => REQUIRED_MESSAGE,
            Self::Invalid(kind) => kind.invalid_message(),
        }
    }
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

/// Aggregated result of validating a record.
///
/// A field absent from `errors` is valid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: BTreeMap<String, String>,
}

impl ValidationResult {
    /// Build a result from an error map.
    pub fn from_errors(errors: BTreeMap<String, String>) -> Self {
        Self {
            is_valid: errors.is_empty(),
            errors,
        }
    }

    /// Fold in additional (e.g. cross-field) errors.
    ///
    /// A field keeps its first error; later errors for the same key are
    /// dropped.
    pub fn merge(&mut self, extra: BTreeMap<String, String>) {
        for (field, message) in extra {
            self.errors.entry(field).or_insert(message);
        }
        self.is_valid = self.errors.is_empty();
    }
}
