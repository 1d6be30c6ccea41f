//! Handlers for the stateless `/validation` helpers.
//!
//! These mirror the checks a form runs while the user types, so a client can
//! validate one value, one date set or one file without submitting anything.

use axum::extract::State;
use axum::Json;
use chrono::NaiveDate;
use panchayat_core::error::CoreError;
use panchayat_core::validation::autocorrect;
use panchayat_core::validation::dates::{self, parse_date};
use panchayat_core::validation::evaluator;
use panchayat_core::validation::field_types::FieldType;
use panchayat_core::validation::files::{validate_file_with, FileMeta};
use panchayat_core::validation::rules::ValidationResult;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::Validate;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// Parse an optional date, rejecting present-but-malformed values.
fn optional_date(field: &str, value: Option<&str>) -> Result<Option<NaiveDate>, CoreError> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(None),
        Some(v) => parse_date(v).map(Some).ok_or_else(|| {
            CoreError::Validation(format!("{field} must be a date in YYYY-MM-DD format"))
        }),
    }
}

// ── Single field ─────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct FieldRequest {
    pub field_type: FieldType,
    #[serde(default)]
    pub value: Option<Value>,
    #[serde(default)]
    pub required: bool,
    /// Normalize string values before checking them.
    #[serde(default)]
    pub auto_correct: bool,
}

#[derive(Debug, Serialize)]
pub struct FieldValidation {
    pub valid: bool,
    pub error: Option<&'static str>,
    /// The value that was checked (after auto-correction, if requested).
    pub value: Option<Value>,
}

/// POST /api/v1/validation/field
pub async fn validate_field(Json(body): Json<FieldRequest>) -> Json<DataResponse<FieldValidation>> {
    let value = match body.value {
        Some(Value::String(s)) if body.auto_correct => Some(Value::String(
            autocorrect::auto_correct(body.field_type, &s),
        )),
        other => other,
    };
    let error = evaluator::validate_field(value.as_ref(), body.field_type, body.required);

    Json(DataResponse {
        data: FieldValidation {
            valid: error.is_none(),
            error: error.map(|e| e.message()),
            value,
        },
    })
}

#[derive(Debug, Deserialize)]
pub struct AutoCorrectRequest {
    pub field_type: FieldType,
    pub value: String,
}

#[derive(Debug, Serialize)]
pub struct AutoCorrected {
    pub value: String,
}

/// POST /api/v1/validation/autocorrect
pub async fn auto_correct(
    Json(body): Json<AutoCorrectRequest>,
) -> Json<DataResponse<AutoCorrected>> {
    Json(DataResponse {
        data: AutoCorrected {
            value: autocorrect::auto_correct(body.field_type, &body.value),
        },
    })
}

// ── Dates ────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct AgeRequest {
    pub birth_date: Option<String>,
    /// Defaults to today.
    pub as_of: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AgeResponse {
    /// `null` when the birth date is absent or after `as_of`.
    pub age: Option<u32>,
}

/// POST /api/v1/validation/age
pub async fn calculate_age(Json(body): Json<AgeRequest>) -> AppResult<Json<DataResponse<AgeResponse>>> {
    let birth = optional_date("birth_date", body.birth_date.as_deref())?;
    let age = match optional_date("as_of", body.as_of.as_deref())? {
        Some(as_of) => dates::calculate_age(birth, as_of),
        None => dates::calculate_age_today(birth),
    };

    Ok(Json(DataResponse {
        data: AgeResponse { age },
    }))
}

#[derive(Debug, Deserialize)]
pub struct DatesRequest {
    pub birth_date: Option<String>,
    pub death_date: Option<String>,
    pub marriage_date: Option<String>,
}

/// POST /api/v1/validation/dates
pub async fn validate_dates(
    Json(body): Json<DatesRequest>,
) -> AppResult<Json<DataResponse<ValidationResult>>> {
    let birth = optional_date("birth_date", body.birth_date.as_deref())?;
    let death = optional_date("death_date", body.death_date.as_deref())?;
    let marriage = optional_date("marriage_date", body.marriage_date.as_deref())?;

    let errors = dates::validate_date_consistency(birth, death, marriage);
    Ok(Json(DataResponse {
        data: ValidationResult::from_errors(errors),
    }))
}

// ── Files ────────────────────────────────────────────────────────────

/// File metadata as sent by a client.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct FileInput {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[validate(length(min = 1, max = 127))]
    pub mime_type: String,
    pub size_bytes: u64,
}

impl FileInput {
    pub fn into_meta(self) -> FileMeta {
        FileMeta {
            name: self.name,
            mime_type: self.mime_type,
            size_bytes: self.size_bytes,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct FileCheckRequest {
    #[validate(nested)]
    pub file: FileInput,
    #[serde(default)]
    #[validate(length(max = 100))]
    pub existing_files: Vec<FileMeta>,
}

#[derive(Debug, Serialize)]
pub struct FileValidation {
    pub valid: bool,
    pub error: Option<String>,
}

/// POST /api/v1/validation/file
///
/// Check a file against the configured limits, counting `existing_files`
/// toward the aggregate size and file count.
pub async fn validate_file(
    State(state): State<AppState>,
    Json(body): Json<FileCheckRequest>,
) -> AppResult<Json<DataResponse<FileValidation>>> {
    body.validate()?;
    let error = validate_file_with(
        &state.config.file_limits,
        &body.file.into_meta(),
        &body.existing_files,
    );

    Ok(Json(DataResponse {
        data: FileValidation {
            valid: error.is_none(),
            error,
        },
    }))
}
