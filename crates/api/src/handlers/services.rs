//! Handlers for the `/services` resource.
//!
//! Everything here is a dry run over the service catalogue: form
//! definitions, whole-record and per-step validation, wizard navigation and
//! required documents. Nothing is persisted.

use axum::extract::Path;
use axum::Json;
use panchayat_core::error::CoreError;
use panchayat_core::services::{
    prepare_submission, required_documents as documents_for, DocumentRequirement, FormDefinition,
    PreparedSubmission, ServiceType,
};
use panchayat_core::types::FormRecord;
use panchayat_core::validation::autocorrect::auto_correct_record;
use panchayat_core::validation::rules::ValidationResult;
use panchayat_core::wizard;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::handlers::today;
use crate::response::DataResponse;

/// Resolve the `{service}` path segment.
fn service_from_path(service: &str) -> AppResult<ServiceType> {
    ServiceType::parse(service).map_err(|_| {
        AppError::Core(CoreError::NotFound {
            entity: "Service",
            id: service.to_string(),
        })
    })
}

// ── Catalogue ─────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct ServiceSummary {
    pub service_type: ServiceType,
    pub label: &'static str,
    pub step_count: usize,
}

/// GET /api/v1/services
pub async fn list_services() -> Json<DataResponse<Vec<ServiceSummary>>> {
    let data = ServiceType::ALL
        .into_iter()
        .map(|service_type| ServiceSummary {
            service_type,
            label: service_type.label(),
            step_count: service_type.form().steps.len(),
        })
        .collect();
    Json(DataResponse { data })
}

/// GET /api/v1/services/{service}/form
pub async fn get_form(
    Path(service): Path<String>,
) -> AppResult<Json<DataResponse<FormDefinition>>> {
    let service = service_from_path(&service)?;
    Ok(Json(DataResponse {
        data: service.form(),
    }))
}

// ── Validation ────────────────────────────────────────────────────────

/// Request body carrying the answers entered so far.
#[derive(Debug, Deserialize)]
pub struct RecordRequest {
    #[serde(default)]
    pub record: FormRecord,
}

/// POST /api/v1/services/{service}/validate
///
/// Run the full submission pipeline without storing anything. Always 200;
/// the outcome is in `data.result`.
pub async fn validate_record(
    Path(service): Path<String>,
    Json(body): Json<RecordRequest>,
) -> AppResult<Json<DataResponse<PreparedSubmission>>> {
    let service = service_from_path(&service)?;
    let prepared = prepare_submission(service, &body.record, today());

    tracing::debug!(
        service = service.as_str(),
        is_valid = prepared.result.is_valid,
        error_count = prepared.result.errors.len(),
        "Validated record"
    );

    Ok(Json(DataResponse { data: prepared }))
}

/// Outcome of validating a single wizard step.
#[derive(Debug, Serialize)]
pub struct StepValidation {
    pub step_id: String,
    pub result: ValidationResult,
    pub can_advance: bool,
    pub next_step: Option<usize>,
    pub previous_step: Option<usize>,
    pub is_last_step: bool,
}

/// POST /api/v1/services/{service}/steps/{index}/validate
///
/// Validate the fields of one step (after auto-correction) and report
/// where the wizard may go next.
pub async fn validate_step(
    Path((service, index)): Path<(String, usize)>,
    Json(body): Json<RecordRequest>,
) -> AppResult<Json<DataResponse<StepValidation>>> {
    let service = service_from_path(&service)?;
    let form = service.form();
    let record = auto_correct_record(&body.record, &form.rules);

    let result = wizard::validate_step(&form.steps, &form.rules, index, &record)?;
    let data = StepValidation {
        step_id: form.steps[index].id.clone(),
        can_advance: result.is_valid,
        next_step: wizard::next_step(&form.steps, index, &record),
        previous_step: wizard::previous_step(&form.steps, index, &record),
        is_last_step: wizard::is_last_step(&form.steps, index, &record),
        result,
    };

    Ok(Json(DataResponse { data }))
}

#[derive(Debug, Deserialize)]
pub struct TransitionRequest {
    pub current: usize,
    pub next: usize,
    #[serde(default)]
    pub record: FormRecord,
}

#[derive(Debug, Serialize)]
pub struct TransitionCheck {
    pub allowed: bool,
    /// Errors on the current step that block moving forward.
    pub result: ValidationResult,
}

/// POST /api/v1/services/{service}/steps/transition
///
/// A move must go to the adjacent visible step. Moving forward additionally
/// requires the current step to be valid; moving back never does.
pub async fn check_transition(
    Path(service): Path<String>,
    Json(body): Json<TransitionRequest>,
) -> AppResult<Json<DataResponse<TransitionCheck>>> {
    let service = service_from_path(&service)?;
    let form = service.form();
    let record = auto_correct_record(&body.record, &form.rules);

    wizard::validate_step_transition(&form.steps, body.current, body.next, &record)?;

    let result = if body.next > body.current {
        wizard::validate_step(&form.steps, &form.rules, body.current, &record)?
    } else {
        ValidationResult::from_errors(Default::default())
    };

    Ok(Json(DataResponse {
        data: TransitionCheck {
            allowed: result.is_valid,
            result,
        },
    }))
}

// ── Documents ─────────────────────────────────────────────────────────

/// POST /api/v1/services/{service}/documents
pub async fn required_documents(
    Path(service): Path<String>,
    Json(body): Json<RecordRequest>,
) -> AppResult<Json<DataResponse<Vec<DocumentRequirement>>>> {
    let service = service_from_path(&service)?;
    Ok(Json(DataResponse {
        data: documents_for(service, &body.record),
    }))
}
