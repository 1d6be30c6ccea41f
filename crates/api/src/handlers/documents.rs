//! Handlers for the `/documents` resource.
//!
//! Citizen documents (identity proofs, land records and so on) are stored
//! under the citizen's own prefix, independent of any application.

use axum::extract::State;
use axum::Json;
use panchayat_core::error::CoreError;
use panchayat_core::services::is_document_category;
use panchayat_core::storage::document_path;
use panchayat_core::validation::files::validate_file_with;
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::error::AppResult;
use crate::handlers::applications::UploadPlan;
use crate::handlers::validation::FileInput;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct DocumentUploadRequest {
    #[validate(length(min = 1, max = 64))]
    pub category: String,
    #[validate(nested)]
    pub file: FileInput,
}

/// POST /api/v1/documents/check
///
/// Validate a document upload and return the object-storage path for it.
pub async fn check_document(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(body): Json<DocumentUploadRequest>,
) -> AppResult<Json<DataResponse<UploadPlan>>> {
    body.validate()?;

    let category = body.category.trim();
    if !is_document_category(category) {
        return Err(CoreError::Validation(format!("Unknown document category '{category}'")).into());
    }
    if let Some(message) = validate_file_with(&state.config.file_limits, &body.file.into_meta(), &[])
    {
        return Err(CoreError::Validation(message).into());
    }

    let file_id = Uuid::new_v4().to_string();
    let storage_path = document_path(&auth.user_id, category, &file_id);

    tracing::debug!(user_id = %auth.user_id, category, file_id = %file_id, "Document upload planned");

    Ok(Json(DataResponse {
        data: UploadPlan {
            file_id,
            storage_path,
        },
    }))
}
