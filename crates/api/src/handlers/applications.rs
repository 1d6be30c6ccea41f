//! Handlers for the `/applications` resource.
//!
//! Citizens submit applications and attach files; staff, officers and admins
//! review them by changing status and adding remarks. Every write goes
//! through the domain methods on [`Application`], which enforce the status
//! table and role rules.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use panchayat_core::application::{Application, ApplicationStatus, AttachedFile};
use panchayat_core::error::CoreError;
use panchayat_core::roles::Role;
use panchayat_core::services::{prepare_submission, ServiceType};
use panchayat_core::types::{ApplicationId, FormRecord};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::handlers::today;
use crate::handlers::validation::FileInput;
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequirePrivileged;
use crate::query::{
    clamp_limit, clamp_offset, ListApplicationsParams, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT,
};
use crate::response::DataResponse;
use crate::state::AppState;
use crate::store::ApplicationFilter;

/// Load an application the caller is allowed to see.
async fn load_visible(
    state: &AppState,
    id: ApplicationId,
    user: &AuthUser,
) -> AppResult<Application> {
    let application = state.store.get(id).await?;
    if !application.is_visible_to(&user.actor()) {
        return Err(AppError::Core(CoreError::Forbidden(format!(
            "User {} may not access application {id}",
            user.user_id
        ))));
    }
    Ok(application)
}

// ── Submission and lookup ────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct SubmitRequest {
    pub service_type: ServiceType,
    pub form_data: FormRecord,
}

/// POST /api/v1/applications
///
/// Auto-correct and validate the form; store it as `pending` when valid,
/// otherwise return 422 with the per-field errors.
pub async fn submit_application(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(body): Json<SubmitRequest>,
) -> AppResult<impl IntoResponse> {
    let prepared = prepare_submission(body.service_type, &body.form_data, today());
    if !prepared.result.is_valid {
        tracing::debug!(
            user_id = %auth.user_id,
            service = body.service_type.as_str(),
            error_count = prepared.result.errors.len(),
            "Submission rejected by validation"
        );
        return Err(AppError::InvalidForm(prepared.result));
    }

    let application = state
        .store
        .insert(Application::new(
            body.service_type,
            auth.user_id.clone(),
            prepared.record,
            Utc::now(),
        ))
        .await;

    tracing::info!(
        user_id = %auth.user_id,
        application_id = %application.id,
        service = application.service_type.as_str(),
        "Application submitted"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: application })))
}

/// GET /api/v1/applications
///
/// Citizens only ever see their own applications; privileged roles see all.
pub async fn list_applications(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<ListApplicationsParams>,
) -> AppResult<Json<DataResponse<Vec<Application>>>> {
    let filter = ApplicationFilter {
        status: params
            .status
            .as_deref()
            .map(ApplicationStatus::parse)
            .transpose()?,
        service_type: params
            .service_type
            .as_deref()
            .map(ServiceType::parse)
            .transpose()?,
        applicant_id: (auth.role == Role::Citizen).then(|| auth.user_id.clone()),
        limit: clamp_limit(params.limit, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT) as usize,
        offset: clamp_offset(params.offset) as usize,
    };

    let data = state.store.list(&filter).await;
    Ok(Json(DataResponse { data }))
}

/// GET /api/v1/applications/{id}
pub async fn get_application(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<ApplicationId>,
) -> AppResult<Json<DataResponse<Application>>> {
    let application = load_visible(&state, id, &auth).await?;
    Ok(Json(DataResponse { data: application }))
}

// ── Review ───────────────────────────────────────────────────────────

#[derive(Debug, Deserialize, Validate)]
pub struct StatusChangeRequest {
    pub status: ApplicationStatus,
    #[validate(length(max = 1000))]
    pub remark: Option<String>,
}

/// PUT /api/v1/applications/{id}/status
///
/// Illegal moves are 409; moves the caller's role may not make are 403.
pub async fn change_status(
    RequirePrivileged(user): RequirePrivileged,
    State(state): State<AppState>,
    Path(id): Path<ApplicationId>,
    Json(body): Json<StatusChangeRequest>,
) -> AppResult<Json<DataResponse<Application>>> {
    body.validate()?;
    let actor = user.actor();

    let application = state
        .store
        .update(id, |app| {
            app.change_status(body.status, &actor, body.remark.as_deref(), Utc::now())
        })
        .await?;

    tracing::info!(
        user_id = %user.user_id,
        role = user.role.as_str(),
        application_id = %id,
        status = body.status.as_str(),
        "Application status changed"
    );

    Ok(Json(DataResponse { data: application }))
}

#[derive(Debug, Deserialize, Validate)]
pub struct RemarkRequest {
    #[validate(length(min = 1, max = 1000))]
    pub text: String,
}

/// POST /api/v1/applications/{id}/remarks
pub async fn add_remark(
    RequirePrivileged(user): RequirePrivileged,
    State(state): State<AppState>,
    Path(id): Path<ApplicationId>,
    Json(body): Json<RemarkRequest>,
) -> AppResult<impl IntoResponse> {
    body.validate()?;
    let actor = user.actor();

    let application = state
        .store
        .update(id, |app| app.add_remark(&actor, &body.text, Utc::now()))
        .await?;

    tracing::info!(user_id = %user.user_id, application_id = %id, "Remark added");

    Ok((StatusCode::CREATED, Json(DataResponse { data: application })))
}

// ── Files ────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct UploadPlan {
    pub file_id: String,
    pub storage_path: String,
}

/// POST /api/v1/applications/{id}/files/check
///
/// Validate a prospective upload against the files already attached and
/// return the object-storage path to upload it to. The client then uploads
/// the bytes and records the upload via `POST /{id}/files`.
pub async fn check_file(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<ApplicationId>,
    Json(file): Json<FileInput>,
) -> AppResult<Json<DataResponse<UploadPlan>>> {
    file.validate()?;
    let application = load_visible(&state, id, &auth).await?;

    let file_id = Uuid::new_v4().to_string();
    let storage_path = application.plan_upload(
        &auth.actor(),
        &file_id,
        &file.into_meta(),
        &state.config.file_limits,
    )?;

    Ok(Json(DataResponse {
        data: UploadPlan {
            file_id,
            storage_path,
        },
    }))
}

#[derive(Debug, Deserialize, Validate)]
pub struct AttachFileRequest {
    /// The id issued by `files/check`.
    pub file_id: Uuid,
    #[validate(nested)]
    pub file: FileInput,
}

/// POST /api/v1/applications/{id}/files
///
/// Record a completed upload. The checks of `files/check` run again, so a
/// stale plan (e.g. another file attached meanwhile) is refused.
pub async fn attach_file(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<ApplicationId>,
    Json(body): Json<AttachFileRequest>,
) -> AppResult<impl IntoResponse> {
    body.validate()?;
    load_visible(&state, id, &auth).await?;

    let actor = auth.actor();
    let limits = state.config.file_limits;
    let file_id = body.file_id.to_string();
    let meta = body.file.into_meta();
    let application = state
        .store
        .update(id, |app| {
            app.attach_file(&actor, &file_id, meta, &limits, Utc::now())
                .map(|_| ())
        })
        .await?;

    let attached: Option<AttachedFile> = application
        .files
        .iter()
        .find(|f| f.file_id == file_id)
        .cloned();
    let attached = attached.ok_or_else(|| {
        AppError::InternalError(format!("Attached file {file_id} missing after update"))
    })?;

    tracing::info!(
        user_id = %auth.user_id,
        application_id = %id,
        file_id = %attached.file_id,
        size_bytes = attached.meta.size_bytes,
        "File attached"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: attached })))
}
