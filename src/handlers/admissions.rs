use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::{
    AppState,
    auth::AdminUser,
    error::{ApiError, ApiResult},
    models::{Admission, ApiResponse, CreateAdmissionRequest},
};

/// create_admission
///
/// [Public Route] Records an admission inquiry from the public form.
#[utoipa::path(
    post,
    path = "/api/admissions",
    tag = "admissions",
    request_body = CreateAdmissionRequest,
    responses(
        (status = 201, description = "Submitted", body = Admission),
        (status = 400, description = "Validation failed")
    )
)]
pub async fn create_admission(
    State(state): State<AppState>,
    Json(payload): Json<CreateAdmissionRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<Admission>>)> {
    let admission = state.repo.create_admission(payload.validate()?).await?;
    tracing::info!(
        admission_id = %admission.id,
        standard = %admission.standard,
        "admission inquiry received"
    );
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::data(admission).with_message("Admission form submitted successfully")),
    ))
}

/// list_admissions
///
/// [Admin Route] Newest first.
#[utoipa::path(
    get,
    path = "/api/admissions",
    tag = "admissions",
    responses((status = 200, description = "Admissions", body = [Admission]))
)]
pub async fn list_admissions(
    AdminUser(_admin): AdminUser,
    State(state): State<AppState>,
) -> ApiResult<Json<ApiResponse<Vec<Admission>>>> {
    Ok(Json(ApiResponse::list(state.repo.list_admissions().await?)))
}

/// delete_admission
///
/// [Admin Route]
#[utoipa::path(
    delete,
    path = "/api/admissions/{id}",
    tag = "admissions",
    params(("id" = Uuid, Path, description = "Admission ID")),
    responses(
        (status = 200, description = "Deleted"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn delete_admission(
    AdminUser(_admin): AdminUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ApiResponse<()>>> {
    if !state.repo.delete_admission(id).await? {
        return Err(ApiError::not_found("Admission"));
    }
    Ok(Json(ApiResponse::message("Admission deleted successfully")))
}
