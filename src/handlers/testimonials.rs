use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::{
    AppState,
    auth::{AdminUser, AuthUser},
    error::{ApiError, ApiResult},
    models::{ApiResponse, CreateTestimonialRequest, Testimonial},
    repository::TestimonialFilter,
};

/// create_testimonial
///
/// [Public Route] Submits a testimonial for moderation. When the request carries
/// a valid token the testimonial is linked to that student.
#[utoipa::path(
    post,
    path = "/api/testimonials",
    tag = "testimonials",
    request_body = CreateTestimonialRequest,
    responses(
        (status = 201, description = "Submitted as pending", body = Testimonial),
        (status = 400, description = "Validation failed")
    )
)]
pub async fn create_testimonial(
    auth: Option<AuthUser>,
    State(state): State<AppState>,
    Json(payload): Json<CreateTestimonialRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<Testimonial>>)> {
    let testimonial = payload.validate(auth.map(|user| user.id))?;
    let testimonial = state.repo.create_testimonial(testimonial).await?;
    tracing::info!(testimonial_id = %testimonial.id, "testimonial submitted");
    Ok((
        StatusCode::CREATED,
        Json(
            ApiResponse::data(testimonial)
                .with_message("Thank you! Your testimonial will appear once approved."),
        ),
    ))
}

/// list_testimonials
///
/// [Public Route] Approved testimonials, featured first.
#[utoipa::path(
    get,
    path = "/api/testimonials",
    tag = "testimonials",
    responses((status = 200, description = "Approved testimonials", body = [Testimonial]))
)]
pub async fn list_testimonials(
    State(state): State<AppState>,
) -> ApiResult<Json<ApiResponse<Vec<Testimonial>>>> {
    let rows = state
        .repo
        .list_testimonials(TestimonialFilter::Approved)
        .await?;
    Ok(Json(ApiResponse::list(rows)))
}

/// featured_testimonials
///
/// [Public Route] Approved and featured, for the home page.
#[utoipa::path(
    get,
    path = "/api/testimonials/featured",
    tag = "testimonials",
    responses((status = 200, description = "Featured testimonials", body = [Testimonial]))
)]
pub async fn featured_testimonials(
    State(state): State<AppState>,
) -> ApiResult<Json<ApiResponse<Vec<Testimonial>>>> {
    let rows = state
        .repo
        .list_testimonials(TestimonialFilter::Featured)
        .await?;
    Ok(Json(ApiResponse::list(rows)))
}

/// all_testimonials
///
/// [Admin Route] The moderation queue: every testimonial in any status.
#[utoipa::path(
    get,
    path = "/api/testimonials/all",
    tag = "testimonials",
    responses((status = 200, description = "All testimonials", body = [Testimonial]))
)]
pub async fn all_testimonials(
    AdminUser(_admin): AdminUser,
    State(state): State<AppState>,
) -> ApiResult<Json<ApiResponse<Vec<Testimonial>>>> {
    let rows = state.repo.list_testimonials(TestimonialFilter::All).await?;
    Ok(Json(ApiResponse::list(rows)))
}

/// Loads the testimonial, runs `apply` on it and writes it back immediately.
async fn transition(
    state: &AppState,
    id: Uuid,
    apply: impl FnOnce(&mut Testimonial),
) -> ApiResult<Testimonial> {
    let mut testimonial = state
        .repo
        .find_testimonial(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Testimonial"))?;
    apply(&mut testimonial);
    state
        .repo
        .save_testimonial(&testimonial)
        .await?
        .ok_or_else(|| ApiError::not_found("Testimonial"))
}

/// approve_testimonial
///
/// [Admin Route] Publishes a testimonial and stamps `approvedAt`.
#[utoipa::path(
    put,
    path = "/api/testimonials/{id}/approve",
    tag = "testimonials",
    params(("id" = Uuid, Path, description = "Testimonial ID")),
    responses(
        (status = 200, description = "Approved", body = Testimonial),
        (status = 404, description = "Not Found")
    )
)]
pub async fn approve_testimonial(
    AdminUser(admin): AdminUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ApiResponse<Testimonial>>> {
    let testimonial = transition(&state, id, Testimonial::approve).await?;
    tracing::info!(testimonial_id = %id, admin_id = %admin.id, "testimonial approved");
    Ok(Json(ApiResponse::data(testimonial)))
}

/// reject_testimonial
///
/// [Admin Route]
#[utoipa::path(
    put,
    path = "/api/testimonials/{id}/reject",
    tag = "testimonials",
    params(("id" = Uuid, Path, description = "Testimonial ID")),
    responses(
        (status = 200, description = "Rejected", body = Testimonial),
        (status = 404, description = "Not Found")
    )
)]
pub async fn reject_testimonial(
    AdminUser(admin): AdminUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ApiResponse<Testimonial>>> {
    let testimonial = transition(&state, id, Testimonial::reject).await?;
    tracing::info!(testimonial_id = %id, admin_id = %admin.id, "testimonial rejected");
    Ok(Json(ApiResponse::data(testimonial)))
}

/// feature_testimonial
///
/// [Admin Route] Flips the featured flag. Status is unaffected.
#[utoipa::path(
    put,
    path = "/api/testimonials/{id}/feature",
    tag = "testimonials",
    params(("id" = Uuid, Path, description = "Testimonial ID")),
    responses(
        (status = 200, description = "Toggled", body = Testimonial),
        (status = 404, description = "Not Found")
    )
)]
pub async fn feature_testimonial(
    AdminUser(_admin): AdminUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ApiResponse<Testimonial>>> {
    let testimonial = transition(&state, id, Testimonial::toggle_featured).await?;
    Ok(Json(ApiResponse::data(testimonial)))
}
