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
    models::{ApiResponse, CreateGalleryImageRequest, GalleryImage, UpdateGalleryImageRequest},
};

/// list_gallery
///
/// [Public Route] Every gallery image, newest first.
#[utoipa::path(
    get,
    path = "/api/gallery",
    tag = "gallery",
    responses((status = 200, description = "Images", body = [GalleryImage]))
)]
pub async fn list_gallery(
    State(state): State<AppState>,
) -> ApiResult<Json<ApiResponse<Vec<GalleryImage>>>> {
    Ok(Json(ApiResponse::list(state.repo.list_gallery(None).await?)))
}

/// gallery_by_category
///
/// [Public Route] Images in one category (case-insensitive).
#[utoipa::path(
    get,
    path = "/api/gallery/{category}",
    tag = "gallery",
    params(("category" = String, Path, description = "Category name")),
    responses((status = 200, description = "Images", body = [GalleryImage]))
)]
pub async fn gallery_by_category(
    State(state): State<AppState>,
    Path(category): Path<String>,
) -> ApiResult<Json<ApiResponse<Vec<GalleryImage>>>> {
    let images = state.repo.list_gallery(Some(category.trim())).await?;
    Ok(Json(ApiResponse::list(images)))
}

/// create_gallery_image
///
/// [Admin Route] Registers an already-uploaded image in the gallery.
#[utoipa::path(
    post,
    path = "/api/gallery",
    tag = "gallery",
    request_body = CreateGalleryImageRequest,
    responses(
        (status = 201, description = "Created", body = GalleryImage),
        (status = 400, description = "Validation failed")
    )
)]
pub async fn create_gallery_image(
    AdminUser(_admin): AdminUser,
    State(state): State<AppState>,
    Json(payload): Json<CreateGalleryImageRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<GalleryImage>>)> {
    let image = state.repo.create_gallery_image(payload.validate()?).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::data(image))))
}

/// update_gallery_image
///
/// [Admin Route]
#[utoipa::path(
    put,
    path = "/api/gallery/{id}",
    tag = "gallery",
    params(("id" = Uuid, Path, description = "Image ID")),
    request_body = UpdateGalleryImageRequest,
    responses(
        (status = 200, description = "Updated", body = GalleryImage),
        (status = 404, description = "Not Found")
    )
)]
pub async fn update_gallery_image(
    AdminUser(_admin): AdminUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateGalleryImageRequest>,
) -> ApiResult<Json<ApiResponse<GalleryImage>>> {
    let payload = payload.validate()?;
    let mut image = state
        .repo
        .find_gallery_image(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Gallery image"))?;
    payload.apply(&mut image);
    let saved = state
        .repo
        .save_gallery_image(&image)
        .await?
        .ok_or_else(|| ApiError::not_found("Gallery image"))?;
    Ok(Json(ApiResponse::data(saved)))
}

/// delete_gallery_image
///
/// [Admin Route] Removes the record, then the stored object if it has one.
/// A storage failure is logged; the record stays deleted.
#[utoipa::path(
    delete,
    path = "/api/gallery/{id}",
    tag = "gallery",
    params(("id" = Uuid, Path, description = "Image ID")),
    responses(
        (status = 200, description = "Deleted"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn delete_gallery_image(
    AdminUser(_admin): AdminUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ApiResponse<()>>> {
    let image = state
        .repo
        .delete_gallery_image(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Gallery image"))?;
    if let Some(public_id) = &image.public_id {
        if let Err(e) = state.storage.delete_object(public_id).await {
            tracing::warn!(%public_id, "stored image not removed: {e}");
        }
    }
    Ok(Json(ApiResponse::message("Gallery image deleted successfully")))
}
