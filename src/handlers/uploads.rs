use axum::{
    Json,
    extract::{Multipart, Path, State, multipart::MultipartError},
    http::StatusCode,
};
use base64::{Engine, engine::general_purpose::STANDARD};
use uuid::Uuid;

use crate::{
    AppState,
    auth::{AdminUser, AuthUser},
    error::{ApiError, ApiResult},
    models::{ApiResponse, Base64UploadRequest, UploadConfig, UploadedImage},
    storage::sanitize_key,
};

/// Largest accepted image, in bytes.
pub const MAX_FILE_SIZE: usize = 5 * 1024 * 1024;
/// Most files accepted by one `/upload/multiple` request.
pub const MAX_FILES: usize = 10;
pub const ALLOWED_TYPES: [&str; 4] = ["image/jpeg", "image/png", "image/webp", "image/gif"];

/// Request body cap for the upload routes: a full batch plus multipart framing.
pub const UPLOAD_BODY_LIMIT: usize = MAX_FILES * MAX_FILE_SIZE + 1024 * 1024;

fn extension(content_type: &str) -> Option<&'static str> {
    match content_type {
        "image/jpeg" => Some("jpg"),
        "image/png" => Some("png"),
        "image/webp" => Some("webp"),
        "image/gif" => Some("gif"),
        _ => None,
    }
}

fn multipart_error(err: MultipartError) -> ApiError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::PayloadTooLarge("Upload exceeds the request size limit".to_string())
    } else {
        ApiError::BadRequest(err.body_text())
    }
}

/// Checks type and size, then writes the object under a fresh flat key.
async fn store_image(
    state: &AppState,
    content_type: &str,
    bytes: Vec<u8>,
) -> ApiResult<UploadedImage> {
    let ext = extension(content_type).ok_or_else(|| {
        ApiError::BadRequest("Only image files are allowed (jpeg, png, webp, gif)".to_string())
    })?;
    if bytes.is_empty() {
        return Err(ApiError::BadRequest("Uploaded file is empty".to_string()));
    }
    if bytes.len() > MAX_FILE_SIZE {
        return Err(ApiError::PayloadTooLarge(
            "File too large. Maximum size is 5MB".to_string(),
        ));
    }
    let public_id = format!("trimurti-{}.{}", Uuid::new_v4(), ext);
    let size = bytes.len();
    let url = state
        .storage
        .put_object(&public_id, content_type, bytes)
        .await?;
    tracing::debug!(%public_id, size, "image stored");
    Ok(UploadedImage {
        public_id,
        url,
        content_type: content_type.to_string(),
        size,
    })
}

/// Collects the image parts named `field` from the form.
async fn image_parts(
    multipart: &mut Multipart,
    field: &str,
    limit: usize,
) -> ApiResult<Vec<(String, Vec<u8>)>> {
    let mut parts = Vec::new();
    while let Some(part) = multipart.next_field().await.map_err(multipart_error)? {
        if part.name() != Some(field) {
            continue;
        }
        if parts.len() == limit {
            return Err(ApiError::BadRequest(format!(
                "Too many files. Maximum is {limit}"
            )));
        }
        let content_type = part.content_type().unwrap_or_default().to_string();
        let bytes = part.bytes().await.map_err(multipart_error)?;
        parts.push((content_type, bytes.to_vec()));
    }
    if parts.is_empty() {
        return Err(ApiError::BadRequest("Please upload a file".to_string()));
    }
    Ok(parts)
}

/// upload_image
///
/// [Authenticated Route] Stores a single image sent as multipart field `image`.
#[utoipa::path(
    post,
    path = "/api/upload/image",
    tag = "upload",
    request_body(content_type = "multipart/form-data", description = "Form with one `image` file"),
    responses(
        (status = 201, description = "Stored", body = UploadedImage),
        (status = 400, description = "Missing file or wrong type"),
        (status = 413, description = "File too large")
    )
)]
pub async fn upload_image(
    AuthUser { id, .. }: AuthUser,
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> ApiResult<(StatusCode, Json<ApiResponse<UploadedImage>>)> {
    let mut parts = image_parts(&mut multipart, "image", 1).await?;
    let (content_type, bytes) = parts.remove(0);
    let image = store_image(&state, &content_type, bytes).await?;
    tracing::info!(public_id = %image.public_id, user_id = %id, "image uploaded");
    Ok((StatusCode::CREATED, Json(ApiResponse::data(image))))
}

/// upload_multiple
///
/// [Authenticated Route] Stores up to ten images sent as multipart fields `images`.
/// Every file is checked before any is stored.
#[utoipa::path(
    post,
    path = "/api/upload/multiple",
    tag = "upload",
    request_body(content_type = "multipart/form-data", description = "Form with `images` files"),
    responses(
        (status = 201, description = "Stored", body = [UploadedImage]),
        (status = 400, description = "Missing files, wrong type or too many"),
        (status = 413, description = "A file is too large")
    )
)]
pub async fn upload_multiple(
    AuthUser { id, .. }: AuthUser,
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> ApiResult<(StatusCode, Json<ApiResponse<Vec<UploadedImage>>>)> {
    let parts = image_parts(&mut multipart, "images", MAX_FILES).await?;
    for (content_type, bytes) in &parts {
        if extension(content_type).is_none() {
            return Err(ApiError::BadRequest(
                "Only image files are allowed (jpeg, png, webp, gif)".to_string(),
            ));
        }
        if bytes.len() > MAX_FILE_SIZE {
            return Err(ApiError::PayloadTooLarge(
                "File too large. Maximum size is 5MB".to_string(),
            ));
        }
    }
    let mut stored = Vec::with_capacity(parts.len());
    for (content_type, bytes) in parts {
        stored.push(store_image(&state, &content_type, bytes).await?);
    }
    tracing::info!(count = stored.len(), user_id = %id, "images uploaded");
    Ok((StatusCode::CREATED, Json(ApiResponse::list(stored))))
}

/// Splits a `data:<type>;base64,<payload>` URL, or passes raw base64 through.
fn split_data_url(image: &str) -> (Option<&str>, &str) {
    match image.strip_prefix("data:").and_then(|rest| rest.split_once(";base64,")) {
        Some((content_type, payload)) => (Some(content_type), payload),
        None => (None, image),
    }
}

/// upload_base64
///
/// [Authenticated Route] Stores an image sent as a data URL or raw base64.
#[utoipa::path(
    post,
    path = "/api/upload/base64",
    tag = "upload",
    request_body = Base64UploadRequest,
    responses(
        (status = 201, description = "Stored", body = UploadedImage),
        (status = 400, description = "Missing or undecodable image"),
        (status = 413, description = "File too large")
    )
)]
pub async fn upload_base64(
    AuthUser { id, .. }: AuthUser,
    State(state): State<AppState>,
    Json(payload): Json<Base64UploadRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<UploadedImage>>)> {
    let image = payload.image.trim();
    if image.is_empty() {
        return Err(ApiError::BadRequest("Please provide image data".to_string()));
    }
    let (embedded_type, encoded) = split_data_url(image);
    let content_type = embedded_type
        .or(payload.content_type.as_deref())
        .ok_or_else(|| ApiError::BadRequest("Please provide the image content type".to_string()))?
        .to_string();
    let bytes = STANDARD
        .decode(encoded)
        .map_err(|_| ApiError::BadRequest("Invalid base64 image data".to_string()))?;
    let image = store_image(&state, &content_type, bytes).await?;
    tracing::info!(public_id = %image.public_id, user_id = %id, "image uploaded");
    Ok((StatusCode::CREATED, Json(ApiResponse::data(image))))
}

/// delete_upload
///
/// [Admin Route] Deletes a stored object by its `publicId`.
#[utoipa::path(
    delete,
    path = "/api/upload/{publicId}",
    tag = "upload",
    params(("publicId" = String, Path, description = "Object key returned by an upload")),
    responses(
        (status = 200, description = "Deleted"),
        (status = 400, description = "Empty key")
    )
)]
pub async fn delete_upload(
    AdminUser(_admin): AdminUser,
    State(state): State<AppState>,
    Path(public_id): Path<String>,
) -> ApiResult<Json<ApiResponse<()>>> {
    let key = sanitize_key(&public_id);
    if key.is_empty() {
        return Err(ApiError::BadRequest("Invalid image id".to_string()));
    }
    state.storage.delete_object(&key).await?;
    tracing::info!(public_id = %key, "image deleted");
    Ok(Json(ApiResponse::message("Image deleted successfully")))
}

/// upload_config
///
/// [Public Route] The limits clients should enforce before uploading.
#[utoipa::path(
    get,
    path = "/api/upload/config",
    tag = "upload",
    responses((status = 200, description = "Upload limits", body = UploadConfig))
)]
pub async fn upload_config(State(state): State<AppState>) -> Json<ApiResponse<UploadConfig>> {
    Json(ApiResponse::data(UploadConfig {
        max_file_size: MAX_FILE_SIZE,
        max_files: MAX_FILES,
        allowed_types: ALLOWED_TYPES.iter().map(|t| t.to_string()).collect(),
        base_url: state.storage.public_url("").trim_end_matches('/').to_string(),
    }))
}
