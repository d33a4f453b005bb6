use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::{
    AppState,
    auth::{self, AdminUser},
    error::{ApiError, ApiResult},
    models::{ApiResponse, CreateUserRequest, UpdateUserRequest, User, UserStats},
};

use super::medium_param;

/// list_users
///
/// [Admin Route]
#[utoipa::path(
    get,
    path = "/api/users",
    tag = "users",
    responses((status = 200, description = "Users", body = [User]))
)]
pub async fn list_users(
    AdminUser(_admin): AdminUser,
    State(state): State<AppState>,
) -> ApiResult<Json<ApiResponse<Vec<User>>>> {
    Ok(Json(ApiResponse::list(state.repo.list_users().await?)))
}

/// get_user
///
/// [Admin Route]
#[utoipa::path(
    get,
    path = "/api/users/{id}",
    tag = "users",
    params(("id" = Uuid, Path, description = "User ID")),
    responses(
        (status = 200, description = "Found", body = User),
        (status = 404, description = "Not Found")
    )
)]
pub async fn get_user(
    AdminUser(_admin): AdminUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ApiResponse<User>>> {
    let record = state
        .repo
        .find_user(id)
        .await?
        .ok_or_else(|| ApiError::not_found("User"))?;
    Ok(Json(ApiResponse::data(record.user)))
}

/// create_user
///
/// [Admin Route] Creates an account with any role.
#[utoipa::path(
    post,
    path = "/api/users",
    tag = "users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "Created", body = User),
        (status = 400, description = "Validation failed"),
        (status = 409, description = "Email already registered")
    )
)]
pub async fn create_user(
    AdminUser(admin): AdminUser,
    State(state): State<AppState>,
    Json(payload): Json<CreateUserRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<User>>)> {
    let user = auth::create_account(&state.repo, payload.validate()?).await?;
    tracing::info!(user_id = %user.id, role = %user.role, admin_id = %admin.id, "user created");
    Ok((StatusCode::CREATED, Json(ApiResponse::data(user))))
}

/// update_user
///
/// [Admin Route] Partial update, including role changes.
#[utoipa::path(
    put,
    path = "/api/users/{id}",
    tag = "users",
    params(("id" = Uuid, Path, description = "User ID")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "Updated", body = User),
        (status = 404, description = "Not Found")
    )
)]
pub async fn update_user(
    AdminUser(_admin): AdminUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateUserRequest>,
) -> ApiResult<Json<ApiResponse<User>>> {
    let payload = payload.validate()?;
    let mut record = state
        .repo
        .find_user(id)
        .await?
        .ok_or_else(|| ApiError::not_found("User"))?;
    payload.apply(&mut record.user);
    let saved = state
        .repo
        .save_user(&record)
        .await?
        .ok_or_else(|| ApiError::not_found("User"))?;
    Ok(Json(ApiResponse::data(saved.user)))
}

/// delete_user
///
/// [Admin Route] An admin cannot delete their own account.
#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    tag = "users",
    params(("id" = Uuid, Path, description = "User ID")),
    responses(
        (status = 200, description = "Deleted"),
        (status = 400, description = "Attempted self-deletion"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn delete_user(
    AdminUser(admin): AdminUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ApiResponse<()>>> {
    if admin.id == id {
        return Err(ApiError::BadRequest(
            "You cannot delete your own account".to_string(),
        ));
    }
    if !state.repo.delete_user(id).await? {
        return Err(ApiError::not_found("User"));
    }
    tracing::info!(user_id = %id, admin_id = %admin.id, "user deleted");
    Ok(Json(ApiResponse::message("User deleted successfully")))
}

/// students_by_class
///
/// [Admin Route] Students of one standard and medium, by name.
#[utoipa::path(
    get,
    path = "/api/users/students/{standard}/{medium}",
    tag = "users",
    params(
        ("standard" = String, Path, description = "Standard"),
        ("medium" = String, Path, description = "gujarati or english")
    ),
    responses(
        (status = 200, description = "Students", body = [User]),
        (status = 400, description = "Unknown medium")
    )
)]
pub async fn students_by_class(
    AdminUser(_admin): AdminUser,
    State(state): State<AppState>,
    Path((standard, medium)): Path<(String, String)>,
) -> ApiResult<Json<ApiResponse<Vec<User>>>> {
    let medium = medium_param(&medium)?;
    let students = state.repo.list_students(&standard, medium).await?;
    Ok(Json(ApiResponse::list(students)))
}

/// user_stats
///
/// [Admin Route]
#[utoipa::path(
    get,
    path = "/api/users/stats",
    tag = "users",
    responses((status = 200, description = "Stats", body = UserStats))
)]
pub async fn user_stats(
    AdminUser(_admin): AdminUser,
    State(state): State<AppState>,
) -> ApiResult<Json<ApiResponse<UserStats>>> {
    Ok(Json(ApiResponse::data(state.repo.user_stats().await?)))
}
