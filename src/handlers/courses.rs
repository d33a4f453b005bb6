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
    models::{ApiResponse, Course, CreateCourseRequest, UpdateCourseRequest},
};

use super::medium_param;

/// How many courses the home page shows as popular.
const POPULAR_LIMIT: i64 = 6;

/// list_courses
///
/// [Public Route] Every course, newest first.
#[utoipa::path(
    get,
    path = "/api/courses",
    tag = "courses",
    responses((status = 200, description = "Courses", body = [Course]))
)]
pub async fn list_courses(
    State(state): State<AppState>,
) -> ApiResult<Json<ApiResponse<Vec<Course>>>> {
    let courses = state.repo.list_courses().await?;
    Ok(Json(ApiResponse::list(courses)))
}

/// get_course
#[utoipa::path(
    get,
    path = "/api/courses/{id}",
    tag = "courses",
    params(("id" = Uuid, Path, description = "Course ID")),
    responses(
        (status = 200, description = "Found", body = Course),
        (status = 404, description = "Not Found")
    )
)]
pub async fn get_course(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ApiResponse<Course>>> {
    let course = state
        .repo
        .find_course(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Course"))?;
    Ok(Json(ApiResponse::data(course)))
}

/// popular_courses
///
/// [Public Route] Courses flagged popular, ranked by enrollment.
#[utoipa::path(
    get,
    path = "/api/courses/popular",
    tag = "courses",
    responses((status = 200, description = "Popular courses", body = [Course]))
)]
pub async fn popular_courses(
    State(state): State<AppState>,
) -> ApiResult<Json<ApiResponse<Vec<Course>>>> {
    let courses = state.repo.popular_courses(POPULAR_LIMIT).await?;
    Ok(Json(ApiResponse::list(courses)))
}

/// filter_courses
///
/// [Public Route] Courses for one standard and medium. The standard matches
/// case-insensitively.
#[utoipa::path(
    get,
    path = "/api/courses/filter/{standard}/{medium}",
    tag = "courses",
    params(
        ("standard" = String, Path, description = "Standard, e.g. Class 10"),
        ("medium" = String, Path, description = "gujarati or english")
    ),
    responses(
        (status = 200, description = "Matching courses", body = [Course]),
        (status = 400, description = "Unknown medium")
    )
)]
pub async fn filter_courses(
    State(state): State<AppState>,
    Path((standard, medium)): Path<(String, String)>,
) -> ApiResult<Json<ApiResponse<Vec<Course>>>> {
    let medium = medium_param(&medium)?;
    let courses = state.repo.filter_courses(&standard, medium).await?;
    Ok(Json(ApiResponse::list(courses)))
}

/// create_course
///
/// [Admin Route]
#[utoipa::path(
    post,
    path = "/api/courses",
    tag = "courses",
    request_body = CreateCourseRequest,
    responses(
        (status = 201, description = "Created", body = Course),
        (status = 400, description = "Validation failed"),
        (status = 403, description = "Not an admin")
    )
)]
pub async fn create_course(
    AdminUser(admin): AdminUser,
    State(state): State<AppState>,
    Json(payload): Json<CreateCourseRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<Course>>)> {
    let course = state.repo.create_course(payload.validate()?).await?;
    tracing::info!(course_id = %course.id, admin_id = %admin.id, "course created");
    Ok((StatusCode::CREATED, Json(ApiResponse::data(course))))
}

/// update_course
///
/// [Admin Route] Partial update; enrollment is untouched.
#[utoipa::path(
    put,
    path = "/api/courses/{id}",
    tag = "courses",
    params(("id" = Uuid, Path, description = "Course ID")),
    request_body = UpdateCourseRequest,
    responses(
        (status = 200, description = "Updated", body = Course),
        (status = 404, description = "Not Found")
    )
)]
pub async fn update_course(
    AdminUser(_admin): AdminUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateCourseRequest>,
) -> ApiResult<Json<ApiResponse<Course>>> {
    let payload = payload.validate()?;
    let mut course = state
        .repo
        .find_course(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Course"))?;
    payload.apply(&mut course);
    let saved = state
        .repo
        .save_course(&course)
        .await?
        .ok_or_else(|| ApiError::not_found("Course"))?;
    Ok(Json(ApiResponse::data(saved)))
}

/// delete_course
///
/// [Admin Route]
#[utoipa::path(
    delete,
    path = "/api/courses/{id}",
    tag = "courses",
    params(("id" = Uuid, Path, description = "Course ID")),
    responses(
        (status = 200, description = "Deleted"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn delete_course(
    AdminUser(_admin): AdminUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ApiResponse<()>>> {
    if !state.repo.delete_course(id).await? {
        return Err(ApiError::not_found("Course"));
    }
    Ok(Json(ApiResponse::message("Course deleted successfully")))
}

/// enroll
///
/// [Authenticated Route] Adds the caller to the course's enrollment list.
#[utoipa::path(
    post,
    path = "/api/courses/{id}/enroll",
    tag = "courses",
    params(("id" = Uuid, Path, description = "Course ID")),
    responses(
        (status = 200, description = "Enrolled", body = Course),
        (status = 400, description = "Already enrolled"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn enroll(
    AuthUser { id: user_id, .. }: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ApiResponse<Course>>> {
    let course = state
        .repo
        .find_course(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Course"))?;
    if course.enrolled_students.contains(&user_id) {
        return Err(ApiError::BadRequest(
            "Already enrolled in this course".to_string(),
        ));
    }
    let course = state
        .repo
        .add_enrollment(id, user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Course"))?;
    tracing::info!(course_id = %id, %user_id, "student enrolled");
    Ok(Json(
        ApiResponse::data(course).with_message("Successfully enrolled in course"),
    ))
}

/// unenroll
///
/// [Authenticated Route] Removes the caller from the course's enrollment list.
#[utoipa::path(
    delete,
    path = "/api/courses/{id}/enroll",
    tag = "courses",
    params(("id" = Uuid, Path, description = "Course ID")),
    responses(
        (status = 200, description = "Unenrolled", body = Course),
        (status = 400, description = "Not enrolled"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn unenroll(
    AuthUser { id: user_id, .. }: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ApiResponse<Course>>> {
    let course = state
        .repo
        .find_course(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Course"))?;
    if !course.enrolled_students.contains(&user_id) {
        return Err(ApiError::BadRequest(
            "Not enrolled in this course".to_string(),
        ));
    }
    let course = state
        .repo
        .remove_enrollment(id, user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Course"))?;
    Ok(Json(
        ApiResponse::data(course).with_message("Successfully unenrolled from course"),
    ))
}
