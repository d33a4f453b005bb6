use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::{Duration, Utc};
use serde_json::{Value, json};

use crate::{
    AppState,
    auth::{self, AuthUser},
    config::Env,
    error::{ApiError, ApiResult},
    models::{
        ApiResponse, AuthResponse, ForgotPasswordRequest, LoginRequest, RegisterRequest,
        ResetPasswordRequest, Role, UpdatePasswordRequest, UpdateUserRequest, User, UserRecord,
        check_password,
    },
    password,
    validation::Checks,
};

fn token_response(user: User, state: &AppState) -> ApiResult<Json<AuthResponse>> {
    let token = auth::issue_token(&user, &state.config)?;
    Ok(Json(AuthResponse {
        success: true,
        token,
        user,
    }))
}

/// Looks up the account and checks the password. Unknown email and wrong
/// password produce the same 401.
async fn verify_credentials(state: &AppState, payload: LoginRequest) -> ApiResult<UserRecord> {
    if payload.email.trim().is_empty() || payload.password.is_empty() {
        return Err(ApiError::BadRequest(
            "Please provide an email and password".to_string(),
        ));
    }
    let record = state
        .repo
        .find_user_by_email(&payload.email)
        .await?
        .filter(|record| password::verify_password(&payload.password, &record.password_hash))
        .ok_or_else(|| ApiError::Unauthorized("Invalid credentials".to_string()))?;
    Ok(record)
}

/// register
///
/// [Public Route] Creates a student account and signs it in.
#[utoipa::path(
    post,
    path = "/api/auth/register",
    tag = "auth",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Registered", body = AuthResponse),
        (status = 400, description = "Validation failed"),
        (status = 409, description = "Email already registered")
    )
)]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<AuthResponse>)> {
    let new_user = payload.validate()?;
    let user = auth::create_account(&state.repo, new_user).await?;
    tracing::info!(user_id = %user.id, "student registered");
    Ok((StatusCode::CREATED, token_response(user, &state)?))
}

/// login
///
/// [Public Route] Exchanges email and password for a session token.
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Signed in", body = AuthResponse),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> ApiResult<Json<AuthResponse>> {
    let record = verify_credentials(&state, payload).await?;
    token_response(record.user, &state)
}

/// admin_login
///
/// [Public Route] Same as `login` but only admin accounts may sign in here.
#[utoipa::path(
    post,
    path = "/api/admin/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Signed in", body = AuthResponse),
        (status = 401, description = "Invalid credentials"),
        (status = 403, description = "Not an admin account")
    )
)]
pub async fn admin_login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> ApiResult<Json<AuthResponse>> {
    let record = verify_credentials(&state, payload).await?;
    if record.user.role != Role::Admin {
        tracing::warn!(user_id = %record.user.id, "non-admin attempted admin login");
        return Err(ApiError::Forbidden(
            "Access denied. Admin privileges required".to_string(),
        ));
    }
    token_response(record.user, &state)
}

/// logout
///
/// [Public Route] Tokens are stateless, so this only acknowledges the request.
#[utoipa::path(
    get,
    path = "/api/auth/logout",
    tag = "auth",
    responses((status = 200, description = "Logged out"))
)]
pub async fn logout() -> Json<ApiResponse<()>> {
    Json(ApiResponse::message("User logged out successfully"))
}

/// get_me
///
/// [Authenticated Route] The current user's profile.
#[utoipa::path(
    get,
    path = "/api/auth/me",
    tag = "auth",
    responses(
        (status = 200, description = "Profile", body = User),
        (status = 401, description = "Missing or invalid token")
    )
)]
pub async fn get_me(AuthUser { user, .. }: AuthUser) -> Json<ApiResponse<User>> {
    Json(ApiResponse::data(user))
}

/// update_details
///
/// [Authenticated Route] Edits the caller's own profile. A `role` in the body is ignored.
#[utoipa::path(
    put,
    path = "/api/auth/updatedetails",
    tag = "auth",
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "Updated profile", body = User),
        (status = 409, description = "Email already in use")
    )
)]
pub async fn update_details(
    AuthUser { id, .. }: AuthUser,
    State(state): State<AppState>,
    Json(mut payload): Json<UpdateUserRequest>,
) -> ApiResult<Json<ApiResponse<User>>> {
    payload.role = None;
    let payload = payload.validate()?;
    let mut record = state
        .repo
        .find_user(id)
        .await?
        .ok_or_else(ApiError::unauthorized)?;
    payload.apply(&mut record.user);
    let saved = state
        .repo
        .save_user(&record)
        .await?
        .ok_or_else(|| ApiError::not_found("User"))?;
    Ok(Json(ApiResponse::data(saved.user)))
}

/// update_password
///
/// [Authenticated Route] Changes the caller's password and returns a fresh token.
#[utoipa::path(
    put,
    path = "/api/auth/updatepassword",
    tag = "auth",
    request_body = UpdatePasswordRequest,
    responses(
        (status = 200, description = "Password changed", body = AuthResponse),
        (status = 401, description = "Current password is wrong")
    )
)]
pub async fn update_password(
    AuthUser { id, .. }: AuthUser,
    State(state): State<AppState>,
    Json(payload): Json<UpdatePasswordRequest>,
) -> ApiResult<Json<AuthResponse>> {
    let mut checks = Checks::new();
    check_password(&mut checks, "newPassword", &payload.new_password);
    checks.finish()?;

    let mut record = state
        .repo
        .find_user(id)
        .await?
        .ok_or_else(ApiError::unauthorized)?;
    if !password::verify_password(&payload.current_password, &record.password_hash) {
        return Err(ApiError::Unauthorized("Password is incorrect".to_string()));
    }
    record.password_hash = password::hash_password(&payload.new_password)?;
    let saved = state
        .repo
        .save_user(&record)
        .await?
        .ok_or_else(|| ApiError::not_found("User"))?;
    tracing::info!(user_id = %id, "password changed");
    token_response(saved.user, &state)
}

/// forgot_password
///
/// [Public Route] Issues a single-use reset token valid for ten minutes. There is
/// no mail delivery: the token is logged, and echoed back in local mode.
#[utoipa::path(
    post,
    path = "/api/auth/forgotpassword",
    tag = "auth",
    request_body = ForgotPasswordRequest,
    responses(
        (status = 200, description = "Token issued"),
        (status = 404, description = "No account with that email")
    )
)]
pub async fn forgot_password(
    State(state): State<AppState>,
    Json(payload): Json<ForgotPasswordRequest>,
) -> ApiResult<Json<ApiResponse<Value>>> {
    let mut record = state
        .repo
        .find_user_by_email(&payload.email)
        .await?
        .ok_or_else(|| ApiError::NotFound("There is no user with that email".to_string()))?;

    let token = password::generate_reset_token();
    record.reset_password_token = Some(token.digest);
    record.reset_password_expire =
        Some(Utc::now() + Duration::minutes(password::RESET_TOKEN_TTL_MINUTES));
    state.repo.save_user(&record).await?;

    tracing::info!(user_id = %record.user.id, reset_token = %token.raw, "password reset requested");

    let response = match state.config.env {
        Env::Local => ApiResponse::data(json!({ "resetToken": token.raw })),
        Env::Production => ApiResponse {
            success: true,
            count: None,
            message: None,
            data: None,
        },
    };
    Ok(Json(response.with_message("Password reset token generated")))
}

/// reset_password
///
/// [Public Route] Redeems a reset token, sets the new password and signs the user in.
#[utoipa::path(
    put,
    path = "/api/auth/resetpassword/{token}",
    tag = "auth",
    params(("token" = String, Path, description = "Raw reset token")),
    request_body = ResetPasswordRequest,
    responses(
        (status = 200, description = "Password reset", body = AuthResponse),
        (status = 400, description = "Invalid or expired token")
    )
)]
pub async fn reset_password(
    State(state): State<AppState>,
    Path(token): Path<String>,
    Json(payload): Json<ResetPasswordRequest>,
) -> ApiResult<Json<AuthResponse>> {
    let mut checks = Checks::new();
    check_password(&mut checks, "password", &payload.password);
    checks.finish()?;

    let digest = password::digest_reset_token(&token);
    let mut record = state
        .repo
        .find_user_by_reset_token(&digest, Utc::now())
        .await?
        .ok_or_else(|| ApiError::BadRequest("Invalid token".to_string()))?;

    record.password_hash = password::hash_password(&payload.password)?;
    record.reset_password_token = None;
    record.reset_password_expire = None;
    let saved = state
        .repo
        .save_user(&record)
        .await?
        .ok_or_else(|| ApiError::not_found("User"))?;
    token_response(saved.user, &state)
}
