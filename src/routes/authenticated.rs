use crate::{
    AppState,
    handlers::{self, uploads::UPLOAD_BODY_LIMIT},
};
use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post, put},
};

/// Authenticated Router Module
///
/// Routes for any signed-in user, student or admin. The router is wrapped in the
/// auth middleware in `create_router`, so every request here has already
/// resolved an `AuthUser`.
pub fn authenticated_routes() -> Router<AppState> {
    Router::<AppState>::new()
        // --- Own account ---
        .route("/auth/me", get(handlers::auth::get_me))
        .route("/auth/updatedetails", put(handlers::auth::update_details))
        .route("/auth/updatepassword", put(handlers::auth::update_password))
        // --- Enrollment ---
        // POST enrolls the caller, DELETE withdraws them.
        .route(
            "/courses/{id}/enroll",
            post(handlers::courses::enroll).delete(handlers::courses::unenroll),
        )
        // --- Uploads ---
        // Image bodies exceed axum's default 2 MB limit.
        .route(
            "/upload/image",
            post(handlers::uploads::upload_image).layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT)),
        )
        .route(
            "/upload/multiple",
            post(handlers::uploads::upload_multiple)
                .layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT)),
        )
        .route(
            "/upload/base64",
            post(handlers::uploads::upload_base64).layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT)),
        )
}
