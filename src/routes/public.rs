use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{get, post, put},
};

/// Public Router Module
///
/// Endpoints reachable without a token: the read side of the marketing site,
/// the public forms (contact, admissions, testimonials) and the sign-in flows.
///
/// `POST /testimonials` is public but still reads an optional bearer token so a
/// signed-in student is linked to their submission.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health))
        // --- Auth ---
        .route("/auth/register", post(handlers::auth::register))
        .route("/auth/login", post(handlers::auth::login))
        .route("/admin/login", post(handlers::auth::admin_login))
        .route("/auth/logout", get(handlers::auth::logout))
        .route("/auth/forgotpassword", post(handlers::auth::forgot_password))
        .route(
            "/auth/resetpassword/{token}",
            put(handlers::auth::reset_password),
        )
        // --- Courses ---
        .route("/courses", get(handlers::courses::list_courses))
        .route("/courses/popular", get(handlers::courses::popular_courses))
        .route(
            "/courses/filter/{standard}/{medium}",
            get(handlers::courses::filter_courses),
        )
        .route("/courses/{id}", get(handlers::courses::get_course))
        // --- Forms ---
        .route("/contact", post(handlers::contacts::create_contact))
        .route("/admissions", post(handlers::admissions::create_admission))
        // --- Gallery ---
        .route("/gallery", get(handlers::gallery::list_gallery))
        .route("/gallery/{id}", get(handlers::gallery::gallery_by_category))
        // --- Testimonials ---
        .route(
            "/testimonials",
            get(handlers::testimonials::list_testimonials)
                .post(handlers::testimonials::create_testimonial),
        )
        .route(
            "/testimonials/featured",
            get(handlers::testimonials::featured_testimonials),
        )
        // --- Uploads ---
        .route("/upload/config", get(handlers::uploads::upload_config))
}
