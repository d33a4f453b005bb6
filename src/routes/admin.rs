use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{delete, get, post, put},
};

/// Admin Router Module
///
/// Management endpoints for the admin dashboard. Every handler here takes the
/// `AdminUser` extractor, which answers 401 without a valid token and 403 for
/// a non-admin account.
///
/// Several paths share a prefix with public routes (`/courses`, `/gallery/{id}`,
/// `/testimonials`); the routers are merged per method.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        // --- Courses ---
        .route("/courses", post(handlers::courses::create_course))
        .route(
            "/courses/{id}",
            put(handlers::courses::update_course).delete(handlers::courses::delete_course),
        )
        // --- Contact messages ---
        .route("/contact", get(handlers::contacts::list_contacts))
        .route("/contact/stats", get(handlers::contacts::contact_stats))
        .route(
            "/contact/{id}",
            get(handlers::contacts::get_contact)
                .put(handlers::contacts::update_contact)
                .delete(handlers::contacts::delete_contact),
        )
        // --- Users ---
        .route(
            "/users",
            get(handlers::users::list_users).post(handlers::users::create_user),
        )
        .route("/users/stats", get(handlers::users::user_stats))
        .route(
            "/users/students/{standard}/{medium}",
            get(handlers::users::students_by_class),
        )
        .route(
            "/users/{id}",
            get(handlers::users::get_user)
                .put(handlers::users::update_user)
                .delete(handlers::users::delete_user),
        )
        // --- Admissions ---
        .route("/admissions", get(handlers::admissions::list_admissions))
        .route(
            "/admissions/{id}",
            delete(handlers::admissions::delete_admission),
        )
        // --- Gallery ---
        .route("/gallery", post(handlers::gallery::create_gallery_image))
        .route(
            "/gallery/{id}",
            put(handlers::gallery::update_gallery_image)
                .delete(handlers::gallery::delete_gallery_image),
        )
        // --- Uploads ---
        .route("/upload/{public_id}", delete(handlers::uploads::delete_upload))
        // --- Testimonial moderation ---
        .route("/testimonials/all", get(handlers::testimonials::all_testimonials))
        .route(
            "/testimonials/{id}/approve",
            put(handlers::testimonials::approve_testimonial),
        )
        .route(
            "/testimonials/{id}/reject",
            put(handlers::testimonials::reject_testimonial),
        )
        .route(
            "/testimonials/{id}/feature",
            put(handlers::testimonials::feature_testimonial),
        )
}
