use axum::{
    Router,
    extract::{FromRef, Request},
    http::HeaderName,
    middleware::{self, Next},
    response::Response,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::{DefaultOnResponse, TraceLayer},
};
use tracing::{Level, Span};

// --- Module Structure ---

// Server side.
pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod memory;
pub mod models;
pub mod password;
pub mod repository;
pub mod storage;
pub mod validation;

// Access tiers (public, authenticated, admin).
pub mod routes;
use auth::AuthUser;
use routes::{admin, authenticated, public};

// Typed session client for the API.
pub mod client;

// --- Public Re-exports ---

pub use config::AppConfig;
pub use error::{ApiError, ApiResult};
pub use memory::MemoryRepository;
pub use repository::{PostgresRepository, RepositoryState};
pub use storage::{MockStorageService, S3StorageClient, StorageState};

/// ApiDoc
///
/// The OpenAPI document served at `/api-docs/openapi.json`, assembled from the
/// `#[utoipa::path]` handlers and `ToSchema` models.
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::health,
        handlers::auth::register, handlers::auth::login, handlers::auth::admin_login,
        handlers::auth::logout, handlers::auth::get_me, handlers::auth::update_details,
        handlers::auth::update_password, handlers::auth::forgot_password,
        handlers::auth::reset_password,
        handlers::courses::list_courses, handlers::courses::get_course,
        handlers::courses::popular_courses, handlers::courses::filter_courses,
        handlers::courses::create_course, handlers::courses::update_course,
        handlers::courses::delete_course, handlers::courses::enroll, handlers::courses::unenroll,
        handlers::contacts::create_contact, handlers::contacts::list_contacts,
        handlers::contacts::get_contact, handlers::contacts::update_contact,
        handlers::contacts::delete_contact, handlers::contacts::contact_stats,
        handlers::users::list_users, handlers::users::get_user, handlers::users::create_user,
        handlers::users::update_user, handlers::users::delete_user,
        handlers::users::students_by_class, handlers::users::user_stats,
        handlers::admissions::create_admission, handlers::admissions::list_admissions,
        handlers::admissions::delete_admission,
        handlers::uploads::upload_image, handlers::uploads::upload_multiple,
        handlers::uploads::upload_base64, handlers::uploads::delete_upload,
        handlers::uploads::upload_config,
        handlers::gallery::list_gallery, handlers::gallery::gallery_by_category,
        handlers::gallery::create_gallery_image, handlers::gallery::update_gallery_image,
        handlers::gallery::delete_gallery_image,
        handlers::testimonials::create_testimonial, handlers::testimonials::list_testimonials,
        handlers::testimonials::featured_testimonials,
        handlers::testimonials::all_testimonials, handlers::testimonials::approve_testimonial,
        handlers::testimonials::reject_testimonial, handlers::testimonials::feature_testimonial,
    ),
    components(
        schemas(
            models::Medium, models::Role, models::TestimonialStatus, models::ContactStatus,
            models::Testimonial, models::CreateTestimonialRequest,
            models::User, models::RegisterRequest, models::CreateUserRequest,
            models::UpdateUserRequest, models::LoginRequest, models::UpdatePasswordRequest,
            models::ForgotPasswordRequest, models::ResetPasswordRequest, models::AuthResponse,
            models::UserStats, models::Course, models::CreateCourseRequest,
            models::UpdateCourseRequest, models::Contact, models::CreateContactRequest,
            models::UpdateContactRequest, models::ContactStats, models::Admission,
            models::CreateAdmissionRequest, models::GalleryImage,
            models::CreateGalleryImageRequest, models::UpdateGalleryImageRequest,
            models::UploadedImage, models::Base64UploadRequest, models::UploadConfig,
        )
    ),
    tags(
        (name = "trimurti-classes", description = "Trimurti Classes website API")
    )
)]
pub struct ApiDoc;

/// AppState
///
/// Shared, cheaply cloneable services handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub repo: RepositoryState,
    pub storage: StorageState,
    pub config: AppConfig,
}

// --- Axum FromRef Extractor Implementations ---

impl FromRef<AppState> for RepositoryState {
    fn from_ref(app_state: &AppState) -> RepositoryState {
        app_state.repo.clone()
    }
}

impl FromRef<AppState> for StorageState {
    fn from_ref(app_state: &AppState) -> StorageState {
        app_state.storage.clone()
    }
}

impl FromRef<AppState> for AppConfig {
    fn from_ref(app_state: &AppState) -> AppConfig {
        app_state.config.clone()
    }
}

/// auth_middleware
///
/// Route layer for the authenticated tier. Extracting `AuthUser` rejects the
/// request with 401 before the handler runs.
async fn auth_middleware(_auth_user: AuthUser, request: Request, next: Next) -> Response {
    next.run(request).await
}

/// api_routes
///
/// The three access tiers merged into one router, before state and layers.
fn api_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .merge(public::public_routes())
        .merge(
            authenticated::authenticated_routes().route_layer(middleware::from_fn_with_state(
                state.clone(),
                auth_middleware,
            )),
        )
        .merge(admin::admin_routes())
}

/// create_router
///
/// Mounts the API under `/api`, the Swagger UI at `/swagger-ui`, and wraps
/// everything in request-id, tracing and CORS layers.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_origin(Any)
        .allow_headers(Any);

    let x_request_id = HeaderName::from_static("x-request-id");

    let base_router = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .nest("/api", api_routes(&state))
        .with_state(state);

    base_router
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(x_request_id.clone(), MakeRequestUuid))
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(trace_span_logger)
                        .on_response(
                            DefaultOnResponse::new()
                                .level(Level::INFO)
                                .latency_unit(tower_http::LatencyUnit::Millis),
                        ),
                )
                .layer(PropagateRequestIdLayer::new(x_request_id)),
        )
        .layer(cors)
}

/// trace_span_logger
///
/// Span for one HTTP request, tagged with its `x-request-id`.
fn trace_span_logger(request: &axum::http::Request<axum::body::Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("unknown");

    tracing::info_span!(
        "http_request",
        method = ?request.method(),
        uri = ?request.uri(),
        req_id = %request_id,
    )
}
