//! HTTP handlers, one module per resource. Each handler carries a
//! `#[utoipa::path]` block that feeds the generated OpenAPI document.

use axum::Json;
use serde_json::{Value, json};

use crate::{error::ApiError, models::Medium};

pub mod admissions;
pub mod auth;
pub mod contacts;
pub mod courses;
pub mod gallery;
pub mod testimonials;
pub mod uploads;
pub mod users;

/// Parses a `{medium}` path segment.
pub(crate) fn medium_param(raw: &str) -> Result<Medium, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::BadRequest("Medium must be either gujarati or english".to_string()))
}

/// health
///
/// [Public Route] Liveness check for load balancers and uptime monitors.
#[utoipa::path(
    get,
    path = "/api/health",
    tag = "system",
    responses((status = 200, description = "Service is up"))
)]
pub async fn health() -> Json<Value> {
    Json(json!({ "success": true, "status": "ok" }))
}
