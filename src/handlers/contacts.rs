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
    models::{ApiResponse, Contact, ContactStats, CreateContactRequest, UpdateContactRequest},
};

/// create_contact
///
/// [Public Route] Stores a contact-form message with status `new`.
#[utoipa::path(
    post,
    path = "/api/contact",
    tag = "contact",
    request_body = CreateContactRequest,
    responses(
        (status = 201, description = "Message received", body = Contact),
        (status = 400, description = "Validation failed")
    )
)]
pub async fn create_contact(
    State(state): State<AppState>,
    Json(payload): Json<CreateContactRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<Contact>>)> {
    let contact = state.repo.create_contact(payload.validate()?).await?;
    tracing::info!(contact_id = %contact.id, "contact message received");
    Ok((
        StatusCode::CREATED,
        Json(
            ApiResponse::data(contact)
                .with_message("Thank you for contacting us. We will get back to you soon."),
        ),
    ))
}

/// list_contacts
///
/// [Admin Route] Newest first.
#[utoipa::path(
    get,
    path = "/api/contact",
    tag = "contact",
    responses((status = 200, description = "Messages", body = [Contact]))
)]
pub async fn list_contacts(
    AdminUser(_admin): AdminUser,
    State(state): State<AppState>,
) -> ApiResult<Json<ApiResponse<Vec<Contact>>>> {
    Ok(Json(ApiResponse::list(state.repo.list_contacts().await?)))
}

/// get_contact
///
/// [Admin Route]
#[utoipa::path(
    get,
    path = "/api/contact/{id}",
    tag = "contact",
    params(("id" = Uuid, Path, description = "Message ID")),
    responses(
        (status = 200, description = "Found", body = Contact),
        (status = 404, description = "Not Found")
    )
)]
pub async fn get_contact(
    AdminUser(_admin): AdminUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ApiResponse<Contact>>> {
    let contact = state
        .repo
        .find_contact(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Contact message"))?;
    Ok(Json(ApiResponse::data(contact)))
}

/// update_contact
///
/// [Admin Route] Moves a message between new, read and replied.
#[utoipa::path(
    put,
    path = "/api/contact/{id}",
    tag = "contact",
    params(("id" = Uuid, Path, description = "Message ID")),
    request_body = UpdateContactRequest,
    responses(
        (status = 200, description = "Updated", body = Contact),
        (status = 404, description = "Not Found")
    )
)]
pub async fn update_contact(
    AdminUser(_admin): AdminUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateContactRequest>,
) -> ApiResult<Json<ApiResponse<Contact>>> {
    let contact = state
        .repo
        .set_contact_status(id, payload.status)
        .await?
        .ok_or_else(|| ApiError::not_found("Contact message"))?;
    Ok(Json(ApiResponse::data(contact)))
}

/// delete_contact
///
/// [Admin Route]
#[utoipa::path(
    delete,
    path = "/api/contact/{id}",
    tag = "contact",
    params(("id" = Uuid, Path, description = "Message ID")),
    responses(
        (status = 200, description = "Deleted"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn delete_contact(
    AdminUser(_admin): AdminUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ApiResponse<()>>> {
    if !state.repo.delete_contact(id).await? {
        return Err(ApiError::not_found("Contact message"));
    }
    Ok(Json(ApiResponse::message("Contact message deleted")))
}

/// contact_stats
///
/// [Admin Route] Totals per status for the dashboard.
#[utoipa::path(
    get,
    path = "/api/contact/stats",
    tag = "contact",
    responses((status = 200, description = "Stats", body = ContactStats))
)]
pub async fn contact_stats(
    AdminUser(_admin): AdminUser,
    State(state): State<AppState>,
) -> ApiResult<Json<ApiResponse<ContactStats>>> {
    Ok(Json(ApiResponse::data(state.repo.contact_stats().await?)))
}
