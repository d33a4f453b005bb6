//! Typed calls for each API resource, reached through `ApiClient::courses()`
//! and friends.

use reqwest::{
    Url,
    multipart::{Form, Part},
};
use serde_json::Value;
use uuid::Uuid;

use super::api::{ApiClient, ClientError, into_data};
use crate::models::{
    Admission, ApiResponse, Base64UploadRequest, Contact, ContactStats, ContactStatus, Course,
    CreateAdmissionRequest, CreateContactRequest, CreateCourseRequest, CreateGalleryImageRequest,
    CreateTestimonialRequest, CreateUserRequest, GalleryImage, Medium, Testimonial,
    UpdateContactRequest, UpdateCourseRequest, UpdateGalleryImageRequest, UpdateUserRequest,
    UploadConfig, UploadedImage, User, UserStats,
};

type Result<T> = std::result::Result<T, ClientError>;

fn invalid_path() -> ClientError {
    ClientError {
        message: "Invalid request path".to_string(),
        status: None,
        original: None,
    }
}

/// Builds an API path from raw segments. Each segment is percent-encoded on
/// its own, so user text like "Class 10" or "a/b" stays in one segment.
fn path(segments: &[&str]) -> Result<String> {
    let mut url = Url::parse("http://localhost/").map_err(|_| invalid_path())?;
    url.path_segments_mut()
        .map_err(|()| invalid_path())?
        .clear()
        .extend(segments);
    Ok(url.path().to_string())
}

impl ApiClient {
    pub fn courses(&self) -> CoursesApi<'_> {
        CoursesApi { api: self }
    }

    pub fn contacts(&self) -> ContactsApi<'_> {
        ContactsApi { api: self }
    }

    pub fn users(&self) -> UsersApi<'_> {
        UsersApi { api: self }
    }

    pub fn admissions(&self) -> AdmissionsApi<'_> {
        AdmissionsApi { api: self }
    }

    pub fn gallery(&self) -> GalleryApi<'_> {
        GalleryApi { api: self }
    }

    pub fn testimonials(&self) -> TestimonialsApi<'_> {
        TestimonialsApi { api: self }
    }

    pub fn uploads(&self) -> UploadsApi<'_> {
        UploadsApi { api: self }
    }
}

fn done(response: ApiResponse<()>) -> Result<()> {
    if response.success {
        Ok(())
    } else {
        Err(ClientError::missing_data())
    }
}

// --- Courses ---

pub struct CoursesApi<'a> {
    api: &'a ApiClient,
}

impl CoursesApi<'_> {
    pub async fn list(&self) -> Result<Vec<Course>> {
        self.api.get_data("/courses").await
    }

    pub async fn get(&self, id: Uuid) -> Result<Course> {
        self.api.get_data(&format!("/courses/{id}")).await
    }

    pub async fn popular(&self) -> Result<Vec<Course>> {
        self.api.get_data("/courses/popular").await
    }

    pub async fn filter(&self, standard: &str, medium: Medium) -> Result<Vec<Course>> {
        self.api
            .get_data(&path(&["courses", "filter", standard, medium.as_str()])?)
            .await
    }

    pub async fn create(&self, course: &CreateCourseRequest) -> Result<Course> {
        into_data(self.api.post("/courses", course).await?)
    }

    pub async fn update(&self, id: Uuid, changes: &UpdateCourseRequest) -> Result<Course> {
        into_data(self.api.put(&format!("/courses/{id}"), changes).await?)
    }

    pub async fn delete(&self, id: Uuid) -> Result<()> {
        done(self.api.delete(&format!("/courses/{id}")).await?)
    }

    pub async fn enroll(&self, id: Uuid) -> Result<Course> {
        into_data(
            self.api
                .post(&format!("/courses/{id}/enroll"), &Value::Null)
                .await?,
        )
    }

    pub async fn unenroll(&self, id: Uuid) -> Result<Course> {
        into_data(self.api.delete(&format!("/courses/{id}/enroll")).await?)
    }
}

// --- Contact messages ---

pub struct ContactsApi<'a> {
    api: &'a ApiClient,
}

impl ContactsApi<'_> {
    pub async fn submit(&self, message: &CreateContactRequest) -> Result<Contact> {
        into_data(self.api.post("/contact", message).await?)
    }

    pub async fn list(&self) -> Result<Vec<Contact>> {
        self.api.get_data("/contact").await
    }

    pub async fn get(&self, id: Uuid) -> Result<Contact> {
        self.api.get_data(&format!("/contact/{id}")).await
    }

    pub async fn set_status(&self, id: Uuid, status: ContactStatus) -> Result<Contact> {
        let body = UpdateContactRequest { status };
        into_data(self.api.put(&format!("/contact/{id}"), &body).await?)
    }

    pub async fn delete(&self, id: Uuid) -> Result<()> {
        done(self.api.delete(&format!("/contact/{id}")).await?)
    }

    pub async fn stats(&self) -> Result<ContactStats> {
        self.api.get_data("/contact/stats").await
    }
}

// --- Users ---

pub struct UsersApi<'a> {
    api: &'a ApiClient,
}

impl UsersApi<'_> {
    pub async fn list(&self) -> Result<Vec<User>> {
        self.api.get_data("/users").await
    }

    pub async fn get(&self, id: Uuid) -> Result<User> {
        self.api.get_data(&format!("/users/{id}")).await
    }

    pub async fn create(&self, user: &CreateUserRequest) -> Result<User> {
        into_data(self.api.post("/users", user).await?)
    }

    pub async fn update(&self, id: Uuid, changes: &UpdateUserRequest) -> Result<User> {
        into_data(self.api.put(&format!("/users/{id}"), changes).await?)
    }

    pub async fn delete(&self, id: Uuid) -> Result<()> {
        done(self.api.delete(&format!("/users/{id}")).await?)
    }

    pub async fn students(&self, standard: &str, medium: Medium) -> Result<Vec<User>> {
        self.api
            .get_data(&path(&["users", "students", standard, medium.as_str()])?)
            .await
    }

    pub async fn stats(&self) -> Result<UserStats> {
        self.api.get_data("/users/stats").await
    }
}

// --- Admissions ---

pub struct AdmissionsApi<'a> {
    api: &'a ApiClient,
}

impl AdmissionsApi<'_> {
    pub async fn submit(&self, form: &CreateAdmissionRequest) -> Result<ApiResponse<Admission>> {
        self.api.post("/admissions", form).await
    }

    pub async fn list(&self) -> Result<Vec<Admission>> {
        self.api.get_data("/admissions").await
    }

    pub async fn delete(&self, id: Uuid) -> Result<()> {
        done(self.api.delete(&format!("/admissions/{id}")).await?)
    }
}

// --- Gallery ---

pub struct GalleryApi<'a> {
    api: &'a ApiClient,
}

impl GalleryApi<'_> {
    pub async fn list(&self) -> Result<Vec<GalleryImage>> {
        self.api.get_data("/gallery").await
    }

    pub async fn by_category(&self, category: &str) -> Result<Vec<GalleryImage>> {
        self.api
            .get_data(&path(&["gallery", category])?)
            .await
    }

    pub async fn create(&self, image: &CreateGalleryImageRequest) -> Result<GalleryImage> {
        into_data(self.api.post("/gallery", image).await?)
    }

    pub async fn update(
        &self,
        id: Uuid,
        changes: &UpdateGalleryImageRequest,
    ) -> Result<GalleryImage> {
        into_data(self.api.put(&format!("/gallery/{id}"), changes).await?)
    }

    pub async fn delete(&self, id: Uuid) -> Result<()> {
        done(self.api.delete(&format!("/gallery/{id}")).await?)
    }
}

// --- Testimonials ---

pub struct TestimonialsApi<'a> {
    api: &'a ApiClient,
}

impl TestimonialsApi<'_> {
    pub async fn submit(&self, testimonial: &CreateTestimonialRequest) -> Result<Testimonial> {
        into_data(self.api.post("/testimonials", testimonial).await?)
    }

    pub async fn approved(&self) -> Result<Vec<Testimonial>> {
        self.api.get_data("/testimonials").await
    }

    pub async fn featured(&self) -> Result<Vec<Testimonial>> {
        self.api.get_data("/testimonials/featured").await
    }

    pub async fn all(&self) -> Result<Vec<Testimonial>> {
        self.api.get_data("/testimonials/all").await
    }

    pub async fn approve(&self, id: Uuid) -> Result<Testimonial> {
        self.moderate(id, "approve").await
    }

    pub async fn reject(&self, id: Uuid) -> Result<Testimonial> {
        self.moderate(id, "reject").await
    }

    pub async fn toggle_featured(&self, id: Uuid) -> Result<Testimonial> {
        self.moderate(id, "feature").await
    }

    async fn moderate(&self, id: Uuid, action: &str) -> Result<Testimonial> {
        into_data(
            self.api
                .put(&format!("/testimonials/{id}/{action}"), &Value::Null)
                .await?,
        )
    }
}

// --- Uploads ---

pub struct UploadsApi<'a> {
    api: &'a ApiClient,
}

fn image_part(file_name: &str, content_type: &str, bytes: Vec<u8>) -> Result<Part> {
    Part::bytes(bytes)
        .file_name(file_name.to_string())
        .mime_str(content_type)
        .map_err(|e| ClientError {
            message: format!("Unsupported content type {content_type}"),
            status: None,
            original: Some(e.into()),
        })
}

impl UploadsApi<'_> {
    pub async fn image(
        &self,
        file_name: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<UploadedImage> {
        let form = Form::new().part("image", image_part(file_name, content_type, bytes)?);
        into_data(self.api.upload("/upload/image", form).await?)
    }

    /// Each entry is `(file name, content type, bytes)`.
    pub async fn multiple(
        &self,
        files: Vec<(String, String, Vec<u8>)>,
    ) -> Result<Vec<UploadedImage>> {
        let mut form = Form::new();
        for (file_name, content_type, bytes) in files {
            form = form.part("images", image_part(&file_name, &content_type, bytes)?);
        }
        into_data(self.api.upload("/upload/multiple", form).await?)
    }

    pub async fn base64(&self, request: &Base64UploadRequest) -> Result<UploadedImage> {
        into_data(self.api.post("/upload/base64", request).await?)
    }

    pub async fn delete(&self, public_id: &str) -> Result<()> {
        done(self.api.delete(&path(&["upload", public_id])?).await?)
    }

    pub async fn config(&self) -> Result<UploadConfig> {
        self.api.get_data("/upload/config").await
    }
}
