use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use thiserror::Error;
use ts_rs::TS;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::validation::{Checks, ValidationError, optional_text};

/// Placeholder avatar for testimonials submitted without a picture.
pub const DEFAULT_AVATAR: &str = "default-avatar.jpg";

// --- Text-backed enums ---

/// UnknownVariant
///
/// Returned when a stored or submitted string does not name a known variant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} `{value}`")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

/// Wires a fieldless enum to its lowercase text form: `as_str`, `FromStr`,
/// `Display`, and sqlx TEXT encoding/decoding so the columns stay plain text.
macro_rules! text_enum {
    ($name:ident, $kind:literal, { $($variant:ident => $text:literal),+ $(,)? }) => {
        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = UnknownVariant;

            fn from_str(value: &str) -> Result<Self, Self::Err> {
                match value.trim().to_ascii_lowercase().as_str() {
                    $($text => Ok($name::$variant),)+
                    _ => Err(UnknownVariant { kind: $kind, value: value.to_string() }),
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl sqlx::Type<sqlx::Postgres> for $name {
            fn type_info() -> sqlx::postgres::PgTypeInfo {
                <String as sqlx::Type<sqlx::Postgres>>::type_info()
            }

            fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
                <String as sqlx::Type<sqlx::Postgres>>::compatible(ty)
            }
        }

        impl<'r> sqlx::Decode<'r, sqlx::Postgres> for $name {
            fn decode(
                value: sqlx::postgres::PgValueRef<'r>,
            ) -> Result<Self, sqlx::error::BoxDynError> {
                let text = <&'r str as sqlx::Decode<'r, sqlx::Postgres>>::decode(value)?;
                Ok(text.parse()?)
            }
        }

        impl<'q> sqlx::Encode<'q, sqlx::Postgres> for $name {
            fn encode_by_ref(
                &self,
                buf: &mut sqlx::postgres::PgArgumentBuffer,
            ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
                <&str as sqlx::Encode<'q, sqlx::Postgres>>::encode_by_ref(&self.as_str(), buf)
            }
        }
    };
}

/// Medium
///
/// Language of instruction for a course, student or testimonial.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS, ToSchema)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum Medium {
    Gujarati,
    English,
}

text_enum!(Medium, "medium", { Gujarati => "gujarati", English => "english" });

/// Role
///
/// The RBAC field on a user account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS, ToSchema)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum Role {
    #[default]
    Student,
    Admin,
}

text_enum!(Role, "role", { Student => "student", Admin => "admin" });

/// TestimonialStatus
///
/// Moderation state. `Pending` is only ever the initial value; approve and
/// reject are the sole transitions and neither leads back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS, ToSchema)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum TestimonialStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

text_enum!(TestimonialStatus, "status", {
    Pending => "pending",
    Approved => "approved",
    Rejected => "rejected",
});

/// ContactStatus
///
/// Admin triage state of a contact-form message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS, ToSchema)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum ContactStatus {
    #[default]
    New,
    Read,
    Replied,
}

text_enum!(ContactStatus, "contact status", { New => "new", Read => "read", Replied => "replied" });

fn parse_medium(checks: &mut Checks, value: Option<String>) -> Option<Medium> {
    let raw = checks.require("medium", value, "Please select medium")?;
    match raw.parse() {
        Ok(medium) => Some(medium),
        Err(_) => {
            checks.fail("medium", "Medium must be either gujarati or english");
            None
        }
    }
}

// --- Testimonial ---

/// Testimonial
///
/// A student or parent review shown on the public site once an admin approves it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema, FromRow)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Testimonial {
    pub id: Uuid,
    // Weak back-reference to the submitting user, if they were signed in.
    pub student: Option<Uuid>,
    pub name: String,
    pub avatar: String,
    pub content: String,
    pub rating: i32,
    pub standard: String,
    pub medium: Medium,
    pub course: Option<Uuid>,
    pub featured: bool,
    pub status: TestimonialStatus,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    pub approved_at: Option<DateTime<Utc>>,
}

impl Testimonial {
    /// Marks the testimonial approved and stamps `approved_at`, whatever the prior status.
    pub fn approve(&mut self) {
        self.status = TestimonialStatus::Approved;
        self.approved_at = Some(Utc::now());
    }

    /// Marks the testimonial rejected. `approved_at` is left as it was.
    pub fn reject(&mut self) {
        self.status = TestimonialStatus::Rejected;
    }

    pub fn toggle_featured(&mut self) {
        self.featured = !self.featured;
    }

    pub fn is_public(&self) -> bool {
        self.status == TestimonialStatus::Approved
    }
}

/// CreateTestimonialRequest
///
/// Public submission payload (POST /testimonials). Every field is optional at the
/// wire level so missing values surface as validation messages instead of a
/// deserialization failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS, ToSchema)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CreateTestimonialRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub standard: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub medium: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub course: Option<Uuid>,
}

impl CreateTestimonialRequest {
    /// Applies the schema rules and builds a fresh `pending` testimonial.
    pub fn validate(self, student: Option<Uuid>) -> Result<Testimonial, ValidationError> {
        let mut checks = Checks::new();

        let name = checks.require("name", self.name, "Please add a name");
        if let Some(name) = &name {
            checks.length("name", name, 1, 50, "Name can not be more than 50 characters");
        }

        let content = checks.require("content", self.content, "Please add testimonial content");
        if let Some(content) = &content {
            checks.length(
                "content",
                content,
                10,
                500,
                "Testimonial content must be between 10 and 500 characters",
            );
        }

        let rating = match self.rating {
            None => {
                checks.fail("rating", "Please add a rating between 1 and 5");
                None
            }
            Some(r) if !(1..=5).contains(&r) => {
                checks.fail("rating", "Rating must be between 1 and 5");
                None
            }
            Some(r) => i32::try_from(r).ok(),
        };

        let standard = checks.require("standard", self.standard, "Please specify the standard");
        let medium = parse_medium(&mut checks, self.medium);

        checks.finish()?;

        match (name, content, rating, standard, medium) {
            (Some(name), Some(content), Some(rating), Some(standard), Some(medium)) => {
                Ok(Testimonial {
                    id: Uuid::new_v4(),
                    student,
                    name,
                    avatar: optional_text(self.avatar)
                        .unwrap_or_else(|| DEFAULT_AVATAR.to_string()),
                    content,
                    rating,
                    standard,
                    medium,
                    course: self.course,
                    featured: false,
                    status: TestimonialStatus::Pending,
                    created_at: Utc::now(),
                    approved_at: None,
                })
            }
            _ => Err(ValidationError::default()),
        }
    }
}

// --- Users ---

/// User
///
/// The public view of an account. Credentials live only on `UserRecord`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema, FromRow)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub role: Role,
    pub standard: Option<String>,
    pub medium: Option<Medium>,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// UserRecord
///
/// Internal row for the `users` table: the public profile plus the Argon2 hash and
/// any outstanding password-reset token (stored hashed).
#[derive(Debug, Clone, FromRow)]
pub struct UserRecord {
    #[sqlx(flatten)]
    pub user: User,
    pub password_hash: String,
    pub reset_password_token: Option<String>,
    pub reset_password_expire: Option<DateTime<Utc>>,
}

/// RegisterRequest
///
/// Public self-registration (POST /auth/register). Always creates a student.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS, ToSchema)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct RegisterRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub standard: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub medium: Option<String>,
}

/// NewUser
///
/// A validated account ready for hashing and insertion.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password: String,
    pub phone: Option<String>,
    pub role: Role,
    pub standard: Option<String>,
    pub medium: Option<Medium>,
}

/// Minimum accepted password length for new and changed passwords.
pub const MIN_PASSWORD_LENGTH: usize = 6;

pub(crate) fn check_password(checks: &mut Checks, field: &'static str, password: &str) {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        checks.fail(field, "Password must be at least 6 characters");
    }
}

fn optional_medium(checks: &mut Checks, value: Option<String>) -> Option<Medium> {
    let raw = optional_text(value)?;
    match raw.parse() {
        Ok(medium) => Some(medium),
        Err(_) => {
            checks.fail("medium", "Medium must be either gujarati or english");
            None
        }
    }
}

impl RegisterRequest {
    pub fn validate(self) -> Result<NewUser, ValidationError> {
        CreateUserRequest {
            name: self.name,
            email: self.email,
            password: self.password,
            phone: self.phone,
            role: Some(Role::Student),
            standard: self.standard,
            medium: self.medium,
        }
        .validate()
    }
}

/// CreateUserRequest
///
/// Admin-side account creation (POST /users); the role may be chosen.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS, ToSchema)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CreateUserRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub standard: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub medium: Option<String>,
}

impl CreateUserRequest {
    pub fn validate(self) -> Result<NewUser, ValidationError> {
        let mut checks = Checks::new();
        let name = checks.require("name", self.name, "Please add a name");
        let email = checks
            .require("email", self.email, "Please add an email")
            .map(|e| e.to_lowercase());
        if let Some(email) = &email {
            checks.email("email", email);
        }
        let password = checks.require("password", self.password, "Please add a password");
        if let Some(password) = &password {
            check_password(&mut checks, "password", password);
        }
        let medium = optional_medium(&mut checks, self.medium);
        checks.finish()?;

        match (name, email, password) {
            (Some(name), Some(email), Some(password)) => Ok(NewUser {
                name,
                email,
                password,
                phone: optional_text(self.phone),
                role: self.role.unwrap_or_default(),
                standard: optional_text(self.standard),
                medium,
            }),
            _ => Err(ValidationError::default()),
        }
    }
}

/// UpdateUserRequest
///
/// Partial profile update, used by both PUT /auth/updatedetails (role ignored)
/// and the admin PUT /users/{id}.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS, ToSchema)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct UpdateUserRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub standard: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub medium: Option<Medium>,
}

impl UpdateUserRequest {
    pub fn validate(mut self) -> Result<Self, ValidationError> {
        let mut checks = Checks::new();
        if let Some(name) = &self.name {
            if name.trim().is_empty() {
                checks.fail("name", "Name can not be empty");
            }
        }
        if let Some(email) = self.email.take() {
            let email = email.trim().to_lowercase();
            checks.email("email", &email);
            self.email = Some(email);
        }
        checks.finish()?;
        Ok(self)
    }

    /// Applies the present fields onto `user`.
    pub fn apply(&self, user: &mut User) {
        if let Some(name) = &self.name {
            user.name = name.trim().to_string();
        }
        if let Some(email) = &self.email {
            user.email = email.clone();
        }
        if let Some(phone) = &self.phone {
            user.phone = optional_text(Some(phone.clone()));
        }
        if let Some(role) = self.role {
            user.role = role;
        }
        if let Some(standard) = &self.standard {
            user.standard = optional_text(Some(standard.clone()));
        }
        if let Some(medium) = self.medium {
            user.medium = Some(medium);
        }
    }
}

/// LoginRequest
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// UpdatePasswordRequest
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS, ToSchema)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct UpdatePasswordRequest {
    #[serde(default)]
    pub current_password: String,
    #[serde(default)]
    pub new_password: String,
}

/// ForgotPasswordRequest
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct ForgotPasswordRequest {
    #[serde(default)]
    pub email: String,
}

/// ResetPasswordRequest
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct ResetPasswordRequest {
    #[serde(default)]
    pub password: String,
}

/// AuthResponse
///
/// Body returned by every endpoint that issues a session token.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct AuthResponse {
    pub success: bool,
    pub token: String,
    pub user: User,
}

/// UserStats
///
/// Output schema for GET /users/stats.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS, ToSchema, FromRow)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct UserStats {
    pub total: i64,
    pub students: i64,
    pub admins: i64,
    pub gujarati: i64,
    pub english: i64,
}

// --- Courses ---

/// Course
///
/// A program offered for one standard and medium. Enrollment is tracked as the
/// list of enrolled user ids.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema, FromRow)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Course {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub standard: String,
    pub medium: Medium,
    pub subjects: Vec<String>,
    pub duration: String,
    // Whole rupees.
    pub fee: i32,
    pub is_popular: bool,
    pub enrolled_students: Vec<Uuid>,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    #[ts(type = "string")]
    pub updated_at: DateTime<Utc>,
}

/// CreateCourseRequest
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS, ToSchema)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CreateCourseRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub standard: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub medium: Option<String>,
    #[serde(default)]
    pub subjects: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fee: Option<i32>,
    #[serde(default)]
    pub is_popular: bool,
}

impl CreateCourseRequest {
    pub fn validate(self) -> Result<Course, ValidationError> {
        let mut checks = Checks::new();
        let title = checks.require("title", self.title, "Please add a course title");
        if let Some(title) = &title {
            checks.length("title", title, 1, 100, "Title can not be more than 100 characters");
        }
        let description =
            checks.require("description", self.description, "Please add a description");
        let standard = checks.require("standard", self.standard, "Please specify the standard");
        let medium = parse_medium(&mut checks, self.medium);
        if self.fee.is_some_and(|fee| fee < 0) {
            checks.fail("fee", "Fee can not be negative");
        }
        checks.finish()?;

        match (title, description, standard, medium) {
            (Some(title), Some(description), Some(standard), Some(medium)) => {
                let now = Utc::now();
                Ok(Course {
                    id: Uuid::new_v4(),
                    title,
                    description,
                    standard,
                    medium,
                    subjects: self
                        .subjects
                        .into_iter()
                        .filter_map(|s| optional_text(Some(s)))
                        .collect(),
                    duration: optional_text(self.duration).unwrap_or_else(|| "1 year".to_string()),
                    fee: self.fee.unwrap_or(0),
                    is_popular: self.is_popular,
                    enrolled_students: Vec::new(),
                    created_at: now,
                    updated_at: now,
                })
            }
            _ => Err(ValidationError::default()),
        }
    }
}

/// UpdateCourseRequest
///
/// Partial update payload for PUT /courses/{id}.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS, ToSchema)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct UpdateCourseRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub standard: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub medium: Option<Medium>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subjects: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fee: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_popular: Option<bool>,
}

impl UpdateCourseRequest {
    /// Applies the same rules as creation to whichever fields are present.
    pub fn validate(self) -> Result<Self, ValidationError> {
        let mut checks = Checks::new();
        if self.title.is_some() {
            let title = checks.require("title", self.title.clone(), "Please add a course title");
            if let Some(title) = &title {
                checks.length(
                    "title",
                    title,
                    1,
                    100,
                    "Title can not be more than 100 characters",
                );
            }
        }
        if self.description.is_some() {
            checks.require(
                "description",
                self.description.clone(),
                "Please add a description",
            );
        }
        if self.standard.is_some() {
            checks.require("standard", self.standard.clone(), "Please specify the standard");
        }
        if self.fee.is_some_and(|fee| fee < 0) {
            checks.fail("fee", "Fee can not be negative");
        }
        checks.finish()?;
        Ok(self)
    }

    pub fn apply(&self, course: &mut Course) {
        if let Some(title) = &self.title {
            course.title = title.trim().to_string();
        }
        if let Some(description) = &self.description {
            course.description = description.trim().to_string();
        }
        if let Some(standard) = &self.standard {
            course.standard = standard.trim().to_string();
        }
        if let Some(medium) = self.medium {
            course.medium = medium;
        }
        if let Some(subjects) = &self.subjects {
            course.subjects = subjects.clone();
        }
        if let Some(duration) = &self.duration {
            course.duration = duration.clone();
        }
        if let Some(fee) = self.fee {
            course.fee = fee;
        }
        if let Some(is_popular) = self.is_popular {
            course.is_popular = is_popular;
        }
        course.updated_at = Utc::now();
    }
}

// --- Contact messages ---

/// Contact
///
/// A message left through the public contact form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema, FromRow)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Contact {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub subject: String,
    pub message: String,
    pub status: ContactStatus,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
}

/// CreateContactRequest
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct CreateContactRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl CreateContactRequest {
    pub fn validate(self) -> Result<Contact, ValidationError> {
        let mut checks = Checks::new();
        let name = checks.require("name", self.name, "Please add your name");
        let email = checks
            .require("email", self.email, "Please add your email")
            .map(|e| e.to_lowercase());
        if let Some(email) = &email {
            checks.email("email", email);
        }
        let subject = checks.require("subject", self.subject, "Please add a subject");
        let message = checks.require("message", self.message, "Please add a message");
        if let Some(message) = &message {
            checks.length(
                "message",
                message,
                1,
                1000,
                "Message can not be more than 1000 characters",
            );
        }
        checks.finish()?;

        match (name, email, subject, message) {
            (Some(name), Some(email), Some(subject), Some(message)) => Ok(Contact {
                id: Uuid::new_v4(),
                name,
                email,
                phone: optional_text(self.phone),
                subject,
                message,
                status: ContactStatus::New,
                created_at: Utc::now(),
            }),
            _ => Err(ValidationError::default()),
        }
    }
}

/// UpdateContactRequest
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct UpdateContactRequest {
    pub status: ContactStatus,
}

/// ContactStats
///
/// Output schema for GET /contact/stats.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS, ToSchema, FromRow)]
#[ts(export)]
pub struct ContactStats {
    pub total: i64,
    pub new: i64,
    pub read: i64,
    pub replied: i64,
}

// --- Admissions ---

/// Admission
///
/// A public inquiry/application. Not linked to any user account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema, FromRow)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Admission {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub standard: String,
    pub medium: Medium,
    pub subject: Option<String>,
    pub message: Option<String>,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
}

/// CreateAdmissionRequest
///
/// The admissions form exactly as the public site submits it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS, ToSchema)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CreateAdmissionRequest {
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub standard: String,
    #[serde(default)]
    pub medium: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub message: String,
}

impl CreateAdmissionRequest {
    pub fn validate(self) -> Result<Admission, ValidationError> {
        let mut checks = Checks::new();
        let full_name =
            checks.require("fullName", Some(self.full_name), "Please add your full name");
        let email = checks
            .require("email", Some(self.email), "Please add your email")
            .map(|e| e.to_lowercase());
        if let Some(email) = &email {
            checks.email("email", email);
        }
        let phone = checks.require("phone", Some(self.phone), "Please add a phone number");
        if let Some(phone) = &phone {
            let digits = phone.chars().filter(char::is_ascii_digit).count();
            if !(10..=13).contains(&digits) {
                checks.fail("phone", "Please add a valid phone number");
            }
        }
        let standard = checks.require("standard", Some(self.standard), "Please select a standard");
        let medium = parse_medium(&mut checks, Some(self.medium));
        checks.finish()?;

        match (full_name, email, phone, standard, medium) {
            (Some(full_name), Some(email), Some(phone), Some(standard), Some(medium)) => {
                Ok(Admission {
                    id: Uuid::new_v4(),
                    full_name,
                    email,
                    phone,
                    standard,
                    medium,
                    subject: optional_text(Some(self.subject)),
                    message: optional_text(Some(self.message)),
                    created_at: Utc::now(),
                })
            }
            _ => Err(ValidationError::default()),
        }
    }
}

// --- Gallery ---

/// GalleryImage
///
/// A curated photo on the public gallery page. `public_id` names the stored
/// object so deleting the record can also delete the file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema, FromRow)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct GalleryImage {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub category: String,
    pub image_url: String,
    pub public_id: Option<String>,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
}

/// CreateGalleryImageRequest
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS, ToSchema)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CreateGalleryImageRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_id: Option<String>,
}

impl CreateGalleryImageRequest {
    pub fn validate(self) -> Result<GalleryImage, ValidationError> {
        let mut checks = Checks::new();
        let title = checks.require("title", self.title, "Please add a title");
        let category = checks
            .require("category", self.category, "Please add a category")
            .map(|c| c.to_lowercase());
        let image_url = checks.require("imageUrl", self.image_url, "Please add an image URL");
        checks.finish()?;

        match (title, category, image_url) {
            (Some(title), Some(category), Some(image_url)) => Ok(GalleryImage {
                id: Uuid::new_v4(),
                title,
                description: optional_text(self.description),
                category,
                image_url,
                public_id: optional_text(self.public_id),
                created_at: Utc::now(),
            }),
            _ => Err(ValidationError::default()),
        }
    }
}

/// UpdateGalleryImageRequest
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS, ToSchema)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct UpdateGalleryImageRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub public_id: Option<String>,
}

impl UpdateGalleryImageRequest {
    pub fn validate(self) -> Result<Self, ValidationError> {
        let mut checks = Checks::new();
        if self.title.is_some() {
            checks.require("title", self.title.clone(), "Please add a title");
        }
        if self.category.is_some() {
            checks.require("category", self.category.clone(), "Please add a category");
        }
        if self.image_url.is_some() {
            checks.require("imageUrl", self.image_url.clone(), "Please add an image URL");
        }
        checks.finish()?;
        Ok(self)
    }

    pub fn apply(&self, image: &mut GalleryImage) {
        if let Some(title) = &self.title {
            image.title = title.trim().to_string();
        }
        if let Some(description) = &self.description {
            image.description = optional_text(Some(description.clone()));
        }
        if let Some(category) = &self.category {
            image.category = category.trim().to_lowercase();
        }
        if let Some(image_url) = &self.image_url {
            image.image_url = image_url.trim().to_string();
        }
        if let Some(public_id) = &self.public_id {
            image.public_id = optional_text(Some(public_id.clone()));
        }
    }
}

// --- Uploads ---

/// UploadedImage
///
/// Result of storing one image through the upload endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct UploadedImage {
    pub public_id: String,
    pub url: String,
    pub content_type: String,
    pub size: usize,
}

/// Base64UploadRequest
///
/// Either a `data:image/...;base64,` URL, or raw base64 plus `contentType`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS, ToSchema)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Base64UploadRequest {
    #[serde(default)]
    pub image: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
}

/// UploadConfig
///
/// Limits the client should enforce before uploading (GET /upload/config).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct UploadConfig {
    pub max_file_size: usize,
    pub max_files: usize,
    pub allowed_types: Vec<String>,
    pub base_url: String,
}

// --- Response envelope ---

/// ApiResponse
///
/// The `{ success, data, count?, message? }` envelope every non-auth success
/// response uses.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn data(data: T) -> Self {
        Self {
            success: true,
            count: None,
            message: None,
            data: Some(data),
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl<T> ApiResponse<Vec<T>> {
    pub fn list(items: Vec<T>) -> Self {
        Self {
            success: true,
            count: Some(items.len()),
            message: None,
            data: Some(items),
        }
    }
}

impl ApiResponse<()> {
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            count: None,
            message: Some(message.into()),
            data: None,
        }
    }
}
