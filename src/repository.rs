use crate::models::{
    Admission, Contact, ContactStats, ContactStatus, Course, GalleryImage, Medium, Testimonial,
    User, UserRecord, UserStats,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

/// RepoError
///
/// Persistence failures. Unique-constraint violations are split out so handlers
/// can answer 409 instead of 500.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("duplicate value for {0}")]
    Conflict(String),
    #[error("database error: {0}")]
    Database(sqlx::Error),
    #[error("migration error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),
}

impl From<sqlx::Error> for RepoError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db) = &err {
            if db.is_unique_violation() {
                let field = db
                    .constraint()
                    .map(|c| c.trim_end_matches("_key").rsplit('_').next().unwrap_or(c).to_string())
                    .unwrap_or_else(|| "field".to_string());
                return RepoError::Conflict(field);
            }
        }
        RepoError::Database(err)
    }
}

pub type RepoResult<T> = Result<T, RepoError>;

/// TestimonialFilter
///
/// Visibility selector for testimonial listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TestimonialFilter {
    /// Every testimonial, any status (admin view).
    #[default]
    All,
    /// Approved only, featured first (public page).
    Approved,
    /// Approved and featured (home page carousel).
    Featured,
}

impl TestimonialFilter {
    pub fn admits(&self, t: &Testimonial) -> bool {
        match self {
            TestimonialFilter::All => true,
            TestimonialFilter::Approved => t.is_public(),
            TestimonialFilter::Featured => t.is_public() && t.featured,
        }
    }
}

/// Repository Trait
///
/// The persistence contract used by every handler. `PostgresRepository` backs
/// production; `MemoryRepository` backs tests and `DATABASE_URL=memory`.
///
/// Mutations that target a row by id return `Option`/`bool` so handlers can
/// distinguish "not found" from success without a second query.
#[async_trait]
pub trait Repository: Send + Sync {
    // --- Users ---
    async fn create_user(&self, record: UserRecord) -> RepoResult<UserRecord>;
    async fn find_user(&self, id: Uuid) -> RepoResult<Option<UserRecord>>;
    async fn find_user_by_email(&self, email: &str) -> RepoResult<Option<UserRecord>>;
    // Matches only tokens whose expiry is after `now`.
    async fn find_user_by_reset_token(
        &self,
        digest: &str,
        now: DateTime<Utc>,
    ) -> RepoResult<Option<UserRecord>>;
    // Writes profile, password hash and reset-token fields as given.
    async fn save_user(&self, record: &UserRecord) -> RepoResult<Option<UserRecord>>;
    async fn list_users(&self) -> RepoResult<Vec<User>>;
    async fn delete_user(&self, id: Uuid) -> RepoResult<bool>;
    async fn list_students(&self, standard: &str, medium: Medium) -> RepoResult<Vec<User>>;
    async fn user_stats(&self) -> RepoResult<UserStats>;

    // --- Courses ---
    async fn list_courses(&self) -> RepoResult<Vec<Course>>;
    async fn find_course(&self, id: Uuid) -> RepoResult<Option<Course>>;
    async fn popular_courses(&self, limit: i64) -> RepoResult<Vec<Course>>;
    async fn filter_courses(&self, standard: &str, medium: Medium) -> RepoResult<Vec<Course>>;
    async fn create_course(&self, course: Course) -> RepoResult<Course>;
    async fn save_course(&self, course: &Course) -> RepoResult<Option<Course>>;
    async fn delete_course(&self, id: Uuid) -> RepoResult<bool>;
    // Both are no-ops when the membership already matches.
    async fn add_enrollment(&self, course_id: Uuid, user_id: Uuid) -> RepoResult<Option<Course>>;
    async fn remove_enrollment(&self, course_id: Uuid, user_id: Uuid)
    -> RepoResult<Option<Course>>;

    // --- Contact messages ---
    async fn create_contact(&self, contact: Contact) -> RepoResult<Contact>;
    async fn list_contacts(&self) -> RepoResult<Vec<Contact>>;
    async fn find_contact(&self, id: Uuid) -> RepoResult<Option<Contact>>;
    async fn set_contact_status(
        &self,
        id: Uuid,
        status: ContactStatus,
    ) -> RepoResult<Option<Contact>>;
    async fn delete_contact(&self, id: Uuid) -> RepoResult<bool>;
    async fn contact_stats(&self) -> RepoResult<ContactStats>;

    // --- Admissions ---
    async fn create_admission(&self, admission: Admission) -> RepoResult<Admission>;
    async fn list_admissions(&self) -> RepoResult<Vec<Admission>>;
    async fn delete_admission(&self, id: Uuid) -> RepoResult<bool>;

    // --- Gallery ---
    async fn list_gallery(&self, category: Option<&str>) -> RepoResult<Vec<GalleryImage>>;
    async fn find_gallery_image(&self, id: Uuid) -> RepoResult<Option<GalleryImage>>;
    async fn create_gallery_image(&self, image: GalleryImage) -> RepoResult<GalleryImage>;
    async fn save_gallery_image(&self, image: &GalleryImage) -> RepoResult<Option<GalleryImage>>;
    // Returns the removed row so its stored object can be cleaned up.
    async fn delete_gallery_image(&self, id: Uuid) -> RepoResult<Option<GalleryImage>>;

    // --- Testimonials ---
    async fn create_testimonial(&self, testimonial: Testimonial) -> RepoResult<Testimonial>;
    async fn list_testimonials(&self, filter: TestimonialFilter) -> RepoResult<Vec<Testimonial>>;
    async fn find_testimonial(&self, id: Uuid) -> RepoResult<Option<Testimonial>>;
    // Last write wins; there is no version check.
    async fn save_testimonial(&self, testimonial: &Testimonial)
    -> RepoResult<Option<Testimonial>>;
}

/// RepositoryState
///
/// The shared handle stored in `AppState`.
pub type RepositoryState = Arc<dyn Repository>;

const USER_COLUMNS: &str = "id, name, email, phone, role, standard, medium, created_at, \
     password_hash, reset_password_token, reset_password_expire";
const PUBLIC_USER_COLUMNS: &str = "id, name, email, phone, role, standard, medium, created_at";
const COURSE_COLUMNS: &str = "id, title, description, standard, medium, subjects, duration, fee, \
     is_popular, enrolled_students, created_at, updated_at";
const CONTACT_COLUMNS: &str = "id, name, email, phone, subject, message, status, created_at";
const ADMISSION_COLUMNS: &str =
    "id, full_name, email, phone, standard, medium, subject, message, created_at";
const GALLERY_COLUMNS: &str = "id, title, description, category, image_url, public_id, created_at";
const TESTIMONIAL_COLUMNS: &str = "id, student, name, avatar, content, rating, standard, medium, \
     course, featured, status, created_at, approved_at";

/// PostgresRepository
///
/// `Repository` over a sqlx connection pool. Queries are checked at runtime so
/// the crate builds without a live database.
pub struct PostgresRepository {
    pool: PgPool,
}

impl PostgresRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Applies the embedded migrations in `migrations/`.
    pub async fn migrate(&self) -> RepoResult<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl Repository for PostgresRepository {
    // --- USERS ---

    async fn create_user(&self, record: UserRecord) -> RepoResult<UserRecord> {
        let sql = format!(
            "INSERT INTO users ({USER_COLUMNS}) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11) \
             RETURNING {USER_COLUMNS}"
        );
        let u = &record.user;
        let created = sqlx::query_as::<_, UserRecord>(&sql)
            .bind(u.id)
            .bind(&u.name)
            .bind(&u.email)
            .bind(&u.phone)
            .bind(u.role)
            .bind(&u.standard)
            .bind(u.medium)
            .bind(u.created_at)
            .bind(&record.password_hash)
            .bind(&record.reset_password_token)
            .bind(record.reset_password_expire)
            .fetch_one(&self.pool)
            .await?;
        Ok(created)
    }

    async fn find_user(&self, id: Uuid) -> RepoResult<Option<UserRecord>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        Ok(sqlx::query_as::<_, UserRecord>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn find_user_by_email(&self, email: &str) -> RepoResult<Option<UserRecord>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1");
        Ok(sqlx::query_as::<_, UserRecord>(&sql)
            .bind(email.trim().to_lowercase())
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn find_user_by_reset_token(
        &self,
        digest: &str,
        now: DateTime<Utc>,
    ) -> RepoResult<Option<UserRecord>> {
        let sql = format!(
            "SELECT {USER_COLUMNS} FROM users \
             WHERE reset_password_token = $1 AND reset_password_expire > $2"
        );
        Ok(sqlx::query_as::<_, UserRecord>(&sql)
            .bind(digest)
            .bind(now)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn save_user(&self, record: &UserRecord) -> RepoResult<Option<UserRecord>> {
        let sql = format!(
            "UPDATE users SET name = $2, email = $3, phone = $4, role = $5, standard = $6, \
             medium = $7, password_hash = $8, reset_password_token = $9, \
             reset_password_expire = $10 WHERE id = $1 RETURNING {USER_COLUMNS}"
        );
        let u = &record.user;
        Ok(sqlx::query_as::<_, UserRecord>(&sql)
            .bind(u.id)
            .bind(&u.name)
            .bind(&u.email)
            .bind(&u.phone)
            .bind(u.role)
            .bind(&u.standard)
            .bind(u.medium)
            .bind(&record.password_hash)
            .bind(&record.reset_password_token)
            .bind(record.reset_password_expire)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn list_users(&self) -> RepoResult<Vec<User>> {
        let sql = format!("SELECT {PUBLIC_USER_COLUMNS} FROM users ORDER BY created_at DESC");
        Ok(sqlx::query_as::<_, User>(&sql).fetch_all(&self.pool).await?)
    }

    async fn delete_user(&self, id: Uuid) -> RepoResult<bool> {
        let mut tx = self.pool.begin().await?;
        // enrolled_students is a plain array, so the user is removed from it by hand.
        sqlx::query(
            "UPDATE courses SET enrolled_students = array_remove(enrolled_students, $1) \
             WHERE $1 = ANY(enrolled_students)",
        )
        .bind(id)
        .execute(&mut *tx)
        .await?;
        let res = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(res.rows_affected() > 0)
    }

    async fn list_students(&self, standard: &str, medium: Medium) -> RepoResult<Vec<User>> {
        let sql = format!(
            "SELECT {PUBLIC_USER_COLUMNS} FROM users \
             WHERE role = 'student' AND standard = $1 AND medium = $2 ORDER BY name ASC"
        );
        Ok(sqlx::query_as::<_, User>(&sql)
            .bind(standard)
            .bind(medium)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn user_stats(&self) -> RepoResult<UserStats> {
        Ok(sqlx::query_as::<_, UserStats>(
            r#"
            SELECT
                COUNT(*) AS total,
                COUNT(*) FILTER (WHERE role = 'student') AS students,
                COUNT(*) FILTER (WHERE role = 'admin') AS admins,
                COUNT(*) FILTER (WHERE role = 'student' AND medium = 'gujarati') AS gujarati,
                COUNT(*) FILTER (WHERE role = 'student' AND medium = 'english') AS english
            FROM users
            "#,
        )
        .fetch_one(&self.pool)
        .await?)
    }

    // --- COURSES ---

    async fn list_courses(&self) -> RepoResult<Vec<Course>> {
        let sql = format!("SELECT {COURSE_COLUMNS} FROM courses ORDER BY created_at DESC");
        Ok(sqlx::query_as::<_, Course>(&sql).fetch_all(&self.pool).await?)
    }

    async fn find_course(&self, id: Uuid) -> RepoResult<Option<Course>> {
        let sql = format!("SELECT {COURSE_COLUMNS} FROM courses WHERE id = $1");
        Ok(sqlx::query_as::<_, Course>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn popular_courses(&self, limit: i64) -> RepoResult<Vec<Course>> {
        let sql = format!(
            "SELECT {COURSE_COLUMNS} FROM courses WHERE is_popular = true \
             ORDER BY cardinality(enrolled_students) DESC, created_at DESC LIMIT $1"
        );
        Ok(sqlx::query_as::<_, Course>(&sql)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn filter_courses(&self, standard: &str, medium: Medium) -> RepoResult<Vec<Course>> {
        let sql = format!(
            "SELECT {COURSE_COLUMNS} FROM courses \
             WHERE lower(standard) = lower($1) AND medium = $2 ORDER BY created_at DESC"
        );
        Ok(sqlx::query_as::<_, Course>(&sql)
            .bind(standard)
            .bind(medium)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn create_course(&self, course: Course) -> RepoResult<Course> {
        let sql = format!(
            "INSERT INTO courses ({COURSE_COLUMNS}) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12) RETURNING {COURSE_COLUMNS}"
        );
        Ok(sqlx::query_as::<_, Course>(&sql)
            .bind(course.id)
            .bind(&course.title)
            .bind(&course.description)
            .bind(&course.standard)
            .bind(course.medium)
            .bind(&course.subjects)
            .bind(&course.duration)
            .bind(course.fee)
            .bind(course.is_popular)
            .bind(&course.enrolled_students)
            .bind(course.created_at)
            .bind(course.updated_at)
            .fetch_one(&self.pool)
            .await?)
    }

    async fn save_course(&self, course: &Course) -> RepoResult<Option<Course>> {
        let sql = format!(
            "UPDATE courses SET title = $2, description = $3, standard = $4, medium = $5, \
             subjects = $6, duration = $7, fee = $8, is_popular = $9, updated_at = $10 \
             WHERE id = $1 RETURNING {COURSE_COLUMNS}"
        );
        Ok(sqlx::query_as::<_, Course>(&sql)
            .bind(course.id)
            .bind(&course.title)
            .bind(&course.description)
            .bind(&course.standard)
            .bind(course.medium)
            .bind(&course.subjects)
            .bind(&course.duration)
            .bind(course.fee)
            .bind(course.is_popular)
            .bind(course.updated_at)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn delete_course(&self, id: Uuid) -> RepoResult<bool> {
        let res = sqlx::query("DELETE FROM courses WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected() > 0)
    }

    async fn add_enrollment(&self, course_id: Uuid, user_id: Uuid) -> RepoResult<Option<Course>> {
        let sql = format!(
            "UPDATE courses SET enrolled_students = CASE \
                 WHEN $2 = ANY(enrolled_students) THEN enrolled_students \
                 ELSE array_append(enrolled_students, $2) END \
             WHERE id = $1 RETURNING {COURSE_COLUMNS}"
        );
        Ok(sqlx::query_as::<_, Course>(&sql)
            .bind(course_id)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn remove_enrollment(
        &self,
        course_id: Uuid,
        user_id: Uuid,
    ) -> RepoResult<Option<Course>> {
        let sql = format!(
            "UPDATE courses SET enrolled_students = array_remove(enrolled_students, $2) \
             WHERE id = $1 RETURNING {COURSE_COLUMNS}"
        );
        Ok(sqlx::query_as::<_, Course>(&sql)
            .bind(course_id)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?)
    }

    // --- CONTACT MESSAGES ---

    async fn create_contact(&self, contact: Contact) -> RepoResult<Contact> {
        let sql = format!(
            "INSERT INTO contacts ({CONTACT_COLUMNS}) VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             RETURNING {CONTACT_COLUMNS}"
        );
        Ok(sqlx::query_as::<_, Contact>(&sql)
            .bind(contact.id)
            .bind(&contact.name)
            .bind(&contact.email)
            .bind(&contact.phone)
            .bind(&contact.subject)
            .bind(&contact.message)
            .bind(contact.status)
            .bind(contact.created_at)
            .fetch_one(&self.pool)
            .await?)
    }

    async fn list_contacts(&self) -> RepoResult<Vec<Contact>> {
        let sql = format!("SELECT {CONTACT_COLUMNS} FROM contacts ORDER BY created_at DESC");
        Ok(sqlx::query_as::<_, Contact>(&sql).fetch_all(&self.pool).await?)
    }

    async fn find_contact(&self, id: Uuid) -> RepoResult<Option<Contact>> {
        let sql = format!("SELECT {CONTACT_COLUMNS} FROM contacts WHERE id = $1");
        Ok(sqlx::query_as::<_, Contact>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn set_contact_status(
        &self,
        id: Uuid,
        status: ContactStatus,
    ) -> RepoResult<Option<Contact>> {
        let sql =
            format!("UPDATE contacts SET status = $2 WHERE id = $1 RETURNING {CONTACT_COLUMNS}");
        Ok(sqlx::query_as::<_, Contact>(&sql)
            .bind(id)
            .bind(status)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn delete_contact(&self, id: Uuid) -> RepoResult<bool> {
        let res = sqlx::query("DELETE FROM contacts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected() > 0)
    }

    async fn contact_stats(&self) -> RepoResult<ContactStats> {
        Ok(sqlx::query_as::<_, ContactStats>(
            r#"
            SELECT
                COUNT(*) AS total,
                COUNT(*) FILTER (WHERE status = 'new') AS new,
                COUNT(*) FILTER (WHERE status = 'read') AS read,
                COUNT(*) FILTER (WHERE status = 'replied') AS replied
            FROM contacts
            "#,
        )
        .fetch_one(&self.pool)
        .await?)
    }

    // --- ADMISSIONS ---

    async fn create_admission(&self, admission: Admission) -> RepoResult<Admission> {
        let sql = format!(
            "INSERT INTO admissions ({ADMISSION_COLUMNS}) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) RETURNING {ADMISSION_COLUMNS}"
        );
        Ok(sqlx::query_as::<_, Admission>(&sql)
            .bind(admission.id)
            .bind(&admission.full_name)
            .bind(&admission.email)
            .bind(&admission.phone)
            .bind(&admission.standard)
            .bind(admission.medium)
            .bind(&admission.subject)
            .bind(&admission.message)
            .bind(admission.created_at)
            .fetch_one(&self.pool)
            .await?)
    }

    async fn list_admissions(&self) -> RepoResult<Vec<Admission>> {
        let sql = format!("SELECT {ADMISSION_COLUMNS} FROM admissions ORDER BY created_at DESC");
        Ok(sqlx::query_as::<_, Admission>(&sql).fetch_all(&self.pool).await?)
    }

    async fn delete_admission(&self, id: Uuid) -> RepoResult<bool> {
        let res = sqlx::query("DELETE FROM admissions WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected() > 0)
    }

    // --- GALLERY ---

    async fn list_gallery(&self, category: Option<&str>) -> RepoResult<Vec<GalleryImage>> {
        let images = match category {
            Some(category) => {
                let sql = format!(
                    "SELECT {GALLERY_COLUMNS} FROM gallery_images \
                     WHERE category = $1 ORDER BY created_at DESC"
                );
                sqlx::query_as::<_, GalleryImage>(&sql)
                    .bind(category.to_lowercase())
                    .fetch_all(&self.pool)
                    .await?
            }
            None => {
                let sql =
                    format!("SELECT {GALLERY_COLUMNS} FROM gallery_images ORDER BY created_at DESC");
                sqlx::query_as::<_, GalleryImage>(&sql)
                    .fetch_all(&self.pool)
                    .await?
            }
        };
        Ok(images)
    }

    async fn find_gallery_image(&self, id: Uuid) -> RepoResult<Option<GalleryImage>> {
        let sql = format!("SELECT {GALLERY_COLUMNS} FROM gallery_images WHERE id = $1");
        Ok(sqlx::query_as::<_, GalleryImage>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn create_gallery_image(&self, image: GalleryImage) -> RepoResult<GalleryImage> {
        let sql = format!(
            "INSERT INTO gallery_images ({GALLERY_COLUMNS}) VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING {GALLERY_COLUMNS}"
        );
        Ok(sqlx::query_as::<_, GalleryImage>(&sql)
            .bind(image.id)
            .bind(&image.title)
            .bind(&image.description)
            .bind(&image.category)
            .bind(&image.image_url)
            .bind(&image.public_id)
            .bind(image.created_at)
            .fetch_one(&self.pool)
            .await?)
    }

    async fn save_gallery_image(&self, image: &GalleryImage) -> RepoResult<Option<GalleryImage>> {
        let sql = format!(
            "UPDATE gallery_images SET title = $2, description = $3, category = $4, \
             image_url = $5, public_id = $6 WHERE id = $1 RETURNING {GALLERY_COLUMNS}"
        );
        Ok(sqlx::query_as::<_, GalleryImage>(&sql)
            .bind(image.id)
            .bind(&image.title)
            .bind(&image.description)
            .bind(&image.category)
            .bind(&image.image_url)
            .bind(&image.public_id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn delete_gallery_image(&self, id: Uuid) -> RepoResult<Option<GalleryImage>> {
        let sql = format!("DELETE FROM gallery_images WHERE id = $1 RETURNING {GALLERY_COLUMNS}");
        Ok(sqlx::query_as::<_, GalleryImage>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    // --- TESTIMONIALS ---

    async fn create_testimonial(&self, t: Testimonial) -> RepoResult<Testimonial> {
        let sql = format!(
            "INSERT INTO testimonials ({TESTIMONIAL_COLUMNS}) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13) \
             RETURNING {TESTIMONIAL_COLUMNS}"
        );
        Ok(sqlx::query_as::<_, Testimonial>(&sql)
            .bind(t.id)
            .bind(t.student)
            .bind(&t.name)
            .bind(&t.avatar)
            .bind(&t.content)
            .bind(t.rating)
            .bind(&t.standard)
            .bind(t.medium)
            .bind(t.course)
            .bind(t.featured)
            .bind(t.status)
            .bind(t.created_at)
            .bind(t.approved_at)
            .fetch_one(&self.pool)
            .await?)
    }

    async fn list_testimonials(&self, filter: TestimonialFilter) -> RepoResult<Vec<Testimonial>> {
        let clause = match filter {
            TestimonialFilter::All => "ORDER BY created_at DESC",
            TestimonialFilter::Approved => {
                "WHERE status = 'approved' ORDER BY featured DESC, created_at DESC"
            }
            TestimonialFilter::Featured => {
                "WHERE status = 'approved' AND featured = true ORDER BY created_at DESC"
            }
        };
        let sql = format!("SELECT {TESTIMONIAL_COLUMNS} FROM testimonials {clause}");
        Ok(sqlx::query_as::<_, Testimonial>(&sql)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn find_testimonial(&self, id: Uuid) -> RepoResult<Option<Testimonial>> {
        let sql = format!("SELECT {TESTIMONIAL_COLUMNS} FROM testimonials WHERE id = $1");
        Ok(sqlx::query_as::<_, Testimonial>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn save_testimonial(&self, t: &Testimonial) -> RepoResult<Option<Testimonial>> {
        let sql = format!(
            "UPDATE testimonials SET featured = $2, status = $3, approved_at = $4 \
             WHERE id = $1 RETURNING {TESTIMONIAL_COLUMNS}"
        );
        Ok(sqlx::query_as::<_, Testimonial>(&sql)
            .bind(t.id)
            .bind(t.featured)
            .bind(t.status)
            .bind(t.approved_at)
            .fetch_optional(&self.pool)
            .await?)
    }
}
