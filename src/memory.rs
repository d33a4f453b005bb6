use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::{
    Admission, Contact, ContactStats, ContactStatus, Course, GalleryImage, Medium, Role,
    Testimonial, User, UserRecord, UserStats,
};
use crate::repository::{RepoError, RepoResult, Repository, TestimonialFilter};

#[derive(Default)]
struct Tables {
    users: Vec<UserRecord>,
    courses: Vec<Course>,
    contacts: Vec<Contact>,
    admissions: Vec<Admission>,
    gallery: Vec<GalleryImage>,
    testimonials: Vec<Testimonial>,
}

/// MemoryRepository
///
/// `Repository` held entirely in process memory. Selected with
/// `DATABASE_URL=memory` and used by the test suites. Rows are kept in
/// insertion order; listings sort the way the SQL queries do.
#[derive(Default)]
pub struct MemoryRepository {
    tables: RwLock<Tables>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn newest_first<T>(rows: &mut [T], created_at: impl Fn(&T) -> DateTime<Utc>) {
    rows.sort_by_key(|row| std::cmp::Reverse(created_at(row)));
}

fn replace<T: Clone>(rows: &mut [T], is_target: impl Fn(&T) -> bool, row: &T) -> Option<T> {
    let slot = rows.iter_mut().find(|r| is_target(r))?;
    *slot = row.clone();
    Some(row.clone())
}

#[async_trait]
impl Repository for MemoryRepository {
    async fn create_user(&self, record: UserRecord) -> RepoResult<UserRecord> {
        let mut tables = self.tables.write().await;
        if tables.users.iter().any(|u| u.user.email == record.user.email) {
            return Err(RepoError::Conflict("email".to_string()));
        }
        tables.users.push(record.clone());
        Ok(record)
    }

    async fn find_user(&self, id: Uuid) -> RepoResult<Option<UserRecord>> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|u| u.user.id == id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> RepoResult<Option<UserRecord>> {
        let email = email.trim().to_lowercase();
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|u| u.user.email == email).cloned())
    }

    async fn find_user_by_reset_token(
        &self,
        digest: &str,
        now: DateTime<Utc>,
    ) -> RepoResult<Option<UserRecord>> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .iter()
            .find(|u| {
                u.reset_password_token.as_deref() == Some(digest)
                    && u.reset_password_expire.is_some_and(|exp| exp > now)
            })
            .cloned())
    }

    async fn save_user(&self, record: &UserRecord) -> RepoResult<Option<UserRecord>> {
        let mut tables = self.tables.write().await;
        if tables
            .users
            .iter()
            .any(|u| u.user.id != record.user.id && u.user.email == record.user.email)
        {
            return Err(RepoError::Conflict("email".to_string()));
        }
        Ok(replace(&mut tables.users, |u| u.user.id == record.user.id, record))
    }

    async fn list_users(&self) -> RepoResult<Vec<User>> {
        let tables = self.tables.read().await;
        let mut users: Vec<User> = tables.users.iter().map(|u| u.user.clone()).collect();
        newest_first(&mut users, |u| u.created_at);
        Ok(users)
    }

    async fn delete_user(&self, id: Uuid) -> RepoResult<bool> {
        let mut tables = self.tables.write().await;
        let before = tables.users.len();
        tables.users.retain(|u| u.user.id != id);
        let removed = tables.users.len() < before;
        if removed {
            for t in tables.testimonials.iter_mut().filter(|t| t.student == Some(id)) {
                t.student = None;
            }
            for course in tables.courses.iter_mut() {
                course.enrolled_students.retain(|student| *student != id);
            }
        }
        Ok(removed)
    }

    async fn list_students(&self, standard: &str, medium: Medium) -> RepoResult<Vec<User>> {
        let tables = self.tables.read().await;
        let mut students: Vec<User> = tables
            .users
            .iter()
            .map(|u| &u.user)
            .filter(|u| {
                u.role == Role::Student
                    && u.standard.as_deref() == Some(standard)
                    && u.medium == Some(medium)
            })
            .cloned()
            .collect();
        students.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(students)
    }

    async fn user_stats(&self) -> RepoResult<UserStats> {
        let tables = self.tables.read().await;
        let mut stats = UserStats::default();
        for u in tables.users.iter().map(|u| &u.user) {
            stats.total += 1;
            match u.role {
                Role::Admin => stats.admins += 1,
                Role::Student => {
                    stats.students += 1;
                    match u.medium {
                        Some(Medium::Gujarati) => stats.gujarati += 1,
                        Some(Medium::English) => stats.english += 1,
                        None => {}
                    }
                }
            }
        }
        Ok(stats)
    }

    async fn list_courses(&self) -> RepoResult<Vec<Course>> {
        let mut courses = self.tables.read().await.courses.clone();
        newest_first(&mut courses, |c| c.created_at);
        Ok(courses)
    }

    async fn find_course(&self, id: Uuid) -> RepoResult<Option<Course>> {
        let tables = self.tables.read().await;
        Ok(tables.courses.iter().find(|c| c.id == id).cloned())
    }

    async fn popular_courses(&self, limit: i64) -> RepoResult<Vec<Course>> {
        let mut courses: Vec<Course> = self
            .tables
            .read()
            .await
            .courses
            .iter()
            .filter(|c| c.is_popular)
            .cloned()
            .collect();
        courses.sort_by(|a, b| {
            b.enrolled_students
                .len()
                .cmp(&a.enrolled_students.len())
                .then(b.created_at.cmp(&a.created_at))
        });
        courses.truncate(usize::try_from(limit).unwrap_or(0));
        Ok(courses)
    }

    async fn filter_courses(&self, standard: &str, medium: Medium) -> RepoResult<Vec<Course>> {
        let mut courses: Vec<Course> = self
            .tables
            .read()
            .await
            .courses
            .iter()
            .filter(|c| c.standard.eq_ignore_ascii_case(standard) && c.medium == medium)
            .cloned()
            .collect();
        newest_first(&mut courses, |c| c.created_at);
        Ok(courses)
    }

    async fn create_course(&self, course: Course) -> RepoResult<Course> {
        self.tables.write().await.courses.push(course.clone());
        Ok(course)
    }

    async fn save_course(&self, course: &Course) -> RepoResult<Option<Course>> {
        let mut tables = self.tables.write().await;
        let Some(slot) = tables.courses.iter_mut().find(|c| c.id == course.id) else {
            return Ok(None);
        };
        // Enrollment is owned by add/remove_enrollment.
        let enrolled = std::mem::take(&mut slot.enrolled_students);
        *slot = Course {
            enrolled_students: enrolled,
            ..course.clone()
        };
        Ok(Some(slot.clone()))
    }

    async fn delete_course(&self, id: Uuid) -> RepoResult<bool> {
        let mut tables = self.tables.write().await;
        let before = tables.courses.len();
        tables.courses.retain(|c| c.id != id);
        let removed = tables.courses.len() < before;
        if removed {
            for t in tables.testimonials.iter_mut().filter(|t| t.course == Some(id)) {
                t.course = None;
            }
        }
        Ok(removed)
    }

    async fn add_enrollment(&self, course_id: Uuid, user_id: Uuid) -> RepoResult<Option<Course>> {
        let mut tables = self.tables.write().await;
        let Some(course) = tables.courses.iter_mut().find(|c| c.id == course_id) else {
            return Ok(None);
        };
        if !course.enrolled_students.contains(&user_id) {
            course.enrolled_students.push(user_id);
        }
        Ok(Some(course.clone()))
    }

    async fn remove_enrollment(
        &self,
        course_id: Uuid,
        user_id: Uuid,
    ) -> RepoResult<Option<Course>> {
        let mut tables = self.tables.write().await;
        let Some(course) = tables.courses.iter_mut().find(|c| c.id == course_id) else {
            return Ok(None);
        };
        course.enrolled_students.retain(|id| *id != user_id);
        Ok(Some(course.clone()))
    }

    async fn create_contact(&self, contact: Contact) -> RepoResult<Contact> {
        self.tables.write().await.contacts.push(contact.clone());
        Ok(contact)
    }

    async fn list_contacts(&self) -> RepoResult<Vec<Contact>> {
        let mut contacts = self.tables.read().await.contacts.clone();
        newest_first(&mut contacts, |c| c.created_at);
        Ok(contacts)
    }

    async fn find_contact(&self, id: Uuid) -> RepoResult<Option<Contact>> {
        let tables = self.tables.read().await;
        Ok(tables.contacts.iter().find(|c| c.id == id).cloned())
    }

    async fn set_contact_status(
        &self,
        id: Uuid,
        status: ContactStatus,
    ) -> RepoResult<Option<Contact>> {
        let mut tables = self.tables.write().await;
        Ok(tables.contacts.iter_mut().find(|c| c.id == id).map(|c| {
            c.status = status;
            c.clone()
        }))
    }

    async fn delete_contact(&self, id: Uuid) -> RepoResult<bool> {
        let mut tables = self.tables.write().await;
        let before = tables.contacts.len();
        tables.contacts.retain(|c| c.id != id);
        Ok(tables.contacts.len() < before)
    }

    async fn contact_stats(&self) -> RepoResult<ContactStats> {
        let tables = self.tables.read().await;
        let mut stats = ContactStats::default();
        for c in &tables.contacts {
            stats.total += 1;
            match c.status {
                ContactStatus::New => stats.new += 1,
                ContactStatus::Read => stats.read += 1,
                ContactStatus::Replied => stats.replied += 1,
            }
        }
        Ok(stats)
    }

    async fn create_admission(&self, admission: Admission) -> RepoResult<Admission> {
        self.tables.write().await.admissions.push(admission.clone());
        Ok(admission)
    }

    async fn list_admissions(&self) -> RepoResult<Vec<Admission>> {
        let mut admissions = self.tables.read().await.admissions.clone();
        newest_first(&mut admissions, |a| a.created_at);
        Ok(admissions)
    }

    async fn delete_admission(&self, id: Uuid) -> RepoResult<bool> {
        let mut tables = self.tables.write().await;
        let before = tables.admissions.len();
        tables.admissions.retain(|a| a.id != id);
        Ok(tables.admissions.len() < before)
    }

    async fn list_gallery(&self, category: Option<&str>) -> RepoResult<Vec<GalleryImage>> {
        let category = category.map(str::to_lowercase);
        let mut images: Vec<GalleryImage> = self
            .tables
            .read()
            .await
            .gallery
            .iter()
            .filter(|g| category.as_deref().is_none_or(|c| g.category == c))
            .cloned()
            .collect();
        newest_first(&mut images, |g| g.created_at);
        Ok(images)
    }

    async fn find_gallery_image(&self, id: Uuid) -> RepoResult<Option<GalleryImage>> {
        let tables = self.tables.read().await;
        Ok(tables.gallery.iter().find(|g| g.id == id).cloned())
    }

    async fn create_gallery_image(&self, image: GalleryImage) -> RepoResult<GalleryImage> {
        self.tables.write().await.gallery.push(image.clone());
        Ok(image)
    }

    async fn save_gallery_image(&self, image: &GalleryImage) -> RepoResult<Option<GalleryImage>> {
        let mut tables = self.tables.write().await;
        Ok(replace(&mut tables.gallery, |g| g.id == image.id, image))
    }

    async fn delete_gallery_image(&self, id: Uuid) -> RepoResult<Option<GalleryImage>> {
        let mut tables = self.tables.write().await;
        let position = tables.gallery.iter().position(|g| g.id == id);
        Ok(position.map(|i| tables.gallery.remove(i)))
    }

    async fn create_testimonial(&self, testimonial: Testimonial) -> RepoResult<Testimonial> {
        self.tables
            .write()
            .await
            .testimonials
            .push(testimonial.clone());
        Ok(testimonial)
    }

    async fn list_testimonials(&self, filter: TestimonialFilter) -> RepoResult<Vec<Testimonial>> {
        let mut rows: Vec<Testimonial> = self
            .tables
            .read()
            .await
            .testimonials
            .iter()
            .filter(|t| filter.admits(t))
            .cloned()
            .collect();
        newest_first(&mut rows, |t| t.created_at);
        if filter == TestimonialFilter::Approved {
            // Stable sort keeps the newest-first order within each group.
            rows.sort_by_key(|t| !t.featured);
        }
        Ok(rows)
    }

    async fn find_testimonial(&self, id: Uuid) -> RepoResult<Option<Testimonial>> {
        let tables = self.tables.read().await;
        Ok(tables.testimonials.iter().find(|t| t.id == id).cloned())
    }

    async fn save_testimonial(&self, testimonial: &Testimonial) -> RepoResult<Option<Testimonial>> {
        let mut tables = self.tables.write().await;
        Ok(replace(
            &mut tables.testimonials,
            |t| t.id == testimonial.id,
            testimonial,
        ))
    }
}
