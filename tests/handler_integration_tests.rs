mod common;

use axum::http::StatusCode;
use common::{PASSWORD, app, bearer, body_json, empty_request, json_request, seed_user, test_state};
use serde_json::json;
use tower::util::ServiceExt;
use trimurti_classes::{config::Env, models::Role, storage::StorageService};

// --- System ---

#[tokio::test]
async fn test_health_check() {
    let (state, _) = test_state(Env::Production);
    let response = app(&state)
        .oneshot(empty_request("GET", "/api/health", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["status"], "ok");
}

#[tokio::test]
async fn test_openapi_document_is_served() {
    let (state, _) = test_state(Env::Production);
    let response = app(&state)
        .oneshot(empty_request("GET", "/api-docs/openapi.json", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let doc = body_json(response).await;
    assert!(doc["paths"].get("/api/testimonials/{id}/approve").is_some());
}

#[tokio::test]
async fn test_request_id_is_propagated() {
    let (state, _) = test_state(Env::Production);
    let response = app(&state)
        .oneshot(empty_request("GET", "/api/health", None))
        .await
        .unwrap();
    assert!(response.headers().contains_key("x-request-id"));
}

// --- Auth ---

#[tokio::test]
async fn test_register_login_and_me() {
    let (state, _) = test_state(Env::Production);
    let router = app(&state);

    let response = router
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/auth/register",
            None,
            json!({
                "name": "Kiran",
                "email": "Kiran@Example.com",
                "password": PASSWORD,
                "standard": "Class 9",
                "medium": "gujarati"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["user"]["role"], "student");
    assert_eq!(body["user"]["email"], "kiran@example.com");
    assert!(body["user"].get("passwordHash").is_none());

    let response = router
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/auth/login",
            None,
            json!({ "email": "kiran@example.com", "password": PASSWORD }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let token = body_json(response).await["token"]
        .as_str()
        .unwrap()
        .to_string();

    let response = router
        .oneshot(empty_request(
            "GET",
            "/api/auth/me",
            Some(&format!("Bearer {token}")),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["name"], "Kiran");
}

#[tokio::test]
async fn test_duplicate_registration_conflicts() {
    let (state, _) = test_state(Env::Production);
    seed_user(&state, Role::Student, "taken@example.com").await;

    let response = app(&state)
        .oneshot(json_request(
            "POST",
            "/api/auth/register",
            None,
            json!({ "name": "Again", "email": "taken@example.com", "password": PASSWORD }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(response).await["success"], false);
}

#[tokio::test]
async fn test_register_validation_errors() {
    let (state, _) = test_state(Env::Production);
    let response = app(&state)
        .oneshot(json_request(
            "POST",
            "/api/auth/register",
            None,
            json!({ "email": "bad", "password": "123" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["errors"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_login_with_wrong_password() {
    let (state, _) = test_state(Env::Production);
    seed_user(&state, Role::Student, "s@example.com").await;

    let response = app(&state)
        .oneshot(json_request(
            "POST",
            "/api/auth/login",
            None,
            json!({ "email": "s@example.com", "password": "wrong-password" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["message"], "Invalid credentials");
}

#[tokio::test]
async fn test_admin_login_rejects_students() {
    let (state, _) = test_state(Env::Production);
    seed_user(&state, Role::Student, "s@example.com").await;
    seed_user(&state, Role::Admin, "a@example.com").await;
    let router = app(&state);

    let response = router
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/admin/login",
            None,
            json!({ "email": "s@example.com", "password": PASSWORD }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = router
        .oneshot(json_request(
            "POST",
            "/api/admin/login",
            None,
            json!({ "email": "a@example.com", "password": PASSWORD }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["user"]["role"], "admin");
}

#[tokio::test]
async fn test_update_details_ignores_role() {
    let (state, _) = test_state(Env::Production);
    let student = seed_user(&state, Role::Student, "s@example.com").await;

    let response = app(&state)
        .oneshot(json_request(
            "PUT",
            "/api/auth/updatedetails",
            Some(&bearer(&state, &student)),
            json!({ "name": "Renamed", "role": "admin" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["name"], "Renamed");
    assert_eq!(body["data"]["role"], "student");
}

#[tokio::test]
async fn test_update_password_requires_current() {
    let (state, _) = test_state(Env::Production);
    let student = seed_user(&state, Role::Student, "s@example.com").await;
    let auth = bearer(&state, &student);
    let router = app(&state);

    let response = router
        .clone()
        .oneshot(json_request(
            "PUT",
            "/api/auth/updatepassword",
            Some(&auth),
            json!({ "currentPassword": "nope-nope", "newPassword": "fresh-pass" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["message"], "Password is incorrect");

    let response = router
        .clone()
        .oneshot(json_request(
            "PUT",
            "/api/auth/updatepassword",
            Some(&auth),
            json!({ "currentPassword": PASSWORD, "newPassword": "fresh-pass" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_json(response).await["token"].is_string());

    let response = router
        .oneshot(json_request(
            "POST",
            "/api/auth/login",
            None,
            json!({ "email": "s@example.com", "password": "fresh-pass" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_password_reset_flow() {
    // Local mode echoes the reset token.
    let (state, _) = test_state(Env::Local);
    seed_user(&state, Role::Student, "forgetful@example.com").await;
    let router = app(&state);

    let response = router
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/auth/forgotpassword",
            None,
            json!({ "email": "nobody@example.com" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = router
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/auth/forgotpassword",
            None,
            json!({ "email": "forgetful@example.com" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let reset_token = body_json(response).await["data"]["resetToken"]
        .as_str()
        .unwrap()
        .to_string();

    let response = router
        .clone()
        .oneshot(json_request(
            "PUT",
            "/api/auth/resetpassword/not-the-token",
            None,
            json!({ "password": "brand-new" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let uri = format!("/api/auth/resetpassword/{reset_token}");
    let response = router
        .clone()
        .oneshot(json_request("PUT", &uri, None, json!({ "password": "brand-new" })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Tokens are single use.
    let response = router
        .oneshot(json_request("PUT", &uri, None, json!({ "password": "again-new" })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_reset_token_hidden_in_production() {
    let (state, _) = test_state(Env::Production);
    seed_user(&state, Role::Student, "p@example.com").await;

    let response = app(&state)
        .oneshot(json_request(
            "POST",
            "/api/auth/forgotpassword",
            None,
            json!({ "email": "p@example.com" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_json(response).await.get("data").is_none());
}

// --- Access tiers ---

#[tokio::test]
async fn test_tiers_reject_missing_or_weak_credentials() {
    let (state, _) = test_state(Env::Production);
    let student = seed_user(&state, Role::Student, "s@example.com").await;
    let router = app(&state);

    let response = router
        .clone()
        .oneshot(empty_request("GET", "/api/auth/me", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = router
        .clone()
        .oneshot(empty_request("GET", "/api/contact", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = router
        .oneshot(empty_request(
            "GET",
            "/api/admissions",
            Some(&bearer(&state, &student)),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

// --- Courses ---

#[tokio::test]
async fn test_course_lifecycle_and_enrollment() {
    let (state, _) = test_state(Env::Production);
    let admin = seed_user(&state, Role::Admin, "a@example.com").await;
    let student = seed_user(&state, Role::Student, "s@example.com").await;
    let admin_auth = bearer(&state, &admin);
    let student_auth = bearer(&state, &student);
    let router = app(&state);

    let response = router
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/courses",
            Some(&admin_auth),
            json!({
                "title": "Maths Mastery",
                "description": "Algebra and geometry",
                "standard": "Class 10",
                "medium": "english",
                "subjects": ["Maths"],
                "fee": 12000,
                "isPopular": true
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let course_id = body_json(response).await["data"]["id"]
        .as_str()
        .unwrap()
        .to_string();

    let enroll_uri = format!("/api/courses/{course_id}/enroll");
    let response = router
        .clone()
        .oneshot(empty_request("POST", &enroll_uri, Some(&student_auth)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["enrolledStudents"][0], student.id.to_string());

    let response = router
        .clone()
        .oneshot(empty_request("POST", &enroll_uri, Some(&student_auth)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await["message"],
        "Already enrolled in this course"
    );

    // Editing a course keeps its enrollment.
    let response = router
        .clone()
        .oneshot(json_request(
            "PUT",
            &format!("/api/courses/{course_id}"),
            Some(&admin_auth),
            json!({ "fee": 15000 }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["fee"], 15000);
    assert_eq!(body["data"]["enrolledStudents"].as_array().unwrap().len(), 1);

    let response = router
        .clone()
        .oneshot(empty_request("GET", "/api/courses/popular", None))
        .await
        .unwrap();
    assert_eq!(body_json(response).await["count"], 1);

    let response = router
        .clone()
        .oneshot(empty_request(
            "GET",
            "/api/courses/filter/class%2010/English",
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["count"], 1);

    let response = router
        .clone()
        .oneshot(empty_request("DELETE", &enroll_uri, Some(&student_auth)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = router
        .clone()
        .oneshot(empty_request("DELETE", &enroll_uri, Some(&student_auth)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = router
        .clone()
        .oneshot(empty_request(
            "DELETE",
            &format!("/api/courses/{course_id}"),
            Some(&admin_auth),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = router
        .oneshot(empty_request("GET", &format!("/api/courses/{course_id}"), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["message"], "Course not found");
}

#[tokio::test]
async fn test_filter_rejects_unknown_medium() {
    let (state, _) = test_state(Env::Production);
    let response = app(&state)
        .oneshot(empty_request("GET", "/api/courses/filter/Class%2010/hindi", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// --- Contact, admissions ---

#[tokio::test]
async fn test_contact_message_triage() {
    let (state, _) = test_state(Env::Production);
    let admin = seed_user(&state, Role::Admin, "a@example.com").await;
    let auth = bearer(&state, &admin);
    let router = app(&state);

    let response = router
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/contact",
            None,
            json!({
                "name": "Parent",
                "email": "parent@example.com",
                "subject": "Fees",
                "message": "What are the fees for Class 8?"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert_eq!(
        body["message"],
        "Thank you for contacting us. We will get back to you soon."
    );
    let id = body["data"]["id"].as_str().unwrap().to_string();

    let response = router
        .clone()
        .oneshot(json_request(
            "PUT",
            &format!("/api/contact/{id}"),
            Some(&auth),
            json!({ "status": "replied" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["status"], "replied");

    let response = router
        .clone()
        .oneshot(empty_request("GET", "/api/contact/stats", Some(&auth)))
        .await
        .unwrap();
    let stats = body_json(response).await;
    assert_eq!(stats["data"]["total"], 1);
    assert_eq!(stats["data"]["replied"], 1);
    assert_eq!(stats["data"]["new"], 0);

    let response = router
        .oneshot(empty_request("DELETE", &format!("/api/contact/{id}"), Some(&auth)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_admission_submission_and_listing() {
    let (state, _) = test_state(Env::Production);
    let admin = seed_user(&state, Role::Admin, "a@example.com").await;
    let router = app(&state);

    let response = router
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/admissions",
            None,
            json!({
                "fullName": "Meera Patel",
                "email": "meera@example.com",
                "phone": "9876543210",
                "standard": "Class 8",
                "medium": "english",
                "subject": "",
                "message": ""
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Admission form submitted successfully");

    let response = router
        .oneshot(empty_request(
            "GET",
            "/api/admissions",
            Some(&bearer(&state, &admin)),
        ))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["count"], 1);
    assert_eq!(body["data"][0]["fullName"], "Meera Patel");
}

// --- Users ---

#[tokio::test]
async fn test_user_administration() {
    let (state, _) = test_state(Env::Production);
    let admin = seed_user(&state, Role::Admin, "a@example.com").await;
    let auth = bearer(&state, &admin);
    let router = app(&state);

    let response = router
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/users",
            Some(&auth),
            json!({
                "name": "Teacher Two",
                "email": "second@example.com",
                "password": PASSWORD,
                "role": "admin"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = router
        .clone()
        .oneshot(empty_request("GET", "/api/users/stats", Some(&auth)))
        .await
        .unwrap();
    let stats = body_json(response).await;
    assert_eq!(stats["data"]["total"], 2);
    assert_eq!(stats["data"]["admins"], 2);

    let response = router
        .clone()
        .oneshot(empty_request(
            "DELETE",
            &format!("/api/users/{}", admin.id),
            Some(&auth),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let student = seed_user(&state, Role::Student, "kid@example.com").await;
    let response = router
        .clone()
        .oneshot(empty_request(
            "GET",
            "/api/users/students/Class%2010/english",
            Some(&auth),
        ))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["count"], 1);
    assert_eq!(body["data"][0]["id"], student.id.to_string());
}

#[tokio::test]
async fn test_course_update_is_validated() {
    let (state, _) = test_state(Env::Production);
    let admin = seed_user(&state, Role::Admin, "a@example.com").await;
    let auth = bearer(&state, &admin);
    let router = app(&state);

    let response = router
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/courses",
            Some(&auth),
            json!({
                "title": "Physics",
                "description": "Mechanics and optics",
                "standard": "Class 11",
                "medium": "gujarati"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let uri = format!(
        "/api/courses/{}",
        body_json(response).await["data"]["id"].as_str().unwrap()
    );

    for changes in [
        json!({ "title": "" }),
        json!({ "title": "x".repeat(101) }),
        json!({ "standard": "  " }),
        json!({ "fee": -1 }),
    ] {
        let response = router
            .clone()
            .oneshot(json_request("PUT", &uri, Some(&auth), changes))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    let response = router
        .oneshot(empty_request("GET", &uri, None))
        .await
        .unwrap();
    let course = body_json(response).await["data"].clone();
    assert_eq!(course["title"], "Physics");
    assert_eq!(course["standard"], "Class 11");
    assert_eq!(course["fee"], 0);
}

// --- Gallery ---

#[tokio::test]
async fn test_gallery_delete_removes_stored_object() {
    let (state, storage) = test_state(Env::Production);
    let admin = seed_user(&state, Role::Admin, "a@example.com").await;
    let auth = bearer(&state, &admin);
    let router = app(&state);

    storage
        .put_object("trimurti-prize.png", "image/png", b"png".to_vec())
        .await
        .unwrap();

    let response = router
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/gallery",
            Some(&auth),
            json!({
                "title": "Prize day",
                "category": "Events",
                "imageUrl": "http://localhost:9000/mock-bucket/trimurti-prize.png",
                "publicId": "trimurti-prize.png"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let id = body_json(response).await["data"]["id"]
        .as_str()
        .unwrap()
        .to_string();

    let response = router
        .clone()
        .oneshot(empty_request("GET", "/api/gallery/events", None))
        .await
        .unwrap();
    assert_eq!(body_json(response).await["count"], 1);

    let response = router
        .oneshot(empty_request("DELETE", &format!("/api/gallery/{id}"), Some(&auth)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(!storage.contains("trimurti-prize.png"));
}

#[tokio::test]
async fn test_gallery_update_is_validated() {
    let (state, _) = test_state(Env::Production);
    let admin = seed_user(&state, Role::Admin, "a@example.com").await;
    let auth = bearer(&state, &admin);
    let router = app(&state);

    let response = router
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/gallery",
            Some(&auth),
            json!({
                "title": "Science fair",
                "category": "Events",
                "imageUrl": "http://localhost:9000/mock-bucket/trimurti-fair.png"
            }),
        ))
        .await
        .unwrap();
    let id = body_json(response).await["data"]["id"]
        .as_str()
        .unwrap()
        .to_string();
    let uri = format!("/api/gallery/{id}");

    let response = router
        .clone()
        .oneshot(json_request(
            "PUT",
            &uri,
            Some(&auth),
            json!({ "title": "", "category": "", "imageUrl": "" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["errors"].as_array().unwrap().len(), 3);

    let response = router
        .oneshot(json_request(
            "PUT",
            &uri,
            Some(&auth),
            json!({ "title": "Science fair 2025", "category": "Achievements" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let data = body_json(response).await["data"].clone();
    assert_eq!(data["title"], "Science fair 2025");
    assert_eq!(data["category"], "achievements");
}

// --- Testimonials ---

#[tokio::test]
async fn test_testimonial_moderation_flow() {
    let (state, _) = test_state(Env::Production);
    let admin = seed_user(&state, Role::Admin, "a@example.com").await;
    let student = seed_user(&state, Role::Student, "s@example.com").await;
    let admin_auth = bearer(&state, &admin);
    let router = app(&state);

    let response = router
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/testimonials",
            Some(&bearer(&state, &student)),
            json!({
                "name": "Priya",
                "content": "Best coaching in town, truly helpful.",
                "rating": 5,
                "standard": "Class 10",
                "medium": "english"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert_eq!(body["data"]["status"], "pending");
    assert_eq!(body["data"]["student"], student.id.to_string());
    let id = body["data"]["id"].as_str().unwrap().to_string();

    // Pending testimonials stay off the public list.
    let response = router
        .clone()
        .oneshot(empty_request("GET", "/api/testimonials", None))
        .await
        .unwrap();
    assert_eq!(body_json(response).await["count"], 0);

    let response = router
        .clone()
        .oneshot(empty_request(
            "PUT",
            &format!("/api/testimonials/{id}/approve"),
            Some(&admin_auth),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["status"], "approved");
    assert!(body["data"]["approvedAt"].is_string());

    let response = router
        .clone()
        .oneshot(empty_request(
            "PUT",
            &format!("/api/testimonials/{id}/feature"),
            Some(&admin_auth),
        ))
        .await
        .unwrap();
    assert_eq!(body_json(response).await["data"]["featured"], true);

    let response = router
        .clone()
        .oneshot(empty_request("GET", "/api/testimonials/featured", None))
        .await
        .unwrap();
    assert_eq!(body_json(response).await["count"], 1);

    let response = router
        .clone()
        .oneshot(empty_request(
            "PUT",
            &format!("/api/testimonials/{id}/reject"),
            Some(&admin_auth),
        ))
        .await
        .unwrap();
    assert_eq!(body_json(response).await["data"]["status"], "rejected");

    let response = router
        .clone()
        .oneshot(empty_request("GET", "/api/testimonials", None))
        .await
        .unwrap();
    assert_eq!(body_json(response).await["count"], 0);

    let response = router
        .oneshot(empty_request("GET", "/api/testimonials/all", Some(&admin_auth)))
        .await
        .unwrap();
    assert_eq!(body_json(response).await["count"], 1);
}

#[tokio::test]
async fn test_anonymous_testimonial_with_bad_rating() {
    let (state, _) = test_state(Env::Production);
    let response = app(&state)
        .oneshot(json_request(
            "POST",
            "/api/testimonials",
            None,
            json!({
                "name": "Anon",
                "content": "Good teachers and a calm place to study.",
                "rating": 9,
                "standard": "Class 12",
                "medium": "gujarati"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await["message"],
        "Rating must be between 1 and 5"
    );
}

#[tokio::test]
async fn test_moderating_unknown_testimonial() {
    let (state, _) = test_state(Env::Production);
    let admin = seed_user(&state, Role::Admin, "a@example.com").await;
    let response = app(&state)
        .oneshot(empty_request(
            "PUT",
            &format!("/api/testimonials/{}/approve", uuid::Uuid::new_v4()),
            Some(&bearer(&state, &admin)),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
