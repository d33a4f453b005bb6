mod common;

use axum::{extract::Request, middleware::Next};
use chrono::Utc;
use common::{PASSWORD, app, seed_user, spawn_app, spawn_router, test_state, unsigned_token};
use reqwest::StatusCode;
use std::sync::{
    Arc, Mutex,
    atomic::{AtomicUsize, Ordering},
};
use trimurti_classes::{
    AppState,
    client::{
        Alert, AdmissionForm, ApiClient, AuthSession, MemorySessionStore, Navigator,
        RecordingNavigator, SESSION_EXPIRED_PATH, SessionStore, TOKEN_KEY, USER_KEY,
        token_is_live,
    },
    config::Env,
    models::{CreateAdmissionRequest, CreateTestimonialRequest, LoginRequest, Role, User},
};

/// A client wired to a running server, with handles on its store and navigator.
struct TestClient {
    api: Arc<ApiClient>,
    store: Arc<MemorySessionStore>,
    navigator: Arc<RecordingNavigator>,
    session: AuthSession,
}

async fn spawn_client(state: &AppState, at: &str) -> TestClient {
    client_for(spawn_app(state).await, at)
}

fn client_for(base_url: String, at: &str) -> TestClient {
    let store = Arc::new(MemorySessionStore::new());
    let navigator = Arc::new(RecordingNavigator::at(at));
    let api = Arc::new(ApiClient::new(base_url, store.clone(), navigator.clone()));
    let session = AuthSession::new(api.clone(), store.clone());
    TestClient {
        api,
        store,
        navigator,
        session,
    }
}

fn credentials(email: &str) -> LoginRequest {
    LoginRequest {
        email: email.to_string(),
        password: PASSWORD.to_string(),
    }
}

#[derive(Default)]
struct RecordingAlert {
    messages: Mutex<Vec<String>>,
}

impl RecordingAlert {
    fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }
}

impl Alert for RecordingAlert {
    fn alert(&self, message: &str) {
        self.messages.lock().unwrap().push(message.to_string());
    }
}

// --- Session restore ---

#[tokio::test]
async fn test_check_auth_without_token() {
    let (state, _) = test_state(Env::Production);
    let client = spawn_client(&state, "/").await;
    assert!(client.session.state().loading);

    assert!(!client.session.check_auth().await);

    let snapshot = client.session.state();
    assert!(!snapshot.loading);
    assert_eq!(snapshot.user, None);
    assert!(client.navigator.history().is_empty());
}

#[tokio::test]
async fn test_check_auth_discards_expired_token() {
    let (state, _) = test_state(Env::Production);
    let client = spawn_client(&state, "/dashboard").await;
    client
        .store
        .set(TOKEN_KEY, &unsigned_token(Utc::now().timestamp() - 60));
    client.store.set(USER_KEY, r#"{"stale":true}"#);

    assert!(!client.session.check_auth().await);

    assert_eq!(client.store.get(TOKEN_KEY), None);
    assert_eq!(client.store.get(USER_KEY), None);
    // Discarded locally, so no 401 and no redirect.
    assert!(client.navigator.history().is_empty());
}

#[tokio::test]
async fn test_check_auth_restores_user() {
    let (state, _) = test_state(Env::Production);
    let user = seed_user(&state, Role::Student, "restore@example.com").await;
    let first = spawn_client(&state, "/login").await;
    first
        .session
        .login(&credentials("restore@example.com"), false)
        .await
        .unwrap();
    let token = first.store.get(TOKEN_KEY).unwrap();
    assert!(token_is_live(&token, Utc::now().timestamp()));

    // A fresh client that only has the stored token, as after a page reload.
    let second = spawn_client(&state, "/dashboard").await;
    second.store.set(TOKEN_KEY, &token);

    assert!(second.session.check_auth().await);
    assert_eq!(second.session.user().map(|u| u.id), Some(user.id));
    assert!(second.session.is_student());
    let cached: User = serde_json::from_str(&second.store.get(USER_KEY).unwrap()).unwrap();
    assert_eq!(cached.email, "restore@example.com");
}

#[tokio::test]
async fn test_check_auth_fetches_me_once() {
    let (state, _) = test_state(Env::Production);
    seed_user(&state, Role::Admin, "counted@example.com").await;

    let me_calls = Arc::new(AtomicUsize::new(0));
    let counter = me_calls.clone();
    let router = app(&state).layer(axum::middleware::from_fn(
        move |request: Request, next: Next| {
            let counter = counter.clone();
            async move {
                if request.uri().path() == "/api/auth/me" {
                    counter.fetch_add(1, Ordering::SeqCst);
                }
                next.run(request).await
            }
        },
    ));
    let client = client_for(spawn_router(router).await, "/admin/dashboard");

    client
        .session
        .login(&credentials("counted@example.com"), true)
        .await
        .unwrap();
    assert_eq!(me_calls.load(Ordering::SeqCst), 0);

    assert!(client.session.check_auth().await);
    assert_eq!(me_calls.load(Ordering::SeqCst), 1);
    assert!(client.session.is_admin());
}

// --- Login and logout ---

#[tokio::test]
async fn test_login_and_logout() {
    let (state, _) = test_state(Env::Production);
    seed_user(&state, Role::Student, "flow@example.com").await;
    let client = spawn_client(&state, "/login").await;

    let err = client
        .session
        .login(
            &LoginRequest {
                email: "flow@example.com".into(),
                password: "wrong-password".into(),
            },
            false,
        )
        .await
        .unwrap_err();
    assert_eq!(err.status, Some(StatusCode::UNAUTHORIZED));
    assert_eq!(
        client.session.state().error.as_deref(),
        Some(err.message.as_str())
    );
    // Failed sign-in on the login page does not redirect.
    assert!(client.navigator.history().is_empty());

    let user = client
        .session
        .login(&credentials("flow@example.com"), false)
        .await
        .unwrap();
    assert_eq!(user.email, "flow@example.com");
    assert!(client.session.is_authenticated());
    assert_eq!(client.session.state().error, None);
    assert!(client.store.get(TOKEN_KEY).is_some());

    client.session.logout().await;
    assert!(!client.session.is_authenticated());
    assert_eq!(client.store.get(TOKEN_KEY), None);
    assert_eq!(client.store.get(USER_KEY), None);
}

#[tokio::test]
async fn test_admin_login_rejects_students() {
    let (state, _) = test_state(Env::Production);
    seed_user(&state, Role::Student, "student@example.com").await;
    seed_user(&state, Role::Admin, "admin@example.com").await;
    let client = spawn_client(&state, "/admin/login").await;

    let err = client
        .session
        .login(&credentials("student@example.com"), true)
        .await
        .unwrap_err();
    assert_eq!(err.status, Some(StatusCode::FORBIDDEN));
    assert!(!client.session.is_authenticated());

    client
        .session
        .login(&credentials("admin@example.com"), true)
        .await
        .unwrap();
    assert!(client.session.is_admin());
}

// --- Expired sessions ---

#[tokio::test]
async fn test_unauthorized_redirects_once() {
    let (state, _) = test_state(Env::Production);
    let user = seed_user(&state, Role::Student, "revoked@example.com").await;
    let client = spawn_client(&state, "/dashboard").await;
    client
        .session
        .login(&credentials("revoked@example.com"), false)
        .await
        .unwrap();
    assert!(state.repo.delete_user(user.id).await.unwrap());

    let (first, second) = tokio::join!(
        client.api.get_data::<User>("/auth/me"),
        client.api.get_data::<User>("/auth/me"),
    );
    assert_eq!(first.unwrap_err().status, Some(StatusCode::UNAUTHORIZED));
    assert_eq!(second.unwrap_err().status, Some(StatusCode::UNAUTHORIZED));

    assert_eq!(client.store.get(TOKEN_KEY), None);
    assert_eq!(client.store.get(USER_KEY), None);
    assert_eq!(client.navigator.history(), vec![SESSION_EXPIRED_PATH]);
}

#[tokio::test]
async fn test_unauthorized_on_login_page_stays_put() {
    let (state, _) = test_state(Env::Production);
    let client = spawn_client(&state, "/login").await;
    client.store.set(TOKEN_KEY, "not-a-token");

    let err = client.api.get_data::<User>("/auth/me").await.unwrap_err();
    assert_eq!(err.status, Some(StatusCode::UNAUTHORIZED));
    assert!(client.navigator.history().is_empty());
    // Left alone on the login pages.
    assert_eq!(client.store.get(TOKEN_KEY).as_deref(), Some("not-a-token"));
}

#[tokio::test]
async fn test_redirect_rearms_after_new_login() {
    let (state, _) = test_state(Env::Production);
    seed_user(&state, Role::Student, "again@example.com").await;
    let client = spawn_client(&state, "/courses").await;

    client.store.set(TOKEN_KEY, "bogus");
    assert!(client.api.get_data::<User>("/auth/me").await.is_err());
    assert_eq!(client.navigator.history().len(), 1);

    client
        .session
        .login(&credentials("again@example.com"), false)
        .await
        .unwrap();
    client.navigator.navigate("/courses");
    client.store.set(TOKEN_KEY, "bogus-again");
    assert!(client.api.get_data::<User>("/auth/me").await.is_err());

    let history = client.navigator.history();
    assert_eq!(history.first().map(String::as_str), Some(SESSION_EXPIRED_PATH));
    assert_eq!(history.last().map(String::as_str), Some(SESSION_EXPIRED_PATH));
    assert_eq!(
        history.iter().filter(|p| *p == SESSION_EXPIRED_PATH).count(),
        2
    );
}

// --- Public pages ---

#[tokio::test]
async fn test_admission_form_submission() {
    let (state, _) = test_state(Env::Production);
    let client = spawn_client(&state, "/admissions").await;
    let alert = RecordingAlert::default();

    let mut form = AdmissionForm::new();
    form.fields = CreateAdmissionRequest {
        full_name: "Priya Patel".into(),
        email: "priya@example.com".into(),
        phone: "98765 43210".into(),
        standard: "Class 9".into(),
        medium: "gujarati".into(),
        ..CreateAdmissionRequest::default()
    };

    assert!(form.submit(&client.api, &alert).await);
    assert!(form.submitted);
    assert!(!form.submitting);
    assert_eq!(form.fields.full_name, "");
    assert!(alert.messages().is_empty());
    assert_eq!(state.repo.list_admissions().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_admission_form_shows_server_message() {
    let (state, _) = test_state(Env::Production);
    let client = spawn_client(&state, "/admissions").await;
    let alert = RecordingAlert::default();

    let mut form = AdmissionForm::new();
    form.fields = CreateAdmissionRequest {
        full_name: "Priya Patel".into(),
        email: "priya@example.com".into(),
        phone: "123".into(),
        standard: "Class 9".into(),
        medium: "english".into(),
        ..CreateAdmissionRequest::default()
    };

    assert!(!form.submit(&client.api, &alert).await);
    assert!(!form.submitted);
    assert_eq!(form.fields.full_name, "Priya Patel");
    assert_eq!(alert.messages(), vec!["Please add a valid phone number"]);
    assert!(client.navigator.history().is_empty());
}

#[tokio::test]
async fn test_anonymous_testimonial_waits_for_approval() {
    let (state, _) = test_state(Env::Production);
    let client = spawn_client(&state, "/").await;

    let submitted = client
        .api
        .testimonials()
        .submit(&CreateTestimonialRequest {
            name: Some("Kiran".into()),
            content: Some("Clear explanations and patient teachers.".into()),
            rating: Some(5),
            standard: Some("Class 12".into()),
            medium: Some("english".into()),
            ..CreateTestimonialRequest::default()
        })
        .await
        .unwrap();
    assert_eq!(submitted.student, None);

    assert!(client.api.testimonials().approved().await.unwrap().is_empty());
    assert!(client.api.courses().list().await.unwrap().is_empty());
}
