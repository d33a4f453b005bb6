mod common;

use axum::{
    extract::FromRequestParts,
    http::{Method, Request, StatusCode, Uri, header, request::Parts},
};
use chrono::Utc;
use common::{bearer, seed_user, test_state};
use jsonwebtoken::{EncodingKey, Header, encode};
use trimurti_classes::{
    AppState,
    auth::{AdminUser, AuthUser, Claims, verify_token},
    config::Env,
    models::Role,
};
use uuid::Uuid;

// --- Helper Functions ---

fn signed_token(state: &AppState, sub: Uuid, role: Role, exp_offset: i64) -> String {
    let now = Utc::now().timestamp();
    let claims = Claims {
        sub,
        role,
        iat: now as usize,
        exp: (now + exp_offset) as usize,
    };
    let key = EncodingKey::from_secret(state.config.jwt_secret.as_bytes());
    encode(&Header::default(), &claims, &key).unwrap()
}

/// The mutable Parts of a generated request.
fn request_parts(method: Method, uri: Uri) -> Parts {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(axum::body::Body::empty())
        .unwrap();
    let (parts, _) = request.into_parts();
    parts
}

fn with_header(mut parts: Parts, name: &'static str, value: &str) -> Parts {
    parts.headers.insert(
        header::HeaderName::from_static(name),
        header::HeaderValue::from_str(value).unwrap(),
    );
    parts
}

// --- Tests ---

#[tokio::test]
async fn test_auth_success_with_valid_jwt() {
    let (state, _) = test_state(Env::Production);
    let user = seed_user(&state, Role::Student, "student@example.com").await;

    let mut parts = with_header(
        request_parts(Method::GET, "/".parse().unwrap()),
        "authorization",
        &bearer(&state, &user),
    );

    let auth_user = AuthUser::from_request_parts(&mut parts, &state)
        .await
        .unwrap();
    assert_eq!(auth_user.id, user.id);
    assert_eq!(auth_user.role, Role::Student);
    assert_eq!(auth_user.user.email, "student@example.com");
}

#[tokio::test]
async fn test_auth_failure_with_missing_header() {
    let (state, _) = test_state(Env::Production);
    let mut parts = request_parts(Method::GET, "/".parse().unwrap());

    let err = AuthUser::from_request_parts(&mut parts, &state)
        .await
        .unwrap_err();
    assert_eq!(err.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_auth_failure_with_expired_jwt() {
    let (state, _) = test_state(Env::Production);
    let user = seed_user(&state, Role::Student, "late@example.com").await;
    // Past the default 60s leeway.
    let token = signed_token(&state, user.id, Role::Student, -3600);

    assert!(verify_token(&token, &state.config).is_err());

    let mut parts = with_header(
        request_parts(Method::GET, "/".parse().unwrap()),
        "authorization",
        &format!("Bearer {token}"),
    );
    let err = AuthUser::from_request_parts(&mut parts, &state)
        .await
        .unwrap_err();
    assert_eq!(err.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_auth_failure_with_foreign_signature() {
    let (state, _) = test_state(Env::Production);
    let user = seed_user(&state, Role::Admin, "admin@example.com").await;
    let forged = encode(
        &Header::default(),
        &Claims {
            sub: user.id,
            role: Role::Admin,
            iat: 0,
            exp: (Utc::now().timestamp() + 3600) as usize,
        },
        &EncodingKey::from_secret(b"someone-else"),
    )
    .unwrap();

    let mut parts = with_header(
        request_parts(Method::GET, "/".parse().unwrap()),
        "authorization",
        &format!("Bearer {forged}"),
    );
    assert!(AuthUser::from_request_parts(&mut parts, &state).await.is_err());
}

#[tokio::test]
async fn test_deleted_account_token_is_rejected() {
    let (state, _) = test_state(Env::Production);
    let user = seed_user(&state, Role::Student, "gone@example.com").await;
    let token = bearer(&state, &user);
    assert!(state.repo.delete_user(user.id).await.unwrap());

    let mut parts = with_header(
        request_parts(Method::GET, "/".parse().unwrap()),
        "authorization",
        &token,
    );
    assert!(AuthUser::from_request_parts(&mut parts, &state).await.is_err());
}

#[tokio::test]
async fn test_local_bypass_success() {
    let (mut state, _) = test_state(Env::Local);
    state.config.header_bypass = true;
    let admin = seed_user(&state, Role::Admin, "local@dev.com").await;

    let mut parts = with_header(
        request_parts(Method::GET, "/".parse().unwrap()),
        "x-user-id",
        &admin.id.to_string(),
    );

    let auth_user = AuthUser::from_request_parts(&mut parts, &state)
        .await
        .unwrap();
    assert_eq!(auth_user.id, admin.id);
    assert!(auth_user.is_admin());
}

#[tokio::test]
async fn test_local_bypass_requires_opt_in() {
    let (state, _) = test_state(Env::Local);
    assert!(!state.config.header_bypass);
    let admin = seed_user(&state, Role::Admin, "quiet@dev.com").await;

    let mut parts = with_header(
        request_parts(Method::GET, "/".parse().unwrap()),
        "x-user-id",
        &admin.id.to_string(),
    );

    let err = AuthUser::from_request_parts(&mut parts, &state)
        .await
        .unwrap_err();
    assert_eq!(err.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_local_bypass_disabled_in_prod() {
    let (mut state, _) = test_state(Env::Production);
    // Even when opted in, production ignores the header.
    state.config.header_bypass = true;
    let admin = seed_user(&state, Role::Admin, "prod@dev.com").await;

    let mut parts = with_header(
        request_parts(Method::GET, "/".parse().unwrap()),
        "x-user-id",
        &admin.id.to_string(),
    );

    let err = AuthUser::from_request_parts(&mut parts, &state)
        .await
        .unwrap_err();
    assert_eq!(err.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_admin_extractor_forbids_students() {
    let (state, _) = test_state(Env::Production);
    let student = seed_user(&state, Role::Student, "s@example.com").await;
    let admin = seed_user(&state, Role::Admin, "a@example.com").await;

    let mut student_parts = with_header(
        request_parts(Method::GET, "/".parse().unwrap()),
        "authorization",
        &bearer(&state, &student),
    );
    let err = AdminUser::from_request_parts(&mut student_parts, &state)
        .await
        .unwrap_err();
    assert_eq!(err.status(), StatusCode::FORBIDDEN);

    let mut admin_parts = with_header(
        request_parts(Method::GET, "/".parse().unwrap()),
        "authorization",
        &bearer(&state, &admin),
    );
    let AdminUser(resolved) = AdminUser::from_request_parts(&mut admin_parts, &state)
        .await
        .unwrap();
    assert_eq!(resolved.id, admin.id);
}
