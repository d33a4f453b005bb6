#![allow(dead_code)]

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, Response, header},
};
use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use serde_json::{Value, json};
use std::sync::Arc;
use tokio::net::TcpListener;
use trimurti_classes::{
    AppConfig, AppState, MemoryRepository, MockStorageService, create_router,
    auth::{create_account, issue_token},
    config::Env,
    models::{Medium, NewUser, Role, User},
    repository::RepositoryState,
    storage::StorageState,
};

pub const PASSWORD: &str = "secret123";

/// App state over the in-memory repository and a mock object store. The mock is
/// returned separately so tests can inspect stored objects.
pub fn test_state(env: Env) -> (AppState, Arc<MockStorageService>) {
    let storage = Arc::new(MockStorageService::new());
    let config = AppConfig {
        env,
        ..AppConfig::default()
    };
    let state = AppState {
        repo: Arc::new(MemoryRepository::new()) as RepositoryState,
        storage: storage.clone() as StorageState,
        config,
    };
    (state, storage)
}

pub fn app(state: &AppState) -> Router {
    create_router(state.clone())
}

pub async fn seed_user(state: &AppState, role: Role, email: &str) -> User {
    let new_user = NewUser {
        name: "Test User".to_string(),
        email: email.to_string(),
        password: PASSWORD.to_string(),
        phone: None,
        role,
        standard: Some("Class 10".to_string()),
        medium: Some(Medium::English),
    };
    create_account(&state.repo, new_user)
        .await
        .expect("seed user")
}

pub fn bearer(state: &AppState, user: &User) -> String {
    format!(
        "Bearer {}",
        issue_token(user, &state.config).expect("token signs")
    )
}

/// A token the client can read the expiry from, with no valid signature.
pub fn unsigned_token(exp: i64) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"none","typ":"JWT"}"#);
    let payload = json!({ "exp": exp }).to_string();
    format!("{header}.{}.", URL_SAFE_NO_PAD.encode(payload))
}

pub fn json_request(method: &str, uri: &str, auth: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(auth) = auth {
        builder = builder.header(header::AUTHORIZATION, auth);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub fn empty_request(method: &str, uri: &str, auth: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(auth) = auth {
        builder = builder.header(header::AUTHORIZATION, auth);
    }
    builder.body(Body::empty()).unwrap()
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// Serves the router on an ephemeral port and returns the `/api` base URL.
pub async fn spawn_app(state: &AppState) -> String {
    spawn_router(app(state)).await
}

/// Like `spawn_app`, for a router the test has wrapped in extra layers.
pub async fn spawn_router(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind port");
    let port = listener.local_addr().unwrap().port();

    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    format!("http://127.0.0.1:{port}/api")
}
