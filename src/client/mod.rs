//! Session client for the Trimurti Classes API.
//!
//! Mirrors what the public site and admin area need from the server: a bearer
//! token kept in a [`SessionStore`], an [`ApiClient`] that normalizes failures
//! and handles expired sessions, the [`AuthSession`] built on top of it, and the
//! route guard and form flows the pages use.
//!
//! ```no_run
//! use std::sync::Arc;
//! use trimurti_classes::client::{
//!     ApiClient, AuthSession, ClientConfig, MemorySessionStore, RecordingNavigator, SessionStore,
//! };
//!
//! # async fn run() {
//! let config = ClientConfig::from_env();
//! let store: Arc<dyn SessionStore> = Arc::new(MemorySessionStore::new());
//! let api = Arc::new(ApiClient::new(
//!     config.api_url,
//!     store.clone(),
//!     Arc::new(RecordingNavigator::default()),
//! ));
//! let session = AuthSession::new(api, store);
//! session.check_auth().await;
//! # }
//! ```

pub mod admission_form;
pub mod api;
pub mod auth;
pub mod guard;
pub mod navigator;
pub mod resources;
pub mod store;
pub mod ui;

pub use admission_form::{Alert, AdmissionForm};
pub use api::{ApiClient, ClientError, ErrorOrigin};
pub use auth::{AuthSession, AuthState, token_expiry, token_is_live};
pub use guard::{GuardDecision, GuardKind, decide};
pub use navigator::{Navigator, RecordingNavigator, SESSION_EXPIRED_PATH, is_login_path};
pub use store::{FileSessionStore, MemorySessionStore, SessionStore, TOKEN_KEY, USER_KEY};
pub use ui::{DEFAULT_THEME_KEY, Theme, ThemePreference, Toast, ToastKind, ToastQueue};

use std::env;

const DEFAULT_API_URL: &str = "http://localhost:5000/api";

/// ClientConfig
///
/// Where the client finds the API and which store key holds the theme.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub api_url: String,
    pub theme_key: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            theme_key: DEFAULT_THEME_KEY.to_string(),
        }
    }
}

impl ClientConfig {
    /// Reads `TRIMURTI_API_URL` and `TRIMURTI_THEME_KEY`, falling back to the
    /// defaults for anything unset or blank.
    pub fn from_env() -> Self {
        let read = |key: &str| env::var(key).ok().filter(|v| !v.trim().is_empty());
        let defaults = Self::default();
        Self {
            api_url: read("TRIMURTI_API_URL").unwrap_or(defaults.api_url),
            theme_key: read("TRIMURTI_THEME_KEY").unwrap_or(defaults.theme_key),
        }
    }
}
