use std::sync::{Mutex, PoisonError};

/// Where the API wrapper sends the user when their session expires.
pub const SESSION_EXPIRED_PATH: &str = "/login?session=expired";

/// True for the student and admin sign-in pages, ignoring any query string.
pub fn is_login_path(path: &str) -> bool {
    let path = path.split(['?', '#']).next().unwrap_or_default();
    matches!(path.trim_end_matches('/'), "/login" | "/admin/login")
}

/// Navigator
///
/// The client's view of the current location, and the way to leave it.
pub trait Navigator: Send + Sync {
    fn current_path(&self) -> String;
    fn navigate(&self, to: &str);
}

/// RecordingNavigator
///
/// In-memory location that remembers every navigation. Used by headless
/// clients and tests.
#[derive(Debug)]
pub struct RecordingNavigator {
    current: Mutex<String>,
    history: Mutex<Vec<String>>,
}

impl RecordingNavigator {
    pub fn at(path: impl Into<String>) -> Self {
        Self {
            current: Mutex::new(path.into()),
            history: Mutex::new(Vec::new()),
        }
    }

    /// Every path passed to `navigate`, oldest first.
    pub fn history(&self) -> Vec<String> {
        self.history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Default for RecordingNavigator {
    fn default() -> Self {
        Self::at("/")
    }
}

impl Navigator for RecordingNavigator {
    fn current_path(&self) -> String {
        self.current
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn navigate(&self, to: &str) {
        *self.current.lock().unwrap_or_else(PoisonError::into_inner) = to.to_string();
        self.history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(to.to_string());
    }
}
