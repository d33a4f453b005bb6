use std::{
    collections::VecDeque,
    fmt,
    sync::{
        Arc, Mutex, PoisonError,
        atomic::{AtomicU64, Ordering},
    },
};

use super::store::SessionStore;

/// Key the theme is stored under unless configured otherwise.
pub const DEFAULT_THEME_KEY: &str = "trimurti-theme";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    fn parse(value: &str) -> Option<Self> {
        match value {
            "light" => Some(Theme::Light),
            "dark" => Some(Theme::Dark),
            _ => None,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// ThemePreference
///
/// Light/dark choice persisted in the session store. An unknown stored value
/// falls back to light.
pub struct ThemePreference {
    store: Arc<dyn SessionStore>,
    key: String,
    current: Mutex<Theme>,
}

impl ThemePreference {
    pub fn load(store: Arc<dyn SessionStore>, key: impl Into<String>) -> Self {
        let key = key.into();
        let current = store
            .get(&key)
            .and_then(|value| Theme::parse(&value))
            .unwrap_or_default();
        Self {
            store,
            key,
            current: Mutex::new(current),
        }
    }

    pub fn theme(&self) -> Theme {
        *self.current.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn set(&self, theme: Theme) {
        *self.current.lock().unwrap_or_else(PoisonError::into_inner) = theme;
        self.store.set(&self.key, theme.as_str());
    }

    pub fn toggle(&self) -> Theme {
        let next = self.theme().toggled();
        self.set(next);
        next
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
    Info,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub id: u64,
    pub kind: ToastKind,
    pub message: String,
}

/// ToastQueue
///
/// Transient notifications, oldest first. Only the newest `capacity` are kept.
pub struct ToastQueue {
    capacity: usize,
    next_id: AtomicU64,
    toasts: Mutex<VecDeque<Toast>>,
}

impl Default for ToastQueue {
    fn default() -> Self {
        Self::with_capacity(5)
    }
}

impl ToastQueue {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            next_id: AtomicU64::new(1),
            toasts: Mutex::new(VecDeque::new()),
        }
    }

    pub fn push(&self, kind: ToastKind, message: impl Into<String>) -> u64 {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let mut toasts = self.toasts.lock().unwrap_or_else(PoisonError::into_inner);
        toasts.push_back(Toast {
            id,
            kind,
            message: message.into(),
        });
        while toasts.len() > self.capacity {
            toasts.pop_front();
        }
        id
    }

    pub fn success(&self, message: impl Into<String>) -> u64 {
        self.push(ToastKind::Success, message)
    }

    pub fn error(&self, message: impl Into<String>) -> u64 {
        self.push(ToastKind::Error, message)
    }

    /// Returns false when the toast was already gone.
    pub fn dismiss(&self, id: u64) -> bool {
        let mut toasts = self.toasts.lock().unwrap_or_else(PoisonError::into_inner);
        let before = toasts.len();
        toasts.retain(|t| t.id != id);
        toasts.len() != before
    }

    pub fn visible(&self) -> Vec<Toast> {
        self.toasts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .cloned()
            .collect()
    }
}
