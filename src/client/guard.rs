use super::auth::AuthState;

/// GuardKind
///
/// Which protected area a route belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardKind {
    /// Any signed-in user.
    Authenticated,
    /// Signed-in admins only.
    Admin,
}

impl GuardKind {
    /// The sign-in page for this area.
    pub fn login_path(&self) -> &'static str {
        match self {
            GuardKind::Authenticated => "/login",
            GuardKind::Admin => "/admin/login",
        }
    }
}

/// GuardDecision
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    /// The session is still being resolved; show a spinner.
    Loading,
    /// Leave for `to`. `from` is the page to return to after signing in.
    Redirect { to: String, from: Option<String> },
    Render,
}

/// decide
///
/// Chooses what a protected route shows for the current session.
///
/// A signed-in non-admin hitting an admin route goes home with no return path,
/// since signing in again would not help.
pub fn decide(kind: GuardKind, state: &AuthState, attempted_path: &str) -> GuardDecision {
    if state.loading {
        return GuardDecision::Loading;
    }
    if !state.is_authenticated() {
        return GuardDecision::Redirect {
            to: kind.login_path().to_string(),
            from: Some(attempted_path.to_string()),
        };
    }
    if kind == GuardKind::Admin && !state.is_admin() {
        return GuardDecision::Redirect {
            to: "/".to_string(),
            from: None,
        };
    }
    GuardDecision::Render
}
