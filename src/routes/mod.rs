/// Router Module Index
///
/// The API is split by access tier. `create_router` merges the three routers
/// under `/api`; routers may register different methods on the same path.

/// Anonymous access.
pub mod public;

/// Requires a valid session token (enforced by a route layer).
pub mod authenticated;

/// Requires an admin session (enforced by the `AdminUser` extractor).
pub mod admin;
