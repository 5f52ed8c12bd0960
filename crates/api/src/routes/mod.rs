pub mod admin;
pub mod auth;
pub mod health;
pub mod notifications;
pub mod submissions;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// ```text
/// /submissions                         intake (public, multipart POST)
///
/// /send-notification                   re-send admin alert (public POST)
/// /send-confirmation                   re-send submitter confirmation (public POST)
///
/// /auth/login                          login (public)
/// /auth/logout                         logout (requires auth)
/// /auth/session                        current admin (requires auth)
///
/// /admin/submissions                   list, optional ?status= (requires auth)
/// /admin/submissions/counts            per-status counts
/// /admin/submissions/{id}              get one with files
/// /admin/submissions/{id}/status       update status (PUT)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/submissions", submissions::router())
        .merge(notifications::router())
        .nest("/auth", auth::router())
        .nest("/admin", admin::router())
}
