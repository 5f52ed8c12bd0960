//! Route definitions for the admin dashboard API.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::admin;
use crate::state::AppState;

/// Routes mounted at `/admin`. All require auth.
///
/// ```text
/// GET /submissions              -> list_submissions
/// GET /submissions/counts       -> status_counts
/// GET /submissions/{id}         -> get_submission
/// PUT /submissions/{id}/status  -> update_status
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/submissions", get(admin::list_submissions))
        .route("/submissions/counts", get(admin::status_counts))
        .route("/submissions/{id}", get(admin::get_submission))
        .route("/submissions/{id}/status", put(admin::update_status))
}
