use axum::routing::post;
use axum::Router;

use crate::handlers::submissions;
use crate::state::AppState;

/// Routes mounted at `/submissions`.
///
/// ```text
/// POST /    -> create_submission (multipart)
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/", post(submissions::create_submission))
}
