use axum::routing::post;
use axum::Router;

use crate::handlers::notifications;
use crate::state::AppState;

/// Notification re-send routes, merged at the `/api` root.
///
/// ```text
/// POST /send-notification  -> send_notification
/// POST /send-confirmation  -> send_confirmation
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/send-notification", post(notifications::send_notification))
        .route("/send-confirmation", post(notifications::send_confirmation))
}
