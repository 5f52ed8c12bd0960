use std::sync::Arc;

use cardintake_events::NotificationDispatcher;
use cardintake_storage::ObjectStore;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable; everything heavy sits behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: cardintake_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Where submission attachments are written.
    pub object_store: Arc<dyn ObjectStore>,
    /// `None` when SMTP is not configured; intake then skips notifications.
    pub dispatcher: Option<Arc<NotificationDispatcher>>,
}
