use std::sync::Arc;

use crate::config::ServerConfig;
use crate::media::MediaStore;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: catalog_db::DbPool,
    /// Server configuration (auth, webhook secret, media settings).
    pub config: Arc<ServerConfig>,
    /// Media host client. `None` when no media credentials are configured.
    pub media: Option<Arc<dyn MediaStore>>,
}
