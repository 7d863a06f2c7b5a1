use std::sync::Arc;

use portico_core::storage::BlobStorage;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: portico_db::DbPool,
    /// Server configuration (upload limits are read per request).
    pub config: Arc<ServerConfig>,
    /// Where uploaded images and documents are kept.
    pub storage: Arc<dyn BlobStorage>,
}
