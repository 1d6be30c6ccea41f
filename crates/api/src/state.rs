use std::sync::Arc;

use crate::config::ServerConfig;
use crate::store::ApplicationStore;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable; everything inside is behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Server configuration (JWT secret, upload limits).
    pub config: Arc<ServerConfig>,
    /// Submitted applications.
    pub store: Arc<ApplicationStore>,
}

impl AppState {
    pub fn new(config: ServerConfig) -> Self {
        Self {
            config: Arc::new(config),
            store: Arc::new(ApplicationStore::new()),
        }
    }
}
