use std::sync::Arc;

use crate::config::ServerConfig;
use crate::scan::ScanOrchestrator;
use cellar_ai::AiService;
use cellar_cloud::StorageClient;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: cellar_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// AI provider facade (vision + text capabilities).
    pub ai: Arc<AiService>,
    /// Object storage client for scan images.
    pub storage: Arc<StorageClient>,
    /// Recognition orchestrator driving all scan flows.
    pub orchestrator: Arc<ScanOrchestrator>,
}
