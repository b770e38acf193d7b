use std::sync::Arc;

use axum::Router;
use sqlx::postgres::PgPoolOptions;

use cellar_ai::AiService;
use cellar_api::config::ServerConfig;
use cellar_api::router::build_app_router;
use cellar_api::scan::ScanOrchestrator;
use cellar_api::state::AppState;
use cellar_cloud::{StorageClient, StorageConfig};

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
    }
}

/// Build the full application router with all middleware layers, wired in
/// degraded mode: no AI providers, mock object storage, and a lazily
/// connecting pool.
///
/// This mirrors the router construction in `main.rs` so tests exercise
/// the same middleware stack production uses. Flows that never reach the
/// database (auth rejections, upload validation, degraded scan paths) run
/// without any backing services.
pub fn build_degraded_test_app() -> Router {
    let config = test_config();

    let pool = PgPoolOptions::new()
        .connect_lazy("postgres://localhost:5432/cellar_test")
        .expect("lazy pool");

    let ai = Arc::new(AiService::with_providers(
        None,
        None,
        "gemini-2.5-flash",
        "gemini-2.5-flash",
    ));

    let storage = Arc::new(StorageClient::new(&StorageConfig {
        bucket: "cellar".to_string(),
        public_base_url: "https://cdn.example.com".to_string(),
        ..StorageConfig::default()
    }));

    let orchestrator = Arc::new(ScanOrchestrator::new(
        pool.clone(),
        Arc::clone(&ai),
        Arc::clone(&storage),
    ));

    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        ai,
        storage,
        orchestrator,
    };

    build_app_router(state, &config)
}
