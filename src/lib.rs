pub mod api;
pub mod config;
pub mod models;
pub mod pipeline;
pub mod triage_service;

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use crate::config::{AppConfig, ConfigError};
use crate::triage_service::TriageService;

/// Reasons the service can fail to start or stop cleanly.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("Failed to start async runtime: {0}")]
    Runtime(std::io::Error),
    #[error(transparent)]
    Server(#[from] api::ServerError),
    #[error("Failed to listen for shutdown signal: {0}")]
    Signal(std::io::Error),
}

pub fn run() -> Result<(), StartupError> {
    // Before tracing, so RUST_LOG may come from .env
    let dotenv = config::load_dotenv();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);
    match dotenv {
        Ok(path) => tracing::info!(path = %path.display(), "Loaded .env"),
        Err(e) => tracing::debug!(error = %e, "No .env file loaded"),
    }

    let config = AppConfig::from_env()?;

    // The remote clients use blocking HTTP. They are created here, before the
    // runtime exists, and this Arc outlives the runtime so their final drop
    // happens outside of it too.
    let service = Arc::new(TriageService::from_config(&config));

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(StartupError::Runtime)?;

    let result = runtime.block_on(serve(&config, Arc::clone(&service)));
    drop(runtime);
    drop(service);

    tracing::info!("{} stopped", config::APP_NAME);
    result
}

async fn serve(config: &AppConfig, service: Arc<TriageService>) -> Result<(), StartupError> {
    let mut server = api::start_server(config.bind, service, &config.static_dir).await?;
    tracing::info!(
        addr = %server.session.server_addr,
        session_id = %server.session.session_id,
        started_at = %server.session.started_at,
        static_dir = %config.static_dir.display(),
        "Listening"
    );

    let signal = tokio::signal::ctrl_c().await.map_err(StartupError::Signal);
    server.shutdown();
    server.stopped().await;
    signal
}
