pub mod api;
pub mod config;
pub mod core_state;
pub mod db;
pub mod engine;
pub mod models;
pub mod simulation;

use std::sync::Arc;

use thiserror::Error;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Initialization failed: {0}")]
    Core(#[from] core_state::CoreError),
    #[error("Runtime error: {0}")]
    Runtime(#[from] std::io::Error),
    #[error("Server error: {0}")]
    Server(String),
}

/// Start the service and block until Ctrl-C.
pub fn run() -> Result<(), StartupError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    let app_config = config::AppConfig::from_env()?;
    tracing::info!(
        addr = %app_config.addr,
        store = ?app_config.store,
        supersede_alerts = app_config.supersede_alerts,
        "Configuration loaded"
    );

    let core = Arc::new(core_state::CoreState::from_config(&app_config)?);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async move {
        let mut server = api::start_api_server(core, app_config.addr)
            .await
            .map_err(StartupError::Server)?;

        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for shutdown signal: {e}");
        }

        server.shutdown();
        server.stopped().await;
        Ok(())
    })
}
