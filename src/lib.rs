pub mod config;
pub mod core_state;
pub mod models;
pub mod predictor;
pub mod selector;
pub mod ui;

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use crate::config::AppConfig;
use crate::core_state::CoreState;
use crate::predictor::{PredictorClient, PredictorError};
use crate::ui::ServeError;

/// Failures that stop the application from starting.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("Failed to create prediction client: {0}")]
    Client(#[from] PredictorError),

    #[error(transparent)]
    Serve(#[from] ServeError),
}

/// Run the selector until Ctrl-C.
pub async fn run() -> Result<(), StartupError> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    let config = AppConfig::from_env();
    tracing::info!(api = %config.api_base_url, "Using prediction API");

    let client = PredictorClient::from_config(&config)?;
    let core = Arc::new(CoreState::new(client));

    // Initial vocabulary load runs alongside serving; a failure shows up as a panel.
    let loader = Arc::clone(&core);
    tokio::spawn(async move {
        if let Err(e) = loader.load_vocabulary().await {
            tracing::error!("Initial vocabulary load failed: {e}");
        }
    });

    let mut server = ui::start_ui_server(core, config.listen_addr).await?;
    tracing::info!(url = %server.session.url(), "Open the symptom selector in a browser");

    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {e}");
    }

    server.shutdown();
    server.wait().await;
    Ok(())
}
