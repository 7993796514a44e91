//! Rota application binary - composition root.
//!
//! Ties the crates together into a single service:
//! 1. Load configuration from TOML
//! 2. Resolve the EPR adapter from the configured backend tag
//! 3. Build the Azure clients (degraded when unconfigured)
//! 4. Construct and initialize the chat orchestrator
//! 5. Start the axum REST API server

use std::path::PathBuf;
use std::sync::Arc;

use rota_api::{routes, AppState};
use rota_azure::{AzureOpenAi, AzureSpeech};
use rota_chat::{Orchestrator, TracingAuditSink};
use rota_core::config::RotaConfig;
use rota_core::types::EprSystem;
use rota_epr::create_adapter;

/// Configuration file location: `ROTA_CONFIG` wins, else `~/.rota/config.toml`.
fn config_path() -> PathBuf {
    if let Ok(path) = std::env::var("ROTA_CONFIG") {
        return PathBuf::from(path);
    }
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home).join(".rota").join("config.toml")
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Config first so its log level can seed the filter; RUST_LOG wins.
    let config_file = config_path();
    let config = RotaConfig::load_or_default(&config_file);

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new(&config.general.log_level)
            }),
        )
        .init();

    tracing::info!("Starting Rota v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!(path = %config_file.display(), "Configuration loaded");

    // Record store.
    let system = EprSystem::parse(&config.epr.system);
    let adapter = create_adapter(system);

    // Azure clients; env vars override file-based secrets.
    let generative = Arc::new(AzureOpenAi::from_config_and_env(&config.azure_openai));
    let speech = Arc::new(AzureSpeech::from_config_and_env(&config.azure_speech));

    // Chat pipeline.
    let orchestrator = Arc::new(Orchestrator::new(
        Arc::clone(&adapter),
        generative,
        speech,
        Arc::new(TracingAuditSink),
    ));
    orchestrator.initialize().await;

    // Serve. `ROTA_PORT` overrides the configured port for containers.
    let port = std::env::var("ROTA_PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(config.general.port);

    let state = AppState::new(orchestrator, adapter);
    routes::start_server(port, state).await?;

    Ok(())
}
