use std::{env, sync::Arc};

use lineup_db_memory::InMemoryStore;
use lineup_server::config::loader::load_config;
use lineup_server::state::AppState;
use lineup_service::QueueService;
use lineup_storage::DocumentStore;

/// How the configuration path was determined.
#[derive(Debug, Clone, Copy)]
enum ConfigSource {
    /// From --config CLI argument
    CliArgument,
    /// From LINEUP_CONFIG environment variable
    EnvironmentVariable,
    /// Default path (lineup.toml)
    Default,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CliArgument => write!(f, "CLI argument (--config)"),
            Self::EnvironmentVariable => write!(f, "environment variable (LINEUP_CONFIG)"),
            Self::Default => write!(f, "default"),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present (before anything else)
    if let Err(e) = dotenvy::dotenv() {
        if !matches!(e, dotenvy::Error::Io(ref io_err) if io_err.kind() == std::io::ErrorKind::NotFound)
        {
            eprintln!("Warning: Failed to load .env file: {e}");
        }
    }

    // Initialize tracing early with the default level
    lineup_server::observability::init_tracing();

    let (config_path, source) = resolve_config_path();
    let cfg = match load_config(config_path.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Configuration error: {e}");
            std::process::exit(2);
        }
    };

    tracing::info!(
        path = %config_path.as_deref().unwrap_or("lineup.toml"),
        source = %source,
        "Configuration loaded"
    );
    lineup_server::observability::apply_logging_level(&cfg.logging.level);

    // Only the memory backend ships today; cfg.validate() already rejected
    // anything else.
    let store: Arc<dyn DocumentStore> = Arc::new(InMemoryStore::new());
    tracing::info!(backend = store.backend_name(), "Storage initialized");

    let service = Arc::new(QueueService::new(store));
    let windows = cfg
        .queue
        .availability_windows()
        .map_err(|e| anyhow::anyhow!(e))?;
    let state = AppState::new(service, cfg.queue.appointment_duration_secs, windows);

    let addr = cfg.addr();
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "Lineup server listening");

    axum::serve(listener, lineup_server::router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

fn resolve_config_path() -> (Option<String>, ConfigSource) {
    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        if arg == "--config" {
            if let Some(path) = args.next() {
                return (Some(path), ConfigSource::CliArgument);
            }
        }
    }
    if let Ok(path) = env::var("LINEUP_CONFIG") {
        return (Some(path), ConfigSource::EnvironmentVariable);
    }
    (None, ConfigSource::Default)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
    tracing::info!("Shutdown signal received");
}
