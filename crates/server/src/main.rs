//! Exhibit server binary.

use anyhow::{Context, Result};
use clap::Parser;
use exhibit_core::config::AppConfig;
use exhibit_extract::{ExtensionClassifier, ImageParser};
use exhibit_server::{AppState, create_router};
use figment::Figment;
use figment::providers::{Env, Format, Toml};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Exhibit - forensic evidence ingestion server
#[derive(Parser, Debug)]
#[command(name = "exhibitd")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(
        short,
        long,
        env = "EXHIBIT_CONFIG",
        default_value = "config/server.toml"
    )]
    config: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Startup banner
    tracing::info!("Exhibit v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration (file is optional, env vars can provide/override everything;
    // every field has a usable default)
    let config_path = std::path::Path::new(&args.config);
    let mut figment = Figment::new();
    if config_path.exists() {
        tracing::info!(config_path = %args.config, "Loading configuration from file");
        figment = figment.merge(Toml::file(&args.config));
    } else {
        tracing::debug!("No config file found at {}", args.config);
    }

    let config: AppConfig = figment
        .merge(Env::prefixed("EXHIBIT_").split("__"))
        .extract()
        .context("failed to load configuration")?;

    // Register Prometheus metrics
    exhibit_server::metrics::register_metrics();
    tracing::info!("Prometheus metrics registered");

    // Ensure the upload spool directory exists before accepting requests
    tokio::fs::create_dir_all(&config.upload.dir)
        .await
        .with_context(|| {
            format!(
                "failed to create upload directory {}",
                config.upload.dir.display()
            )
        })?;

    // Initialize store backends
    let stores =
        exhibit_stores::from_config(&config.stores).context("failed to initialize stores")?;
    if stores.is_empty() {
        tracing::warn!("No store backends configured, fan-out requests will report failures");
    } else {
        tracing::info!(kinds = ?stores.kinds(), "Store backends initialized");
    }

    // Extension-based classification until a full image parser is wired in
    let parser: Arc<dyn ImageParser> = Arc::new(ExtensionClassifier);

    // Create application state
    let state = AppState::new(config.clone(), stores, parser);

    // Spawn watchdog task to detect panicked extraction workers
    let _watchdog_handle = state.task_registry.clone().spawn_watchdog();
    tracing::info!("Job task watchdog spawned");

    // Spawn retention sweep evicting terminal jobs past the window
    let _sweep_handle = exhibit_server::jobs::spawn_retention_sweep(
        state.jobs.clone(),
        config.server.job_retention(),
    );
    tracing::info!(
        retention_secs = config.server.job_retention_secs,
        "Job retention sweep spawned"
    );

    // Create router
    let app = create_router(state);

    // Parse bind address
    let addr: SocketAddr = config.server.bind.parse().context("invalid bind address")?;

    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind to {}", addr))?;
    axum::serve(listener, app).await?;

    Ok(())
}
