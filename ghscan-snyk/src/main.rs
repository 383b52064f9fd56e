//! ghscan-snyk - Snyk bulk importer
//!
//! Reads active repositories and their scanned manifests from the scan
//! database, submits each manifest to the Snyk import API under a shared
//! rate limit, and upserts the outcome into `snyk_imports`.
//!
//! Startup failures (missing credentials, unreachable database) exit
//! non-zero before any import is attempted. Per-file failures only show up
//! as `success = false` rows.

use anyhow::{Context, Result};
use clap::Parser;
use ghscan_common::config::load_toml_config;
use ghscan_snyk::config::{Args, ImporterConfig};
use ghscan_snyk::db::PgImportStore;
use ghscan_snyk::services::RateGate;
use ghscan_snyk::Pipeline;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, reload, util::SubscriberInitExt, EnvFilter};

const DEFAULT_LOG_LEVEL: &str = "info";

fn default_filter(level: &str) -> EnvFilter {
    EnvFilter::new(format!("ghscan_snyk={level},ghscan_common={level}"))
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing at the default level; the TOML level is applied once loaded
    let env_filter = EnvFilter::try_from_default_env().ok();
    let from_env = env_filter.is_some();
    let (filter, filter_handle) =
        reload::Layer::new(env_filter.unwrap_or_else(|| default_filter(DEFAULT_LOG_LEVEL)));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    let toml_config =
        load_toml_config(args.config.as_deref()).context("Failed to load config file")?;

    if !from_env {
        filter_handle
            .reload(default_filter(&toml_config.logging.level))
            .context("Failed to apply log level")?;
    }

    info!("Starting ghscan-snyk {}", env!("CARGO_PKG_VERSION"));

    // Credentials are checked before anything touches the database
    let config = ImporterConfig::from_env(&args, &toml_config).context("Invalid configuration")?;

    let pool = ghscan_common::db::init_pool(&config.database)
        .await
        .context("Failed to connect to database")?;
    let store = PgImportStore::new(pool);
    store
        .ensure_schema()
        .await
        .context("Failed to initialize snyk_imports table")?;

    let client = config.snyk_client()?;
    let gate = RateGate::new(config.rate_interval, config.rate_burst)?;

    let cancel = CancellationToken::new();
    tokio::spawn(shutdown_signal(cancel.clone()));

    let summary = Pipeline::with_pg_store(store.clone(), client, gate)
        .with_handoff_capacity(config.handoff_capacity)
        .run(cancel)
        .await
        .context("Import run aborted")?;

    if !summary.fully_persisted() {
        warn!(
            submitted = summary.submitted,
            persisted = summary.persisted,
            "Some import results were not recorded; re-run to converge"
        );
    }

    store.pool().close().await;
    info!("ghscan-snyk finished");
    Ok(())
}

/// Cancel the run on Ctrl+C or SIGTERM
///
/// In-flight Snyk calls finish and are recorded; workers waiting on the
/// rate gate stop without submitting.
async fn shutdown_signal(cancel: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    warn!("Shutdown requested, cancelling pending imports");
    cancel.cancel();
}
