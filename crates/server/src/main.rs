use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use transit_pulse_core::{
    create_kv_store, load_config, validate_config, EventStore, Generator, IngestCycle,
    IngestScheduler, SnapshotCache, SqliteEventStore, TransitPulse,
};
use transit_pulse_server::{api::create_router, state::AppState};

/// Application version
const VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("transit-pulse {} starting", VERSION);

    // Determine config path
    let config_path = std::env::var("PULSE_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config.toml"));

    // Load configuration
    info!("Loading configuration from {:?}", config_path);
    let config = load_config(&config_path)
        .with_context(|| format!("Failed to load config from {:?}", config_path))?;

    // Validate configuration
    validate_config(&config).context("Configuration validation failed")?;

    info!("Configuration loaded successfully");
    info!("Database path: {:?}", config.database.path);
    info!(
        "Cache backend: {:?} (TTL {}s)",
        config.cache.backend, config.cache.ttl_secs
    );

    // Create snapshot cache
    let kv_store = create_kv_store(&config.cache)
        .await
        .context("Failed to create cache backend")?;
    let cache = SnapshotCache::from_config(kv_store, &config.cache);
    info!("Snapshot cache initialized ({})", cache.backend_name());

    // Create SQLite event store
    let store: Arc<dyn EventStore> = Arc::new(
        SqliteEventStore::with_busy_timeout(
            &config.database.path,
            config.database.busy_timeout(),
        )
        .context("Failed to create event store")?,
    );
    info!("Event store initialized");

    // Create generator
    let generator = Generator::from_config(&config.generator);
    info!("Status generator initialized (source: {})", generator.source_name());

    let pulse = Arc::new(
        TransitPulse::new(generator, cache, store).with_horizon(config.forecast.horizon_minutes),
    );

    // Start the ingest scheduler; the first cycle runs before we accept traffic
    let scheduler = Arc::new(IngestScheduler::new(
        config.scheduler.clone(),
        Arc::clone(&pulse) as Arc<dyn IngestCycle>,
    ));
    scheduler.start().await;

    // Create app state
    let state = Arc::new(AppState::new(
        config.clone(),
        Arc::clone(&pulse),
        Arc::clone(&scheduler),
    ));

    // Create router
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::new(config.server.host, config.server.port);
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    // Run server with graceful shutdown
    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error");

    // Stop the scheduler whether or not the server exited cleanly
    info!("Server shutting down...");
    scheduler.stop().await;

    served
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
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
                error!("Failed to install SIGTERM handler: {}", e);
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
}
