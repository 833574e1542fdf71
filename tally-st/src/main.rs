//! Session Tracker (tally-st) - Main entry point
//!
//! HTTP service for recruitment session statistics: per-person totals,
//! leaderboards, people filters, and the staged approval pipeline for
//! session reports.

use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal;
use tracing::info;

use tally_common::config;
use tally_common::db::init_database;
use tally_st::{build_router, AppState};

/// Command-line arguments for tally-st
#[derive(Parser, Debug)]
#[command(name = "tally-st")]
#[command(about = "Session Tracker service for Tally")]
#[command(version)]
struct Args {
    /// Port to listen on
    #[arg(short, long, default_value = "5730", env = "TALLY_ST_PORT")]
    port: u16,

    /// Root folder holding the database (overrides env and config file)
    #[arg(short, long)]
    root_folder: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    // Build identification, logged before anything can fail
    info!(
        "Starting Tally Session Tracker (tally-st) v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let args = Args::parse();

    let root_folder = config::resolve_root_folder(args.root_folder.as_deref());
    config::ensure_root_folder(&root_folder).context("Failed to create root folder")?;
    info!("Root folder: {}", root_folder.display());

    let db_path = config::database_path(&root_folder);
    let pool = init_database(&db_path)
        .await
        .context("Failed to initialize database")?;

    let state = AppState::new(pool);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(("127.0.0.1", args.port))
        .await
        .with_context(|| format!("Failed to bind to port {}", args.port))?;
    info!("tally-st listening on http://127.0.0.1:{}", args.port);
    info!("Health check: http://127.0.0.1:{}/health", args.port);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown on Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
