//! CodeStream node binary
//!
//! Runs the consumer (file ingest + clone/timing reports) and the monitor
//! (store poller + derived-metrics dashboard) in one process.

mod cli;
mod config;
mod detector;
mod monitor_server;
mod server;

use anyhow::Result;
use cli::Cli;
use codestream_monitor::{SampleLog, Sampler};
use codestream_pipeline::{Pipeline, RunStats};
use codestream_store::MemoryStore;
use config::NodeConfig;
use detector::WindowDetector;
use monitor_server::{MonitorServer, MonitorState};
use server::{AppState, IngestServer};
use std::sync::Arc;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse_args();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    let config = NodeConfig::from(&cli);
    tracing::info!("CodeStream node starting...");
    tracing::info!(
        "document store {}:{}/{} (in-process backend)",
        config.store.host,
        config.store.port,
        config.store.db_name
    );

    let store = Arc::new(MemoryStore::new());
    let stats = Arc::new(RunStats::new(config.stats_every, &config.dashboard_url));
    let pipeline = Arc::new(Pipeline::new(
        WindowDetector::new(),
        Arc::clone(&store),
        Arc::clone(&stats),
    ));
    let samples = Arc::new(SampleLog::new());

    // Counter poller
    let sampler = Sampler::new(Arc::clone(&store), Arc::clone(&samples));
    tokio::spawn(sampler.run(config.sample_interval));

    // Consumer: ingest + report endpoints
    let ingest = IngestServer::new(
        config.ingest_addr,
        Arc::new(AppState {
            pipeline,
            store: Arc::clone(&store),
            stats,
        }),
    );
    tokio::spawn(async move {
        if let Err(e) = ingest.run().await {
            tracing::error!("ingest server error: {}", e);
        }
    });

    // Monitor dashboard in the foreground until shutdown
    let monitor = MonitorServer::new(
        config.monitor_addr,
        Arc::new(MonitorState { store, samples }),
    );
    tokio::select! {
        result = monitor.run() => result?,
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("shutdown signal received");
        }
    }

    tracing::info!("CodeStream node stopped");
    Ok(())
}
