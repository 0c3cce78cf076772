//! Configuration types for codestream-node

use crate::cli::Cli;
use codestream_store::StoreConfig;
use std::net::SocketAddr;
use std::time::Duration;

/// Node configuration
#[derive(Debug, Clone)]
pub struct NodeConfig {
    /// Ingest + report listen address
    pub ingest_addr: SocketAddr,
    /// Monitor dashboard listen address
    pub monitor_addr: SocketAddr,
    /// Dashboard base URL printed in periodic summaries
    pub dashboard_url: String,
    /// Summary frequency in processed files
    pub stats_every: u64,
    /// Counter poll interval
    pub sample_interval: Duration,
    /// Document store settings
    pub store: StoreConfig,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            ingest_addr: addr_on_port(3000),
            monitor_addr: addr_on_port(3001),
            dashboard_url: "http://localhost:8080/".to_string(),
            stats_every: 100,
            sample_interval: Duration::from_secs(10),
            store: StoreConfig::default(),
        }
    }
}

impl From<&Cli> for NodeConfig {
    fn from(cli: &Cli) -> Self {
        Self {
            ingest_addr: addr_on_port(cli.port),
            monitor_addr: addr_on_port(cli.monitor_port),
            dashboard_url: cli.dashboard_url.clone(),
            stats_every: cli.stats_freq,
            sample_interval: Duration::from_secs(cli.sample_interval_secs),
            store: StoreConfig {
                host: cli.db_host.clone(),
                port: cli.db_port,
                db_name: cli.db_name.clone(),
            },
        }
    }
}

fn addr_on_port(port: u16) -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], port))
}
