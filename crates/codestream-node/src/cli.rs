//! CLI argument parsing for codestream-node
//!
//! Every flag is backed by the environment variable the original
//! deployment used, so `PORT=4000 codestream` and `codestream --port 4000`
//! are equivalent.

use clap::Parser;
use codestream_monitor::DEFAULT_INTERVAL;

/// CodeStream clone-analysis consumer and monitor
#[derive(Parser, Debug, Clone)]
#[command(name = "codestream")]
#[command(about = "CodeStream clone-analysis consumer and monitor")]
#[command(version)]
pub struct Cli {
    /// Ingest + report listen port
    #[arg(long, env = "PORT", default_value = "3000")]
    pub port: u16,

    /// Monitor dashboard listen port
    #[arg(long, env = "MONITOR_PORT", default_value = "3001")]
    pub monitor_port: u16,

    /// Dashboard base URL printed in periodic summaries
    #[arg(long, env = "URL", default_value = "http://localhost:8080/")]
    pub dashboard_url: String,

    /// Log a statistics summary every N processed files
    #[arg(long, env = "STATS_FREQ", default_value = "100")]
    pub stats_freq: u64,

    /// Counter poll interval in seconds
    #[arg(long, env = "SAMPLE_INTERVAL_SECS", default_value_t = DEFAULT_INTERVAL.as_secs())]
    pub sample_interval_secs: u64,

    /// Document store host
    #[arg(long, env = "DBHOST", default_value = "localhost")]
    pub db_host: String,

    /// Document store port
    #[arg(long, env = "DBPORT", default_value = "27017")]
    pub db_port: u16,

    /// Document store database name
    #[arg(long, env = "DBNAME", default_value = "cloneDetector")]
    pub db_name: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

impl Cli {
    /// Parse CLI arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["codestream"]);
        assert_eq!(cli.port, 3000);
        assert_eq!(cli.monitor_port, 3001);
        assert_eq!(cli.dashboard_url, "http://localhost:8080/");
        assert_eq!(cli.stats_freq, 100);
        assert_eq!(cli.sample_interval_secs, 10);
        assert_eq!(cli.db_host, "localhost");
        assert_eq!(cli.db_port, 27017);
        assert_eq!(cli.db_name, "cloneDetector");
        assert_eq!(cli.log_level, "info");
    }

    #[test]
    fn test_cli_custom_values() {
        let cli = Cli::parse_from([
            "codestream",
            "--port", "4000",
            "--monitor-port", "4001",
            "--dashboard-url", "http://clones.example/",
            "--stats-freq", "10",
            "--sample-interval-secs", "2",
            "--db-name", "clones",
        ]);
        assert_eq!(cli.port, 4000);
        assert_eq!(cli.monitor_port, 4001);
        assert_eq!(cli.dashboard_url, "http://clones.example/");
        assert_eq!(cli.stats_freq, 10);
        assert_eq!(cli.sample_interval_secs, 2);
        assert_eq!(cli.db_name, "clones");
    }
}
