use clap::{Parser, Subcommand};

use std::path::PathBuf;

use super::constants::{
    ENV_CONFIG, ENV_HOST, ENV_PORT, ENV_PROCESSING_DEADLINE_MS, ENV_PROMETHEUS_PUSHGATEWAY_URL,
    ENV_PUSHGATEWAY_JOB, ENV_PUSHGATEWAY_TIMEOUT_SECS, ENV_PUSHGATEWAY_TIMESTAMPS,
    ENV_PUSHGATEWAY_URL,
};

#[derive(Parser)]
#[command(name = "streamgauge")]
#[command(version, about = "Metric stream to Pushgateway forwarder", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Server host address
    #[arg(long, short = 'H', global = true, env = ENV_HOST)]
    pub host: Option<String>,

    /// Server port
    #[arg(long, short = 'p', global = true, env = ENV_PORT)]
    pub port: Option<u16>,

    /// Path to config file
    #[arg(long, short = 'c', global = true, env = ENV_CONFIG)]
    pub config: Option<PathBuf>,

    /// Pushgateway base URL (e.g. http://localhost:9091)
    #[arg(long, global = true, env = ENV_PUSHGATEWAY_URL)]
    pub pushgateway_url: Option<String>,

    /// Job name pushes are grouped under
    #[arg(long, global = true, env = ENV_PUSHGATEWAY_JOB)]
    pub pushgateway_job: Option<String>,

    /// Push request timeout in seconds
    #[arg(long, global = true, env = ENV_PUSHGATEWAY_TIMEOUT_SECS)]
    pub pushgateway_timeout: Option<u64>,

    /// Send sample timestamps with pushes (the stock Pushgateway rejects them)
    #[arg(long, global = true, env = ENV_PUSHGATEWAY_TIMESTAMPS)]
    pub pushgateway_timestamps: Option<bool>,

    /// Per-batch processing deadline in milliseconds
    #[arg(long, global = true, env = ENV_PROCESSING_DEADLINE_MS)]
    pub deadline_ms: Option<u64>,
}

#[derive(Subcommand, Clone, Debug)]
pub enum Commands {
    /// Start the server (default command)
    Start,
    /// Process a transformation request from a JSON file and print the result
    Process {
        /// Path to the request JSON (`-` reads stdin)
        file: PathBuf,
    },
    /// Send a sample metric record to a running server
    Invoke {
        /// Metric name (e.g. ConsumedReadCapacityUnits)
        #[arg(long, short = 'm')]
        metric: String,

        /// Sample value (defaults to the metric's canned value)
        #[arg(long)]
        value: Option<f64>,

        /// Server base URL (defaults to the configured host and port)
        #[arg(long)]
        url: Option<String>,

        /// Print the request instead of sending it
        #[arg(long)]
        dry_run: bool,
    },
}

/// Configuration derived from CLI arguments
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub config: Option<PathBuf>,
    pub pushgateway_url: Option<String>,
    pub pushgateway_job: Option<String>,
    pub pushgateway_timeout: Option<u64>,
    pub pushgateway_timestamps: Option<bool>,
    pub deadline_ms: Option<u64>,
}

/// Parse CLI arguments and return config with command
pub fn parse() -> (CliConfig, Option<Commands>) {
    let cli = Cli::parse();
    let config = CliConfig {
        host: cli.host,
        port: cli.port,
        config: cli.config,
        // Older deployments only set PROMETHEUS_PUSHGATEWAY_URL
        pushgateway_url: cli
            .pushgateway_url
            .or_else(|| std::env::var(ENV_PROMETHEUS_PUSHGATEWAY_URL).ok()),
        pushgateway_job: cli.pushgateway_job,
        pushgateway_timeout: cli.pushgateway_timeout,
        pushgateway_timestamps: cli.pushgateway_timestamps,
        deadline_ms: cli.deadline_ms,
    };
    (config, cli.command)
}
