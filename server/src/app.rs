//! Core application

use std::path::Path;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};

use crate::api::ApiServer;
use crate::core::banner;
use crate::core::cli::{self, CliConfig, Commands};
use crate::core::config::{AppConfig, is_all_interfaces};
use crate::core::constants::{APP_NAME_LOWER, DEFAULT_HOST, DEFAULT_PORT, ENV_LOG};
use crate::core::shutdown::ShutdownService;
use crate::data::PushgatewayClient;
use crate::data::types::TransformationRequest;
use crate::domain::BatchProcessor;
use crate::domain::metrics::{known_metric_names, sample_request, sample_value};
use crate::utils::file::read_input;

pub struct CoreApp {
    pub shutdown: ShutdownService,
    pub config: AppConfig,
    pub processor: Arc<BatchProcessor>,
    push_url: String,
}

impl CoreApp {
    /// Run the application with CLI argument parsing
    pub async fn run() -> Result<()> {
        dotenvy::dotenv().ok();
        Self::init_logging();

        tracing::debug!("Application starting");

        let (cli_config, command) = cli::parse();
        tracing::trace!(command = ?command, "Parsed command");

        match command {
            Some(Commands::Process { file }) => {
                let app = Self::init(&cli_config)?;
                app.process_file(&file).await
            }
            Some(Commands::Invoke {
                metric,
                value,
                url,
                dry_run,
            }) => Self::invoke(&cli_config, &metric, value, url, dry_run).await,
            Some(Commands::Start) | None => {
                let app = Self::init(&cli_config)?;
                Self::start_server(app).await
            }
        }
    }

    fn init(cli: &CliConfig) -> Result<Self> {
        let config = AppConfig::load(cli)?;

        let client = PushgatewayClient::new(&config.pushgateway)
            .context("Failed to initialize Pushgateway client")?;
        let push_url = client.push_url().to_string();

        let processor =
            BatchProcessor::new(Arc::new(client)).with_deadline(config.processing.deadline());

        Ok(Self {
            shutdown: ShutdownService::new(),
            config,
            processor: Arc::new(processor),
            push_url,
        })
    }

    fn init_logging() {
        let default_filter = format!("info,{}=info", APP_NAME_LOWER);

        let filter = std::env::var(ENV_LOG)
            .or_else(|_| std::env::var("RUST_LOG"))
            .unwrap_or(default_filter);

        tracing_subscriber::fmt()
            .with_target(false)
            .with_thread_ids(false)
            .with_level(true)
            .with_ansi(true)
            .compact()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }

    async fn start_server(app: Self) -> Result<()> {
        // Install signal handlers FIRST (before any blocking calls)
        app.shutdown.install_signal_handlers();

        banner::print_banner(&app.config, &app.push_url);

        let server = ApiServer::new(app);
        let app = server.start().await?;
        tracing::debug!(triggered = app.shutdown.is_triggered(), "Server stopped");

        Ok(())
    }

    /// Run one transformation request from a file (or stdin) and print the result
    async fn process_file(&self, path: &Path) -> Result<()> {
        let content = read_input(path)?;

        let request: TransformationRequest = serde_json::from_str(&content)
            .with_context(|| format!("Invalid transformation request: {}", path.display()))?;

        let records = request.into_input_records();
        let result = self.processor.process(&records).await;

        println!("{}", serde_json::to_string_pretty(&result)?);
        Ok(())
    }

    /// Send a sample metric record to a running server
    async fn invoke(
        cli: &CliConfig,
        metric: &str,
        value: Option<f64>,
        url: Option<String>,
        dry_run: bool,
    ) -> Result<()> {
        let Some(default_value) = sample_value(metric) else {
            anyhow::bail!(
                "Unknown metric '{}'. Known metrics: {}",
                metric,
                known_metric_names()
            );
        };
        let value = value.unwrap_or(default_value);

        let timestamp_millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as i64)
            .unwrap_or_default();
        let request = sample_request(metric, value, timestamp_millis);

        if dry_run {
            println!("{}", serde_json::to_string_pretty(&request)?);
            return Ok(());
        }

        let base = url.unwrap_or_else(|| default_server_url(cli));
        let endpoint = format!("{}/api/v1/firehose/transform", base.trim_end_matches('/'));
        tracing::debug!(endpoint = %endpoint, metric, value, "Sending sample record");

        let response = reqwest::Client::new()
            .post(&endpoint)
            .json(&request)
            .send()
            .await
            .with_context(|| format!("Failed to reach {}", endpoint))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .context("Failed to read response body")?;

        if !status.is_success() {
            anyhow::bail!("Server responded {}: {}", status, body);
        }

        println!("{}", body);
        Ok(())
    }
}

/// Local server URL derived from the host/port flags
fn default_server_url(cli: &CliConfig) -> String {
    let host = cli.host.as_deref().unwrap_or(DEFAULT_HOST);
    let host = if is_all_interfaces(host) {
        "127.0.0.1"
    } else {
        host
    };
    let port = cli.port.unwrap_or(DEFAULT_PORT);
    format!("http://{}:{}", host, port)
}
