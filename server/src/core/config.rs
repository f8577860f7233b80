use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::utils::file::expand_path;

use super::cli::CliConfig;
use super::constants::{
    APP_DOT_FOLDER, CONFIG_FILE_NAME, DEFAULT_HOST, DEFAULT_PORT, DEFAULT_PUSHGATEWAY_JOB,
    DEFAULT_PUSHGATEWAY_TIMEOUT_SECS,
};

// =============================================================================
// File Config Structs (JSON deserialization)
// =============================================================================

/// Server configuration section
#[derive(Debug, Default, Clone, Deserialize)]
pub struct ServerFileConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
}

/// Pushgateway configuration section
#[derive(Debug, Default, Clone, Deserialize)]
pub struct PushgatewayFileConfig {
    pub url: Option<String>,
    pub job: Option<String>,
    pub timeout_secs: Option<u64>,
    pub timestamps: Option<bool>,
}

/// Batch processing configuration section
#[derive(Debug, Default, Clone, Deserialize)]
pub struct ProcessingFileConfig {
    pub deadline_ms: Option<u64>,
}

/// File-based configuration (JSON)
#[derive(Debug, Default, Deserialize)]
pub struct FileConfig {
    pub server: Option<ServerFileConfig>,
    pub pushgateway: Option<PushgatewayFileConfig>,
    pub processing: Option<ProcessingFileConfig>,
    #[serde(flatten)]
    pub extra: serde_json::Value,
}

impl FileConfig {
    /// Load configuration from a JSON file
    fn load_from_file(path: &Path) -> Result<Self> {
        tracing::debug!(path = %path.display(), "Loading config file");
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        tracing::trace!(config = ?config, "Parsed config file");
        Ok(config)
    }

    /// Warn about unknown fields in the config
    fn warn_unknown_fields(&self) {
        if let serde_json::Value::Object(map) = &self.extra
            && !map.is_empty()
        {
            let keys_str: String = map
                .keys()
                .map(|k| k.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            tracing::warn!(
                fields = %keys_str,
                "Unknown fields in config file (possible typos)"
            );
        }
    }

    /// Merge another FileConfig into this one (other takes precedence)
    fn merge(&mut self, other: FileConfig) {
        // Server
        if let Some(server) = other.server {
            let current = self.server.get_or_insert_with(ServerFileConfig::default);
            if server.host.is_some() {
                tracing::trace!(host = ?server.host, "Merging server.host");
                current.host = server.host;
            }
            if server.port.is_some() {
                tracing::trace!(port = ?server.port, "Merging server.port");
                current.port = server.port;
            }
        }

        // Pushgateway
        if let Some(gateway) = other.pushgateway {
            let current = self
                .pushgateway
                .get_or_insert_with(PushgatewayFileConfig::default);
            if gateway.url.is_some() {
                tracing::trace!(url = ?gateway.url, "Merging pushgateway.url");
                current.url = gateway.url;
            }
            if gateway.job.is_some() {
                tracing::trace!(job = ?gateway.job, "Merging pushgateway.job");
                current.job = gateway.job;
            }
            if gateway.timeout_secs.is_some() {
                current.timeout_secs = gateway.timeout_secs;
            }
            if gateway.timestamps.is_some() {
                current.timestamps = gateway.timestamps;
            }
        }

        // Processing
        if let Some(processing) = other.processing {
            let current = self
                .processing
                .get_or_insert_with(ProcessingFileConfig::default);
            if processing.deadline_ms.is_some() {
                tracing::trace!(deadline_ms = ?processing.deadline_ms, "Merging processing.deadline_ms");
                current.deadline_ms = processing.deadline_ms;
            }
        }
    }
}

// =============================================================================
// Runtime Config Structs (final merged configuration)
// =============================================================================

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Pushgateway client configuration
#[derive(Debug, Clone)]
pub struct PushgatewayConfig {
    /// Base URL, e.g. `http://localhost:9091`
    pub url: String,
    pub job: String,
    pub timeout_secs: u64,
    /// Attach record timestamps to pushed samples
    pub timestamps: bool,
}

/// Batch processing configuration
#[derive(Debug, Clone, Default)]
pub struct ProcessingConfig {
    pub deadline_ms: Option<u64>,
}

impl ProcessingConfig {
    pub fn deadline(&self) -> Option<Duration> {
        self.deadline_ms.map(Duration::from_millis)
    }
}

/// Final merged application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub pushgateway: PushgatewayConfig,
    pub processing: ProcessingConfig,
}

impl AppConfig {
    /// Load configuration from all sources
    ///
    /// Priority (lowest to highest):
    /// 1. Defaults
    /// 2. Profile directory config (~/.streamgauge/streamgauge.json)
    /// 3. Local directory config OR CLI-specified config path
    /// 4. CLI arguments (which include env var fallbacks via clap)
    pub fn load(cli: &CliConfig) -> Result<Self> {
        tracing::debug!("Loading application configuration");
        tracing::trace!(cli = ?cli, "CLI config");

        let mut file_config = FileConfig::default();
        let mut found_configs: Vec<String> = Vec::new();

        // 1. Load from profile dir - skip if not exists
        if let Some(profile_path) = get_profile_config_path()
            && profile_path.exists()
        {
            let profile_config = FileConfig::load_from_file(&profile_path)?;
            profile_config.warn_unknown_fields();
            file_config.merge(profile_config);
            found_configs.push(profile_path.display().to_string());
        }

        // 2. Load from CLI-specified path OR local directory
        let overlay_path = if let Some(ref path) = cli.config {
            let expanded = expand_path(&path.to_string_lossy());
            if !expanded.exists() {
                anyhow::bail!("Config file not found: {}", expanded.display());
            }
            Some(expanded)
        } else {
            let local = PathBuf::from(CONFIG_FILE_NAME);
            if local.exists() { Some(local) } else { None }
        };

        if let Some(path) = overlay_path {
            let overlay_config = FileConfig::load_from_file(&path)?;
            overlay_config.warn_unknown_fields();
            file_config.merge(overlay_config);
            found_configs.push(path.display().to_string());
        }

        tracing::debug!(configs = ?found_configs, "Config files loaded");

        Self::resolve(cli, file_config)
    }

    /// Layer CLI/env overrides on top of merged file config and defaults
    fn resolve(cli: &CliConfig, file_config: FileConfig) -> Result<Self> {
        let file_server = file_config.server.unwrap_or_default();
        let file_gateway = file_config.pushgateway.unwrap_or_default();
        let file_processing = file_config.processing.unwrap_or_default();

        let host = cli
            .host
            .clone()
            .or(file_server.host)
            .unwrap_or_else(|| DEFAULT_HOST.to_string());

        let port = cli.port.or(file_server.port).unwrap_or(DEFAULT_PORT);

        let Some(url) = cli.pushgateway_url.clone().or(file_gateway.url) else {
            anyhow::bail!(
                "Configuration error: pushgateway.url is required \
                 (set --pushgateway-url, STREAMGAUGE_PUSHGATEWAY_URL or the config file)"
            );
        };

        let pushgateway = PushgatewayConfig {
            url: url.trim().to_string(),
            job: cli
                .pushgateway_job
                .clone()
                .or(file_gateway.job)
                .unwrap_or_else(|| DEFAULT_PUSHGATEWAY_JOB.to_string()),
            timeout_secs: cli
                .pushgateway_timeout
                .or(file_gateway.timeout_secs)
                .unwrap_or(DEFAULT_PUSHGATEWAY_TIMEOUT_SECS),
            timestamps: cli
                .pushgateway_timestamps
                .or(file_gateway.timestamps)
                .unwrap_or(false),
        };

        let processing = ProcessingConfig {
            deadline_ms: cli.deadline_ms.or(file_processing.deadline_ms),
        };

        let config = Self {
            server: ServerConfig { host, port },
            pushgateway,
            processing,
        };

        config.validate()?;

        tracing::debug!(
            host = %config.server.host,
            port = config.server.port,
            pushgateway = %config.pushgateway.url,
            job = %config.pushgateway.job,
            deadline_ms = ?config.processing.deadline_ms,
            "Configuration loaded"
        );

        Ok(config)
    }

    /// Validate the configuration for consistency and correctness
    fn validate(&self) -> Result<()> {
        // Host must not be empty
        if self.server.host.is_empty() {
            anyhow::bail!("Configuration error: server.host must not be empty");
        }

        // Port must be non-zero (port 0 would cause bind failure)
        if self.server.port == 0 {
            anyhow::bail!("Configuration error: server.port must be greater than 0");
        }

        let url = &self.pushgateway.url;
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            anyhow::bail!(
                "Configuration error: pushgateway.url must start with http:// or https:// (got '{}')",
                url
            );
        }

        // Job is a single path segment of the push URL
        let job = &self.pushgateway.job;
        if job.trim().is_empty() {
            anyhow::bail!("Configuration error: pushgateway.job must not be empty");
        }
        if job.contains('/') {
            anyhow::bail!("Configuration error: pushgateway.job must not contain '/'");
        }

        if self.pushgateway.timeout_secs == 0 {
            anyhow::bail!("Configuration error: pushgateway.timeout_secs must be greater than 0");
        }

        if self.processing.deadline_ms == Some(0) {
            anyhow::bail!("Configuration error: processing.deadline_ms must be greater than 0");
        }

        if self.pushgateway.timestamps {
            tracing::warn!(
                "pushgateway.timestamps is enabled; a stock Pushgateway rejects samples with timestamps"
            );
        }

        // The transform endpoint is unauthenticated
        if is_all_interfaces(&self.server.host) {
            tracing::warn!(
                host = %self.server.host,
                "Binding to all network interfaces. \
                 Anyone on your network can submit metric records."
            );
        }

        Ok(())
    }
}

/// Get the profile config path (~/.streamgauge/streamgauge.json)
fn get_profile_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(APP_DOT_FOLDER).join(CONFIG_FILE_NAME))
}

/// Check if host binds to all network interfaces
pub(crate) fn is_all_interfaces(host: &str) -> bool {
    matches!(host, "0.0.0.0" | "::" | "[::]")
}
