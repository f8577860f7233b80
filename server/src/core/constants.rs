// =============================================================================
// Application Identity
// =============================================================================

/// Application name in title case (for display)
pub const APP_NAME: &str = "StreamGauge";

/// Application name in lowercase (for paths and identifiers)
pub const APP_NAME_LOWER: &str = "streamgauge";

/// Unix-style dotfile folder name
pub const APP_DOT_FOLDER: &str = ".streamgauge";

// =============================================================================
// Configuration Files
// =============================================================================

/// Config file name
pub const CONFIG_FILE_NAME: &str = "streamgauge.json";

/// Environment variable for config file path
pub const ENV_CONFIG: &str = "STREAMGAUGE_CONFIG";

// =============================================================================
// Environment Variables - Server
// =============================================================================

/// Environment variable for server host
pub const ENV_HOST: &str = "STREAMGAUGE_HOST";

/// Environment variable for server port
pub const ENV_PORT: &str = "STREAMGAUGE_PORT";

/// Environment variable for log level/filter
pub const ENV_LOG: &str = "STREAMGAUGE_LOG";

// =============================================================================
// Server Defaults
// =============================================================================

/// Default server host
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default server port
pub const DEFAULT_PORT: u16 = 5390;

// =============================================================================
// Environment Variables - Pushgateway
// =============================================================================

/// Environment variable for the Pushgateway base URL
pub const ENV_PUSHGATEWAY_URL: &str = "STREAMGAUGE_PUSHGATEWAY_URL";

/// Legacy environment variable for the Pushgateway base URL
pub const ENV_PROMETHEUS_PUSHGATEWAY_URL: &str = "PROMETHEUS_PUSHGATEWAY_URL";

/// Environment variable for the push job name
pub const ENV_PUSHGATEWAY_JOB: &str = "STREAMGAUGE_PUSHGATEWAY_JOB";

/// Environment variable for the push request timeout (seconds)
pub const ENV_PUSHGATEWAY_TIMEOUT_SECS: &str = "STREAMGAUGE_PUSHGATEWAY_TIMEOUT_SECS";

/// Environment variable to send sample timestamps with pushes
pub const ENV_PUSHGATEWAY_TIMESTAMPS: &str = "STREAMGAUGE_PUSHGATEWAY_TIMESTAMPS";

// =============================================================================
// Pushgateway Defaults
// =============================================================================

/// Default push job name
pub const DEFAULT_PUSHGATEWAY_JOB: &str = "streamgauge";

/// Default push request timeout in seconds
pub const DEFAULT_PUSHGATEWAY_TIMEOUT_SECS: u64 = 10;

// =============================================================================
// Processing
// =============================================================================

/// Environment variable for the per-batch deadline (milliseconds)
pub const ENV_PROCESSING_DEADLINE_MS: &str = "STREAMGAUGE_PROCESSING_DEADLINE_MS";

// =============================================================================
// Request Body Limits
// =============================================================================

/// Default body limit for general API requests (1 MB)
pub const DEFAULT_BODY_LIMIT: usize = 1024 * 1024;

/// Body limit for the transformation endpoint (6 MB, the stream's batch ceiling)
pub const TRANSFORM_BODY_LIMIT: usize = 6 * 1024 * 1024;

// =============================================================================
// Shutdown
// =============================================================================

/// Graceful shutdown timeout in seconds
pub const SHUTDOWN_TIMEOUT_SECS: u64 = 30;
