//! Infrastructure layer constants
//!
//! Domain-specific constants are defined in `swidget_domain::constants`.

// ============================================================================
// CONFIGURATION CONSTANTS
// ============================================================================

/// Default configuration file name
pub const DEFAULT_CONFIG_FILENAME: &str = "swidget.toml";

/// Default configuration directory name
pub const DEFAULT_CONFIG_DIR: &str = "swidget";

/// Environment variable prefix for configuration
pub const CONFIG_ENV_PREFIX: &str = "SWIDGET";

/// Separator between nested keys in environment variable names
pub const CONFIG_ENV_SEPARATOR: &str = "__";

// ============================================================================
// LOGGING CONSTANTS
// ============================================================================

/// Default log level
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Environment variable overriding the log filter
pub const LOG_ENV_VAR: &str = "SWIDGET_LOG";

/// File name prefix of rolling log files
pub const LOG_FILE_PREFIX: &str = "swidget";

// ============================================================================
// HOST CONSTANTS
// ============================================================================

/// Default host application name
pub const DEFAULT_HOST_NAME: &str = "swidget-host";

/// Default HTTP request timeout in seconds
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// Region the CLI mounts into
pub const DEFAULT_MOUNT_REGION: &str = "main";
