//! Tracing subscriber setup
//!
//! Installs the global subscriber: an `EnvFilter` (overridable through
//! `SWIDGET_LOG`), human-readable or JSON stdout output, and an optional
//! daily rolling log file.

use std::ffi::OsStr;
use std::path::Path;

use crate::constants::{LOG_ENV_VAR, LOG_FILE_PREFIX};
use swidget_domain::error::{Error, Result};

pub use crate::config::LoggingConfig;
use tracing::{Level, info, warn};
use tracing_subscriber::{
    EnvFilter, Layer, Registry, fmt, layer::SubscriberExt, util::SubscriberInitExt,
};

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Install the global subscriber described by `config`
///
/// Fails if the level is invalid or a global subscriber is already set.
pub fn init_logging(config: LoggingConfig) -> Result<()> {
    let level = parse_log_level(&config.level)?;
    let filter =
        EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new(&config.level));

    let mut outputs = vec![stdout_layer(config.json_format)];
    outputs.extend(
        config
            .file_output
            .as_deref()
            .map(|path| file_layer(path, config.json_format)),
    );

    Registry::default()
        .with(outputs)
        .with(filter)
        .try_init()
        .map_err(|e| Error::configuration_with_source("Failed to install logger", e))?;

    info!(%level, json = config.json_format, "Tracing subscriber installed");
    Ok(())
}

fn stdout_layer(json: bool) -> BoxedLayer {
    let layer = fmt::layer().with_target(true);
    if json {
        layer
            .json()
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true)
            .boxed()
    } else {
        layer.boxed()
    }
}

fn file_layer(path: &Path, json: bool) -> BoxedLayer {
    let directory = path
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let prefix = path
        .file_stem()
        .unwrap_or_else(|| OsStr::new(LOG_FILE_PREFIX));
    let layer = fmt::layer()
        .with_writer(tracing_appender::rolling::daily(directory, prefix))
        .with_ansi(false)
        .with_target(true);
    if json {
        layer.json().boxed()
    } else {
        layer.boxed()
    }
}

/// Map a configured level name onto a tracing `Level`
///
/// Case-insensitive; `warning` is accepted as an alias of `warn`.
pub fn parse_log_level(level: &str) -> Result<Level> {
    let parsed = match level.trim().to_ascii_lowercase().as_str() {
        "trace" => Some(Level::TRACE),
        "debug" => Some(Level::DEBUG),
        "info" => Some(Level::INFO),
        "warn" | "warning" => Some(Level::WARN),
        "error" => Some(Level::ERROR),
        _ => None,
    };
    parsed.ok_or_else(|| {
        Error::configuration(format!(
            "Unknown log level '{level}' (expected trace, debug, info, warn or error)"
        ))
    })
}

/// Record whether a configuration file was found at `config_path`
pub fn log_config_loaded(config_path: &Path, success: bool) {
    if success {
        info!(path = %config_path.display(), "Read configuration file");
    } else {
        warn!(path = %config_path.display(), "No configuration file, using defaults");
    }
}
