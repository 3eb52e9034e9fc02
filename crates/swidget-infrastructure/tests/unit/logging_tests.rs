//! Logging Tests

use swidget_infrastructure::constants::DEFAULT_LOG_LEVEL;
use swidget_infrastructure::logging::{LoggingConfig, init_logging, parse_log_level};
use tracing::Level;

#[test]
fn test_parse_log_level() {
    assert_eq!(parse_log_level("trace").unwrap(), Level::TRACE);
    assert_eq!(parse_log_level("debug").unwrap(), Level::DEBUG);
    assert_eq!(parse_log_level("INFO").unwrap(), Level::INFO);
    assert_eq!(parse_log_level("warn").unwrap(), Level::WARN);
    assert_eq!(parse_log_level("warning").unwrap(), Level::WARN);
    assert_eq!(parse_log_level("error").unwrap(), Level::ERROR);

    assert!(parse_log_level("invalid").is_err());
}

#[test]
fn test_logging_config_default() {
    let config = LoggingConfig::default();
    assert_eq!(config.level, DEFAULT_LOG_LEVEL);
    assert!(!config.json_format);
    assert!(config.file_output.is_none());
}

#[test]
fn test_init_logging_rejects_invalid_level() {
    let config = LoggingConfig {
        level: "chatty".to_string(),
        ..LoggingConfig::default()
    };

    assert!(init_logging(config).is_err());
}

#[test]
fn test_parse_log_level_trims_and_names_the_bad_value() {
    assert_eq!(parse_log_level("  Debug ").unwrap(), Level::DEBUG);

    let message = parse_log_level("loud").unwrap_err().to_string();
    assert!(message.contains("loud"), "unexpected message: {message}");
}

#[test]
fn test_init_logging_with_file_output_installs_once() {
    let dir = tempfile::tempdir().unwrap();
    let config = LoggingConfig {
        json_format: true,
        file_output: Some(dir.path().join("swidget.log")),
        ..LoggingConfig::default()
    };

    init_logging(config.clone()).unwrap();

    let rolled: Vec<_> = std::fs::read_dir(dir.path())
        .unwrap()
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .collect();
    assert!(
        rolled.iter().any(|name| name.starts_with("swidget")),
        "no log file in {rolled:?}"
    );

    // The global subscriber can only be set once per process
    assert!(init_logging(config).is_err());
}
