//! Configuration Loader Tests

use std::fs;

use swidget_application::EvictionPolicy;
use swidget_domain::constants::DEFAULT_MAX_BUNDLE_BYTES;
use swidget_domain::error::Error;
use swidget_infrastructure::config::{AppConfig, ConfigLoader, to_toml, validate_app_config};
use swidget_infrastructure::constants::{DEFAULT_HOST_NAME, DEFAULT_LOG_LEVEL};
use tempfile::TempDir;

/// Loader that ignores the developer's environment
fn isolated_loader() -> ConfigLoader {
    ConfigLoader::new().with_env_prefix("SWIDGET_TEST_UNUSED")
}

#[test]
fn test_defaults_when_file_missing() {
    let temp_dir = TempDir::new().unwrap();
    let config = isolated_loader()
        .with_config_path(temp_dir.path().join("absent.toml"))
        .load()
        .unwrap();

    assert_eq!(config.logging.level, DEFAULT_LOG_LEVEL);
    assert_eq!(config.loader.eviction, EvictionPolicy::Persist);
    assert!(!config.loader.strict_bindings);
    assert_eq!(config.loader.max_bundle_bytes, DEFAULT_MAX_BUNDLE_BYTES);
    assert_eq!(config.host.name, DEFAULT_HOST_NAME);
    assert_eq!(config.host.default_route, "/");
}

#[test]
fn test_toml_file_overrides_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("swidget.toml");
    fs::write(
        &path,
        r#"
[loader]
eviction = "evict_on_release"
strict_bindings = true

[http]
timeout_secs = 5

[host]
name = "demo-host"

[host.build_config]
env = "staging"
"#,
    )
    .unwrap();

    let config = isolated_loader().with_config_path(&path).load().unwrap();

    assert_eq!(config.loader.eviction, EvictionPolicy::EvictOnRelease);
    assert!(config.loader.strict_bindings);
    assert_eq!(config.http.timeout_secs, 5);
    assert_eq!(config.host.name, "demo-host");
    assert_eq!(
        config.host.build_config.get("env"),
        Some(&serde_json::json!("staging"))
    );
    // Untouched sections keep their defaults
    assert_eq!(config.logging.level, DEFAULT_LOG_LEVEL);
}

#[test]
fn test_invalid_values_fail_validation() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("swidget.toml");
    fs::write(&path, "[http]\ntimeout_secs = 0\n").unwrap();

    let err = isolated_loader().with_config_path(&path).load().unwrap_err();

    assert!(matches!(err, Error::Configuration { .. }), "{err:?}");
}

#[test]
fn test_unparseable_file_is_configuration_error() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("swidget.toml");
    fs::write(&path, "[loader]\neviction = \"sometimes\"\n").unwrap();

    let err = isolated_loader().with_config_path(&path).load().unwrap_err();

    assert!(matches!(err, Error::Configuration { .. }), "{err:?}");
}

#[test]
fn test_validation_rules() {
    let mut config = AppConfig::default();
    assert!(validate_app_config(&config).is_ok());

    config.logging.level = "loud".to_string();
    assert!(validate_app_config(&config).is_err());

    let mut config = AppConfig::default();
    config.loader.max_bundle_bytes = 0;
    assert!(validate_app_config(&config).is_err());

    let mut config = AppConfig::default();
    config.host.default_route = "home".to_string();
    assert!(validate_app_config(&config).is_err());

    let mut config = AppConfig::default();
    config.host.name = "  ".to_string();
    assert!(validate_app_config(&config).is_err());
}

#[test]
fn test_save_then_load_round_trip() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("saved.toml");
    let mut original = AppConfig::default();
    original.host.name = "saved-host".to_string();
    original.loader.eviction = EvictionPolicy::EvictOnRelease;

    let loader = isolated_loader();
    loader.save_to_file(&original, &path).unwrap();
    let loaded = isolated_loader().with_config_path(&path).load().unwrap();

    assert_eq!(loaded.host.name, "saved-host");
    assert_eq!(loaded.loader.eviction, EvictionPolicy::EvictOnRelease);
}

#[test]
fn test_to_toml_contains_sections() {
    let rendered = to_toml(&AppConfig::default()).unwrap();

    for section in ["[logging]", "[loader]", "[http]", "[host]"] {
        assert!(rendered.contains(section), "missing {section} in:\n{rendered}");
    }
    assert!(rendered.contains("eviction = \"persist\""));
}
