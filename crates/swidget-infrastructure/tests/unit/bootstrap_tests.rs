//! Host bootstrap tests

use std::sync::Arc;

use serde_json::{Value, json};
use swidget_application::{EntryCatalog, MountDirective};
use swidget_domain::di::DiContainer;
use swidget_domain::error::Result;
use swidget_domain::ports::{Component, EntryArgs, EntryFn, RenderScope};
use swidget_domain::value_objects::{BundleManifest, Node, service_ids};
use swidget_infrastructure::config::AppConfig;
use swidget_infrastructure::{HostBuilder, init_host};
use swidget_providers::MemoryBundleSource;

const URL: &str = "memory://greeter.json";

#[derive(Clone)]
struct Greeting;

impl Component for Greeting {
    fn render(&self, scope: &RenderScope<'_>) -> Result<Node> {
        let greeting = scope
            .config
            .get("greeting")
            .and_then(Value::as_str)
            .unwrap_or("hello");
        let host: Arc<String> = scope
            .container
            .parent()
            .expect("instance container is a child")
            .resolve(&service_ids::APP_NAME)?;
        Ok(Node::text(format!("{greeting} from {host}")))
    }
}

fn catalog() -> Arc<EntryCatalog> {
    let entry = EntryFn::new(|_args: EntryArgs| Ok(Box::new(Greeting) as Box<dyn Component>));
    Arc::new(EntryCatalog::new().with_entry("greeter-entry", Arc::new(entry)))
}

fn source() -> Arc<MemoryBundleSource> {
    let source = MemoryBundleSource::new();
    source
        .insert_manifest(
            URL,
            &BundleManifest {
                format: 1,
                name: "greeter".to_string(),
                version: "1.0.0".to_string(),
                entry: "greeter-entry".to_string(),
                metadata: None,
                config: json!({"greeting": "hallo"}),
            },
        )
        .unwrap();
    Arc::new(source)
}

#[test]
fn test_init_host_binds_host_services() {
    let mut config = AppConfig::default();
    config.host.name = "shell".to_string();
    config
        .host
        .build_config
        .insert("env".to_string(), json!("test"));

    let runtime = init_host(config).unwrap();

    let name: Arc<String> = runtime.container().resolve(&service_ids::APP_NAME).unwrap();
    let build: Arc<Value> = runtime.container().resolve(&service_ids::CONFIG).unwrap();
    assert_eq!(name.as_str(), "shell");
    assert_eq!(*build, json!({"env": "test"}));
    assert!(runtime.cache().is_empty());
}

#[test]
fn test_existing_container_bindings_are_kept() {
    let container = DiContainer::new();
    container
        .bind_constant(service_ids::APP_NAME, "preset".to_string())
        .unwrap();

    let runtime = HostBuilder::new(AppConfig::default())
        .with_container(container.clone())
        .build()
        .unwrap();

    let name: Arc<String> = runtime.container().resolve(&service_ids::APP_NAME).unwrap();
    assert_eq!(name.as_str(), "preset");
    assert!(runtime.container().same_container(&container));
}

#[test]
fn test_strict_bindings_follow_config() {
    let mut config = AppConfig::default();
    config.loader.strict_bindings = true;

    let runtime = init_host(config).unwrap();

    assert!(runtime.container().options().strict);
    assert!(
        runtime
            .container()
            .bind_constant(service_ids::APP_NAME, "again".to_string())
            .is_err()
    );
}

#[tokio::test]
async fn test_runtime_mounts_from_overridden_source() {
    let mut config = AppConfig::default();
    config.host.name = "shell".to_string();
    let source = source();
    let runtime = HostBuilder::new(config)
        .with_source("memory", source.clone())
        .with_catalog(catalog())
        .build()
        .unwrap();
    runtime.mounts().create_region("main");

    let mounted = runtime
        .loader()
        .mount("main", MountDirective::new(URL, "greeter", "g1"))
        .await
        .unwrap();

    assert_eq!(mounted.text(), "hallo from shell");
    assert_eq!(runtime.mounts().region_text("main").unwrap(), "hallo from shell");
    assert_eq!(source.fetch_count(URL), 1);

    runtime.loader().unmount(mounted);
    assert_eq!(runtime.mounts().mount_count("main"), 0);
}
