//! Two toggles mounting the same swidget, sharing one context

use std::sync::Arc;
use swidget::demo::{HostHome, Toggle, demo_manifest, demo_runtime};
use swidget::infrastructure::{AppConfig, HostBuilder};
use swidget_application::MountDirective;
use swidget_domain::value_objects::ModuleKey;
use swidget_providers::MemoryBundleSource;

fn demo_key() -> ModuleKey {
    ModuleKey::new("swidget", "s1")
}

#[tokio::test]
async fn test_host_page_starts_empty() {
    let (runtime, source) = demo_runtime(AppConfig::default()).unwrap();
    let home = HostHome::for_runtime(&runtime);

    assert_eq!(home.render().unwrap(), "");
    assert!(home.mounted(Toggle::First).is_none());
    assert_eq!(source.total_fetches(), 0);
}

#[tokio::test]
async fn test_toggle_mounts_greeting() {
    let (runtime, _source) = demo_runtime(AppConfig::default()).unwrap();
    let mut home = HostHome::for_runtime(&runtime);

    assert!(home.toggle(Toggle::First).await.unwrap());
    let text = home.render().unwrap();

    assert_eq!(text, "Hallo Swidget from TestService");
    let mounted = home.mounted(Toggle::First).unwrap();
    assert_eq!(mounted.key(), &demo_key());
}

#[tokio::test]
async fn test_both_toggles_share_one_fetch() {
    let (runtime, source) = demo_runtime(AppConfig::default()).unwrap();
    let mut home = HostHome::for_runtime(&runtime);

    home.toggle(Toggle::First).await.unwrap();
    home.toggle(Toggle::Second).await.unwrap();

    assert_eq!(source.total_fetches(), 1);
    let record = runtime.cache().record(&demo_key()).unwrap();
    assert_eq!(record.ref_count, 2);
    assert_eq!(runtime.mounts().mount_count("main"), 2);
    assert_eq!(
        home.render().unwrap(),
        "Hallo Swidget from TestServiceHallo Swidget from TestService"
    );
}

#[tokio::test]
async fn test_host_update_rerenders_every_instance() {
    let (runtime, _source) = demo_runtime(AppConfig::default()).unwrap();
    let mut home = HostHome::for_runtime(&runtime);
    home.toggle(Toggle::First).await.unwrap();
    home.toggle(Toggle::Second).await.unwrap();

    let first = home.mounted(Toggle::First).unwrap().render_count();
    let second = home.mounted(Toggle::Second).unwrap().render_count();
    home.render().unwrap();

    assert!(home.mounted(Toggle::First).unwrap().render_count() > first);
    assert!(home.mounted(Toggle::Second).unwrap().render_count() > second);
}

#[tokio::test]
async fn test_swidget_stamps_shared_context() {
    let (runtime, _source) = demo_runtime(AppConfig::default()).unwrap();
    let mut home = HostHome::for_runtime(&runtime);
    let context = home.context();
    assert_eq!(context.get().get_str("foo"), Some("bar"));

    home.toggle(Toggle::First).await.unwrap();

    let stamped = context.get();
    assert!(stamped.version() >= 1);
    let foo = stamped.get_str("foo").unwrap();
    assert_ne!(foo, "bar");
    assert_eq!(foo.len(), "00:00:00".len());
}

#[tokio::test]
async fn test_hiding_toggle_releases_reference() {
    let (runtime, source) = demo_runtime(AppConfig::default()).unwrap();
    let mut home = HostHome::for_runtime(&runtime);
    home.toggle(Toggle::First).await.unwrap();
    home.toggle(Toggle::Second).await.unwrap();

    assert!(!home.toggle(Toggle::First).await.unwrap());

    assert!(home.mounted(Toggle::First).is_none());
    assert_eq!(runtime.mounts().mount_count("main"), 1);
    assert_eq!(runtime.cache().record(&demo_key()).unwrap().ref_count, 1);

    // Showing it again reuses the cached module
    assert!(home.toggle(Toggle::First).await.unwrap());
    assert_eq!(source.total_fetches(), 1);
}

#[tokio::test]
async fn test_dropping_host_page_unmounts() {
    let (runtime, _source) = demo_runtime(AppConfig::default()).unwrap();
    let mut home = HostHome::for_runtime(&runtime);
    home.toggle(Toggle::First).await.unwrap();
    let context = home.context();

    drop(home);

    assert_eq!(runtime.mounts().mount_count("main"), 0);
    assert!(context.is_closed());
    assert_eq!(runtime.cache().record(&demo_key()).unwrap().ref_count, 0);
}

#[tokio::test]
async fn test_metadata_falls_back_to_entry() {
    let (runtime, _source) = demo_runtime(AppConfig::default()).unwrap();
    let mut home = HostHome::for_runtime(&runtime);
    home.toggle(Toggle::First).await.unwrap();

    let metadata = runtime.loader().metadata(&demo_key()).unwrap();

    assert_eq!(metadata.description, "My-App Swidget");
    assert!(metadata.authors.is_empty());
}

#[tokio::test]
async fn test_remount_reuses_cached_module() {
    let url = "http://localhost:7070/swidget.js";
    let source = Arc::new(MemoryBundleSource::new());
    source.insert_manifest(url, &demo_manifest("swidget")).unwrap();
    let runtime = HostBuilder::new(AppConfig::default())
        .with_source("http", Arc::clone(&source) as _)
        .build()
        .unwrap();
    runtime.mounts().create_region("main");
    let directive = || MountDirective::new(url, "swidget", "s1");

    let first = runtime.loader().mount("main", directive()).await.unwrap();
    assert_eq!(first.text(), "Hallo Swidget from TestService");
    let module = Arc::clone(first.module());
    let first_id = first.id();
    runtime.loader().unmount(first);
    assert_eq!(runtime.mounts().region_text("main").unwrap(), "");

    let second = runtime.loader().mount("main", directive()).await.unwrap();

    assert_eq!(source.fetch_count(url), 1);
    assert!(Arc::ptr_eq(second.module(), &module));
    assert_ne!(second.id(), first_id);
    assert_eq!(second.render_count(), 1);
    assert_eq!(second.text(), "Hallo Swidget from TestService");
}
