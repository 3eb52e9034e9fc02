//! Unit tests for field injection

use std::sync::Arc;

use swidget_domain::di::{
    Binding, DiContainer, FieldInjections, Inject, Injectable, InjectionRegistry, activate,
    construct,
};
use swidget_domain::error::Error;
use swidget_domain::value_objects::ServiceId;

trait TestService: Send + Sync {
    fn test(&self) -> String;
}

struct TestServiceImpl;

impl TestService for TestServiceImpl {
    fn test(&self) -> String {
        "42".to_string()
    }
}

#[derive(Default)]
struct Home {
    service: Inject<dyn TestService>,
    title: Inject<String>,
}

impl Injectable for Home {
    fn decorate(fields: &mut FieldInjections<Self>) {
        fields
            .inject("service", "test-service", |home| &mut home.service)
            .inject("title", "title", |home| &mut home.title);
    }
}

#[derive(Default)]
struct Plain;

impl Injectable for Plain {
    fn decorate(_fields: &mut FieldInjections<Self>) {}
}

fn container() -> DiContainer {
    let container = DiContainer::new();
    let service: Arc<dyn TestService> = Arc::new(TestServiceImpl);
    container
        .bind("test-service", Binding::constant_arc(service))
        .unwrap();
    container.bind_constant("title", "Home".to_string()).unwrap();
    container
}

#[test]
fn test_slot_is_empty_before_activation() {
    let home = Home::default();

    assert!(!home.service.is_injected());
    assert!(matches!(home.service.get(), Err(Error::NotInjected { .. })));
}

#[test]
fn test_construct_fills_declared_fields() {
    let home: Home = construct(&container()).unwrap();

    assert_eq!(home.service.get().unwrap().test(), "42");
    assert_eq!(home.title.get().unwrap(), "Home");
}

#[test]
fn test_activate_existing_instance() {
    let mut home = Home::default();

    activate(&container(), &mut home).unwrap();

    assert!(home.service.is_injected());
    assert!(home.title.is_injected());
}

#[test]
fn test_missing_binding_fails_activation() {
    let container = DiContainer::new();
    container.bind_constant("title", "Home".to_string()).unwrap();

    let err = construct::<Home>(&container).err().expect("activation fails");

    match err {
        Error::UnresolvedDependency { id } => assert_eq!(id, "test-service"),
        other => panic!("Expected UnresolvedDependency, got {other:?}"),
    }
}

#[test]
fn test_injection_resolves_through_child() {
    let child = container().create_child();
    child.bind_constant("title", "Child".to_string()).unwrap();

    let home: Home = construct(&child).unwrap();

    assert_eq!(home.title.get().unwrap(), "Child");
    assert_eq!(home.service.get().unwrap().test(), "42");
}

#[test]
fn test_registry_records_fields_in_order() {
    let table = InjectionRegistry::decorate::<Home>().unwrap();

    let fields = table.fields();

    assert_eq!(
        fields,
        vec![
            ("service", ServiceId::from("test-service")),
            ("title", ServiceId::from("title")),
        ]
    );
    assert!(InjectionRegistry::is_decorated::<Home>());
    assert!(InjectionRegistry::table::<Home>().is_some());
}

#[test]
fn test_type_without_injections() {
    let plain: Plain = construct(&DiContainer::new()).unwrap();
    let _ = plain;

    let table = InjectionRegistry::decorate::<Plain>().unwrap();
    assert!(table.is_empty());
}

#[test]
fn test_class_binding_singleton_shares_instance() {
    let container = container();
    container.bind_class::<Home>().unwrap();

    let first: Arc<Home> = container.resolve_type().unwrap();
    let second: Arc<Home> = container.resolve_type().unwrap();

    assert!(Arc::ptr_eq(&first, &second));
}

#[test]
fn test_class_binding_transient() {
    let container = container();
    container
        .bind(ServiceId::of::<Home>(), Binding::class::<Home>())
        .unwrap();

    let first: Arc<Home> = container.resolve_type().unwrap();
    let second: Arc<Home> = container.resolve_type().unwrap();

    assert!(!Arc::ptr_eq(&first, &second));
}

#[test]
fn test_prefilled_slot() {
    let slot: Inject<String> = Inject::with(Arc::new("ready".to_string()));

    assert_eq!(slot.arc().unwrap().as_str(), "ready");
}
