//! Unit tests for the DI container
//!
//! Covers binding kinds, scopes, parent/child resolution and strict mode.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use swidget_domain::di::{Binding, BindingKind, ContainerOptions, DiContainer, Scope};
use swidget_domain::error::{Error, Result};
use swidget_domain::value_objects::ServiceId;

trait Greeter: Send + Sync {
    fn greet(&self) -> String;
}

struct English;

impl Greeter for English {
    fn greet(&self) -> String {
        "hello".to_string()
    }
}

#[derive(Debug)]
struct Counter(usize);

#[test]
fn test_constant_resolves_to_same_value() {
    let container = DiContainer::new();
    container.bind_constant("answer", 42_u32).unwrap();

    let first: Arc<u32> = container.resolve(&"answer".into()).unwrap();
    let second: Arc<u32> = container.resolve(&"answer".into()).unwrap();

    assert_eq!(*first, 42);
    assert!(Arc::ptr_eq(&first, &second));
}

#[test]
fn test_trait_object_binding() {
    let container = DiContainer::new();
    let greeter: Arc<dyn Greeter> = Arc::new(English);
    container
        .bind("greeter", Binding::constant_arc(greeter))
        .unwrap();

    let resolved: Arc<dyn Greeter> = container.resolve(&"greeter".into()).unwrap();

    assert_eq!(resolved.greet(), "hello");
}

#[test]
fn test_factory_is_transient_by_default() {
    let container = DiContainer::new();
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    container
        .bind_factory("counter", move |_| -> Result<Arc<Counter>> {
            Ok(Arc::new(Counter(counter.fetch_add(1, Ordering::SeqCst))))
        })
        .unwrap();

    let first: Arc<Counter> = container.resolve(&"counter".into()).unwrap();
    let second: Arc<Counter> = container.resolve(&"counter".into()).unwrap();

    assert!(!Arc::ptr_eq(&first, &second));
    assert_eq!((first.0, second.0), (0, 1));
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[test]
fn test_singleton_factory_constructs_once() {
    let container = DiContainer::new();
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let binding = Binding::factory(move |_| -> Result<Arc<Counter>> {
        counter.fetch_add(1, Ordering::SeqCst);
        Ok(Arc::new(Counter(7)))
    })
    .in_singleton_scope();
    assert_eq!(binding.kind(), BindingKind::Factory);
    assert_eq!(binding.scope(), Scope::Singleton);
    container.bind("counter", binding).unwrap();

    let first: Arc<Counter> = container.resolve(&"counter".into()).unwrap();
    let second: Arc<Counter> = container.resolve(&"counter".into()).unwrap();

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_constant_ignores_transient_scope() {
    let binding = Binding::constant(1_u8).in_transient_scope();
    assert_eq!(binding.scope(), Scope::Singleton);
    assert!(binding.is_resolved());
}

#[test]
fn test_child_falls_back_to_parent() {
    let parent = DiContainer::new();
    parent.bind_constant("shared", "from parent".to_string()).unwrap();
    let child = parent.create_child();

    let value: Arc<String> = child.resolve(&"shared".into()).unwrap();

    assert_eq!(value.as_str(), "from parent");
    assert_eq!(child.depth(), 1);
    assert!(child.parent().is_some_and(|p| p.same_container(&parent)));
    assert!(child.is_bound(&"shared".into()));
    assert!(!child.is_bound_locally(&"shared".into()));
}

#[test]
fn test_child_binding_shadows_parent() {
    let parent = DiContainer::new();
    parent.bind_constant("name", "parent".to_string()).unwrap();
    let child = parent.create_child();
    child.bind_constant("name", "child".to_string()).unwrap();

    let from_child: Arc<String> = child.resolve(&"name".into()).unwrap();
    let from_parent: Arc<String> = parent.resolve(&"name".into()).unwrap();

    assert_eq!(from_child.as_str(), "child");
    assert_eq!(from_parent.as_str(), "parent");
}

#[test]
fn test_siblings_are_isolated() {
    let parent = DiContainer::new();
    let first = parent.create_child();
    let second = parent.create_child();
    first.bind_constant("only-first", 1_u8).unwrap();

    assert!(first.is_bound(&"only-first".into()));
    assert!(!second.is_bound(&"only-first".into()));
    assert!(!parent.is_bound(&"only-first".into()));
}

#[test]
fn test_parent_factory_resolves_in_parent() {
    let parent = DiContainer::new();
    parent.bind_constant("dep", "parent dep".to_string()).unwrap();
    parent
        .bind_factory("service", |container| -> Result<Arc<String>> {
            let dep: Arc<String> = container.resolve(&"dep".into())?;
            Ok(Arc::new(format!("service with {dep}")))
        })
        .unwrap();
    let child = parent.create_child();
    child.bind_constant("dep", "child dep".to_string()).unwrap();

    let service: Arc<String> = child.resolve(&"service".into()).unwrap();

    assert_eq!(service.as_str(), "service with parent dep");
}

#[test]
fn test_unresolved_dependency() {
    let container = DiContainer::new().create_child();

    let err = container.resolve::<u32>(&"missing".into()).unwrap_err();

    match err {
        Error::UnresolvedDependency { id } => assert_eq!(id, "missing"),
        other => panic!("Expected UnresolvedDependency, got {other:?}"),
    }
    assert!(
        container
            .try_resolve::<u32>(&"missing".into())
            .unwrap()
            .is_none()
    );
}

#[test]
fn test_type_mismatch() {
    let container = DiContainer::new();
    container.bind_constant("number", 1_u32).unwrap();

    let err = container.resolve::<String>(&"number".into()).unwrap_err();

    assert!(matches!(err, Error::ServiceTypeMismatch { .. }), "{err:?}");
    // A mismatch is an error, not an absence
    assert!(container.try_resolve::<String>(&"number".into()).is_err());
}

#[test]
fn test_rebinding_replaces_when_not_strict() {
    let container = DiContainer::new();
    container.bind_constant("value", 1_u32).unwrap();
    container.bind_constant("value", 2_u32).unwrap();

    let value: Arc<u32> = container.resolve(&"value".into()).unwrap();

    assert_eq!(*value, 2);
}

#[test]
fn test_strict_mode_rejects_duplicates() {
    let container = DiContainer::with_options(ContainerOptions::strict());
    container.bind_constant("value", 1_u32).unwrap();

    let err = container.bind_constant("value", 2_u32).unwrap_err();

    assert!(matches!(err, Error::DuplicateBinding { ref id } if id == "value"));
    // Children inherit strict mode but may still shadow parent bindings
    let child = container.create_child();
    assert!(child.options().strict);
    child.bind_constant("value", 3_u32).unwrap();
}

#[test]
fn test_unbind_only_touches_local_registry() {
    let parent = DiContainer::new();
    parent.bind_constant("value", 1_u32).unwrap();
    let child = parent.create_child();
    child.bind_constant("value", 2_u32).unwrap();

    assert!(child.unbind(&"value".into()));
    assert!(!child.unbind(&"value".into()));

    let value: Arc<u32> = child.resolve(&"value".into()).unwrap();
    assert_eq!(*value, 1);
}

#[test]
fn test_circular_dependency_is_reported() {
    let container = DiContainer::new();
    container
        .bind_factory("a", |c| -> Result<Arc<u32>> { c.resolve(&ServiceId::from("b")) })
        .unwrap();
    container
        .bind_factory("b", |c| -> Result<Arc<u32>> { c.resolve(&ServiceId::from("a")) })
        .unwrap();

    let err = container.resolve::<u32>(&"a".into()).unwrap_err();

    match err {
        Error::CircularDependency { path } => assert_eq!(path, vec!["a", "b", "a"]),
        other => panic!("Expected CircularDependency, got {other:?}"),
    }
    // The guard unwinds: unrelated resolutions keep working
    container.bind_constant("c", 3_u32).unwrap();
    assert_eq!(*container.resolve::<u32>(&"c".into()).unwrap(), 3);
}

#[test]
fn test_identifiers_are_sorted() {
    let container = DiContainer::new();
    container.bind_constant("zeta", 1_u8).unwrap();
    container.bind_constant("alpha", 2_u8).unwrap();

    let ids: Vec<String> = container
        .identifiers()
        .iter()
        .map(|id| id.as_str().to_string())
        .collect();

    assert_eq!(ids, vec!["alpha", "zeta"]);
}
