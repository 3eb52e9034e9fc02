//! Mount registry tests

use swidget_application::{MountPointId, MountRegistry};
use swidget_domain::error::Error;
use swidget_domain::value_objects::{ModuleKey, Node};

#[test]
fn test_mount_points_are_isolated() {
    let mounts = MountRegistry::new();
    mounts.create_region("main");
    let (a, b) = (MountPointId::new(), MountPointId::new());
    mounts.attach("main", a).unwrap();
    mounts.attach("main", b).unwrap();

    mounts.render("main", a, Node::text("A")).unwrap();
    mounts.render("main", b, Node::text("B")).unwrap();
    assert_eq!(mounts.region_text("main").unwrap(), "AB");

    assert!(mounts.detach("main", a));
    assert_eq!(mounts.region_text("main").unwrap(), "B");
    assert_eq!(mounts.node("main", b), Some(Node::text("B")));
    assert!(mounts.node("main", a).is_none());
    assert!(!mounts.detach("main", a));
}

#[test]
fn test_missing_region() {
    let mounts = MountRegistry::new();

    let err = mounts.attach("sidebar", MountPointId::new()).unwrap_err();

    assert!(matches!(err, Error::MountTargetUnavailable { ref target } if target == "sidebar"));
    assert!(mounts.region_nodes("sidebar").is_err());
    assert_eq!(mounts.mount_count("sidebar"), 0);
}

#[test]
fn test_render_into_detached_point_fails() {
    let mounts = MountRegistry::new();
    mounts.create_region("main");

    assert!(mounts.render("main", MountPointId::new(), Node::text("x")).is_err());
}

#[test]
fn test_fallback_is_replaced_and_cleared() {
    let mounts = MountRegistry::new();
    mounts.create_region("main");
    let key = ModuleKey::new("swidget", "s1");

    mounts.show_fallback("main", &key, Node::text("loading failed")).unwrap();
    mounts.show_fallback("main", &key, Node::text("still failing")).unwrap();

    assert_eq!(mounts.mount_count("main"), 1);
    assert_eq!(mounts.region_text("main").unwrap(), "still failing");
    assert!(mounts.clear_fallback("main", &key));
    assert_eq!(mounts.mount_count("main"), 0);
}

#[test]
fn test_regions_and_markup() {
    let mounts = MountRegistry::new();
    mounts.create_region("main");
    mounts.create_region("aside");
    let id = MountPointId::new();
    mounts.attach("main", id).unwrap();
    mounts
        .render("main", id, Node::element("h1").with_child(Node::text("Hi")))
        .unwrap();

    assert_eq!(mounts.regions(), vec!["aside".to_string(), "main".to_string()]);
    assert_eq!(mounts.region_markup("main").unwrap(), "<h1>Hi</h1>");
    // Re-creating keeps the contents
    mounts.create_region("main");
    assert_eq!(mounts.mount_count("main"), 1);
    assert!(mounts.remove_region("main"));
    assert!(!mounts.has_region("main"));
}
