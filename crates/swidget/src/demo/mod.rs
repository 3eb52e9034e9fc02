//! Demo swidget and host
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`services`] | `TestService`, the service the swidget injects |
//! | [`my_app`] | The "My-App" swidget: entry point, `init`, routes |
//! | [`host`] | Host page with two toggles mounting the same swidget |

pub mod host;
pub mod my_app;
pub mod services;

pub use host::{DEMO_BUNDLE_URL, HostHome, Toggle, demo_runtime};
pub use my_app::{ContextWrapper, Home, MY_APP_ENTRY, demo_manifest, my_app_entry};
pub use services::{DefaultTestService, TestService, test_service_id};
