//! Use cases
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`module_cache`] | Per-key module records, single fetch per key |
//! | [`loader`] | Mount/unmount orchestration |
//! | [`mount_registry`] | Host regions and isolated mount points |
//! | [`application`] | `init` hook and root component bootstrap |
//! | [`routes`] | Route table and `Route` component |

pub mod application;
pub mod loader;
pub mod module_cache;
pub mod mount_registry;
pub mod routes;

pub use application::{Application, ApplicationBuilder, InitHook};
pub use loader::{MountDirective, MountedSwidget, SwidgetLoader};
pub use module_cache::{EvictionPolicy, ModuleCache, ModuleLease, ModuleRecordInfo, ModuleState};
pub use mount_registry::{MountPointId, MountRegistry};
pub use routes::{Route, RouteEntry, RouteMatch, RouteTable};
