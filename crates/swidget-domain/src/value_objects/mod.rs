//! Value objects
//!
//! Immutable types shared by every layer: identifiers, the render tree, bundle
//! manifests and the props crossing the host/swidget boundary.

pub mod bundle;
pub mod module_key;
pub mod node;
pub mod props;
pub mod service_id;

pub use bundle::{Bundle, BundleManifest, SwidgetMetadata};
pub use module_key::ModuleKey;
pub use node::Node;
pub use props::{Prop, Props};
pub use service_id::{ServiceId, service_ids};
