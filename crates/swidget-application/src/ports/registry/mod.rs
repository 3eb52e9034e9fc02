//! Registry System
//!
//! Compile-time registration of bundle sources and swidget entry points,
//! discovered at runtime through `linkme` distributed slices.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                      Registration Flow                          │
//! ├─────────────────────────────────────────────────────────────────┤
//! │                                                                 │
//! │  1. Provider defines:  #[linkme::distributed_slice(SLICE)]      │
//! │                        static ENTRY: Entry = ...                │
//! │                              ↓                                  │
//! │  2. Registry declares: #[linkme::distributed_slice]             │
//! │                        pub static SLICE: [Entry] = [..]         │
//! │                              ↓                                  │
//! │  3. Resolver queries:  SLICE.iter()                             │
//! │                              ↓                                  │
//! │  4. Lookup selects:    "https://..."   → HttpBundleSource       │
//! │                        entry "my-app"  → My-App entry point     │
//! │                                                                 │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ### Registering a bundle source (in swidget-providers)
//!
//! ```ignore
//! use swidget_application::ports::registry::{BundleSourceEntry, BUNDLE_SOURCES};
//!
//! #[linkme::distributed_slice(BUNDLE_SOURCES)]
//! static HTTP_SOURCE: BundleSourceEntry = BundleSourceEntry {
//!     name: "http",
//!     schemes: &["http", "https"],
//!     description: "Fetch bundles over HTTP(S)",
//!     factory: |config| Ok(Arc::new(HttpBundleSource::from_config(config)?)),
//! };
//! ```
//!
//! ### Exporting an entry point (in a swidget crate)
//!
//! ```ignore
//! use swidget_application::ports::registry::{SwidgetEntryRegistration, SWIDGET_ENTRIES};
//!
//! #[linkme::distributed_slice(SWIDGET_ENTRIES)]
//! static MY_APP: SwidgetEntryRegistration = SwidgetEntryRegistration {
//!     name: "my-app",
//!     description: "Demo application swidget",
//!     factory: || Arc::new(my_app_entry()),
//! };
//! ```

pub mod bundle_source;
pub mod entry;

pub use bundle_source::{
    BUNDLE_SOURCES, BundleSourceConfig, BundleSourceEntry, list_bundle_sources,
    resolve_bundle_source, resolve_bundle_source_for_url, url_scheme,
};
pub use entry::{SWIDGET_ENTRIES, SwidgetEntryRegistration, find_linked_entry, list_linked_entries};
