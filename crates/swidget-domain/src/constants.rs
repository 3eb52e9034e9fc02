//! Domain constants

/// Manifest format understood by this host
pub const BUNDLE_FORMAT_VERSION: u32 = 1;

/// Route path rendered when the host does not choose one
pub const DEFAULT_ROUTE_PATH: &str = "/";

/// Largest bundle accepted by default (2 MiB)
pub const DEFAULT_MAX_BUNDLE_BYTES: usize = 2 * 1024 * 1024;

/// Bound on back-to-back notification rounds caused by updates issued from
/// inside subscriber callbacks
pub const MAX_CONTEXT_NOTIFY_ROUNDS: usize = 8;
