//! Service identifiers

use std::borrow::Cow;
use std::fmt;

/// Identifier a binding is registered under
///
/// Identifiers are plain strings. [`ServiceId::of`] derives one from a type
/// name for type-keyed registrations.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ServiceId(Cow<'static, str>);

impl ServiceId {
    /// Identifier backed by a static string
    pub const fn from_static(id: &'static str) -> Self {
        Self(Cow::Borrowed(id))
    }

    /// Identifier backed by an owned string
    pub fn new<S: Into<String>>(id: S) -> Self {
        Self(Cow::Owned(id.into()))
    }

    /// Identifier derived from a type
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self(Cow::Borrowed(std::any::type_name::<T>()))
    }

    /// Borrow as `&str`
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ServiceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&'static str> for ServiceId {
    fn from(id: &'static str) -> Self {
        Self::from_static(id)
    }
}

impl From<String> for ServiceId {
    fn from(id: String) -> Self {
        Self::new(id)
    }
}

impl From<&ServiceId> for ServiceId {
    fn from(id: &ServiceId) -> Self {
        id.clone()
    }
}

/// Well-known identifiers
pub mod service_ids {
    use super::ServiceId;

    /// The application's `RouteTable`
    pub const ROUTES: ServiceId = ServiceId::from_static("routes");

    /// Build-time configuration handed to the entry point
    pub const CONFIG: ServiceId = ServiceId::from_static("config");

    /// Name of the running application instance
    pub const APP_NAME: ServiceId = ServiceId::from_static("app-name");

    /// Name declared by the bundle an instance was loaded from
    pub const MODULE_NAME: ServiceId = ServiceId::from_static("module-name");
}
