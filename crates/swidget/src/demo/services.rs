//! Services bound by the demo swidget

use swidget_domain::value_objects::ServiceId;

/// Service injected into the demo `Home` route
pub trait TestService: Send + Sync {
    /// Text rendered after the greeting
    fn test(&self) -> String;
}

/// Identifier [`TestService`] is bound under
pub fn test_service_id() -> ServiceId {
    ServiceId::of::<dyn TestService>()
}

/// Default implementation, used unless the host shares its own
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultTestService;

impl TestService for DefaultTestService {
    fn test(&self) -> String {
        "from TestService".to_string()
    }
}
