use super::payment::{StkPushAck, StkPushRequest};
use super::surface::{Severity, SurfaceId};
use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// A single page element.
///
/// Mutations take `&self`: elements are shared between the workflow and its
/// timers, so implementations use interior mutability.
pub trait Element: Send + Sync {
    fn text(&self) -> String;
    fn set_text(&self, text: &str);
    fn value(&self) -> String;
    fn set_value(&self, value: &str);
    fn is_enabled(&self) -> bool;
    fn set_enabled(&self, enabled: bool);
    fn is_visible(&self) -> bool;
    fn set_visible(&self, visible: bool);
    fn severity(&self) -> Option<Severity>;
    fn set_severity(&self, severity: Severity);
}

/// Capability lookup over the page the controller is mounted on.
pub trait Page: Send + Sync {
    /// Returns the element, or `None` if the template has not rendered it.
    fn lookup(&self, id: SurfaceId) -> Option<ElementRef>;

    /// Blocking notice shown to the user.
    fn alert(&self, message: &str);
}

pub trait Navigator: Send + Sync {
    /// Full page load of `route`.
    fn navigate(&self, route: &str);
}

#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Asks the gateway to push a PIN prompt to the payer's phone.
    async fn initiate(&self, request: &StkPushRequest) -> Result<StkPushAck>;
}

pub type ElementRef = Arc<dyn Element>;
pub type PageRef = Arc<dyn Page>;
pub type NavigatorRef = Arc<dyn Navigator>;
pub type GatewayRef = Arc<dyn PaymentGateway>;
