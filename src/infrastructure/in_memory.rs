use crate::domain::payment::{StkPushAck, StkPushRequest};
use crate::domain::ports::{Element, ElementRef, Navigator, Page, PaymentGateway};
use crate::domain::surface::{Severity, SurfaceId};
use crate::error::{CheckoutError, Result};
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use crate::sync::lock;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::Instant;

#[derive(Debug, Clone, Default)]
struct ElementState {
    text: String,
    value: String,
    enabled: bool,
    visible: bool,
    severity: Option<Severity>,
}

/// An element held in memory, starting enabled and visible.
#[derive(Debug, Default)]
pub struct InMemoryElement {
    state: Mutex<ElementState>,
}

impl InMemoryElement {
    pub fn new(text: &str) -> Self {
        Self {
            state: Mutex::new(ElementState {
                text: text.to_string(),
                enabled: true,
                visible: true,
                ..ElementState::default()
            }),
        }
    }

    pub fn hidden(text: &str) -> Self {
        let element = Self::new(text);
        element.set_visible(false);
        element
    }
}

impl Element for InMemoryElement {
    fn text(&self) -> String {
        lock(&self.state).text.clone()
    }

    fn set_text(&self, text: &str) {
        lock(&self.state).text = text.to_string();
    }

    fn value(&self) -> String {
        lock(&self.state).value.clone()
    }

    fn set_value(&self, value: &str) {
        lock(&self.state).value = value.to_string();
    }

    fn is_enabled(&self) -> bool {
        lock(&self.state).enabled
    }

    fn set_enabled(&self, enabled: bool) {
        lock(&self.state).enabled = enabled;
    }

    fn is_visible(&self) -> bool {
        lock(&self.state).visible
    }

    fn set_visible(&self, visible: bool) {
        lock(&self.state).visible = visible;
    }

    fn severity(&self) -> Option<Severity> {
        lock(&self.state).severity
    }

    fn set_severity(&self, severity: Severity) {
        lock(&self.state).severity = Some(severity);
    }
}

/// A page whose elements live in a map keyed by [`SurfaceId`].
///
/// Alerts are recorded instead of blocking so callers can inspect them.
#[derive(Default)]
pub struct InMemoryPage {
    elements: Mutex<HashMap<SurfaceId, ElementRef>>,
    alerts: Mutex<Vec<String>>,
}

impl InMemoryPage {
    /// Creates a page with no elements at all.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a page carrying every element of the checkout template, in the
    /// state the template renders them: modal and status hidden, controls idle.
    pub fn provisioned() -> Self {
        let page = Self::new();
        page.insert(SurfaceId::ConfirmationModal, InMemoryElement::hidden(""));
        page.insert(SurfaceId::AmountLabel, InMemoryElement::new(""));
        page.insert(SurfaceId::PhoneInput, InMemoryElement::new(""));
        page.insert(SurfaceId::StatusMessage, InMemoryElement::hidden(""));
        page.insert(SurfaceId::PayControl, InMemoryElement::new("Pay Now"));
        page.insert(SurfaceId::HostForm, InMemoryElement::new(""));
        page.insert(SurfaceId::SubmitControl, InMemoryElement::new("Predict"));
        page
    }

    pub fn insert(&self, id: SurfaceId, element: InMemoryElement) {
        lock(&self.elements).insert(id, Arc::new(element));
    }

    pub fn remove(&self, id: SurfaceId) {
        lock(&self.elements).remove(&id);
    }

    pub fn alerts(&self) -> Vec<String> {
        lock(&self.alerts).clone()
    }
}

impl Page for InMemoryPage {
    fn lookup(&self, id: SurfaceId) -> Option<ElementRef> {
        lock(&self.elements).get(&id).cloned()
    }

    fn alert(&self, message: &str) {
        tracing::warn!(notice = message, "page alert");
        lock(&self.alerts).push(message.to_string());
    }
}

/// Navigator that records each visit and when it happened.
#[derive(Default)]
pub struct RecordingNavigator {
    visits: Mutex<Vec<(String, Instant)>>,
}

impl RecordingNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn routes(&self) -> Vec<String> {
        lock(&self.visits).iter().map(|(route, _)| route.clone()).collect()
    }

    pub fn visits(&self) -> Vec<(String, Instant)> {
        lock(&self.visits).clone()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, route: &str) {
        lock(&self.visits).push((route.to_string(), Instant::now()));
    }
}

/// A canned gateway answer.
#[derive(Debug, Clone, PartialEq)]
pub enum ScriptedReply {
    Accept,
    Refuse { status: u16, error: Option<String> },
    Unreachable,
}

/// Gateway that answers from a script and records every request it receives.
///
/// Once the script runs out, every further call gets the fallback reply.
pub struct InMemoryGateway {
    script: Mutex<VecDeque<ScriptedReply>>,
    fallback: ScriptedReply,
    latency: Duration,
    requests: Mutex<Vec<StkPushRequest>>,
}

impl InMemoryGateway {
    pub fn new(fallback: ScriptedReply) -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            fallback,
            latency: Duration::ZERO,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn accepting() -> Self {
        Self::new(ScriptedReply::Accept)
    }

    pub fn with_script(self, replies: impl IntoIterator<Item = ScriptedReply>) -> Self {
        lock(&self.script).extend(replies);
        self
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn requests(&self) -> Vec<StkPushRequest> {
        lock(&self.requests).clone()
    }

    pub fn dispatch_count(&self) -> usize {
        lock(&self.requests).len()
    }
}

#[async_trait]
impl PaymentGateway for InMemoryGateway {
    async fn initiate(&self, request: &StkPushRequest) -> Result<StkPushAck> {
        lock(&self.requests).push(request.clone());
        let reply = lock(&self.script)
            .pop_front()
            .unwrap_or_else(|| self.fallback.clone());

        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        match reply {
            ScriptedReply::Accept => Ok(StkPushAck {
                message: Some("Success".to_string()),
                detail: Some("Check phone for PIN.".to_string()),
            }),
            ScriptedReply::Refuse { status, error } => Err(CheckoutError::Gateway {
                status,
                message: error,
            }),
            ScriptedReply::Unreachable => Err(CheckoutError::Unreachable(
                "connection refused".to_string(),
            )),
        }
    }
}
