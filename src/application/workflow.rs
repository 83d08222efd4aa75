use crate::config::CheckoutConfig;
use crate::domain::outcome::{RequestOutcome, WorkflowState};
use crate::domain::payment::{Amount, PendingPayment, StkPushRequest};
use crate::domain::phone::PhoneNumber;
use crate::domain::ports::{ElementRef, GatewayRef, NavigatorRef, Page, PageRef};
use crate::domain::surface::{Severity, SurfaceId};
use crate::error::{CheckoutError, Result};
use crate::sync::lock;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tokio::runtime::Handle;
use tokio::task::{AbortHandle, JoinHandle};
use tokio::time::Instant;

pub const PAY_IDLE_LABEL: &str = "Pay Now";
pub const PAY_BUSY_LABEL: &str = "Sending...";
pub const REFRESH_NOTICE: &str = "Payment system initializing... please refresh.";
pub const INVALID_PHONE_MESSAGE: &str = "❌ Invalid Phone Number";
pub const ACCEPTED_MESSAGE: &str = "✅ Request Sent! Check your phone to enter PIN.";
pub const GENERIC_FAILURE: &str = "Payment Failed";

/// Elements `trigger_mpesa` works on, looked up once per attempt.
struct CheckoutSurfaces {
    phone: ElementRef,
    status: ElementRef,
    pay: ElementRef,
}

/// The redirect timer of the last accepted attempt.
///
/// The abort handle stays in the slot for as long as the timer may fire, so a
/// new attempt can cancel it even while someone is waiting on `task`.
struct ScheduledRedirect {
    abort: AbortHandle,
    task: Option<JoinHandle<()>>,
}

/// Releases the attempt slot however the attempt ends.
struct AttemptSlot<'a>(&'a AtomicBool);

impl Drop for AttemptSlot<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Drives a single STK push attempt from plan selection to redirect.
///
/// The workflow owns no payment state of its own: [`open_payment_modal`]
/// returns a [`PendingPayment`] and the caller passes it back into
/// [`trigger_mpesa`]. What it does own is the attempt slot, which lets only
/// one dispatch run at a time, and the handle of the redirect timer scheduled
/// by the last accepted attempt.
///
/// [`open_payment_modal`]: PaymentWorkflow::open_payment_modal
/// [`trigger_mpesa`]: PaymentWorkflow::trigger_mpesa
pub struct PaymentWorkflow {
    page: PageRef,
    gateway: GatewayRef,
    navigator: NavigatorRef,
    config: CheckoutConfig,
    state: Arc<Mutex<WorkflowState>>,
    in_flight: AtomicBool,
    redirect: Mutex<Option<ScheduledRedirect>>,
    runtime: Handle,
}

impl PaymentWorkflow {
    /// Creates a new `PaymentWorkflow` in the `Idle` state.
    ///
    /// # Arguments
    ///
    /// * `page` - Lookup for the modal, status line and controls.
    /// * `gateway` - Where STK push requests are sent.
    /// * `navigator` - Performs the redirect after an accepted request.
    /// * `config` - Currency, redirect route and delay.
    ///
    /// # Panics
    ///
    /// Panics when called outside a tokio runtime. The redirect timer is
    /// spawned onto the runtime that was current here.
    pub fn new(
        page: PageRef,
        gateway: GatewayRef,
        navigator: NavigatorRef,
        config: CheckoutConfig,
    ) -> Self {
        Self {
            page,
            gateway,
            navigator,
            config,
            state: Arc::new(Mutex::new(WorkflowState::Idle)),
            in_flight: AtomicBool::new(false),
            redirect: Mutex::new(None),
            runtime: Handle::current(),
        }
    }

    pub fn state(&self) -> WorkflowState {
        *lock(&self.state)
    }

    fn set_state(&self, state: WorkflowState) {
        *lock(&self.state) = state;
    }

    /// Builds the payment context for `plan` and shows the confirmation modal.
    ///
    /// If the modal or its amount label has not been rendered yet, the user is
    /// told to refresh and [`CheckoutError::MissingSurface`] is returned.
    pub fn open_payment_modal(
        &self,
        plan: impl Into<String>,
        amount: Amount,
    ) -> Result<PendingPayment> {
        let pending = PendingPayment::new(plan, amount)?;

        let modal = self.require(SurfaceId::ConfirmationModal)?;
        let label = self.require(SurfaceId::AmountLabel)?;

        label.set_text(&format!("{} {}", self.config.currency, pending.amount()));
        modal.set_visible(true);
        self.set_state(WorkflowState::AwaitingConfirmation);
        tracing::debug!(plan = pending.plan(), amount = %pending.amount(), "payment modal opened");

        Ok(pending)
    }

    /// Hides the confirmation modal. Does nothing if it is absent or hidden.
    pub fn close_payment_modal(&self) {
        if let Some(modal) = self.page.lookup(SurfaceId::ConfirmationModal) {
            modal.set_visible(false);
        }
    }

    /// Validates the phone input and sends the STK push for `pending`.
    ///
    /// Gateway failures never escape as errors: they are rendered into the
    /// status line and returned as [`RequestOutcome::TransportOrServerError`].
    /// The only errors are a page missing its checkout elements and a second
    /// call while an attempt is still in flight.
    pub async fn trigger_mpesa(&self, pending: &PendingPayment) -> Result<RequestOutcome> {
        let surfaces = self.checkout_surfaces()?;

        if self.in_flight.swap(true, Ordering::AcqRel) {
            tracing::warn!(plan = pending.plan(), "payment attempt already in flight");
            return Err(CheckoutError::AttemptInProgress);
        }
        let _slot = AttemptSlot(&self.in_flight);
        self.cancel_navigation();

        self.set_state(WorkflowState::Validating);
        let phone = match PhoneNumber::parse(&surfaces.phone.value()) {
            Ok(phone) => phone,
            Err(e) => {
                tracing::debug!(error = %e, "phone number rejected");
                render_status(&surfaces.status, INVALID_PHONE_MESSAGE, Severity::Negative);
                self.set_state(WorkflowState::Rejected);
                return Ok(RequestOutcome::ValidationRejected);
            }
        };

        surfaces.pay.set_enabled(false);
        surfaces.pay.set_text(PAY_BUSY_LABEL);
        surfaces.status.set_visible(false);
        self.set_state(WorkflowState::Dispatching);

        let request = StkPushRequest::new(phone, pending.amount());
        tracing::info!(
            plan = pending.plan(),
            amount = %pending.amount(),
            msisdn = %request.phone_number.msisdn(),
            "dispatching stk push"
        );

        match self.gateway.initiate(&request).await {
            Ok(ack) => {
                tracing::info!(reply = ?ack.message, detail = ?ack.detail, "stk push accepted");
                render_status(&surfaces.status, ACCEPTED_MESSAGE, Severity::Positive);
                self.set_state(WorkflowState::Succeeded);
                self.schedule_navigation();
                Ok(RequestOutcome::Accepted)
            }
            Err(e) => {
                tracing::error!(error = %e, plan = pending.plan(), "stk push failed");
                let message = e.gateway_message().unwrap_or(GENERIC_FAILURE).to_string();
                render_status(
                    &surfaces.status,
                    &format!("❌ Error: {message}"),
                    Severity::Negative,
                );
                surfaces.pay.set_enabled(true);
                surfaces.pay.set_text(PAY_IDLE_LABEL);
                self.set_state(WorkflowState::Failed);
                Ok(RequestOutcome::TransportOrServerError(message))
            }
        }
    }

    /// Waits for the redirect scheduled by the last accepted attempt.
    ///
    /// Returns `false` if nothing was scheduled, the redirect was cancelled,
    /// or another caller is already waiting on it. A new attempt still
    /// cancels the redirect while this waits.
    pub async fn wait_for_navigation(&self) -> bool {
        let task = lock(&self.redirect)
            .as_mut()
            .and_then(|redirect| redirect.task.take());
        match task {
            Some(task) => task.await.is_ok(),
            None => false,
        }
    }

    fn schedule_navigation(&self) {
        let deadline = Instant::now() + self.config.redirect_delay;
        let navigator = Arc::clone(&self.navigator);
        let state = Arc::clone(&self.state);
        let route = self.config.profile_route.clone();

        let task = self.runtime.spawn(async move {
            tokio::time::sleep_until(deadline).await;
            tracing::info!(route = %route, "redirecting after accepted payment");
            navigator.navigate(&route);
            *lock(&state) = WorkflowState::Navigated;
        });
        let redirect = ScheduledRedirect {
            abort: task.abort_handle(),
            task: Some(task),
        };

        if let Some(previous) = lock(&self.redirect).replace(redirect) {
            previous.abort.abort();
        }
    }

    fn cancel_navigation(&self) {
        if let Some(pending) = lock(&self.redirect).take() {
            tracing::debug!("cancelling redirect from previous attempt");
            pending.abort.abort();
        }
    }

    fn checkout_surfaces(&self) -> Result<CheckoutSurfaces> {
        Ok(CheckoutSurfaces {
            phone: self.require(SurfaceId::PhoneInput)?,
            status: self.require(SurfaceId::StatusMessage)?,
            pay: self.require(SurfaceId::PayControl)?,
        })
    }

    fn require(&self, id: SurfaceId) -> Result<ElementRef> {
        lookup_or_alert(self.page.as_ref(), id)
    }
}

fn lookup_or_alert(page: &dyn Page, id: SurfaceId) -> Result<ElementRef> {
    page.lookup(id).ok_or_else(|| {
        page.alert(REFRESH_NOTICE);
        CheckoutError::MissingSurface(id)
    })
}

fn render_status(status: &ElementRef, message: &str, severity: Severity) {
    status.set_text(message);
    status.set_severity(severity);
    status.set_visible(true);
}
