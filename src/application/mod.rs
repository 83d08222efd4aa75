//! Application layer: the two controllers mounted on the page.
//!
//! `PaymentWorkflow` runs the STK push checkout from plan selection to the
//! redirect. `SubmissionGuard` keeps the prediction form from being submitted
//! twice. They share nothing but the tokio runtime their timers run on.

pub mod guard;
pub mod workflow;
