/// Result of one `trigger_mpesa` call, after it has been rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestOutcome {
    /// The phone number failed the format check; nothing was sent.
    ValidationRejected,
    /// The request failed in transit or the gateway refused it.
    TransportOrServerError(String),
    /// The gateway accepted the STK push.
    Accepted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WorkflowState {
    #[default]
    Idle,
    AwaitingConfirmation,
    Validating,
    Dispatching,
    Succeeded,
    Rejected,
    Failed,
    Navigated,
}
