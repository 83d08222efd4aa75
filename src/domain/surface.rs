/// The page elements the controller knows how to address.
///
/// Each identifier maps onto a stable selector in the page template; the
/// template owns the elements, the controller only looks them up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SurfaceId {
    /// The confirmation modal shown after a plan is picked.
    ConfirmationModal,
    /// Label inside the modal showing the amount due.
    AmountLabel,
    /// Text input the payer types the phone number into.
    PhoneInput,
    /// Status line under the pay control.
    StatusMessage,
    /// The "Pay Now" control inside the modal.
    PayControl,
    /// The prediction-request form.
    HostForm,
    /// The submit control of the prediction-request form.
    SubmitControl,
}

impl SurfaceId {
    pub const fn dom_id(self) -> &'static str {
        match self {
            Self::ConfirmationModal => "paymentModal",
            Self::AmountLabel => "payAmount",
            Self::PhoneInput => "mpesaPhone",
            Self::StatusMessage => "paymentStatus",
            Self::PayControl => "payBtn",
            Self::HostForm => "form",
            Self::SubmitControl => "button[type=\"submit\"]",
        }
    }
}

/// Visual severity of a status message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Positive,
    Negative,
}

impl Severity {
    pub const fn css_class(self) -> &'static str {
        match self {
            Self::Positive => "text-green-500 text-sm font-bold mt-2",
            Self::Negative => "text-red-500 text-sm font-bold mt-2",
        }
    }
}
