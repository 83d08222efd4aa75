use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";

/// Settings for the payment workflow and its HTTP gateway.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckoutConfig {
    /// Origin the endpoint and the profile route are resolved against.
    pub base_url: String,
    /// Path of the STK push initiation endpoint.
    pub stk_push_path: String,
    /// Route loaded after an accepted request.
    pub profile_route: String,
    /// Currency code shown in front of the amount.
    pub currency: String,
    /// Delay between an accepted request and the redirect.
    pub redirect_delay: Duration,
    /// Total timeout of one gateway call.
    pub request_timeout: Duration,
}

impl Default for CheckoutConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            stk_push_path: "/mpesa/stkpush".to_string(),
            profile_route: "/profile".to_string(),
            currency: "KES".to_string(),
            redirect_delay: Duration::from_secs(5),
            request_timeout: Duration::from_secs(30),
        }
    }
}

impl CheckoutConfig {
    pub fn endpoint_url(&self) -> String {
        join_url(&self.base_url, &self.stk_push_path)
    }

    pub fn profile_url(&self) -> String {
        join_url(&self.base_url, &self.profile_route)
    }
}

/// Settings for the submit guard on the prediction form.
#[derive(Debug, Clone, PartialEq)]
pub struct GuardConfig {
    /// How long the submit control stays busy before it is released.
    pub release_after: Duration,
    pub busy_label: String,
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            release_after: Duration::from_secs(15),
            busy_label: "Analyzing...".to_string(),
        }
    }
}

pub(crate) fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}
