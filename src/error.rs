use crate::domain::surface::SurfaceId;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CheckoutError {
    #[error("Surface `{}` is not present on the page", .0.dom_id())]
    MissingSurface(SurfaceId),
    #[error("Invalid phone number: {0:?}")]
    InvalidPhone(String),
    #[error("Validation error: {0}")]
    ValidationError(String),
    #[error("A payment attempt is already in progress")]
    AttemptInProgress,
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Malformed gateway response: {0}")]
    MalformedResponse(#[from] serde_json::Error),
    #[error("Gateway answered with status {status}")]
    Gateway { status: u16, message: Option<String> },
    #[error("Gateway unreachable: {0}")]
    Unreachable(String),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl CheckoutError {
    /// Error text supplied by the gateway itself, if it sent any.
    pub fn gateway_message(&self) -> Option<&str> {
        match self {
            Self::Gateway {
                message: Some(message),
                ..
            } if !message.is_empty() => Some(message),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, CheckoutError>;
