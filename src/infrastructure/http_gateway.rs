use crate::config::CheckoutConfig;
use crate::domain::payment::{StkPushAck, StkPushRequest};
use crate::domain::ports::PaymentGateway;
use crate::error::{CheckoutError, Result};
use async_trait::async_trait;
use reqwest::multipart::Form;
use serde_json::Value;

/// Talks to the STK push initiation endpoint over HTTP.
///
/// The request is a multipart form with `phone_number` and `amount`. The reply
/// must be JSON whatever the status, but any JSON value will do. A 2xx status
/// means the push was accepted; anything else is reported as
/// [`CheckoutError::Gateway`] carrying the reply's `error` text when the reply
/// is an object with a string `error` field.
pub struct HttpGateway {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpGateway {
    pub fn new(config: &CheckoutConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self {
            client,
            endpoint: config.endpoint_url(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl PaymentGateway for HttpGateway {
    async fn initiate(&self, request: &StkPushRequest) -> Result<StkPushAck> {
        let form = request
            .form_fields()
            .into_iter()
            .fold(Form::new(), |form, (name, value)| form.text(name, value));

        tracing::debug!(endpoint = %self.endpoint, "posting stk push");
        let response = self.client.post(&self.endpoint).multipart(form).send().await?;
        let status = response.status();
        let body = response.bytes().await?;
        let reply: Value = serde_json::from_slice(&body)?;

        if !status.is_success() {
            return Err(CheckoutError::Gateway {
                status: status.as_u16(),
                message: reply.get("error").and_then(Value::as_str).map(str::to_owned),
            });
        }

        Ok(acknowledgement(reply))
    }
}

/// Reads the optional `message` and `detail` strings out of an accepting reply.
fn acknowledgement(reply: Value) -> StkPushAck {
    serde_json::from_value(reply).unwrap_or_default()
}
