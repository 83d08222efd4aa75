#![allow(dead_code)]

use axum::Router;
use axum::extract::{Multipart, State};
use axum::http::{StatusCode, header};
use axum::response::IntoResponse;
use axum::routing::post;
use rust_decimal_macros::dec;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use stkpay::application::workflow::PaymentWorkflow;
use stkpay::config::CheckoutConfig;
use stkpay::domain::payment::{Amount, PendingPayment};
use stkpay::domain::ports::{ElementRef, GatewayRef, Page};
use stkpay::domain::surface::SurfaceId;
use stkpay::infrastructure::in_memory::{InMemoryPage, RecordingNavigator};
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::timeout;

pub struct Checkout {
    pub page: Arc<InMemoryPage>,
    pub navigator: Arc<RecordingNavigator>,
    pub workflow: PaymentWorkflow,
}

impl Checkout {
    pub fn new(gateway: GatewayRef) -> Self {
        Self::with_config(gateway, CheckoutConfig::default())
    }

    pub fn with_config(gateway: GatewayRef, config: CheckoutConfig) -> Self {
        let page = Arc::new(InMemoryPage::provisioned());
        let navigator = Arc::new(RecordingNavigator::new());
        let workflow = PaymentWorkflow::new(page.clone(), gateway, navigator.clone(), config);
        Self {
            page,
            navigator,
            workflow,
        }
    }

    pub fn element(&self, id: SurfaceId) -> ElementRef {
        self.page.lookup(id).unwrap()
    }

    pub fn type_phone(&self, phone: &str) {
        self.element(SurfaceId::PhoneInput).set_value(phone);
    }

    /// Opens the modal for the "pro" plan at 500.
    pub fn open_pro(&self) -> PendingPayment {
        self.workflow
            .open_payment_modal("pro", Amount::new(dec!(500)).unwrap())
            .unwrap()
    }
}

/// Multipart fields of one request, by field name.
pub type Fields = HashMap<String, String>;

#[derive(Clone)]
struct StubReply {
    status: StatusCode,
    body: &'static str,
    fields: mpsc::UnboundedSender<Fields>,
}

/// An STK push endpoint answering every request with a fixed status and body.
pub struct StubEndpoint {
    pub base_url: String,
    fields: mpsc::UnboundedReceiver<Fields>,
    server: JoinHandle<()>,
}

impl StubEndpoint {
    pub async fn spawn(status: StatusCode, body: &'static str) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let reply = StubReply {
            status,
            body,
            fields: tx,
        };
        let app = Router::new()
            .route("/mpesa/stkpush", post(stk_push))
            .with_state(reply);

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        let server = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url,
            fields: rx,
            server,
        }
    }

    /// Fields of the next request the endpoint received.
    ///
    /// Gives up after a few seconds so a caller that never connects fails the
    /// test instead of hanging it.
    pub async fn received(&mut self) -> Fields {
        timeout(Duration::from_secs(10), self.fields.recv())
            .await
            .expect("no request reached the stub endpoint")
            .expect("stub endpoint stopped")
    }
}

impl Drop for StubEndpoint {
    fn drop(&mut self) {
        self.server.abort();
    }
}

async fn stk_push(State(reply): State<StubReply>, mut multipart: Multipart) -> impl IntoResponse {
    let mut fields = Fields::new();
    while let Ok(Some(field)) = multipart.next_field().await {
        let Some(name) = field.name().map(str::to_owned) else {
            continue;
        };
        if let Ok(value) = field.text().await {
            fields.insert(name, value);
        }
    }
    let _ = reply.fields.send(fields);

    (
        reply.status,
        [(header::CONTENT_TYPE, "application/json")],
        reply.body,
    )
}
