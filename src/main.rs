use clap::{Args, Parser, Subcommand};
use miette::{IntoDiagnostic, Result, miette};
use std::io;
use std::sync::Arc;
use std::time::Duration;
use stkpay::application::workflow::PaymentWorkflow;
use stkpay::config::{CheckoutConfig, DEFAULT_BASE_URL};
use stkpay::domain::outcome::RequestOutcome;
use stkpay::domain::payment::Amount;
use stkpay::domain::phone::PhoneNumber;
use stkpay::domain::ports::{GatewayRef, Page};
use stkpay::domain::surface::SurfaceId;
use stkpay::infrastructure::http_gateway::HttpGateway;
use stkpay::infrastructure::in_memory::{InMemoryGateway, InMemoryPage};
use stkpay::interfaces::console::navigator::ConsoleNavigator;
use stkpay::interfaces::console::status_writer::StatusWriter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Log filter directive, e.g. `info` or `stkpay=debug`
    #[arg(long, global = true, env = "STKPAY_LOG", default_value = "warn")]
    log: String,
}

#[derive(Subcommand)]
enum Command {
    /// Request an M-Pesa STK push for a plan and follow the redirect
    Pay(PayArgs),
    /// Check a phone number against the accepted mobile formats
    Validate {
        /// Phone number as the payer would type it
        phone: String,
    },
}

#[derive(Args)]
struct PayArgs {
    /// Plan being paid for
    #[arg(long)]
    plan: String,

    /// Amount due, sent exactly as given
    #[arg(long, value_parser = parse_amount)]
    amount: Amount,

    /// Payer phone number
    #[arg(long)]
    phone: String,

    /// Origin serving the STK push endpoint and the profile page
    #[arg(long, env = "STKPAY_BASE_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Delay before redirecting after an accepted request
    #[arg(long, default_value_t = 5000)]
    redirect_delay_ms: u64,

    /// Timeout for the gateway call
    #[arg(long, default_value_t = 30)]
    timeout_secs: u64,

    /// Do not contact the gateway; treat the request as accepted
    #[arg(long)]
    dry_run: bool,
}

fn parse_amount(raw: &str) -> std::result::Result<Amount, String> {
    raw.parse().map_err(|e| format!("{e}"))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&cli.log).unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    match cli.command {
        Command::Pay(args) => pay(args).await,
        Command::Validate { phone } => {
            let phone = PhoneNumber::parse(&phone).into_diagnostic()?;
            println!("{}", phone.msisdn());
            Ok(())
        }
    }
}

async fn pay(args: PayArgs) -> Result<()> {
    let config = CheckoutConfig {
        base_url: args.base_url.clone(),
        redirect_delay: Duration::from_millis(args.redirect_delay_ms),
        request_timeout: Duration::from_secs(args.timeout_secs),
        ..CheckoutConfig::default()
    };

    let gateway: GatewayRef = if args.dry_run {
        Arc::new(InMemoryGateway::accepting())
    } else {
        let gateway = HttpGateway::new(&config).into_diagnostic()?;
        tracing::info!(endpoint = gateway.endpoint(), "using http gateway");
        Arc::new(gateway)
    };

    let page = Arc::new(InMemoryPage::provisioned());
    let navigator = Arc::new(ConsoleNavigator::new(config.base_url.clone()));
    let workflow = PaymentWorkflow::new(page.clone(), gateway, navigator, config);

    let stdout = io::stdout();
    let mut writer = StatusWriter::new(stdout.lock());

    let pending = workflow
        .open_payment_modal(args.plan, args.amount)
        .into_diagnostic()?;
    writer
        .write_confirmation(page.as_ref(), pending.plan())
        .into_diagnostic()?;

    if let Some(input) = page.lookup(SurfaceId::PhoneInput) {
        input.set_value(&args.phone);
    }

    let outcome = workflow.trigger_mpesa(&pending).await.into_diagnostic()?;
    writer.write_status(page.as_ref()).into_diagnostic()?;
    drop(writer);

    match outcome {
        RequestOutcome::Accepted => {
            workflow.wait_for_navigation().await;
            Ok(())
        }
        RequestOutcome::ValidationRejected => Err(miette!("phone number was rejected")),
        RequestOutcome::TransportOrServerError(message) => {
            Err(miette!("payment request failed: {message}"))
        }
    }
}
