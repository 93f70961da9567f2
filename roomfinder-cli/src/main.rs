//! RoomFinder command-line client
//!
//! Talks to the marketplace through the same services as the web front end.
//! Logs go to stderr (`RUST_LOG`), results to stdout.

mod commands;
mod output;

use std::process::ExitCode;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand, ValueEnum};
use roomfinder_app::adapters::FileSessionStore;
use roomfinder_app::{AppConfig, AppState, AppStateBuilder};
use roomfinder_core::{
    CoreError, InMemorySessionStore, MobileMoneyProvider, Notifier, PropertyType, SessionStore,
    TicketPriority, Toast, ToastLevel,
};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "roomfinder", version, about = "RoomFinder marketplace client")]
struct Cli {
    /// REST API base URL
    #[arg(long, global = true, env = "ROOMFINDER_API_URL")]
    api_url: Option<String>,

    /// Print raw JSON instead of a summary
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Sign in and remember the session
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "ROOMFINDER_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Forget the stored session
    Logout,
    /// Search listings
    Search(SearchArgs),
    /// Show one property with its reviews
    Show { property_id: String },
    /// Book a property and pay by mobile money
    Book(BookArgs),
    /// Your bookings
    Bookings {
        #[command(subcommand)]
        command: Option<BookingsCommand>,
    },
    /// Host payouts
    Payouts {
        #[command(subcommand)]
        command: Option<PayoutsCommand>,
    },
    /// Support tickets
    Tickets {
        #[command(subcommand)]
        command: Option<TicketsCommand>,
    },
}

#[derive(Args, Debug)]
struct SearchArgs {
    /// Free-text query
    query: Option<String>,
    #[arg(long)]
    city: Option<String>,
    #[arg(long = "type", value_enum)]
    property_type: Option<PropertyKind>,
    #[arg(long)]
    min_price: Option<f64>,
    #[arg(long)]
    max_price: Option<f64>,
    #[arg(long)]
    guests: Option<u32>,
    #[arg(long, default_value_t = 1)]
    page: u32,
    #[arg(long, default_value_t = 20)]
    page_size: u32,
}

#[derive(Args, Debug)]
struct BookArgs {
    property_id: String,
    /// Arrival date (YYYY-MM-DD)
    #[arg(long)]
    check_in: chrono::NaiveDate,
    /// Departure date (YYYY-MM-DD)
    #[arg(long)]
    check_out: chrono::NaiveDate,
    #[arg(long, default_value_t = 1)]
    guests: u32,
    #[arg(long, value_enum)]
    provider: Provider,
    /// Payer phone, e.g. 6XXXXXXXX or +237 6XX XX XX XX
    #[arg(long)]
    phone: String,
    #[arg(long)]
    requests: Option<String>,
}

#[derive(Subcommand, Debug)]
enum BookingsCommand {
    List {
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    Show { booking_id: String },
    Cancel { booking_id: String },
    /// Check the payment status once
    Verify { booking_id: String },
}

#[derive(Subcommand, Debug)]
enum PayoutsCommand {
    /// Withdrawable and locked balances
    Eligibility,
    List {
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    Request {
        amount: f64,
        #[arg(long, value_enum)]
        provider: Provider,
        #[arg(long)]
        phone: String,
    },
}

#[derive(Subcommand, Debug)]
enum TicketsCommand {
    List {
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    Show {
        ticket_id: String,
    },
    Create {
        #[arg(long)]
        subject: String,
        #[arg(long)]
        message: String,
        #[arg(long, value_enum, default_value_t = Priority::Medium)]
        priority: Priority,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        booking_id: Option<String>,
    },
    Reply {
        ticket_id: String,
        #[arg(long)]
        message: String,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Provider {
    Mtn,
    Orange,
}

impl From<Provider> for MobileMoneyProvider {
    fn from(value: Provider) -> Self {
        match value {
            Provider::Mtn => Self::Mtn,
            Provider::Orange => Self::Orange,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum PropertyKind {
    Apartment,
    House,
    Studio,
    Room,
    Villa,
    Guesthouse,
}

impl From<PropertyKind> for PropertyType {
    fn from(value: PropertyKind) -> Self {
        match value {
            PropertyKind::Apartment => Self::Apartment,
            PropertyKind::House => Self::House,
            PropertyKind::Studio => Self::Studio,
            PropertyKind::Room => Self::Room,
            PropertyKind::Villa => Self::Villa,
            PropertyKind::Guesthouse => Self::Guesthouse,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Priority {
    Low,
    Medium,
    High,
    Urgent,
}

impl From<Priority> for TicketPriority {
    fn from(value: Priority) -> Self {
        match value {
            Priority::Low => Self::Low,
            Priority::Medium => Self::Medium,
            Priority::High => Self::High,
            Priority::Urgent => Self::Urgent,
        }
    }
}

/// Prints toasts on stderr.
struct StderrNotifier;

impl Notifier for StderrNotifier {
    fn notify(&self, toast: Toast) {
        let tag = match toast.level {
            ToastLevel::Success => "ok",
            ToastLevel::Info => "info",
            ToastLevel::Warning => "warning",
            ToastLevel::Error => "error",
        };
        eprintln!("[{tag}] {}", toast.message);
    }
}

async fn bootstrap(api_url: Option<String>) -> anyhow::Result<AppState> {
    let mut config = AppConfig::load()?;
    if let Some(url) = api_url {
        config.api_url = url;
    }

    let session_store: Arc<dyn SessionStore> = match FileSessionStore::default_path() {
        Some(path) => Arc::new(FileSessionStore::new(path)),
        None => {
            tracing::warn!("No data directory; the session will not be remembered");
            Arc::new(InMemorySessionStore::new())
        }
    };

    let app = AppStateBuilder::new()
        .config(config)
        .session_store(session_store)
        .notifier(Arc::new(StderrNotifier))
        .build()
        .await?;
    app.run_startup().await;
    Ok(app)
}

fn describe(err: &anyhow::Error) -> String {
    err.downcast_ref::<CoreError>()
        .map_or_else(|| format!("{err:#}"), CoreError::user_message)
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .without_time()
                .with_target(false),
        )
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let cli = Cli::parse();

    let app = match bootstrap(cli.api_url).await {
        Ok(app) => app,
        Err(e) => {
            tracing::error!("Startup failed: {e:#}");
            eprintln!("error: {}", describe(&e));
            return ExitCode::FAILURE;
        }
    };

    let result = commands::run(&app, cli.command, cli.json).await;
    app.shutdown().await;

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", describe(&e));
            ExitCode::FAILURE
        }
    }
}
