mod client;
mod commands;
mod render;

use anyhow::Result;
use clap::{Parser, Subcommand};
use owo_colors::OwoColorize;
use slotdesk_core::config::SlotDeskConfig;
use slotdesk_core::{DayKey, SlotDeskError, TimeOfDay, Timestamp};
use tracing_subscriber::EnvFilter;

use crate::commands::Session;

#[derive(Parser)]
#[command(name = "slotdesk")]
#[command(about = "Manage booking availability, batch time assignment and appointment requests")]
struct Cli {
    /// More log output (-v info, -vv debug). RUST_LOG takes precedence.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load the backend schedule into the local draft
    Pull,
    /// Discard local changes and reload from the backend
    Reset,
    /// Show the draft schedule (and the batch session, if any)
    Status,
    /// Pick days on the calendar (MM/DD/YYYY or YYYY-MM-DD)
    Select {
        #[arg(required = true)]
        days: Vec<DayKey>,
    },
    /// Unpick days
    Deselect {
        #[arg(required = true)]
        days: Vec<DayKey>,
    },
    /// Set the free times (HH:MM) of one day; no times clears the day
    Times {
        day: DayKey,

        times: Vec<TimeOfDay>,

        /// Keep the day's current times and add these
        #[arg(short, long)]
        add: bool,
    },
    /// Give many days the same times at once
    Batch {
        #[command(subcommand)]
        action: BatchAction,
    },
    /// Check and store the draft on the backend
    Save,
    /// List pending and approved requests and the free dates
    Requests,
    /// Cancel an approved booking (epoch ms or "YYYY-MM-DD HH:MM")
    Cancel {
        date: Timestamp,

        /// Don't ask for confirmation
        #[arg(short, long)]
        yes: bool,
    },
    /// Show configuration paths and backend
    Config,
}

#[derive(Subcommand)]
pub enum BatchAction {
    /// Start a batch session; `select` then picks into it
    On,
    /// Drop the batch session and reload the schedule
    Off,
    /// Open the time editor
    Edit,
    /// Add candidate times (HH:MM)
    Add {
        #[arg(required = true)]
        times: Vec<TimeOfDay>,
    },
    /// Change the candidate time at a position
    Change { position: usize, time: TimeOfDay },
    /// Remove the candidate time at a position
    Remove { position: usize },
    /// Close the time editor and forget the candidate times
    Cancel,
    /// Stamp the candidate times onto every selected day
    Apply,
    /// Add the applied times to the schedule and leave batch mode
    Commit,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli).await {
        report(&e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = SlotDeskConfig::load()?;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        base_url = %config.base_url,
        "slotdesk started"
    );

    let mut session = Session::open(config)?;

    if session.config.report_activation {
        report_activation(&session).await;
    }

    match cli.command {
        Commands::Pull => commands::pull::run(&mut session).await,
        Commands::Reset => commands::pull::reset(&mut session).await,
        Commands::Status => commands::status::run(&session),
        Commands::Select { days } => commands::select::select(&mut session, days).await,
        Commands::Deselect { days } => commands::select::deselect(&mut session, days).await,
        Commands::Times { day, times, add } => {
            commands::times::run(&mut session, day, times, add).await
        }
        Commands::Batch { action } => commands::batch::run(&mut session, action).await,
        Commands::Save => commands::save::run(&mut session).await,
        Commands::Requests => commands::requests::run(&session).await,
        Commands::Cancel { date, yes } => commands::cancel::run(&mut session, date, yes).await,
        Commands::Config => commands::config::run(&session),
    }
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// The backend keeps a log of admin activations. Failing to reach it is not
/// worth aborting the command for.
async fn report_activation(session: &Session) {
    let result = match session.client() {
        Ok(client) => client.send_log("slotdesk admin activated").await,
        Err(e) => Err(e),
    };
    if let Err(e) = result {
        tracing::warn!(error = %e, "could not report activation");
    }
}

/// Validation problems block the operation; anything else (mostly the
/// backend being unreachable) is a notice and can simply be retried.
fn report(e: &anyhow::Error) {
    match e.downcast_ref::<SlotDeskError>() {
        Some(err) if err.is_validation() => eprintln!("{} {}", "✗".red().bold(), err.bold()),
        _ => eprintln!("{} {:#}", "!".red().bold(), e.red()),
    }
}
