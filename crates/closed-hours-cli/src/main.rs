mod config;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use closed_hours::{
    to_local, to_utc, ActorId, ClosedHoursError, ClosedHoursService, ClosedIntervalCommand,
    IntervalId, JsonFileRepository, WallTime,
};
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{FileConfig, Settings};

/// Manage a storefront's daily closed hours.
///
/// Hours are entered and shown in the shop's timezone and stored in UTC.
#[derive(Parser)]
#[command(name = "closed-hours", version, about)]
struct Cli {
    /// TOML config file (defaults to ./closed-hours.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// JSON file holding the closed intervals
    #[arg(long, global = true)]
    data: Option<PathBuf>,

    /// IANA timezone of the shop
    #[arg(long, short = 'z', global = true)]
    timezone: Option<String>,

    /// Log debug output to stderr
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List active closed intervals in local time
    List,
    /// Show one closed interval in local time
    Show { id: u64 },
    /// Add a closed interval
    Add {
        /// Local start time, HH:MM
        #[arg(long)]
        initial: String,
        /// Local end time, HH:MM (earlier than start to span midnight)
        #[arg(long = "final")]
        final_: String,
        /// Id of the admin user making the change
        #[arg(long, default_value_t = 0)]
        actor: u64,
    },
    /// Change the hours of a closed interval
    Edit {
        id: u64,
        #[arg(long)]
        initial: String,
        #[arg(long = "final")]
        final_: String,
        #[arg(long, default_value_t = 0)]
        actor: u64,
    },
    /// Soft-delete a closed interval
    Delete { id: u64 },
    /// Report whether the store is closed
    Status {
        /// Evaluate this local time instead of the current one
        #[arg(long)]
        at: Option<String>,
    },
    /// Convert a time of day between the shop timezone and UTC
    #[command(subcommand)]
    Convert(Convert),
}

#[derive(Subcommand)]
enum Convert {
    /// Local HH:MM to UTC
    ToUtc { time: String },
    /// UTC HH:MM to local
    ToLocal { time: String },
}

fn init_logger(verbose: bool) {
    let filter = if verbose {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("closed_hours=debug,warn"))
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("closed_hours=info,warn"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .compact(),
        )
        .init();
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let out = serde_json::to_string_pretty(value).context("serializing output")?;
    println!("{out}");
    Ok(())
}

fn run(command: Command, settings: &Settings) -> Result<()> {
    let tz = settings.timezone.as_str();
    let service = ClosedHoursService::new(JsonFileRepository::new(&settings.data));

    match command {
        Command::List => print_json(&service.list(tz)?),
        Command::Show { id } => print_json(&service.get(IntervalId(id), tz)?),
        Command::Add {
            initial,
            final_,
            actor,
        } => {
            let cmd = ClosedIntervalCommand::new(initial, final_);
            print_json(&service.create(&cmd, tz, ActorId(actor))?)
        }
        Command::Edit {
            id,
            initial,
            final_,
            actor,
        } => {
            let cmd = ClosedIntervalCommand::new(initial, final_);
            print_json(&service.update(IntervalId(id), &cmd, tz, ActorId(actor))?)
        }
        Command::Delete { id } => print_json(&service.delete(IntervalId(id))?),
        Command::Status { at: Some(at) } => {
            let current: WallTime = at.parse().context("parsing --at")?;
            print_json(&service.status_at(tz, current)?)
        }
        Command::Status { at: None } => print_json(&service.status(tz)?),
        Command::Convert(convert) => {
            let converted = match convert {
                Convert::ToUtc { time } => to_utc(&time, tz)?,
                Convert::ToLocal { time } => to_local(&time, tz)?,
            };
            println!("{converted}");
            Ok(())
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logger(cli.verbose);

    let settings = match FileConfig::discover(cli.config.as_deref()) {
        Ok(file) => file.resolve(cli.timezone, cli.data),
        Err(e) => {
            eprintln!("error: {e:#}");
            return ExitCode::FAILURE;
        }
    };

    match run(cli.command, &settings) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => match e.downcast_ref::<ClosedHoursError>() {
            Some(ClosedHoursError::Validation(errors)) => {
                let json = serde_json::to_string(errors).unwrap_or_else(|_| errors.to_string());
                eprintln!("{json}");
                ExitCode::from(2)
            }
            _ => {
                eprintln!("error: {e:#}");
                ExitCode::FAILURE
            }
        },
    }
}
