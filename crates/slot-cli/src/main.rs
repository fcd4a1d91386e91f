//! `slots` CLI — find booking conflicts and suggest alternative slots from a
//! booking/availability snapshot.
//!
//! ## Usage
//!
//! ```sh
//! # Conflicting bookings for one trainer (snapshot on stdin)
//! cat snapshot.json | slots conflicts --owner trainer-42
//!
//! # Every overlapping pair with its overlap in minutes
//! slots pairs --owner trainer-42 -i snapshot.json
//!
//! # Full report with ranked suggestions, evaluated as of a fixed date
//! slots report --owner trainer-42 -i snapshot.json --now 2025-03-01
//!
//! # Custom policy and full datetimes in the output
//! slots --policy policy.toml report --owner trainer-42 -i snapshot.json --datetime
//!
//! # Owners present in a snapshot
//! slots owners -i snapshot.json
//! ```
//!
//! A snapshot is `{"bookings": [...], "availability": [...]}` as exported from
//! the booking and availability stores.

mod config;

use std::io::{self, Read};
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use serde::Serialize;
use slot_engine::report::DateFormat;
use slot_engine::store::{ScheduleSnapshot, ScheduleStore};
use tracing::info;

#[derive(Parser)]
#[command(
    name = "slots",
    version,
    about = "Trainer booking conflict detection and slot suggestions"
)]
struct Cli {
    /// Recommender policy file (TOML)
    #[arg(long, global = true, env = "SLOTS_POLICY", value_name = "FILE")]
    policy: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error); RUST_LOG takes precedence
    #[arg(long, global = true, env = "SLOTS_LOG_LEVEL", default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the bookings of an owner that overlap another booking
    Conflicts {
        /// Owner (trainer) identifier
        #[arg(long)]
        owner: String,
        /// Snapshot file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
    },
    /// List every overlapping pair of bookings with the overlap in minutes
    Pairs {
        /// Owner (trainer) identifier
        #[arg(long)]
        owner: String,
        /// Snapshot file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
    },
    /// Build the conflict report with ranked alternative slots
    Report {
        /// Owner (trainer) identifier
        #[arg(long)]
        owner: String,
        /// Snapshot file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        /// Evaluate as of this instant (ISO 8601); defaults to the current time
        #[arg(long)]
        now: Option<String>,
        /// Override the policy timezone (IANA name)
        #[arg(long)]
        timezone: Option<String>,
        /// Emit RFC 3339 datetimes instead of dates
        #[arg(long)]
        datetime: bool,
    },
    /// List the owners that have bookings in the snapshot
    Owners {
        /// Snapshot file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
    },
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PairOutput {
    booking_a: String,
    booking_b: String,
    overlap_minutes: i64,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    config::init_logging(&cli.log_level)?;

    match cli.command {
        Commands::Conflicts { owner, input } => {
            let snapshot = read_snapshot(input.as_deref())?;
            let bookings = snapshot.bookings_for(&owner)?;
            let conflicts = slot_engine::find_conflicting_bookings(&bookings);
            info!(owner = %owner, conflicts = conflicts.len(), "conflict scan done");
            write_json(None, &conflicts)?;
        }
        Commands::Pairs { owner, input } => {
            let snapshot = read_snapshot(input.as_deref())?;
            let bookings = snapshot.bookings_for(&owner)?;
            let pairs: Vec<PairOutput> = slot_engine::find_conflict_pairs(&bookings)
                .into_iter()
                .map(|p| PairOutput {
                    booking_a: p.booking_a.id,
                    booking_b: p.booking_b.id,
                    overlap_minutes: p.overlap_minutes,
                })
                .collect();
            write_json(None, &pairs)?;
        }
        Commands::Report {
            owner,
            input,
            output,
            now,
            timezone,
            datetime,
        } => {
            let mut policy = config::load_policy(cli.policy.as_deref())?;
            if let Some(name) = timezone {
                policy = policy
                    .with_timezone_name(&name)
                    .context("Invalid --timezone")?;
            }
            let now = resolve_now(now.as_deref())?;
            let snapshot = read_snapshot(input.as_deref())?;

            let report = slot_engine::analyze_owner(&snapshot, &owner, now, &policy)
                .with_context(|| format!("Failed to analyze owner '{}'", owner))?;

            let format = if datetime {
                DateFormat::DateTime
            } else {
                DateFormat::Date
            };
            write_json(output.as_deref(), &report.to_payload(format, &policy))?;
        }
        Commands::Owners { input } => {
            let snapshot = read_snapshot(input.as_deref())?;
            write_json(None, &snapshot.owners())?;
        }
    }

    Ok(())
}

fn resolve_now(now: Option<&str>) -> Result<DateTime<Utc>> {
    match now {
        Some(raw) => slot_engine::parse_instant(raw).context("Invalid --now"),
        None => Ok(Utc::now()),
    }
}

fn read_snapshot(path: Option<&str>) -> Result<ScheduleSnapshot> {
    let raw = read_input(path)?;
    ScheduleSnapshot::from_json(&raw).context("Failed to parse schedule snapshot")
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}

fn write_json<T: Serialize>(path: Option<&str>, value: &T) -> Result<()> {
    let pretty = serde_json::to_string_pretty(value)?;
    match path {
        Some(path) => {
            std::fs::write(path, pretty).with_context(|| format!("Failed to write file: {}", path))?;
        }
        None => {
            println!("{}", pretty);
        }
    }
    Ok(())
}
