//! `slots` CLI — query free time, activity suggestions and placement conflicts
//! over busy-interval JSON from the command line.
//!
//! Busy intervals are a JSON array of `{"start": "...", "end": "..."}` objects.
//! Each `-i` file is treated as a separate calendar provider; with no `-i` the
//! array is read from stdin.
//!
//! ## Usage
//!
//! ```sh
//! # Free one-hour slots on a day (stdin → stdout)
//! echo '[{"start":"2026-03-02T09:00:00Z","end":"2026-03-02T10:00:00Z"}]' \
//!   | slots free --date 2026-03-02 --duration 60
//!
//! # Merge a remote export and the local store
//! slots free --date 2026-03-02 --duration 30 -i google.json -i local.json
//!
//! # Slots plus activity ideas for the current time of day
//! slots suggest --date 2026-03-02 --duration 45 -i busy.json
//!
//! # Would 14:00-15:00 double-book?
//! slots check --start 2026-03-02T14:00:00 --end 2026-03-02T15:00:00 -i busy.json
//!
//! # Merged busy blocks over the whole day
//! slots day --date 2026-03-02 -i busy.json
//! ```
//!
//! Engine failures are printed as `{"error": "..."}` on stdout with exit code 1.

mod config;

use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use serde_json::json;
use slot_engine::format::SlotRecord;
use slot_engine::request::parse_date;
use slot_engine::source::parse_datetime;
use slot_engine::{
    AvailabilityConfig, AvailabilityService, Interval, MultiSource, RawBusyInterval, SlotError,
    SlotQuery, SlotRequest, StaticSource,
};
use tracing::{debug, info};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(
    name = "slots",
    version,
    about = "Free-slot finder for calendar planning agents"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// TOML config file (defaults to $SLOTS_CONFIG)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pretty: bool,
}

#[derive(Args)]
struct BusyInput {
    /// Busy-interval JSON file, one per provider (reads stdin if omitted)
    #[arg(short, long = "input")]
    inputs: Vec<PathBuf>,
}

#[derive(Args)]
struct SlotArgs {
    /// Day to search, YYYY-MM-DD
    #[arg(long)]
    date: String,
    /// Required slot length in minutes
    #[arg(long, allow_negative_numbers = true)]
    duration: i64,
    /// Override the configured start of the working window (HH:MM)
    #[arg(long)]
    day_start: Option<String>,
    /// Override the configured end of the working window (HH:MM)
    #[arg(long)]
    day_end: Option<String>,
    #[command(flatten)]
    busy: BusyInput,
}

impl SlotArgs {
    fn query(&self) -> SlotQuery {
        SlotQuery {
            date: self.date.clone(),
            duration_minutes: self.duration,
            day_start: self.day_start.clone(),
            day_end: self.day_end.clone(),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// List every free slot of the requested duration
    Free(SlotArgs),
    /// Free slots (capped) plus activity suggestions for the current hour
    Suggest(SlotArgs),
    /// Earliest free slot of the requested duration
    First(SlotArgs),
    /// Check a proposed event placement against busy time
    Check {
        /// Proposed start (RFC 3339 or local YYYY-MM-DDTHH:MM:SS)
        #[arg(long)]
        start: String,
        /// Proposed end
        #[arg(long)]
        end: String,
        #[command(flatten)]
        busy: BusyInput,
    },
    /// Merged busy blocks over the whole day (00:00-23:59)
    Day {
        /// Day to list, YYYY-MM-DD
        #[arg(long)]
        date: String,
        #[command(flatten)]
        busy: BusyInput,
    },
}

fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();

    let config = config::load(cli.config.as_deref())?;
    debug!(?config, "loaded configuration");

    match run(cli.command, config)? {
        Outcome::Success(value) => print_json(&value, cli.pretty)?,
        Outcome::Failure(value) => {
            print_json(&value, cli.pretty)?;
            process::exit(1);
        }
    }

    Ok(())
}

enum Outcome {
    Success(serde_json::Value),
    Failure(serde_json::Value),
}

fn run(command: Commands, config: AvailabilityConfig) -> Result<Outcome> {
    match command {
        Commands::Free(args) => {
            let service = build_service(&args.busy, config)?;
            let response = service.available_slots(&args.query());
            let failed = response.is_error();
            outcome(&response, failed)
        }
        Commands::Suggest(args) => {
            let service = build_service(&args.busy, config)?;
            let response = service.suggest_activities(&args.query(), Utc::now());
            let failed = response.is_error();
            outcome(&response, failed)
        }
        Commands::First(args) => {
            let service = build_service(&args.busy, config)?;
            let tz = service.config().tz()?;
            let found = SlotRequest::try_from(&args.query())
                .and_then(|request| service.first_available(&request));
            match found {
                Ok(slot) => Ok(Outcome::Success(json!({
                    "date": args.date,
                    "slot": slot.map(|s| SlotRecord::from_slot(&s, tz)),
                }))),
                Err(e) => Ok(failure(&e)),
            }
        }
        Commands::Check { start, end, busy } => {
            let service = build_service(&busy, config)?;
            let tz = service.config().tz()?;
            let checked = parse_datetime(&start, tz)
                .and_then(|s| Ok((s, parse_datetime(&end, tz)?)))
                .and_then(|(s, e)| service.check_placement(Interval { start: s, end: e }));
            match checked {
                Ok(conflicts) => {
                    let records: Vec<serde_json::Value> = conflicts
                        .iter()
                        .map(|c| {
                            json!({
                                "start": c.busy.start.with_timezone(&tz).to_rfc3339(),
                                "end": c.busy.end.with_timezone(&tz).to_rfc3339(),
                                "overlap_minutes": c.overlap_minutes,
                            })
                        })
                        .collect();
                    Ok(Outcome::Success(json!({
                        "available": records.is_empty(),
                        "count": records.len(),
                        "conflicts": records,
                    })))
                }
                Err(e) => Ok(failure(&e)),
            }
        }
        Commands::Day { date, busy } => {
            let service = build_service(&busy, config)?;
            match parse_date(&date).and_then(|d| service.list_day(d)) {
                Ok(listing) => outcome(&listing, false),
                Err(e) => Ok(failure(&e)),
            }
        }
    }
}

fn outcome<T: Serialize>(response: &T, failed: bool) -> Result<Outcome> {
    let value = serde_json::to_value(response).context("Failed to serialize response")?;
    Ok(if failed {
        Outcome::Failure(value)
    } else {
        Outcome::Success(value)
    })
}

fn failure(e: &SlotError) -> Outcome {
    info!(error = %e, "query rejected");
    Outcome::Failure(json!({ "error": e.to_string() }))
}

/// One `StaticSource` per input file, named after the file stem; stdin is
/// the single source "stdin".
fn build_service(
    busy: &BusyInput,
    config: AvailabilityConfig,
) -> Result<AvailabilityService<MultiSource>> {
    let tz = config.tz()?;
    let mut sources = MultiSource::new();

    if busy.inputs.is_empty() {
        let raw = parse_busy_json(&read_stdin()?, "stdin")?;
        sources = sources.with_source(StaticSource::from_raw("stdin", &raw, tz));
    } else {
        for path in &busy.inputs {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read file: {}", path.display()))?;
            let name = source_name(path);
            let raw = parse_busy_json(&text, &name)?;
            sources = sources.with_source(StaticSource::from_raw(name, &raw, tz));
        }
    }

    debug!(sources = sources.len(), "built busy sources");
    AvailabilityService::new(sources, config).context("Invalid configuration")
}

fn parse_busy_json(text: &str, name: &str) -> Result<Vec<RawBusyInterval>> {
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }
    serde_json::from_str(text).with_context(|| format!("Invalid busy-interval JSON in {}", name))
}

fn source_name(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("file")
        .to_string()
}

fn read_stdin() -> Result<String> {
    let mut buf = String::new();
    io::stdin()
        .read_to_string(&mut buf)
        .context("Failed to read from stdin")?;
    Ok(buf)
}

fn print_json(value: &serde_json::Value, pretty: bool) -> Result<()> {
    let text = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{}", text);
    Ok(())
}

/// Logs go to stderr so stdout stays machine-readable JSON.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}
