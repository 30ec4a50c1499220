//! `slots` CLI — run the consecutive-meeting matcher over a JSON request.
//!
//! ## Usage
//!
//! ```sh
//! # Match a request file and print the selectable options as JSON
//! slots match -i request.json
//!
//! # Same, reading the request from stdin, pretty-printed
//! cat request.json | slots match --pretty
//!
//! # Print the classified availability grid (free/busy per cell)
//! slots grid -i request.json --unit 15
//! ```
//!
//! A request carries the date window, the ordered meeting list, and the raw
//! free/busy intervals:
//!
//! ```json
//! {
//!   "window_start": "2021-12-01T09:00:00Z",
//!   "window_end": "2021-12-01T17:00:00Z",
//!   "meetings": [
//!     { "event_title": "Intro", "slot_size_minutes": 15,
//!       "participants": ["p1@example.com"] }
//!   ],
//!   "intervals": [
//!     { "participant": "p1@example.com", "status": "free",
//!       "start": "2021-12-01T14:00:00Z", "end": "2021-12-01T14:30:00Z" }
//!   ]
//! }
//! ```

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use serde::Deserialize;
use std::io::{self, Read};

use slot_engine::{
    classify_grid, dedupe, match_consecutive, AvailabilityStore, FreeBusyInterval, MeetingSpec,
    SelectionState,
};

#[derive(Parser)]
#[command(name = "slots", version, about = "Consecutive-meeting slot matcher")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Match a request and print the selectable options as JSON
    Match {
        /// Input request file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
    },
    /// Print the free/busy classification of every grid cell
    Grid {
        /// Input request file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Grid cell size in minutes
        #[arg(long, default_value_t = 15)]
        unit: u32,
    },
}

/// A scheduling request as read from the input file.
#[derive(Debug, Deserialize)]
struct Request {
    window_start: DateTime<Utc>,
    window_end: DateTime<Utc>,
    meetings: Vec<MeetingSpec>,
    #[serde(default)]
    intervals: Vec<FreeBusyInterval>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Match {
            input,
            output,
            pretty,
        } => {
            let request = read_request(input.as_deref())?;
            let store = AvailabilityStore::from_intervals(&request.intervals);
            let combinations = match_consecutive(
                &request.meetings,
                &store,
                request.window_start,
                request.window_end,
            )?;
            let options = dedupe(combinations);

            let json = if pretty {
                serde_json::to_string_pretty(&options)?
            } else {
                serde_json::to_string(&options)?
            };
            write_output(output.as_deref(), &json)?;
        }
        Commands::Grid { input, unit } => {
            let request = read_request(input.as_deref())?;
            let store = AvailabilityStore::from_intervals(&request.intervals);
            let participants: Vec<String> = request
                .meetings
                .iter()
                .flat_map(|m| m.participants.iter().cloned())
                .collect();

            let cells = classify_grid(
                request.window_start,
                request.window_end,
                unit,
                participants.iter(),
                &store,
                &SelectionState::Unselected,
            );
            for cell in cells {
                let class = serde_json::to_value(cell.class)?;
                println!(
                    "{}..{} {}",
                    cell.start.format("%Y-%m-%dT%H:%M:%SZ"),
                    cell.end.format("%Y-%m-%dT%H:%M:%SZ"),
                    class.as_str().unwrap_or("busy")
                );
            }
        }
    }

    Ok(())
}

/// Read the request from a file, or stdin when no path is given.
fn read_request(path: Option<&str>) -> Result<Request> {
    let raw = match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read request file: {}", path))?,
        None => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .context("failed to read request from stdin")?;
            buffer
        }
    };
    serde_json::from_str(&raw).context("request is not valid JSON")
}

/// Write to a file, or stdout when no path is given.
fn write_output(path: Option<&str>, content: &str) -> Result<()> {
    match path {
        Some(path) => std::fs::write(path, content)
            .with_context(|| format!("failed to write output file: {}", path)),
        None => {
            println!("{}", content);
            Ok(())
        }
    }
}
