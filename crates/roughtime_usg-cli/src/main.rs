// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! Command-line Roughtime poller.
//!
//! Queries a classic-dialect Roughtime server and prints the verified time,
//! the measured round trip, and the local clock offset. Any failed protocol
//! step aborts with a non-zero exit; an unverified timestamp is never
//! printed.
//!
//! ```sh
//! roughtime --host roughtime.int08h.com:2002 \
//!     --key AW5uAoTSTDfG5NfY1bTh08GUnOqlRb+HVhbJ3ODJvsE=
//! ```

use std::io;
use std::process;
use std::thread;
use std::time::Duration;

use chrono::{TimeZone, Utc};
use clap::Parser;
use log::debug;

use roughtime_client::{RoughtimeEstimate, decode_nonce, decode_public_key};

#[derive(Parser, Debug)]
#[command(name = "roughtime", version, about = "Query a Roughtime server for authenticated time")]
struct Args {
    /// Server address, e.g. `roughtime.int08h.com:2002`.
    #[arg(long)]
    host: String,

    /// Base64-encoded Ed25519 root public key of the server.
    #[arg(long)]
    key: String,

    /// Base64-encoded 32-byte nonce override. Every poll reuses it; omit to
    /// generate a fresh random nonce per poll.
    #[arg(long)]
    nonce: Option<String>,

    /// Seconds to wait between polls.
    #[arg(long, default_value_t = 1)]
    intervals: u64,

    /// Number of polls to perform.
    #[arg(long, default_value_t = 1)]
    repeats: u32,

    /// Per-request timeout in seconds.
    #[arg(long, default_value_t = 5)]
    timeout: u64,
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    if let Err(e) = run(&args) {
        eprintln!("roughtime: {e}");
        process::exit(1);
    }
}

fn run(args: &Args) -> io::Result<()> {
    let public_key = decode_public_key(&args.key)?;
    let nonce = args.nonce.as_deref().map(decode_nonce).transpose()?;
    let timeout = Duration::from_secs(args.timeout);

    for poll in 0..args.repeats {
        if poll > 0 {
            thread::sleep(Duration::from_secs(args.intervals));
        }
        debug!("poll {}/{} to {}", poll + 1, args.repeats, args.host);

        let est = match &nonce {
            Some(nonce) => {
                roughtime_client::request_with_nonce(&args.host, &public_key, nonce, timeout)?
            }
            None => roughtime_client::request_with_timeout(&args.host, &public_key, timeout)?,
        };

        report(&est);
    }

    Ok(())
}

fn report(est: &RoughtimeEstimate) {
    println!("round-trip:   {} µs", est.round_trip_micros);
    println!(
        "current time: {} ±{} µs (epoch {} µs)",
        format_utc(est.midpoint_micros),
        est.radius_micros,
        est.midpoint_micros
    );
    println!("clock offset: {} µs", est.local_offset_micros);
}

/// Render epoch microseconds as UTC, falling back to the raw count for
/// values chrono cannot map.
fn format_utc(epoch_micros: u64) -> String {
    let secs = (epoch_micros / 1_000_000) as i64;
    let micros = (epoch_micros % 1_000_000) as u32;
    match Utc.timestamp_opt(secs, micros * 1_000).single() {
        Some(utc) => utc.format("%Y-%m-%d %H:%M:%S%.6f UTC").to_string(),
        None => format!("{epoch_micros} µs since epoch"),
    }
}
