// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! # fleetdesk
//!
//! Operator command line for the booking engine. Every subcommand opens the
//! configured database, runs one operation and prints the result as JSON on
//! stdout. Logs go to stderr.
//!
//! A failed operation prints `{"category": ..., "error": ...}` and exits
//! with status 1. The category is the stable failure name a caller can
//! branch on, such as `NoCapacityAvailable`.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

mod args;
mod commands;
mod output;

#[cfg(test)]
mod tests;

use clap::Parser;
use color_eyre::{Result, eyre::Context};
use tracing_subscriber::EnvFilter;

use crate::args::Args;
use crate::output::ErrorResponse;

fn main() -> Result<()> {
    color_eyre::install()?;
    let args = Args::parse();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(args.log_level().into())
                .from_env_lossy(),
        )
        .with_writer(std::io::stderr)
        .without_time()
        .init();

    let mut persistence =
        commands::open_persistence(args.database.as_deref(), args.mysql_url.as_deref())
            .wrap_err("Failed to open database")?;

    match commands::run(&mut persistence, args.command) {
        Ok(report) => {
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Err(err) => {
            let response = ErrorResponse::from(&err);
            tracing::error!(category = response.category, "{err}");
            println!("{}", serde_json::to_string_pretty(&response)?);
            std::process::exit(1);
        }
    }
    Ok(())
}
