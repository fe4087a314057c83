//! TrackMyIP - look up IP address and URL geolocations and keep them.
//!
//! Geolocations come from the ipstack API and are stored in a local SQLite
//! database. Everything is driven through CLI commands; `list` runs when no
//! command is given.

pub mod cli;
pub mod config;
pub mod db;
pub mod error;
pub mod lookup;
pub mod model;
#[cfg(test)]
pub mod test_utils;
pub mod workflow;

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn main() -> anyhow::Result<()> {
    let args = cli::Cli::parse();

    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env().add_directive("track_my_ip=info".parse()?))
        .init();

    cli::run_command(&args)
}
