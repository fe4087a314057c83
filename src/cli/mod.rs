//! Command-line interface for track-my-ip.
//!
//! This module drives the workflow controllers from the terminal: list,
//! search, add, edit and delete stored geolocations, and manage the API key.

mod commands;
mod prompt;

pub use commands::{Cli, Commands, run_command};
