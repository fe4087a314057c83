//! CLI command definitions and dispatch.
//!
//! Each group of subcommands is implemented in its own submodule:
//! - `records`: list, search, add, show, update and delete geolocations
//! - `settings`: check and save the ipstack API key

mod records;
mod settings;

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tokio::runtime::Runtime;
use tokio::sync::broadcast;

use crate::config::{self, Config};
use crate::lookup::IpStackClient;
use crate::workflow::WorkflowEvent;

pub use records::{RecordEdits, cmd_add, cmd_delete, cmd_list, cmd_search, cmd_show, cmd_update};
pub use settings::{cmd_check_key, cmd_set_key};

/// TrackMyIP CLI
#[derive(Parser)]
#[command(author, version, about = "Look up and keep track of IP geolocations", long_about = None)]
pub struct Cli {
    /// Database file (default: TrackMyIP.db, or [database] path from the config file)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// ipstack API key (overrides the config file)
    #[arg(long, global = true, env = "IPSTACK_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Subcommand)]
pub enum Commands {
    /// List stored geolocations (default)
    List,
    /// Look up an IP address or URL without saving it
    Search {
        /// IP address or hostname
        query: String,
    },
    /// Look up an IP address or URL and save the result
    Add {
        /// IP address or hostname
        query: String,
    },
    /// Show a stored geolocation by ID, or the ones stored for an IP
    Show {
        /// Geolocation ID or IP address
        target: String,
    },
    /// Edit a stored geolocation
    Update {
        /// Geolocation ID
        id: i64,
        #[command(flatten)]
        edits: RecordEdits,
    },
    /// Delete a stored geolocation
    Delete {
        /// Geolocation ID
        id: i64,
        /// Don't ask for confirmation
        #[arg(short, long)]
        yes: bool,
    },
    /// Check whether the API key is accepted by ipstack
    CheckKey,
    /// Save an API key to the config file
    SetKey {
        /// ipstack access key
        key: String,
        /// Save without probing the key first
        #[arg(long)]
        no_check: bool,
    },
}

/// Run the specified CLI command, `list` if none was given.
pub fn run_command(cli: &Cli) -> anyhow::Result<()> {
    let rt = Runtime::new()?;
    let ctx = Context::from_cli(cli);

    match cli.command.as_ref().unwrap_or(&Commands::List) {
        Commands::List => cmd_list(&rt, &ctx),
        Commands::Search { query } => cmd_search(&rt, &ctx, query),
        Commands::Add { query } => cmd_add(&rt, &ctx, query),
        Commands::Show { target } => cmd_show(&rt, &ctx, target),
        Commands::Update { id, edits } => cmd_update(&rt, &ctx, *id, edits),
        Commands::Delete { id, yes } => cmd_delete(&rt, &ctx, *id, *yes),
        Commands::CheckKey => cmd_check_key(&rt, &ctx),
        Commands::SetKey { key, no_check } => cmd_set_key(&rt, &ctx, key, *no_check),
    }
}

// ============================================================================
// Shared helpers
// ============================================================================

/// Settings resolved from the config file and command-line overrides.
pub struct Context {
    pub config: Config,
    pub config_path: Option<PathBuf>,
    pub db_path: Option<PathBuf>,
    pub client: Arc<IpStackClient>,
}

impl Context {
    fn from_cli(cli: &Cli) -> Self {
        let config_path = config::config_path();
        let config = match &config_path {
            Some(path) => config::load_from(path),
            None => config::load(),
        };
        Self::resolve(cli, config, config_path)
    }

    /// Command-line values win over the config file.
    fn resolve(cli: &Cli, config: Config, config_path: Option<PathBuf>) -> Self {
        let api_key = cli
            .api_key
            .as_deref()
            .or(config.api_key())
            .unwrap_or_default()
            .to_string();
        if api_key.trim().is_empty() {
            tracing::debug!("No API key configured");
        }

        let db_path = cli.db.clone().or_else(|| config.database.path.clone());
        let client = Arc::new(IpStackClient::from_config(&config.api, api_key));

        Self {
            config,
            config_path,
            db_path,
            client,
        }
    }
}

/// Print every notice published so far to stderr.
pub(crate) fn print_notices(events: &mut broadcast::Receiver<WorkflowEvent>) {
    while let Ok(event) = events.try_recv() {
        if let WorkflowEvent::Notice(notice) = event {
            eprintln!("{}", notice);
        }
    }
}
