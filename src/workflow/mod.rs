//! Workflow state machine for the geolocation list and settings.
//!
//! Presentation-agnostic: the CLI drives it today, and anything else can
//! subscribe to [`WorkflowEvent`]s and call the same operations.

pub mod controller;
pub mod events;
pub mod settings;
pub mod state;
pub mod traits;

pub use controller::WorkflowController;
pub use events::{EventBus, Notice, WorkflowEvent};
pub use settings::SettingsController;
pub use state::{BusyGate, Commands, Phase};
pub use traits::{ConfirmPrompt, RecordRepository};

use crate::lookup::LookupError;

/// Why a workflow operation didn't run or didn't finish.
#[derive(Debug, thiserror::Error)]
pub enum WorkflowError {
    #[error("Another operation is in progress")]
    Busy,

    #[error("No geolocation selected")]
    NoSelection,

    #[error("Search query is empty")]
    EmptyQuery,

    #[error("Nothing found to add, search first")]
    NothingFound,

    #[error("A geolocation for {0} already exists in the database")]
    DuplicateRecord(String),

    #[error(transparent)]
    Lookup(#[from] LookupError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}
