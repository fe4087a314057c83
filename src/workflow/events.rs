//! Workflow events and user-visible notices.
//!
//! The controller publishes every state change on a broadcast channel so a
//! presentation layer (CLI today) can mirror it without polling. Sending
//! with nobody subscribed is fine.

use tokio::sync::broadcast;

use super::state::{Commands, Phase};
use crate::lookup::LookupError;
use crate::model::GeolocationRecord;

/// Buffered events per subscriber before the slowest one starts lagging
pub const EVENT_CAPACITY: usize = 64;

/// A title/message pair to show the user (dialog, toast, stderr...).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub title: String,
    pub message: String,
}

impl Notice {
    pub const READING_TITLE: &'static str = "Reading geolocation";
    pub const ADDING_TITLE: &'static str = "Adding geolocation";
    pub const DELETING_TITLE: &'static str = "Deleting geolocation";
    pub const SAVING_TITLE: &'static str = "Saving settings";
    pub const KEY_CHECK_TITLE: &'static str = "Checking API key";

    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
        }
    }

    /// A failed lookup. Network failures get a friendlier message.
    pub fn lookup_failed(error: &LookupError) -> Self {
        let message = if error.is_network() {
            "Internet connection problem.".to_string()
        } else {
            error.to_string()
        };
        Self::new(Self::READING_TITLE, message)
    }

    pub fn duplicate() -> Self {
        Self::new(
            Self::ADDING_TITLE,
            "A geolocation for this IP address / URL already exists in the database.",
        )
    }

    pub fn confirm_delete() -> Self {
        Self::new(
            Self::DELETING_TITLE,
            "Are you sure you want to delete the selected geolocation?",
        )
    }
}

impl std::fmt::Display for Notice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.title, self.message)
    }
}

/// Everything observable that the workflow does.
#[derive(Debug, Clone, PartialEq)]
pub enum WorkflowEvent {
    PhaseChanged(Phase),
    /// Actions that can execute now
    CommandsChanged(Commands),
    /// Cache replaced from the store; carries the new length
    RecordsReloaded(usize),
    RecordAdded(GeolocationRecord),
    /// Cached record overwritten in place
    RecordUpdated(GeolocationRecord),
    RecordRemoved(i64),
    SelectionChanged(Option<i64>),
    /// A search produced a record that can be added
    SearchCompleted(GeolocationRecord),
    Notice(Notice),
}

/// Broadcast sender wrapper.
#[derive(Debug, Clone)]
pub struct EventBus {
    tx: broadcast::Sender<WorkflowEvent>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Publish an event, ignoring if no subscribers are listening
    pub fn publish(&self, event: WorkflowEvent) {
        let _ = self.tx.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<WorkflowEvent> {
        self.tx.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(EVENT_CAPACITY)
    }
}
