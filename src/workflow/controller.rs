//! The geolocation workflow: refresh, search, add, update and delete.
//!
//! Holds the in-memory record list the presentation layer displays, the
//! current selection and the last search result. Every store or network
//! call runs inside the busy gate; the [`BusyGuard`] releases it on drop,
//! so an error (or a panic) can't leave the controller stuck in `Loading`.

use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use tokio::sync::broadcast;

use super::WorkflowError;
use super::events::{EventBus, Notice, WorkflowEvent};
use super::state::{BusyGate, Commands, Phase};
use super::traits::{ConfirmPrompt, RecordRepository};
use crate::lookup::GeolocationLookup;
use crate::model::GeolocationRecord;

/// Releases the busy gate when dropped.
struct BusyGuard<'a> {
    controller: &'a WorkflowController,
    operation: &'static str,
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.controller.gate.leave();
        tracing::debug!("{} finished", self.operation);
        self.controller.publish_state();
    }
}

/// Orchestrates lookups and storage for the geolocation list.
pub struct WorkflowController {
    lookup: Arc<dyn GeolocationLookup>,
    repository: Arc<dyn RecordRepository>,
    prompt: Arc<dyn ConfirmPrompt>,
    gate: BusyGate,
    records: RwLock<Vec<GeolocationRecord>>,
    selected: Mutex<Option<GeolocationRecord>>,
    found: Mutex<Option<GeolocationRecord>>,
    events: EventBus,
}

impl WorkflowController {
    pub fn new(
        lookup: Arc<dyn GeolocationLookup>,
        repository: Arc<dyn RecordRepository>,
        prompt: Arc<dyn ConfirmPrompt>,
    ) -> Self {
        Self {
            lookup,
            repository,
            prompt,
            gate: BusyGate::new(),
            records: RwLock::new(Vec::new()),
            selected: Mutex::new(None),
            found: Mutex::new(None),
            events: EventBus::default(),
        }
    }

    /// Receive every event published from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<WorkflowEvent> {
        self.events.subscribe()
    }

    pub fn phase(&self) -> Phase {
        self.gate.phase()
    }

    pub fn is_busy(&self) -> bool {
        self.gate.is_busy()
    }

    /// Snapshot of the cached records, in store order.
    pub fn records(&self) -> Vec<GeolocationRecord> {
        self.records.read().clone()
    }

    /// Cached record by ID.
    pub fn record(&self, id: i64) -> Option<GeolocationRecord> {
        self.records.read().iter().find(|r| r.id == id).cloned()
    }

    pub fn selected(&self) -> Option<GeolocationRecord> {
        self.selected.lock().clone()
    }

    /// The last search result not yet added.
    pub fn found(&self) -> Option<GeolocationRecord> {
        self.found.lock().clone()
    }

    /// Actions that can execute right now.
    pub fn available_commands(&self) -> Commands {
        Commands::available(
            self.gate.phase(),
            self.selected.lock().is_some(),
            self.found.lock().is_some(),
        )
    }

    /// Whether every action in `command` can execute right now.
    pub fn can_execute(&self, command: Commands) -> bool {
        self.available_commands().contains(command)
    }

    /// Search additionally needs a non-blank query.
    pub fn can_search(&self, query: &str) -> bool {
        !query.trim().is_empty() && self.can_execute(Commands::SEARCH)
    }

    // ========================================================================
    // Selection
    // ========================================================================

    /// Select a cached record by ID, or clear the selection with `None`.
    ///
    /// Returns the new selection; an unknown ID clears it.
    pub fn select(&self, id: Option<i64>) -> Option<GeolocationRecord> {
        let selection = id.and_then(|id| self.record(id));
        let selected_id = selection.as_ref().map(|r| r.id);
        *self.selected.lock() = selection.clone();

        self.events.publish(WorkflowEvent::SelectionChanged(selected_id));
        self.publish_commands();
        selection
    }

    /// Edit the selected record before calling [`update_selected`](Self::update_selected).
    ///
    /// The ID can't be changed.
    pub fn edit_selected(
        &self,
        edit: impl FnOnce(&mut GeolocationRecord),
    ) -> Result<GeolocationRecord, WorkflowError> {
        let mut selected = self.selected.lock();
        let record = selected.as_mut().ok_or(WorkflowError::NoSelection)?;
        let id = record.id;
        edit(record);
        record.id = id;
        Ok(record.clone())
    }

    // ========================================================================
    // Commands
    // ========================================================================

    /// Reload the cache from the store.
    ///
    /// Returns the number of records loaded.
    pub async fn refresh(&self) -> Result<usize, WorkflowError> {
        let _guard = self.begin("refresh")?;

        let loaded = self.repository.list_all().await?;
        let count = loaded.len();
        *self.records.write() = loaded;
        tracing::info!("Loaded {} geolocations", count);
        self.events.publish(WorkflowEvent::RecordsReloaded(count));

        // Drop a selection that no longer exists in the store
        let stale = self
            .selected
            .lock()
            .as_ref()
            .is_some_and(|s| self.record(s.id).is_none());
        if stale {
            *self.selected.lock() = None;
            self.events.publish(WorkflowEvent::SelectionChanged(None));
        }

        Ok(count)
    }

    /// Look up `query` and keep the result for [`add_found`](Self::add_found).
    pub async fn search(&self, query: &str) -> Result<GeolocationRecord, WorkflowError> {
        if query.trim().is_empty() {
            return Err(WorkflowError::EmptyQuery);
        }
        let _guard = self.begin("search")?;
        self.lookup_locked(query).await
    }

    /// Store the last search result, unless its IP is already listed.
    pub async fn add_found(&self) -> Result<GeolocationRecord, WorkflowError> {
        let record = self.found().ok_or(WorkflowError::NothingFound)?;
        let _guard = self.begin("add")?;
        self.add_locked(record).await
    }

    /// Look up `query` and store the result, unless its IP is already listed.
    pub async fn search_and_add(&self, query: &str) -> Result<GeolocationRecord, WorkflowError> {
        if query.trim().is_empty() {
            return Err(WorkflowError::EmptyQuery);
        }
        let _guard = self.begin("search and add")?;
        let record = self.lookup_locked(query).await?;
        self.add_locked(record).await
    }

    /// Write the selected record to the store and refresh its cached copy.
    pub async fn update_selected(&self) -> Result<GeolocationRecord, WorkflowError> {
        let selected = self.selected().ok_or(WorkflowError::NoSelection)?;
        let _guard = self.begin("update")?;

        self.repository.update(&selected).await?;

        // Overwrite in place so holders of the cached entry see the change
        let updated = {
            let mut records = self.records.write();
            records.iter_mut().find(|r| r.id == selected.id).map(|cached| {
                cached.overwrite_from(&selected);
                cached.clone()
            })
        };
        match updated {
            Some(record) => {
                tracing::info!("Updated geolocation {} ({})", record.id, record.ip);
                self.events.publish(WorkflowEvent::RecordUpdated(record));
            }
            None => tracing::debug!("Geolocation {} not cached, nothing to refresh", selected.id),
        }

        Ok(selected)
    }

    /// Delete the selected record after the user confirms.
    ///
    /// Returns `false` if the user declined, in which case nothing changed.
    pub async fn delete_selected(&self) -> Result<bool, WorkflowError> {
        let selected = self.selected().ok_or(WorkflowError::NoSelection)?;
        if self.gate.is_busy() {
            return Err(WorkflowError::Busy);
        }

        let question = Notice::confirm_delete();
        if !self.prompt.confirm(&question.title, &question.message).await {
            tracing::debug!("Delete of geolocation {} declined", selected.id);
            return Ok(false);
        }

        let _guard = self.begin("delete")?;
        self.repository.delete(selected.id).await?;

        self.records.write().retain(|r| r.id != selected.id);
        *self.selected.lock() = None;
        tracing::info!("Deleted geolocation {} ({})", selected.id, selected.ip);
        self.events.publish(WorkflowEvent::RecordRemoved(selected.id));
        self.events.publish(WorkflowEvent::SelectionChanged(None));

        Ok(true)
    }

    // ========================================================================
    // Internals
    // ========================================================================

    /// Enter the busy gate or fail with [`WorkflowError::Busy`].
    fn begin(&self, operation: &'static str) -> Result<BusyGuard<'_>, WorkflowError> {
        if !self.gate.try_enter() {
            tracing::warn!("Rejected {}: another operation is in progress", operation);
            return Err(WorkflowError::Busy);
        }
        tracing::debug!("{} started", operation);
        self.publish_state();
        Ok(BusyGuard {
            controller: self,
            operation,
        })
    }

    /// Fetch and remember the result. Caller holds the gate.
    async fn lookup_locked(&self, query: &str) -> Result<GeolocationRecord, WorkflowError> {
        match self.lookup.fetch(query).await {
            Ok(record) => {
                tracing::info!("Found {} for query {:?}", record.ip, query);
                *self.found.lock() = Some(record.clone());
                self.events.publish(WorkflowEvent::SearchCompleted(record.clone()));
                Ok(record)
            }
            Err(e) => {
                tracing::warn!("Lookup of {:?} failed: {}", query, e);
                self.events.publish(WorkflowEvent::Notice(Notice::lookup_failed(&e)));
                Err(e.into())
            }
        }
    }

    /// Duplicate check plus insert. Caller holds the gate.
    async fn add_locked(
        &self,
        mut record: GeolocationRecord,
    ) -> Result<GeolocationRecord, WorkflowError> {
        let duplicate = self.records.read().iter().any(|r| r.ip == record.ip);
        if duplicate {
            tracing::warn!("Not adding {}: already listed", record.ip);
            self.events.publish(WorkflowEvent::Notice(Notice::duplicate()));
            return Err(WorkflowError::DuplicateRecord(record.ip));
        }

        record.id = self.repository.add(&record).await?;
        self.records.write().push(record.clone());
        *self.found.lock() = None;

        tracing::info!("Added geolocation {} ({})", record.id, record.ip);
        self.events.publish(WorkflowEvent::RecordAdded(record.clone()));
        Ok(record)
    }

    fn publish_state(&self) {
        self.events.publish(WorkflowEvent::PhaseChanged(self.gate.phase()));
        self.publish_commands();
    }

    fn publish_commands(&self) {
        self.events.publish(WorkflowEvent::CommandsChanged(self.available_commands()));
    }
}
