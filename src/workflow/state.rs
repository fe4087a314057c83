//! Workflow phase, busy gate and command availability.

use bitflags::bitflags;
use parking_lot::Mutex;

/// What the workflow is doing right now.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Phase {
    #[default]
    Idle,
    /// A lookup or store operation is in flight
    Loading,
}

bitflags! {
    /// Set of workflow actions, used both to name an action and to report
    /// which actions can execute at the moment.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Commands: u8 {
        /// Reload records from the store
        const REFRESH = 1 << 0;
        /// Look up an address
        const SEARCH = 1 << 1;
        /// Store the last search result
        const ADD = 1 << 2;
        /// Write the edited selection back
        const UPDATE = 1 << 3;
        /// Remove the selection
        const DELETE = 1 << 4;
    }
}

impl Commands {
    /// Compute what may run given the current phase and UI state.
    pub fn available(phase: Phase, has_selection: bool, has_found: bool) -> Self {
        if phase == Phase::Loading {
            return Commands::empty();
        }

        let mut commands = Commands::REFRESH | Commands::SEARCH;
        if has_found {
            commands |= Commands::ADD;
        }
        if has_selection {
            commands |= Commands::UPDATE | Commands::DELETE;
        }
        commands
    }
}

/// At-most-one-in-flight gate.
///
/// Entering is an atomic check-and-set, so two tasks racing on a
/// multi-threaded runtime can't both get in.
#[derive(Debug, Default)]
pub struct BusyGate {
    phase: Mutex<Phase>,
}

impl BusyGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Switch from `Idle` to `Loading`. Returns `false` if already loading.
    pub fn try_enter(&self) -> bool {
        let mut phase = self.phase.lock();
        if *phase == Phase::Loading {
            return false;
        }
        *phase = Phase::Loading;
        true
    }

    /// Return to `Idle`.
    pub fn leave(&self) {
        *self.phase.lock() = Phase::Idle;
    }

    pub fn phase(&self) -> Phase {
        *self.phase.lock()
    }

    pub fn is_busy(&self) -> bool {
        self.phase() == Phase::Loading
    }
}
