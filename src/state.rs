//! View state and the transition rules shared by both controllers.
//!
//! [`ControllerCore`] owns the [`ViewState`] and applies every mutation. A
//! controller splits each operation into "begin" and "finish" halves around
//! its network call, so the same rules hold whether the call blocks the
//! caller or runs on a thread pool:
//! - every load is tagged with a sequence number and only the latest one may
//!   complete; superseded completions are dropped untouched
//! - once the core is deactivated (unmounted) all completions are dropped

use std::collections::HashSet;
use std::sync::mpsc::{channel, Receiver, Sender};

use crate::config;
use crate::error::Result;
use crate::models::ExpenseRecord;

// ---------------------------------------------------------------------------
// ViewState
// ---------------------------------------------------------------------------

/// What the expense list view renders.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewState {
    records: Vec<ExpenseRecord>,
    loading: bool,
    error: Option<String>,
}

impl ViewState {
    /// Records in server order.
    pub fn records(&self) -> &[ExpenseRecord] {
        &self.records
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.records.iter().any(|r| r.id == id)
    }
}

// ---------------------------------------------------------------------------
// ControllerEvent
// ---------------------------------------------------------------------------

/// Side effects the hosting shell is expected to carry out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControllerEvent {
    /// Show a message the user must acknowledge.
    Notify(String),
    /// Navigate away from the list to the given location.
    Redirect(String),
}

/// Ticket identifying one issued load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket(u64);

impl LoadTicket {
    pub fn sequence(&self) -> u64 {
        self.0
    }
}

// ---------------------------------------------------------------------------
// ControllerCore
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub(crate) struct ControllerCore {
    state: ViewState,
    active: bool,
    latest_load: u64,
    subscribers: Vec<Sender<ControllerEvent>>,
}

impl ControllerCore {
    pub(crate) fn new() -> Self {
        Self {
            state: ViewState::default(),
            active: true,
            latest_load: 0,
            subscribers: Vec::new(),
        }
    }

    pub(crate) fn state(&self) -> &ViewState {
        &self.state
    }

    #[cfg_attr(not(feature = "async"), allow(dead_code))]
    pub(crate) fn is_active(&self) -> bool {
        self.active
    }

    pub(crate) fn subscribe(&mut self) -> Receiver<ControllerEvent> {
        let (tx, rx) = channel();
        self.subscribers.push(tx);
        rx
    }

    fn emit(&mut self, event: ControllerEvent) {
        // Receivers that were dropped are pruned here.
        self.subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }

    pub(crate) fn dismiss_error(&mut self) {
        self.state.error = None;
    }

    pub(crate) fn deactivate(&mut self) {
        self.active = false;
        self.subscribers.clear();
    }

    /// Mark a load as outstanding and hand out its ticket.
    pub(crate) fn begin_load(&mut self) -> LoadTicket {
        self.latest_load += 1;
        self.state.loading = true;
        tracing::debug!("Load #{} started", self.latest_load);
        LoadTicket(self.latest_load)
    }

    /// No credential: ask the shell to notify the user and leave the view.
    ///
    /// Records and the loading flag are left as they are.
    pub(crate) fn missing_credential(&mut self) {
        if !self.active {
            return;
        }
        tracing::warn!("No credential available; redirecting to {}", config::LOGIN_LOCATION);
        self.emit(ControllerEvent::Notify(config::SESSION_EXPIRED.to_string()));
        self.emit(ControllerEvent::Redirect(config::LOGIN_LOCATION.to_string()));
    }

    /// Apply the outcome of a load. Returns `false` if it was discarded.
    pub(crate) fn finish_load(
        &mut self,
        ticket: LoadTicket,
        result: Result<Vec<ExpenseRecord>>,
    ) -> bool {
        if !self.active {
            tracing::debug!("Load #{} finished after unmount; ignored", ticket.0);
            return false;
        }
        if ticket.0 != self.latest_load {
            tracing::debug!(
                "Load #{} superseded by #{}; ignored",
                ticket.0,
                self.latest_load
            );
            return false;
        }

        match result {
            Ok(records) => {
                check_records(&records);
                tracing::info!("Loaded {} expenses", records.len());
                self.state.records = records;
                self.state.error = None;
            }
            Err(e) => {
                tracing::warn!("Error fetching expenses: {}", e);
                self.state.error = Some(config::LOAD_FAILED.to_string());
            }
        }
        self.state.loading = false;
        true
    }

    /// Apply the outcome of a delete. Returns `false` if it was discarded.
    ///
    /// Only a 200 counts as success; the record is then filtered out by id,
    /// which is a no-op when it is already gone.
    pub(crate) fn finish_remove(&mut self, id: &str, result: Result<u16>) -> bool {
        if !self.active {
            tracing::debug!("Delete of {} finished after unmount; ignored", id);
            return false;
        }

        match result {
            Ok(200) => {
                let before = self.state.records.len();
                self.state.records.retain(|r| r.id != id);
                if self.state.records.len() == before {
                    tracing::debug!("Deleted expense {} was not in the list", id);
                } else {
                    tracing::info!("Deleted expense {}", id);
                }
                self.emit(ControllerEvent::Notify(config::DELETE_SUCCEEDED.to_string()));
            }
            Ok(status) => {
                tracing::warn!("Error deleting expense {}: status {}", id, status);
                self.state.error = Some(config::DELETE_FAILED.to_string());
            }
            Err(e) => {
                tracing::warn!("Error deleting expense {}: {}", id, e);
                self.state.error = Some(config::DELETE_FAILED.to_string());
            }
        }
        true
    }
}

/// Log server data that breaks the record invariants. The records are kept
/// as received either way.
fn check_records(records: &[ExpenseRecord]) {
    let mut seen = HashSet::new();
    for record in records {
        if !seen.insert(record.id.as_str()) {
            tracing::warn!("Duplicate expense id {} in server response", record.id);
        }
        if record.amount < 0.0 {
            tracing::warn!("Expense {} has negative amount {}", record.id, record.amount);
        }
    }
}
