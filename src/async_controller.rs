//! Async expense list controller for use in Tokio runtimes.
//!
//! Credential lookups and service calls run on the blocking thread pool via
//! [`tokio::task::spawn_blocking`], keeping the event loop free. The handle
//! is cheap to clone, so several `load()`/`remove()` calls may be in flight
//! at once; their completions are serialized through one mutex-guarded
//! state core, where stale loads and post-unmount completions are dropped.
//!
//! # Example
//!
//! ```no_run
//! use expense_list::{AsyncListController, HttpExpenseService, StaticCredential};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() {
//!     let service = tokio::task::spawn_blocking(|| {
//!         HttpExpenseService::new("http://localhost:5000", Duration::from_secs(30))
//!     })
//!     .await
//!     .unwrap()
//!     .unwrap();
//!
//!     let list = AsyncListController::mount(StaticCredential::new("token"), service).await;
//!     println!("{} expenses", list.state().records().len());
//! }
//! ```

use std::sync::mpsc::Receiver;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::credentials::CredentialSource;
use crate::error::{ExpenseError, Result};
use crate::service::ExpenseService;
use crate::state::{ControllerCore, ControllerEvent, ViewState};

/// Async counterpart of [`ListController`](crate::ListController).
pub struct AsyncListController<C, S> {
    core: Arc<Mutex<ControllerCore>>,
    credentials: Arc<C>,
    service: Arc<S>,
}

impl<C, S> Clone for AsyncListController<C, S> {
    fn clone(&self) -> Self {
        Self {
            core: Arc::clone(&self.core),
            credentials: Arc::clone(&self.credentials),
            service: Arc::clone(&self.service),
        }
    }
}

impl<C, S> AsyncListController<C, S>
where
    C: CredentialSource + 'static,
    S: ExpenseService + 'static,
{
    /// Create an idle controller with an empty view state.
    pub fn new(credentials: C, service: S) -> Self {
        Self {
            core: Arc::new(Mutex::new(ControllerCore::new())),
            credentials: Arc::new(credentials),
            service: Arc::new(service),
        }
    }

    /// Create a controller and run its initial [`load`](Self::load).
    pub async fn mount(credentials: C, service: S) -> Self {
        let controller = Self::new(credentials, service);
        controller.load().await;
        controller
    }

    fn lock(&self) -> MutexGuard<'_, ControllerCore> {
        // The core is never left half-updated, so a poisoned lock is usable.
        self.core.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Snapshot of the current view state.
    pub fn state(&self) -> ViewState {
        self.lock().state().clone()
    }

    pub fn is_active(&self) -> bool {
        self.lock().is_active()
    }

    /// Receive notifications and redirects emitted from now on.
    pub fn subscribe(&self) -> Receiver<ControllerEvent> {
        self.lock().subscribe()
    }

    /// Fetch the expense list and replace the current records with it.
    ///
    /// If another load is issued before this one completes, this one's
    /// result is discarded.
    pub async fn load(&self) {
        let ticket = {
            let mut core = self.lock();
            if !core.is_active() {
                tracing::debug!("load() on unmounted controller ignored");
                return;
            }
            core.begin_load()
        };
        match self.call(|service, credential| service.list(credential)).await {
            Some(result) => {
                self.lock().finish_load(ticket, result);
            }
            None => self.lock().missing_credential(),
        }
    }

    /// Delete an expense on the backend, then drop it from the local list.
    pub async fn remove(&self, id: &str) {
        if !self.is_active() {
            tracing::debug!("remove({}) on unmounted controller ignored", id);
            return;
        }
        let target = id.to_string();
        match self
            .call(move |service, credential| service.delete_by_id(&target, credential))
            .await
        {
            Some(result) => {
                self.lock().finish_remove(id, result);
            }
            None => self.lock().missing_credential(),
        }
    }

    /// Look up the credential and run `f` with it, both on the blocking
    /// pool; credential sources may read files. `None` means no credential.
    async fn call<T, F>(&self, f: F) -> Option<Result<T>>
    where
        F: FnOnce(&S, &str) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let credentials = Arc::clone(&self.credentials);
        let service = Arc::clone(&self.service);
        let joined = tokio::task::spawn_blocking(move || {
            credentials
                .get()
                .map(|credential| f(&service, &credential))
        })
        .await;
        match joined {
            Ok(outcome) => outcome,
            Err(e) => Some(Err(ExpenseError::Task(format!("Task join error: {e}")))),
        }
    }

    pub fn dismiss_error(&self) {
        self.lock().dismiss_error();
    }

    /// Tear the view down. Requests still in flight complete on the backend
    /// but no longer touch the state or emit events.
    pub fn unmount(&self) {
        self.lock().deactivate();
    }
}
