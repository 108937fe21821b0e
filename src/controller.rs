//! Synchronous expense list controller.
//!
//! Each operation blocks the caller for the duration of its single network
//! call. The controller never returns an error: failures end up in
//! [`ViewState::error`] or as [`ControllerEvent`]s.

use std::sync::mpsc::Receiver;

use crate::credentials::CredentialSource;
use crate::service::ExpenseService;
use crate::state::{ControllerCore, ControllerEvent, ViewState};

/// Owns one authoritative copy of the expense collection and keeps it in
/// sync with the backend through [`load`](Self::load) and
/// [`remove`](Self::remove).
pub struct ListController<C, S> {
    core: ControllerCore,
    credentials: C,
    service: S,
}

impl<C, S> ListController<C, S>
where
    C: CredentialSource,
    S: ExpenseService,
{
    /// Create an idle controller with an empty view state.
    pub fn new(credentials: C, service: S) -> Self {
        Self {
            core: ControllerCore::new(),
            credentials,
            service,
        }
    }

    /// Create a controller and run its initial [`load`](Self::load).
    pub fn mount(credentials: C, service: S) -> Self {
        let mut controller = Self::new(credentials, service);
        controller.load();
        controller
    }

    pub fn state(&self) -> &ViewState {
        self.core.state()
    }

    /// Receive notifications and redirects emitted from now on.
    pub fn subscribe(&mut self) -> Receiver<ControllerEvent> {
        self.core.subscribe()
    }

    /// Fetch the expense list and replace the current records with it.
    ///
    /// Without a credential no request is made: the session-expired
    /// notification and login redirect are emitted and `loading` stays set.
    pub fn load(&mut self) {
        let ticket = self.core.begin_load();
        let Some(credential) = self.credentials.get() else {
            self.core.missing_credential();
            return;
        };
        let result = self.service.list(&credential);
        self.core.finish_load(ticket, result);
    }

    /// Delete an expense on the backend, then drop it from the local list.
    ///
    /// The request is sent even if `id` is not in the list.
    pub fn remove(&mut self, id: &str) {
        let Some(credential) = self.credentials.get() else {
            self.core.missing_credential();
            return;
        };
        let result = self.service.delete_by_id(id, &credential);
        self.core.finish_remove(id, result);
    }

    pub fn dismiss_error(&mut self) {
        self.core.dismiss_error();
    }

    pub fn credentials(&self) -> &C {
        &self.credentials
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    /// Tear the view down, returning its last state.
    pub fn unmount(mut self) -> ViewState {
        self.core.deactivate();
        self.core.state().clone()
    }
}
