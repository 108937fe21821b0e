//! Expense list SDK for Rust.
//!
//! Fetches expense records from a REST backend, keeps them in a view state
//! and deletes them on request. The [`ListController`] owns the fetch
//! lifecycle; credentials and the backend are injected through the
//! [`CredentialSource`] and [`ExpenseService`] traits, and navigation or
//! notifications are reported back as [`ControllerEvent`]s.
//!
//! # Quick start
//!
//! ```no_run
//! use expense_list::{display, ExpenseList};
//!
//! let mut list = ExpenseList::builder()
//!     .base_url("http://localhost:5000")
//!     .token("my-session-token")
//!     .mount()
//!     .unwrap();
//!
//! println!("{}", display::render_view(list.state()));
//!
//! // Delete the first expense, if any
//! if let Some(id) = list.state().records().first().map(|r| r.id.clone()) {
//!     list.remove(&id);
//! }
//! ```

#[cfg(feature = "async")]
pub mod async_controller;
pub mod cli;
pub mod config;
pub mod controller;
pub mod credentials;
pub mod display;
pub mod error;
pub mod models;
pub mod service;
pub mod state;

#[cfg(feature = "async")]
pub use async_controller::AsyncListController;
pub use controller::ListController;
pub use credentials::{
    CredentialChain, CredentialSource, EnvCredential, FileCredential, StaticCredential,
};
pub use error::{ExpenseError, Result};
pub use models::{ExpenseRecord, RecordDate};
pub use service::{ExpenseService, HttpExpenseService};
pub use state::{ControllerEvent, ViewState};

use std::time::Duration;

/// A [`ListController`] wired to the HTTP backend.
pub type ExpenseList = ListController<Box<dyn CredentialSource>, HttpExpenseService>;

// ---------------------------------------------------------------------------
// ExpenseListBuilder
// ---------------------------------------------------------------------------

/// Builder for an [`ExpenseList`] backed by [`HttpExpenseService`].
///
/// Use [`ExpenseList::builder()`] to obtain one.
pub struct ExpenseListBuilder {
    base_url: Option<String>,
    timeout: Duration,
    credentials: Option<Box<dyn CredentialSource>>,
}

impl Default for ExpenseListBuilder {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout: config::DEFAULT_TIMEOUT,
            credentials: None,
        }
    }
}

impl ExpenseListBuilder {
    /// Set the backend base URL.
    ///
    /// If not set, `EXPENSE_API_URL` is used, falling back to
    /// `http://localhost:5000`.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the HTTP request timeout.
    ///
    /// Defaults to 30 seconds.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Use a fixed bearer token.
    pub fn token(self, token: impl Into<String>) -> Self {
        self.credentials(StaticCredential::new(token))
    }

    /// Use a custom credential source.
    ///
    /// If not set, the token is read from `EXPENSE_AUTH_TOKEN`, then from
    /// the token file in the user config directory.
    pub fn credentials<C: CredentialSource + 'static>(mut self, source: C) -> Self {
        self.credentials = Some(Box::new(source));
        self
    }

    fn parts(self) -> Result<(Box<dyn CredentialSource>, HttpExpenseService)> {
        let base_url = self.base_url.unwrap_or_else(config::default_base_url);
        let service = HttpExpenseService::new(&base_url, self.timeout)?;
        let credentials = self
            .credentials
            .unwrap_or_else(|| Box::new(credentials::default_credentials()));
        Ok((credentials, service))
    }

    /// Build an idle controller; nothing is fetched yet.
    pub fn build(self) -> Result<ExpenseList> {
        let (credentials, service) = self.parts()?;
        Ok(ListController::new(credentials, service))
    }

    /// Build the controller and run its initial load.
    ///
    /// Load failures do not fail the build; they are reported through the
    /// view state like any other load.
    pub fn mount(self) -> Result<ExpenseList> {
        let (credentials, service) = self.parts()?;
        Ok(ListController::mount(credentials, service))
    }

    /// Build an async controller, constructing the blocking HTTP client on
    /// the blocking thread pool.
    #[cfg(feature = "async")]
    pub async fn build_async(
        self,
    ) -> Result<AsyncListController<Box<dyn CredentialSource>, HttpExpenseService>> {
        let (credentials, service) = tokio::task::spawn_blocking(move || self.parts())
            .await
            .map_err(|e| ExpenseError::Task(format!("Task join error: {e}")))??;
        Ok(AsyncListController::new(credentials, service))
    }
}

impl ExpenseList {
    /// Create a new builder for an HTTP-backed expense list.
    pub fn builder() -> ExpenseListBuilder {
        ExpenseListBuilder::default()
    }
}
