//! Remote expense service: the two REST calls the list view depends on.
//!
//! [`ExpenseService`] is the seam the controllers are written against;
//! [`HttpExpenseService`] is the production implementation over a blocking
//! `reqwest` client.

use std::sync::Arc;
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::AUTHORIZATION;
use reqwest::Url;

use crate::config;
use crate::error::{ExpenseError, Result};
use crate::models::ExpenseRecord;

/// Backend operations needed by the expense list.
pub trait ExpenseService: Send + Sync {
    /// Fetch every expense visible to `credential`, in server order.
    ///
    /// Any non-2xx answer is an [`ExpenseError::Status`].
    fn list(&self, credential: &str) -> Result<Vec<ExpenseRecord>>;

    /// Delete one expense and report the HTTP status the server answered with.
    ///
    /// Only transport-level failures are errors; interpreting the status is
    /// left to the caller.
    fn delete_by_id(&self, id: &str, credential: &str) -> Result<u16>;
}

impl<T: ExpenseService + ?Sized> ExpenseService for Box<T> {
    fn list(&self, credential: &str) -> Result<Vec<ExpenseRecord>> {
        (**self).list(credential)
    }

    fn delete_by_id(&self, id: &str, credential: &str) -> Result<u16> {
        (**self).delete_by_id(id, credential)
    }
}

impl<T: ExpenseService + ?Sized> ExpenseService for Arc<T> {
    fn list(&self, credential: &str) -> Result<Vec<ExpenseRecord>> {
        (**self).list(credential)
    }

    fn delete_by_id(&self, id: &str, credential: &str) -> Result<u16> {
        (**self).delete_by_id(id, credential)
    }
}

// ---------------------------------------------------------------------------
// HttpExpenseService
// ---------------------------------------------------------------------------

/// [`ExpenseService`] talking JSON over HTTP to `{base_url}/api/expenses`.
pub struct HttpExpenseService {
    base_url: Url,
    client: Client,
}

impl HttpExpenseService {
    /// Create a service for the backend at `base_url`.
    ///
    /// The base URL may carry a path prefix (e.g. `https://host/app`); the
    /// expense endpoints are appended to it.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| ExpenseError::InvalidUrl(format!("{}: {}", base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(ExpenseError::InvalidUrl(base_url.to_string()));
        }
        // Redirects are not followed: a 3xx (e.g. an auth proxy bouncing to a
        // login page) must reach the caller as-is, never as the target's status.
        let client = Client::builder()
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::none())
            .build()?;
        Ok(Self { base_url, client })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// URL of the collection, or of a single record when `id` is given.
    ///
    /// The id is pushed as one path segment so reserved characters are
    /// percent-encoded rather than interpreted.
    pub fn endpoint(&self, id: Option<&str>) -> Result<Url> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| ExpenseError::InvalidUrl(self.base_url.to_string()))?;
            segments.pop_if_empty().extend(config::EXPENSES_PATH);
            if let Some(id) = id {
                segments.push(id);
            }
        }
        Ok(url)
    }
}

impl ExpenseService for HttpExpenseService {
    fn list(&self, credential: &str) -> Result<Vec<ExpenseRecord>> {
        let url = self.endpoint(None)?;
        tracing::debug!("GET {}", url);
        let resp = self
            .client
            .get(url)
            .header(AUTHORIZATION, format!("Bearer {}", credential))
            .send()?;
        let status = resp.status();
        if !status.is_success() {
            return Err(ExpenseError::Status(status.as_u16()));
        }
        let body = resp.text()?;
        let records: Vec<ExpenseRecord> = serde_json::from_str(&body)?;
        Ok(records)
    }

    fn delete_by_id(&self, id: &str, credential: &str) -> Result<u16> {
        let url = self.endpoint(Some(id))?;
        tracing::debug!("DELETE {}", url);
        let resp = self
            .client
            .delete(url)
            .header(AUTHORIZATION, format!("Bearer {}", credential))
            .send()?;
        Ok(resp.status().as_u16())
    }
}
