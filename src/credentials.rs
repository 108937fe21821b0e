//! Credential sources supplying the bearer token for backend requests.
//!
//! The controllers never store a token themselves; they ask their
//! [`CredentialSource`] before every request, so a token that disappears
//! (logout, expiry, deleted token file) is noticed on the next operation.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config;
use crate::error::Result;

/// Supplies a bearer token, or `None` when the user has no session.
pub trait CredentialSource: Send + Sync {
    fn get(&self) -> Option<String>;
}

impl<T: CredentialSource + ?Sized> CredentialSource for Box<T> {
    fn get(&self) -> Option<String> {
        (**self).get()
    }
}

impl<T: CredentialSource + ?Sized> CredentialSource for Arc<T> {
    fn get(&self) -> Option<String> {
        (**self).get()
    }
}

fn non_blank(token: &str) -> Option<String> {
    let token = token.trim();
    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}

// ---------------------------------------------------------------------------
// StaticCredential
// ---------------------------------------------------------------------------

/// A fixed token, or a fixed absence of one.
#[derive(Debug, Clone, Default)]
pub struct StaticCredential {
    token: Option<String>,
}

impl StaticCredential {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: non_blank(&token.into()),
        }
    }

    pub fn absent() -> Self {
        Self { token: None }
    }
}

impl CredentialSource for StaticCredential {
    fn get(&self) -> Option<String> {
        self.token.clone()
    }
}

// ---------------------------------------------------------------------------
// FnCredential
// ---------------------------------------------------------------------------

/// Adapts a closure into a [`CredentialSource`]; see [`from_fn`].
pub struct FnCredential<F>(F);

impl<F> CredentialSource for FnCredential<F>
where
    F: Fn() -> Option<String> + Send + Sync,
{
    fn get(&self) -> Option<String> {
        (self.0)()
    }
}

/// Build a credential source from a closure, e.g. one reading an
/// application's session store.
pub fn from_fn<F>(f: F) -> FnCredential<F>
where
    F: Fn() -> Option<String> + Send + Sync,
{
    FnCredential(f)
}

// ---------------------------------------------------------------------------
// EnvCredential
// ---------------------------------------------------------------------------

/// Reads the token from an environment variable on every call.
#[derive(Debug, Clone)]
pub struct EnvCredential {
    var: String,
}

impl EnvCredential {
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }
}

impl Default for EnvCredential {
    fn default() -> Self {
        Self::new(config::TOKEN_ENV)
    }
}

impl CredentialSource for EnvCredential {
    fn get(&self) -> Option<String> {
        std::env::var(&self.var).ok().and_then(|v| non_blank(&v))
    }
}

// ---------------------------------------------------------------------------
// FileCredential
// ---------------------------------------------------------------------------

/// Reads the token from a file on every call.
#[derive(Debug, Clone)]
pub struct FileCredential {
    path: PathBuf,
}

impl FileCredential {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the token file.
    ///
    /// A missing or blank file is `Ok(None)`; any other IO failure is
    /// returned as an error.
    pub fn read(&self) -> Result<Option<String>> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => Ok(non_blank(&contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

impl Default for FileCredential {
    fn default() -> Self {
        Self::new(config::default_token_path())
    }
}

impl CredentialSource for FileCredential {
    fn get(&self) -> Option<String> {
        match self.read() {
            Ok(token) => token,
            Err(e) => {
                tracing::warn!("Failed to read token file {}: {}", self.path.display(), e);
                None
            }
        }
    }
}

// ---------------------------------------------------------------------------
// CredentialChain
// ---------------------------------------------------------------------------

/// Tries each source in order; the first token found wins.
#[derive(Default)]
pub struct CredentialChain {
    sources: Vec<Box<dyn CredentialSource>>,
}

impl CredentialChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with<S: CredentialSource + 'static>(mut self, source: S) -> Self {
        self.sources.push(Box::new(source));
        self
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

impl CredentialSource for CredentialChain {
    fn get(&self) -> Option<String> {
        self.sources.iter().find_map(|s| s.get())
    }
}

/// `EXPENSE_AUTH_TOKEN`, then the token file in the user config directory.
pub fn default_credentials() -> CredentialChain {
    CredentialChain::new()
        .with(EnvCredential::default())
        .with(FileCredential::default())
}
