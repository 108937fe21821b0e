use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";
pub const EXPENSES_PATH: &[&str] = &["api", "expenses"];
pub const LOGIN_LOCATION: &str = "/login";

pub const BASE_URL_ENV: &str = "EXPENSE_API_URL";
pub const TOKEN_ENV: &str = "EXPENSE_AUTH_TOKEN";
pub const TOKEN_FILE: &str = "auth_token";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

// User-facing messages
pub const SESSION_EXPIRED: &str = "Session expired. Please log in.";
pub const LOAD_FAILED: &str = "Failed to load expenses.";
pub const DELETE_FAILED: &str = "Failed to delete expense.";
pub const DELETE_SUCCEEDED: &str = "Expense deleted successfully.";

pub const CURRENCY_GLYPH: &str = "\u{20b9}";

/// Base URL of the backend: `EXPENSE_API_URL` if set and non-blank,
/// otherwise [`DEFAULT_BASE_URL`].
pub fn default_base_url() -> String {
    std::env::var(BASE_URL_ENV)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
}

pub fn default_token_path() -> PathBuf {
    if let Some(config) = dirs::config_dir() {
        config.join("expense-list").join(TOKEN_FILE)
    } else {
        PathBuf::from(".expense-list").join(TOKEN_FILE)
    }
}
