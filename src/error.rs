#[derive(Debug, thiserror::Error)]
pub enum ExpenseError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Unexpected status code: {0}")]
    Status(u16),

    #[error("Task error: {0}")]
    Task(String),
}

pub type Result<T> = std::result::Result<T, ExpenseError>;
