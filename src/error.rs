use thiserror::Error;

#[derive(Error, Debug)]
pub enum StatuslineError {
    #[error("{0} is not configured")]
    NotConfigured(String),

    #[error("{0} is not installed")]
    MissingTool(String),

    #[error("`{command}` timed out after {timeout_ms}ms")]
    Timeout { command: String, timeout_ms: u128 },

    #[error("`{command}` exited with {status}")]
    CommandFailed { command: String, status: String },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, StatuslineError>;
