//! Error types for the circulation hub

use thiserror::Error;

/// Main hub error type
#[derive(Error, Debug)]
pub enum HubError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Dispatch task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Result type alias for hub operations
pub type HubResult<T> = Result<T, HubError>;
