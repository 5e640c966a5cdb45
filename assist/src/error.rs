//! Error types for the safety assist library

use centroidtrack::TrackerError;
use thiserror::Error;

/// Result type alias for the safety assist library
pub type Result<T> = std::result::Result<T, AssistError>;

/// Errors that can occur while configuring or running an assist module
#[derive(Error, Debug)]
pub enum AssistError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Unknown assist module: {0} (available: passthrough, object_detection)")]
    UnknownModule(String),

    #[error("Tracker error: {0}")]
    Tracker(#[from] TrackerError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl AssistError {
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::Config(msg.into())
    }

    pub fn unknown_module<S: Into<String>>(name: S) -> Self {
        Self::UnknownModule(name.into())
    }
}
