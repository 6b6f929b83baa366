//! Error types for the notical service.

use thiserror::Error;

/// Errors that can occur in notical operations.
#[derive(Error, Debug)]
pub enum NoticalError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("ICS parse error: {0}")]
    IcsParse(String),

    #[error("ICS generation error: {0}")]
    IcsGenerate(String),

    #[error("Could not parse model output as JSON")]
    ModelOutput { raw: String },

    #[error("Invalid timestamp: '{value}'")]
    InvalidTimestamp { value: String },

    #[error("No event matching '{title}' starting at {start}")]
    EventNotFound { title: String, start: String },

    #[error("Extraction service error: {0}")]
    Extraction(String),
}

/// Result type alias for notical operations.
pub type NoticalResult<T> = Result<T, NoticalError>;
