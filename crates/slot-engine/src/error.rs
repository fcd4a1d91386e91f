//! Error types for slot-engine operations.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SlotError {
    #[error("Invalid datetime: {0}")]
    InvalidDateTime(String),

    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error("Invalid policy: {0}")]
    InvalidPolicy(String),

    /// The booking or availability store could not be read. Fatal for the
    /// whole invocation; retrying is up to the caller.
    #[error("Store error during {operation}: {message}")]
    Store { operation: String, message: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl SlotError {
    pub fn store(operation: impl Into<String>, message: impl Into<String>) -> Self {
        SlotError::Store {
            operation: operation.into(),
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, SlotError>;
