//! Error types for slot-engine operations.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SlotError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error("Calendar source '{source_name}' unavailable: {reason}")]
    UpstreamUnavailable { source_name: String, reason: String },

    #[error("Malformed busy interval: {0}")]
    MalformedBusyInterval(String),
}

pub type Result<T> = std::result::Result<T, SlotError>;
