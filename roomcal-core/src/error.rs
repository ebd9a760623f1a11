//! Error types for roomcal.

use thiserror::Error;

/// Errors that can occur while loading, parsing or publishing a feed.
#[derive(Error, Debug)]
pub enum RoomcalError {
    /// The upstream feed answered with something other than 200.
    #[error("non-200 code: {0}")]
    Fetch(u16),

    #[error("Request error: {0}")]
    Request(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The parsed document has no calendar container to take events from.
    #[error("no events in the ics")]
    NoEventContainer,

    #[error("ICS parse error: {0}")]
    IcsParse(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Result type alias for roomcal operations.
pub type RoomcalResult<T> = Result<T, RoomcalError>;
