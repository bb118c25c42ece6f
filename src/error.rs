//! Error types for the shiftgrid crate.

use thiserror::Error;

/// Errors that can occur in shiftgrid operations.
///
/// Grid, layout, and drag paths never produce errors; they clamp or
/// degrade to a no-op instead. Only the remote-I/O and preference
/// persistence boundaries are fallible.
#[derive(Error, Debug)]
pub enum GridError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Event not found: {0}")]
    EventNotFound(String),

    #[error("Remote error: {0}")]
    Remote(String),

    /// The remote store no longer has the row. Sync treats this as a
    /// soft success and clears the pending entry.
    #[error("Remote row not found: {0}")]
    RemoteNotFound(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for shiftgrid operations.
pub type GridResult<T> = Result<T, GridError>;
