//! Error types for `oggcast` core library.

use thiserror::Error;

/// Result type alias using `oggcast` Error.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error types for `oggcast` operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid or inconsistent session configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Metadata file could not be loaded
    #[error("Metadata error: {0}")]
    Metadata(String),

    /// Failure reported by the streaming session
    #[error(transparent)]
    Session(#[from] SessionError),
}

/// Errors reported by a [`SourceSession`](crate::session::SourceSession).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("Session is connected")]
    Connected,

    #[error("Session is not connected")]
    NotConnected,

    #[error("Invalid setting: {0}")]
    InvalidSetting(String),

    #[error("Connection error: {0}")]
    Connect(String),

    #[error("Send error: {0}")]
    Send(String),

    #[error("Unsupported: {0}")]
    Unsupported(String),
}
