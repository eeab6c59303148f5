//! Error types for the chat client.

use kairo_shared::CodecError;
use thiserror::Error;

/// Client-specific errors
#[derive(Debug, Error)]
pub enum ClientError {
    /// The server could not be reached
    #[error("Failed to connect to {addr}: {source}")]
    Connection {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    /// The server closed the connection
    #[error("Server disconnected")]
    ServerClosed,

    /// Reading from or writing to the server failed
    #[error("Connection error: {0}")]
    Io(#[from] std::io::Error),

    /// A record from the server could not be decoded
    #[error(transparent)]
    Codec(#[from] CodecError),
}

/// Rejected local input. The user is prompted again.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InputError {
    #[error("Input cannot be empty!")]
    Empty,

    #[error("Input cannot be more than {max} characters!")]
    TooLong { len: usize, max: usize },
}
