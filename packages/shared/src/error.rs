//! Error types for the wire codec.

use thiserror::Error;

/// Codec errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// The buffer cannot hold a whole record
    #[error("Buffer too small: a record needs {required} bytes, buffer has {actual}")]
    BufferTooSmall { required: usize, actual: usize },
}
