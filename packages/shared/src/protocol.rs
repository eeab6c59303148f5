//! Wire protocol constants and the `Message` record.
//!
//! A message travels as a fixed 296-byte record:
//!
//! ```text
//! +------------------+---------------------+----------------+
//! | sender_name (32) | content (256)       | timestamp (8)  |
//! | NUL padded       | NUL padded          | i64, host order|
//! +------------------+---------------------+----------------+
//! ```
//!
//! There is no header and no length prefix: the record size is the only
//! framing. Readers must therefore consume exactly `RECORD_SIZE` bytes per
//! message (see `read_exact` in the server reactor and client session).

/// Default TCP port of the relay server
pub const DEFAULT_PORT: u16 = 8080;

/// Width of the `sender_name` field on the wire (including the NUL terminator)
pub const SENDER_NAME_SIZE: usize = 32;

/// Width of the `content` field on the wire (including the NUL terminator)
pub const CONTENT_SIZE: usize = 256;

/// Width of the `timestamp` field on the wire
pub const TIMESTAMP_SIZE: usize = std::mem::size_of::<i64>();

/// Total size of one encoded message record
pub const RECORD_SIZE: usize = SENDER_NAME_SIZE + CONTENT_SIZE + TIMESTAMP_SIZE;

/// Maximum number of visible bytes in a sender name
pub const MAX_SENDER_NAME_LEN: usize = SENDER_NAME_SIZE - 1;

/// Maximum number of visible bytes in message content
pub const MAX_CONTENT_LEN: usize = CONTENT_SIZE - 1;

/// Content that ends a session instead of being relayed
pub const DISCONNECT_SENTINEL: &str = "quit";

/// A chat message as it is relayed between clients.
///
/// Fields are bounded to what fits on the wire. `Message::new` truncates its
/// inputs so that a constructed message always survives an encode/decode
/// round trip unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    /// Display name of the sender (at most 31 bytes)
    pub sender_name: String,
    /// Message text (at most 255 bytes)
    pub content: String,
    /// Unix timestamp in seconds
    pub timestamp: i64,
}

impl Message {
    /// Create a new message, truncating fields to their wire widths
    pub fn new(sender_name: impl AsRef<str>, content: impl AsRef<str>, timestamp: i64) -> Self {
        Self {
            sender_name: bounded(sender_name.as_ref(), MAX_SENDER_NAME_LEN).to_string(),
            content: bounded(content.as_ref(), MAX_CONTENT_LEN).to_string(),
            timestamp,
        }
    }

    /// Whether this message asks the receiver to close the connection
    pub fn is_disconnect(&self) -> bool {
        self.content == DISCONNECT_SENTINEL
    }
}

/// Cut `value` at its first NUL byte and then to at most `max_len` bytes,
/// never splitting a UTF-8 character.
pub fn bounded(value: &str, max_len: usize) -> &str {
    let value = match value.find('\0') {
        Some(nul) => &value[..nul],
        None => value,
    };
    if value.len() <= max_len {
        return value;
    }
    let mut end = max_len;
    while !value.is_char_boundary(end) {
        end -= 1;
    }
    &value[..end]
}
