//! Pure input handling rules for the client.

use kairo_shared::protocol::{DISCONNECT_SENTINEL, MAX_CONTENT_LEN};

use crate::error::InputError;

/// Longest line accepted as message content
pub const MAX_INPUT_LEN: usize = MAX_CONTENT_LEN - 1;

/// Strip one trailing line terminator (`\n` or `\r\n`)
pub fn trim_newline(line: &str) -> &str {
    let line = line.strip_suffix('\n').unwrap_or(line);
    line.strip_suffix('\r').unwrap_or(line)
}

/// Whether the line asks to end the session
pub fn is_quit(line: &str) -> bool {
    line == DISCONNECT_SENTINEL
}

/// Check that a line can be sent as message content.
///
/// # Returns
///
/// * `Ok(&str)` - The line, unchanged
/// * `Err(InputError::Empty)` - The line is empty
/// * `Err(InputError::TooLong)` - The line is `MAX_CONTENT_LEN` bytes or longer
pub fn validate_input(line: &str) -> Result<&str, InputError> {
    if line.is_empty() {
        return Err(InputError::Empty);
    }
    if line.len() > MAX_INPUT_LEN {
        return Err(InputError::TooLong {
            len: line.len(),
            max: MAX_INPUT_LEN,
        });
    }
    Ok(line)
}
