//! Message formatting utilities for client display.

use kairo_shared::{Message, time::format_hh_mm};

use crate::{chat_log::ChatLog, error::InputError};

const TITLE: &str = "\
*************************************************\n\
*                                               *\n\
*                Welcome to Kairo               *\n\
*                                               *\n\
*************************************************\n";

/// Message formatter for client display
pub struct MessageFormatter;

impl MessageFormatter {
    /// Format the banner shown above the chat log
    pub fn format_title() -> &'static str {
        TITLE
    }

    /// Format a single chat log entry as `[HH:MM, name] content`
    ///
    /// # Arguments
    ///
    /// * `message` - The message to format
    pub fn format_entry(message: &Message) -> String {
        format!(
            "[{}, {}] {}",
            format_hh_mm(message.timestamp),
            message.sender_name,
            message.content
        )
    }

    /// Format the whole chat view: title, log entries, the last input error
    /// (if any) and the prompt.
    ///
    /// # Arguments
    ///
    /// * `log` - Messages to show, oldest first
    /// * `user_name` - The local user's display name
    /// * `error` - Why the previous input was rejected
    ///
    /// # Returns
    ///
    /// A formatted string ready to be printed
    pub fn format_chat_view(log: &ChatLog, user_name: &str, error: Option<&InputError>) -> String {
        let mut output = String::new();
        output.push_str(TITLE);
        output.push_str("Chat log\n");

        if log.is_empty() {
            output.push_str("(empty)\n");
        } else {
            for message in log {
                output.push_str(&Self::format_entry(message));
                output.push('\n');
            }
        }
        output.push_str("\n\n");

        if let Some(error) = error {
            output.push_str(&format!("{}\n", error));
        }
        output.push_str(&Self::format_prompt(user_name));
        output
    }

    /// Format the input prompt
    pub fn format_prompt(user_name: &str) -> String {
        format!("[{}] Type your message (type 'quit' to exit): ", user_name)
    }
}
