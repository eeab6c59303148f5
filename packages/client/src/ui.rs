//! Terminal input and output for the client.

use std::io::Write;

use rustyline::{DefaultEditor, error::ReadlineError};
use tokio::sync::mpsc;

/// Prompt shown while waiting for the display name
pub const NAME_PROMPT: &str = "Enter your name: ";

/// Start reading lines from the terminal on a dedicated thread.
///
/// The first line is read with `NAME_PROMPT`; later lines use an empty prompt
/// because the chat view already ends with one. The channel closes on EOF,
/// Ctrl+C, or a readline error.
pub fn spawn_input_reader() -> mpsc::UnboundedReceiver<String> {
    let (input_tx, input_rx) = mpsc::unbounded_channel::<String>();

    std::thread::spawn(move || {
        let mut rl = match DefaultEditor::new() {
            Ok(rl) => rl,
            Err(e) => {
                tracing::error!("Failed to initialize readline: {}", e);
                return;
            }
        };

        let mut prompt = NAME_PROMPT;
        loop {
            match rl.readline(prompt) {
                Ok(line) => {
                    if !line.is_empty() {
                        rl.add_history_entry(line.as_str()).ok();
                    }
                    if input_tx.send(line).is_err() {
                        // Session is gone
                        break;
                    }
                    prompt = "";
                }
                Err(ReadlineError::Interrupted) => {
                    tracing::info!("Interrupted");
                    break;
                }
                Err(ReadlineError::Eof) => {
                    tracing::info!("EOF");
                    break;
                }
                Err(err) => {
                    tracing::error!("Readline error: {}", err);
                    break;
                }
            }
        }
    });

    input_rx
}

/// Print a full view to stdout
pub fn redisplay(view: &str) {
    print!("\n{}", view);
    std::io::stdout().flush().ok();
}
