//! Kairo chat client.
//!
//! Connects to a relay server, reads lines from the terminal, keeps a local
//! chat log and shows every message exchanged in the session.

pub mod chat_log;
pub mod domain;
pub mod error;
pub mod formatter;
pub mod session;

mod runner;
mod ui;

pub use chat_log::ChatLog;
pub use error::{ClientError, InputError};
pub use runner::run_client;
pub use session::{ClientSession, LocalAction, SessionState};
