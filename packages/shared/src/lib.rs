//! Shared building blocks for the Kairo relay.
//!
//! Both the server and the client depend on this crate for the wire protocol
//! (the fixed-layout `Message` record and its codec), logging setup, and the
//! clock abstraction used to stamp messages.

pub mod codec;
pub mod error;
pub mod logger;
pub mod protocol;
pub mod time;

pub use codec::{decode, encode};
pub use error::CodecError;
pub use protocol::Message;
