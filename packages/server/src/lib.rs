//! Kairo relay server.
//!
//! Clients connect over TCP and send fixed-size message records. The server
//! relays each record to every other connected client from a single-threaded
//! reactor that owns all connection state.

pub mod broadcast;
pub mod error;
pub mod reactor;
pub mod signal;
pub mod table;

mod runner;

pub use broadcast::{BroadcastReport, RecordSink, broadcast, broadcast_record};
pub use error::{ServerError, TableError};
pub use reactor::Reactor;
pub use runner::run_server;
pub use table::{ClientSlot, ConnectionTable, MAX_CLIENTS, SlotIndex};
