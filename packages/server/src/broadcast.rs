//! Broadcast dispatcher.
//!
//! A relayed record is written to every occupied slot except the sender's.
//! The reactor forwards the bytes it received, so recipients see exactly what
//! the sender wrote. Delivery is best effort: a failed write is logged and
//! dropped, and the remaining recipients are still served. There is no retry
//! and no per-recipient queue, so a peer that stops reading can hold up the
//! reactor until its write completes.

use async_trait::async_trait;
use kairo_shared::Message;
use tokio::{io::AsyncWriteExt, net::tcp::OwnedWriteHalf};

use crate::table::{ConnectionTable, SlotIndex};

/// Destination for encoded message records
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecordSink: Send {
    /// Write one whole record to the peer
    async fn send_record(&mut self, record: &[u8]) -> std::io::Result<()>;
}

#[async_trait]
impl RecordSink for OwnedWriteHalf {
    async fn send_record(&mut self, record: &[u8]) -> std::io::Result<()> {
        self.write_all(record).await
    }
}

/// Outcome of one broadcast
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BroadcastReport {
    /// Recipients the record was written to
    pub delivered: usize,
    /// Recipients whose write failed
    pub failed: usize,
}

/// Send `message` to every occupied slot except `sender`.
///
/// # Arguments
///
/// * `table` - Connection table owned by the reactor
/// * `sender` - Slot index of the client that sent the message
/// * `message` - Decoded message to relay
///
/// # Returns
///
/// How many recipients were written to and how many writes failed
pub async fn broadcast<W: RecordSink>(
    table: &mut ConnectionTable<W>,
    sender: SlotIndex,
    message: &Message,
) -> BroadcastReport {
    broadcast_record(table, sender, &message.to_record()).await
}

/// Send an already encoded record, unchanged, to every occupied slot except
/// `sender`.
pub async fn broadcast_record<W: RecordSink>(
    table: &mut ConnectionTable<W>,
    sender: SlotIndex,
    record: &[u8],
) -> BroadcastReport {
    let mut report = BroadcastReport::default();

    for slot in table.iter_mut().filter(|slot| slot.index != sender) {
        match slot.connection.send_record(record).await {
            Ok(()) => {
                report.delivered += 1;
                tracing::debug!("Relayed message from slot {} to slot {}", sender, slot.index);
            }
            Err(e) => {
                report.failed += 1;
                tracing::warn!("Failed to send message to slot {}: {}", slot.index, e);
            }
        }
    }

    report
}
