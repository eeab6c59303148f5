//! Single-threaded reactor.
//!
//! The reactor owns the listening socket, the connection table and one
//! pending record read per occupied slot. Each loop iteration waits once for
//! the first ready source (shutdown signal, new connection, completed read, or
//! the periodic tick) and runs the matching handler to completion before
//! waiting again. Nothing else touches the table, so no locking is involved.
//! Completed reads are served before new connections, so a flood of
//! connection attempts cannot starve connected clients.
//!
//! Records are read with `read_exact`, so a record split or coalesced by TCP
//! is still delivered whole. A connection that closes mid-record counts as a
//! disconnect.

use std::{future::Future, io, net::SocketAddr, time::Duration};

use futures_util::{
    FutureExt, StreamExt,
    future::BoxFuture,
    stream::FuturesUnordered,
};
use kairo_shared::{decode, protocol::RECORD_SIZE};
use tokio::{
    io::AsyncReadExt,
    net::{
        TcpListener, TcpSocket, TcpStream,
        tcp::{OwnedReadHalf, OwnedWriteHalf},
    },
    time::MissedTickBehavior,
};

use crate::{
    broadcast::broadcast_record,
    error::ServerError,
    table::{ConnectionTable, MAX_CLIENTS, SlotIndex},
};

/// Length of the pending-connection queue
pub const BACKLOG: u32 = 3;

/// Upper bound on a single readiness wait; the tick has no side effects
pub const REACTOR_TICK: Duration = Duration::from_secs(1);

type RecordBuffer = Box<[u8; RECORD_SIZE]>;

/// Result of one pending read, handed back to the reactor with its reader
struct ReadOutcome {
    index: SlotIndex,
    reader: OwnedReadHalf,
    result: io::Result<RecordBuffer>,
}

async fn read_record(
    index: SlotIndex,
    mut reader: OwnedReadHalf,
    mut buffer: RecordBuffer,
) -> ReadOutcome {
    let result = reader.read_exact(&mut buffer[..]).await;
    let result = result.map(|_| buffer);
    ReadOutcome {
        index,
        reader,
        result,
    }
}

/// Relay server event loop
pub struct Reactor {
    listener: TcpListener,
    table: ConnectionTable<OwnedWriteHalf>,
    reads: FuturesUnordered<BoxFuture<'static, ReadOutcome>>,
}

impl Reactor {
    /// Bind a listening socket on `addr` with room for `MAX_CLIENTS` clients.
    ///
    /// Must be called from within a tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns `ServerError::Bind` if the socket cannot be created, bound or
    /// put into listening mode.
    pub fn bind(addr: SocketAddr) -> Result<Self, ServerError> {
        Self::bind_with_capacity(addr, MAX_CLIENTS)
    }

    /// Bind a listening socket on `addr` with room for `capacity` clients
    pub fn bind_with_capacity(addr: SocketAddr, capacity: usize) -> Result<Self, ServerError> {
        let listener = listen(addr).map_err(|source| ServerError::Bind { addr, source })?;

        Ok(Self {
            listener,
            table: ConnectionTable::with_capacity(capacity),
            reads: FuturesUnordered::new(),
        })
    }

    /// Address the listener is bound to
    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Run the event loop until `shutdown` completes, then close every
    /// connection and the listener.
    pub async fn run_until<F>(mut self, shutdown: F) -> Result<(), ServerError>
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);

        let mut tick = tokio::time::interval(REACTOR_TICK);
        tick.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;
                _ = &mut shutdown => break,
                Some(outcome) = self.reads.next(), if !self.reads.is_empty() => {
                    self.handle_read(outcome).await;
                }
                accepted = self.listener.accept() => self.handle_accept(accepted),
                _ = tick.tick() => {
                    tracing::trace!("Reactor tick ({} clients connected)", self.table.len());
                }
            }
        }

        self.shutdown();
        Ok(())
    }

    fn handle_accept(&mut self, accepted: io::Result<(TcpStream, SocketAddr)>) {
        let (stream, peer) = match accepted {
            Ok(accepted) => accepted,
            Err(e) => {
                tracing::warn!("Failed to accept connection: {}", e);
                return;
            }
        };

        let (reader, writer) = stream.into_split();
        match self.table.allocate_slot(writer) {
            Ok(index) => {
                tracing::info!("Client {} connected (slot {})", peer, index);
                self.arm_read(index, reader, Box::new([0u8; RECORD_SIZE]));
            }
            Err(e) => {
                // Dropping both halves closes the rejected connection.
                tracing::warn!("{}. Rejecting connection from {}", e, peer);
            }
        }
    }

    async fn handle_read(&mut self, outcome: ReadOutcome) {
        let ReadOutcome {
            index,
            reader,
            result,
        } = outcome;

        let buffer = match result {
            Ok(buffer) => buffer,
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => {
                tracing::info!("Client in slot {} disconnected", index);
                self.close_slot(index);
                return;
            }
            Err(e) => {
                tracing::warn!("Read error on slot {}: {}", index, e);
                self.close_slot(index);
                return;
            }
        };

        let message = match decode(&buffer[..]) {
            Ok(message) => message,
            Err(e) => {
                tracing::warn!("Discarding record from slot {}: {}", index, e);
                self.arm_read(index, reader, buffer);
                return;
            }
        };

        if message.is_disconnect() {
            tracing::info!(
                "Client '{}' in slot {} asked to disconnect",
                message.sender_name,
                index
            );
            self.close_slot(index);
            return;
        }

        if let Some(slot) = self.table.get_mut(index) {
            slot.messages_received += 1;
        }
        tracing::info!("[{}] {}", message.sender_name, message.content);

        let report = broadcast_record(&mut self.table, index, &buffer[..]).await;
        tracing::debug!(
            "Message from slot {} delivered to {} clients ({} failed)",
            index,
            report.delivered,
            report.failed
        );

        self.arm_read(index, reader, buffer);
    }

    fn arm_read(&mut self, index: SlotIndex, reader: OwnedReadHalf, buffer: RecordBuffer) {
        self.reads.push(read_record(index, reader, buffer).boxed());
    }

    fn close_slot(&mut self, index: SlotIndex) {
        if let Some(slot) = self.table.free_slot(index) {
            tracing::debug!(
                "Released slot {} after {} messages ({} clients remain)",
                slot.index,
                slot.messages_received,
                self.table.len()
            );
        }
    }

    fn shutdown(mut self) {
        tracing::info!("Shutting down reactor");
        self.reads.clear();
        let closed = self.table.clear();
        tracing::info!("Closed {} client connections", closed);
    }
}

fn listen(addr: SocketAddr) -> io::Result<TcpListener> {
    let socket = match addr {
        SocketAddr::V4(_) => TcpSocket::new_v4()?,
        SocketAddr::V6(_) => TcpSocket::new_v6()?,
    };
    socket.set_reuseaddr(true)?;
    socket.bind(addr)?;
    socket.listen(BACKLOG)
}

#[cfg(test)]
mod tests {
    use super::*;
    use kairo_shared::Message;
    use tokio::{io::AsyncWriteExt, sync::oneshot};

    fn localhost() -> SocketAddr {
        "127.0.0.1:0".parse().unwrap()
    }

    #[tokio::test]
    async fn test_bind_reports_local_addr() {
        // テスト項目: エフェメラルポートへのバインドで実際のアドレスが取得できる
        // given (前提条件):
        let reactor = Reactor::bind(localhost()).unwrap();

        // when (操作):
        let addr = reactor.local_addr().unwrap();

        // then (期待する結果):
        assert!(addr.port() > 0);
    }

    #[tokio::test]
    async fn test_bind_fails_on_port_in_use() {
        // テスト項目: 使用中のポートへのバインドは Bind エラーになる
        // given (前提条件):
        let first = Reactor::bind(localhost()).unwrap();
        let addr = first.local_addr().unwrap();
        let _keep_listening = first;

        // when (操作):
        let reactor = Reactor::bind(addr);

        // then (期待する結果):
        // SO_REUSEADDR does not allow two listeners on one port
        assert!(matches!(reactor, Err(ServerError::Bind { .. })));
    }

    #[tokio::test]
    async fn test_run_until_stops_on_shutdown() {
        // テスト項目: シャットダウン通知でイベントループが終了し接続が閉じられる
        // given (前提条件):
        let reactor = Reactor::bind(localhost()).unwrap();
        let addr = reactor.local_addr().unwrap();
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let handle = tokio::spawn(reactor.run_until(async {
            let _ = shutdown_rx.await;
        }));

        let mut client = TcpStream::connect(addr).await.unwrap();
        client
            .write_all(&Message::new("alice", "hello", 1).to_record())
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;

        // when (操作):
        shutdown_tx.send(()).unwrap();
        let result = handle.await.unwrap();

        // then (期待する結果):
        assert!(result.is_ok());
        let mut buf = [0u8; 1];
        let read = client.read(&mut buf).await;
        assert!(matches!(read, Ok(0) | Err(_)));
    }
}
