//! Client session: local input, inbound records and the chat log.
//!
//! The session runs one readiness loop that waits on the interrupt signal,
//! the local input channel and the inbound record stream, and handles
//! whichever is ready first to completion. The chat log is owned by the
//! session and only touched from this loop.

use std::future::Future;

use futures_util::{Stream, StreamExt, stream};
use kairo_shared::{
    Message, decode,
    protocol::{MAX_SENDER_NAME_LEN, RECORD_SIZE, bounded},
    time::Clock,
};
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::{TcpStream, tcp::OwnedReadHalf},
    sync::mpsc,
};

use crate::{
    chat_log::ChatLog,
    domain::{is_quit, trim_newline, validate_input},
    error::{ClientError, InputError},
    formatter::MessageFormatter,
    ui::redisplay,
};

/// Lifecycle of a client session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Waiting for the first input line, which becomes the display name
    AwaitingName,
    /// Exchanging messages
    Connected,
    /// Quit requested or connection lost; resources are being released
    Closing,
    /// Session over
    Terminated,
}

/// What the session decided to do with one line of local input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocalAction {
    /// The line became the display name
    Named,
    /// The line was rejected; nothing was logged or sent
    Rejected(InputError),
    /// The line was logged and must be sent to the server
    Send(Message),
    /// The user asked to quit
    Quit,
}

/// Chat client session
pub struct ClientSession<C: Clock> {
    state: SessionState,
    user_name: String,
    log: ChatLog,
    last_error: Option<InputError>,
    clock: C,
    echo: bool,
}

impl<C: Clock> ClientSession<C> {
    /// Create a session waiting for the user's display name
    pub fn new(clock: C) -> Self {
        Self {
            state: SessionState::AwaitingName,
            user_name: String::new(),
            log: ChatLog::new(),
            last_error: None,
            clock,
            echo: true,
        }
    }

    /// Stop printing the chat view to stdout
    pub fn without_echo(mut self) -> Self {
        self.echo = false;
        self
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn user_name(&self) -> &str {
        &self.user_name
    }

    pub fn log(&self) -> &ChatLog {
        &self.log
    }

    /// Handle one line of local input.
    ///
    /// In `AwaitingName` the line becomes the display name. Afterwards `quit`
    /// moves to `Closing`, invalid lines are rejected without touching the
    /// log, and valid lines are stamped, appended to the log (local echo) and
    /// returned for transmission.
    pub fn handle_local_line(&mut self, line: &str) -> LocalAction {
        let line = trim_newline(line);

        match self.state {
            SessionState::AwaitingName => {
                self.user_name = bounded(line, MAX_SENDER_NAME_LEN).to_string();
                self.state = SessionState::Connected;
                tracing::info!("Joined as '{}'", self.user_name);
                LocalAction::Named
            }
            SessionState::Connected => {
                if is_quit(line) {
                    self.state = SessionState::Closing;
                    return LocalAction::Quit;
                }

                match validate_input(line) {
                    Ok(content) => {
                        self.last_error = None;
                        let message =
                            Message::new(&self.user_name, content, self.clock.now_epoch_secs());
                        self.log.append(message.clone());
                        LocalAction::Send(message)
                    }
                    Err(e) => {
                        tracing::debug!("Rejected input: {}", e);
                        self.last_error = Some(e.clone());
                        LocalAction::Rejected(e)
                    }
                }
            }
            SessionState::Closing | SessionState::Terminated => LocalAction::Quit,
        }
    }

    /// Append a message received from the server
    pub fn handle_inbound(&mut self, message: Message) {
        tracing::debug!("Received message from '{}'", message.sender_name);
        self.log.append(message);
    }

    /// Run the session over `stream` until the user quits, local input ends,
    /// `shutdown` completes, or the server connection is lost.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::ServerClosed` or `ClientError::Io` when the
    /// connection to the server is lost. The session is `Terminated` either
    /// way.
    pub async fn run<S>(
        &mut self,
        stream: TcpStream,
        mut input: mpsc::UnboundedReceiver<String>,
        shutdown: S,
    ) -> Result<(), ClientError>
    where
        S: Future<Output = ()>,
    {
        let (reader, mut writer) = stream.into_split();
        let inbound = inbound_records(reader);
        tokio::pin!(inbound, shutdown);

        if self.state == SessionState::Connected {
            self.show();
        }

        let result = loop {
            tokio::select! {
                biased;
                _ = &mut shutdown => {
                    tracing::info!("Interrupted, closing session");
                    break Ok(());
                }
                line = input.recv() => {
                    let Some(line) = line else {
                        tracing::info!("Local input closed, closing session");
                        break Ok(());
                    };
                    match self.handle_local_line(&line) {
                        LocalAction::Named | LocalAction::Rejected(_) => self.show(),
                        LocalAction::Send(message) => {
                            if let Err(e) = writer.write_all(&message.to_record()).await {
                                tracing::warn!("Failed to send message: {}", e);
                                break Err(ClientError::Io(e));
                            }
                            self.show();
                        }
                        LocalAction::Quit => break Ok(()),
                    }
                }
                record = inbound.next() => match record {
                    Some(Ok(message)) => {
                        self.handle_inbound(message);
                        if self.state == SessionState::Connected {
                            self.show();
                        }
                    }
                    Some(Err(e)) => break Err(e),
                    None => break Err(ClientError::ServerClosed),
                }
            }
        };

        self.state = SessionState::Closing;
        tracing::debug!("Closing session ({} messages in log)", self.log.len());
        // Dropping the write half closes the connection, which tells the
        // server this client left.
        drop(writer);
        self.state = SessionState::Terminated;
        tracing::info!("Session terminated");

        result
    }

    fn show(&self) {
        if self.echo {
            let view =
                MessageFormatter::format_chat_view(&self.log, &self.user_name, self.last_error.as_ref());
            redisplay(&view);
        }
    }
}

/// Stream of records read from the server. Ends after the first error.
fn inbound_records(reader: OwnedReadHalf) -> impl Stream<Item = Result<Message, ClientError>> {
    stream::unfold(Some(reader), |reader| async move {
        let Some(mut reader) = reader else {
            return None;
        };
        let mut buffer = [0u8; RECORD_SIZE];
        match reader.read_exact(&mut buffer).await {
            Ok(_) => Some((decode(&buffer).map_err(ClientError::from), Some(reader))),
            Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                tracing::info!("Server disconnected");
                Some((Err(ClientError::ServerClosed), None))
            }
            Err(e) => {
                tracing::warn!("Error receiving message from server: {}", e);
                Some((Err(ClientError::Io(e)), None))
            }
        }
    })
}
