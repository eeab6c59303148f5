//! Client execution logic.

use kairo_shared::time::SystemClock;
use tokio::net::TcpStream;

use crate::{
    error::ClientError,
    formatter::MessageFormatter,
    session::ClientSession,
    ui::spawn_input_reader,
};

/// Connect to the relay server and run one chat session.
///
/// There is no reconnection: losing the server ends the session with an
/// error.
///
/// # Arguments
///
/// * `host` - Server host (e.g., "127.0.0.1")
/// * `port` - Server port (e.g., 8080)
pub async fn run_client(host: &str, port: u16) -> Result<(), ClientError> {
    let addr = format!("{}:{}", host, port);
    let stream = TcpStream::connect(&addr)
        .await
        .map_err(|source| ClientError::Connection {
            addr: addr.clone(),
            source,
        })?;
    tracing::info!("Connected to relay server at {}", addr);

    print!("{}", MessageFormatter::format_title());
    let input = spawn_input_reader();

    let mut session = ClientSession::new(SystemClock);
    let result = session.run(stream, input, interrupted()).await;

    if result.is_ok() {
        println!("\nGoodbye!");
    }
    result
}

async fn interrupted() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to install Ctrl+C handler: {}", e);
        std::future::pending::<()>().await;
    }
}
