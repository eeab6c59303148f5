//! Server execution logic.

use std::net::SocketAddr;

use crate::{error::ServerError, reactor::Reactor, signal::shutdown_signal};

/// Run the relay server until Ctrl+C or SIGTERM
///
/// # Arguments
///
/// * `host` - The host address to bind to (e.g., "0.0.0.0")
/// * `port` - The port number to bind to (e.g., 8080)
///
/// # Errors
///
/// Returns an error if the address is invalid or the listening socket cannot
/// be set up. Failures of individual client connections are never returned.
pub async fn run_server(host: &str, port: u16) -> Result<(), ServerError> {
    let bind_addr = format!("{}:{}", host, port);
    let addr: SocketAddr = bind_addr
        .parse()
        .map_err(|_| ServerError::InvalidAddress(bind_addr.clone()))?;

    let reactor = Reactor::bind(addr)?;

    tracing::info!("Relay server listening on {}", reactor.local_addr()?);
    tracing::info!("Press Ctrl+C to shutdown gracefully");

    reactor.run_until(shutdown_signal()).await?;

    tracing::info!("Server shutdown complete");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_run_server_rejects_invalid_address() {
        // テスト項目: 不正なホスト名ではサーバーが起動せずエラーになる
        // given (前提条件):
        let host = "not an address";

        // when (操作):
        let result = run_server(host, 8080).await;

        // then (期待する結果):
        assert!(matches!(result, Err(ServerError::InvalidAddress(_))));
    }
}
