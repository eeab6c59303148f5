//! Error types for the relay server.

use std::net::SocketAddr;

use thiserror::Error;

/// Connection table errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TableError {
    /// Every slot is occupied
    #[error("Connection table is full ({capacity} slots in use)")]
    TableFull { capacity: usize },
}

/// Server errors
#[derive(Debug, Error)]
pub enum ServerError {
    /// The host/port pair does not form a socket address
    #[error("Invalid listen address '{0}'")]
    InvalidAddress(String),

    /// Creating, binding or listening on the socket failed
    #[error("Failed to listen on {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    /// Other I/O error on the listening socket
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
