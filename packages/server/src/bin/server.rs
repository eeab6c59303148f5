//! Kairo relay server.
//!
//! Receives fixed-size message records from clients and relays each one to
//! all other connected clients.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin kairo-server
//! cargo run --bin kairo-server -- --host 127.0.0.1 --port 3000
//! ```

use clap::Parser;

use kairo_shared::{logger::setup_logger, protocol::DEFAULT_PORT};

#[derive(Parser, Debug)]
#[command(name = "kairo-server")]
#[command(about = "TCP chat relay server with broadcast support", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, default_value = "0.0.0.0")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, default_value_t = DEFAULT_PORT)]
    port: u16,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "debug");

    let args = Args::parse();

    if let Err(e) = kairo_server::run_server(&args.host, args.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
