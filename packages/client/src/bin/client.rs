//! Kairo chat client.
//!
//! Connects to a relay server, asks for a display name, then sends each line
//! typed as a message. Type `quit` to exit. The client exits with an error
//! if the server goes away.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin kairo-client
//! cargo run --bin kairo-client -- --host 192.168.0.10 --port 3000
//! ```

use clap::Parser;

use kairo_shared::{logger::setup_logger, protocol::DEFAULT_PORT};

#[derive(Parser, Debug)]
#[command(name = "kairo-client")]
#[command(about = "TCP chat client for the Kairo relay server", long_about = None)]
struct Args {
    /// Server host address
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Server port
    #[arg(short = 'p', long, default_value_t = DEFAULT_PORT)]
    port: u16,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "warn");

    let args = Args::parse();

    if let Err(e) = kairo_client::run_client(&args.host, args.port).await {
        tracing::error!("Client error: {}", e);
        eprintln!("\n{}", e);
        std::process::exit(1);
    }
}
