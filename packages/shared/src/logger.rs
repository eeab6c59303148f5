//! Logging setup utilities for the Kairo relay.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Crates whose events are enabled by the default filter
const WORKSPACE_CRATES: [&str; 3] = ["kairo_shared", "kairo_server", "kairo_client"];

/// Initialize the tracing subscriber with the specified default log level.
///
/// Events are written to stderr so that the client's chat view on stdout is
/// not interleaved with log lines. The log level can be overridden using the
/// `RUST_LOG` environment variable.
///
/// # Arguments
///
/// * `binary_name` - The name of the binary (e.g., "kairo-server", "kairo-client")
/// * `default_log_level` - The default log level (e.g., "debug", "info", "warn", "error")
///
/// # Examples
///
/// ```no_run
/// use kairo_shared::logger::setup_logger;
///
/// setup_logger("kairo-server", "debug");
/// ```
pub fn setup_logger(binary_name: &str, default_log_level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter(binary_name, default_log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn default_filter(binary_name: &str, default_log_level: &str) -> String {
    let binary_target = binary_name.replace('-', "_");
    let binary_target = (!WORKSPACE_CRATES.contains(&binary_target.as_str()))
        .then_some(binary_target.as_str());
    WORKSPACE_CRATES
        .iter()
        .copied()
        .chain(binary_target)
        .map(|target| format!("{}={}", target, default_log_level))
        .collect::<Vec<_>>()
        .join(",")
}
