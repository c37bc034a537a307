//! Logging setup for the chatctx binary.
//!
//! Logs go to stderr; stdout is reserved for replies and dry-run payloads.

use std::io::IsTerminal;

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::error::{ChatctxError, Result};

/// Initializes the tracing subscriber.
///
/// The filter is `log_level` if given, else `RUST_LOG`, else `info`.
///
/// # Example
/// ```no_run
/// use chatctx::logging::init_logging;
///
/// init_logging(Some("debug"), true).expect("logging already initialized");
/// ```
pub fn init_logging(log_level: Option<&str>, no_color: bool) -> Result<()> {
    let env_filter = filter(log_level)?;

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true)
        .with_ansi(!no_color && supports_color());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| ChatctxError::Config(format!("Failed to init logging: {e}")))
}

fn filter(log_level: Option<&str>) -> Result<EnvFilter> {
    let default_level = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    let filter_str = log_level.unwrap_or(&default_level);

    EnvFilter::try_new(filter_str)
        .map_err(|e| ChatctxError::Config(format!("Invalid log filter '{filter_str}': {e}")))
}

fn supports_color() -> bool {
    if std::env::var_os("NO_COLOR").is_some_and(|v| !v.is_empty()) {
        return false;
    }
    std::io::stderr().is_terminal()
}
