//! Logging initialisation via tracing-subscriber.
//!
//! Call [`init`] once at startup, after configuration is resolved.

use thiserror::Error;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Error)]
#[error("logging setup failed: {0}")]
pub struct LoggingError(String);

/// Initialise the global tracing subscriber, writing to stderr.
///
/// `RUST_LOG` takes precedence; `level` is the fallback filter.
pub fn init(level: &str) -> Result<(), LoggingError> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .map_err(|e| LoggingError(format!("invalid log level '{level}': {e}")))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| LoggingError(format!("failed to set subscriber: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_succeeds_or_is_already_set() {
        // Another test may have installed a subscriber first.
        match init("info") {
            Ok(()) => {}
            Err(LoggingError(msg)) => assert!(msg.contains("set subscriber"), "{msg}"),
        }
    }
}
