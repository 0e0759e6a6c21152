//! Diagnostic logging setup.
//!
//! Logs go to stderr so that tables on stdout stay clean. `RUST_LOG`, when
//! set, takes precedence over the configured level.

use std::sync::Once;

use tracing_subscriber::{fmt, EnvFilter};

static INIT: Once = Once::new();

/// Installs the global subscriber. Later calls are no-ops.
pub fn init_logging(level: &str, json: bool) {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(level.to_lowercase()));

        let builder = fmt()
            .with_env_filter(filter)
            .with_target(true)
            .with_writer(std::io::stderr);

        let result = if json {
            builder.json().try_init()
        } else {
            builder.try_init()
        };

        match result {
            Ok(()) => tracing::debug!(level, json, "logging initialized"),
            Err(e) => eprintln!("warning: logging not initialized: {e}"),
        }
    });
}
