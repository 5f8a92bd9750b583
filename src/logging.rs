//! Process-wide logging bootstrap.
//!
//! Logs go to stderr through `flexi_logger`. Initialization happens at most
//! once per process and never panics.

use flexi_logger::{Logger, LoggerHandle};
use log::info;
use once_cell::sync::OnceCell;

static LOGGER: OnceCell<LoggerHandle> = OnceCell::new();

/// `debug` in debug builds, `warn` in release builds.
pub fn default_log_level() -> &'static str {
    if cfg!(debug_assertions) {
        "debug"
    } else {
        "warn"
    }
}

/// Starts the stderr logger with `spec` (e.g. `info`, `taskorbit=debug`).
///
/// Repeated calls after a successful start are no-ops.
///
/// # Errors
/// Returns a human-readable message when the log spec is invalid or the backend
/// cannot start.
pub fn init_logging(spec: &str) -> Result<(), String> {
    LOGGER
        .get_or_try_init(|| {
            let handle = Logger::try_with_str(spec.trim())
                .map_err(|err| format!("invalid log spec `{}`: {err}", spec.trim()))?
                .log_to_stderr()
                .format(flexi_logger::default_format)
                .start()
                .map_err(|err| format!("failed to start logger: {err}"))?;
            info!(
                "event=logging_started version={} spec={}",
                env!("CARGO_PKG_VERSION"),
                spec.trim()
            );
            Ok(handle)
        })
        .map(|_| ())
}

/// Whether [`init_logging`] has succeeded in this process.
pub fn logging_active() -> bool {
    LOGGER.get().is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_is_idempotent() {
        init_logging("warn").expect("first init should succeed");
        init_logging("warn").expect("second init should be a no-op");
        assert!(logging_active());
    }
}
