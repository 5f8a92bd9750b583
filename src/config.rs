use std::path::PathBuf;

use crate::logging::default_log_level;

/// Overrides the data directory.
pub const DATA_DIR_ENV: &str = "TASKORBIT_DATA_DIR";
/// Overrides the log level (flexi_logger spec syntax, e.g. `info` or `taskorbit=debug`).
pub const LOG_ENV: &str = "TASKORBIT_LOG";

/// Runtime settings resolved from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Directory holding `tasks.json` and `categories.json`.
    pub data_dir: PathBuf,
    pub log_level: String,
}

impl Config {
    /// Resolves the configuration.
    ///
    /// The data directory is determined in the following order:
    /// 1. `TASKORBIT_DATA_DIR` environment variable.
    /// 2. `~/.local/share/taskorbit` (on Linux).
    /// 3. `./taskorbit` (fallback).
    pub fn from_env() -> Self {
        let data_dir = std::env::var(DATA_DIR_ENV)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| {
                let mut p = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
                p.push("taskorbit");
                p
            });
        let log_level = std::env::var(LOG_ENV)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| default_log_level().to_string());
        Config { data_dir, log_level }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_dir_env_overrides_default() {
        std::env::set_var(DATA_DIR_ENV, "/tmp/taskorbit-config-test");
        let config = Config::from_env();
        std::env::remove_var(DATA_DIR_ENV);
        assert_eq!(config.data_dir, PathBuf::from("/tmp/taskorbit-config-test"));

        let fallback = Config::from_env();
        assert!(fallback.data_dir.ends_with("taskorbit"));
    }
}
