mod config;

pub use config::{Config, DefinitionsConfig, ExportConfig, LedgerConfig};

use std::path::PathBuf;

use crate::error::ConfigError;

/// Environment variable that overrides the data directory.
pub const DATA_DIR_ENV: &str = "EMBERS_DATA_DIR";

/// Returns the data directory, creating it if needed.
///
/// `EMBERS_DATA_DIR` wins when set. Otherwise `~/.config/embers/`, or
/// `~/.config/embers-dev/` when `EMBERS_ENV=dev`.
///
/// Only the binary calls this; library code receives the directory as a
/// parameter.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let dir = match std::env::var_os(DATA_DIR_ENV) {
        Some(explicit) if !explicit.is_empty() => PathBuf::from(explicit),
        _ => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");

            let env = std::env::var("EMBERS_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("embers-dev")
            } else {
                base_dir.join("embers")
            }
        }
    };

    std::fs::create_dir_all(&dir)
        .map_err(|e| ConfigError::DataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}
