mod chore_db;
mod config;
pub mod migrations;

pub use chore_db::ChoreDb;
pub use config::{
    AccountConfig, AppConfig, Config, DisplayConfig, MailConfig, MAX_FINAL_WEEK_DAYS, REDACTED,
};

use std::path::PathBuf;

use crate::error::ConfigError;

/// Returns the data directory, creating it if needed.
///
/// `CHOREIO_DATA_DIR` wins when set. Otherwise `~/.config/choreio/`, or
/// `~/.config/choreio-dev/` when `CHOREIO_ENV=dev`.
///
/// # Errors
/// Returns an error if the directory cannot be created.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let dir = match std::env::var_os("CHOREIO_DATA_DIR") {
        Some(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("CHOREIO_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("choreio-dev")
            } else {
                base_dir.join("choreio")
            }
        }
    };

    std::fs::create_dir_all(&dir)
        .map_err(|e| ConfigError::DataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}
