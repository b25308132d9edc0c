//! Application configuration loaded from environment variables.

use std::path::{Path, PathBuf};

/// Store configuration with sensible defaults.
///
/// Reads from environment variables:
/// - `STOCKBOOK_DATA_DIR` — directory holding the collection files
///   (default: `"./data"`)
/// - `RUST_LOG` — tracing filter directive (default: `"info"`)
#[derive(Debug, Clone)]
pub struct Config {
    pub data_dir: PathBuf,
    pub log_level: String,
}

impl Config {
    /// Loads configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self {
            data_dir: std::env::var_os("STOCKBOOK_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("./data")),
            log_level: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        }
    }

    /// Returns the path of one collection file under the data directory.
    pub fn data_path(&self, file: impl AsRef<Path>) -> PathBuf {
        self.data_dir.join(file)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./data"),
            log_level: "info".to_string(),
        }
    }
}
