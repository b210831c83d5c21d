//! Configuration file
//!
//! ```json
//! {
//!   "data_dir": "./bookshelf-data",
//!   "collection": "books",
//!   "search_mode": "literal",
//!   "log_format": "auto",
//!   "http": { "host": "127.0.0.1", "port": 5000 }
//! }
//! ```
//!
//! Only `data_dir` is required.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::errors::{CliError, CliResult};
use crate::books::{SearchMode, DEFAULT_COLLECTION};
use crate::http_server::HttpServerConfig;
use crate::observability::LogFormat;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Data directory (required)
    pub data_dir: String,

    /// Collection holding the books (default "books")
    #[serde(default = "default_collection")]
    pub collection: String,

    /// How title search text is interpreted (default literal)
    #[serde(default)]
    pub search_mode: SearchMode,

    /// Log output format (default auto)
    #[serde(default)]
    pub log_format: LogFormat,

    #[serde(default)]
    pub http: HttpServerConfig,
}

fn default_collection() -> String {
    DEFAULT_COLLECTION.to_string()
}

impl Config {
    /// Load configuration from file
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| CliError::config_error(format!("Failed to read config: {}", e)))?;

        let config: Config = serde_json::from_str(&content)
            .map_err(|e| CliError::config_error(format!("Invalid config JSON: {}", e)))?;

        config.validate()?;

        Ok(config)
    }

    fn validate(&self) -> CliResult<()> {
        if self.data_dir.trim().is_empty() {
            return Err(CliError::config_error("data_dir must not be empty"));
        }

        if self.collection.is_empty()
            || !self
                .collection
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            return Err(CliError::config_error(format!(
                "Invalid collection name: '{}'. Use letters, digits, '_' or '-'.",
                self.collection
            )));
        }

        if self.http.port == 0 {
            return Err(CliError::config_error("http.port must be > 0"));
        }

        Ok(())
    }

    /// Get data directory as Path
    pub fn data_path(&self) -> &Path {
        Path::new(&self.data_dir)
    }
}
