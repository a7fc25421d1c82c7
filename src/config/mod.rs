//! Connection configuration for the Zotero library.
//!
//! Credentials live in a small JSON file next to the binary:
//!
//! ```json
//! {
//!   "library_id": 1234567,
//!   "library_type": "user",
//!   "api_key": "your-zotero-api-key"
//! }
//! ```
//!
//! When the file is missing, [`load_or_init`] writes a zeroed template so
//! the operator has something to fill in, and the run aborts.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default name of the connection file, resolved against the working directory.
pub const CONNECTION_FILE: &str = "secret.json";

/// Credentials and addressing for one Zotero library
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionConfig {
    /// Numeric id of the user or group library
    pub library_id: u64,

    /// Library kind, "user" or "group"
    pub library_type: String,

    /// Zotero Web API key
    pub api_key: String,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            library_id: 0,
            library_type: "user".to_string(),
            api_key: String::new(),
        }
    }
}

/// Load the connection file, or bootstrap a placeholder template.
///
/// If the file exists it is parsed and returned; no validation is done
/// beyond that. If it is absent, a template with placeholder values is
/// written and [`ConfigError::TemplateWritten`] is returned so the caller
/// can abort with instructions instead of running with empty credentials.
pub fn load_or_init(path: &Path) -> Result<ConnectionConfig, ConfigError> {
    if path.exists() {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io(e.to_string()))?;
        serde_json::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))
    } else {
        let template = serde_json::to_string_pretty(&ConnectionConfig::default())
            .map_err(|e| ConfigError::Serialize(e.to_string()))?;
        std::fs::write(path, template).map_err(|e| ConfigError::Io(e.to_string()))?;
        Err(ConfigError::TemplateWritten(path.to_path_buf()))
    }
}

/// Connection configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Serialize error: {0}")]
    Serialize(String),

    #[error("no connection data found; wrote a template to {0}")]
    TemplateWritten(PathBuf),
}
