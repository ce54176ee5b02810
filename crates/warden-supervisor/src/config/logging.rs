use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use super::types::LogLevel;

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: LogLevel,
    pub file: Option<PathBuf>,
    pub json: bool,
    pub capture_backend_output: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            file: None,
            json: false,
            capture_backend_output: true,
        }
    }
}
