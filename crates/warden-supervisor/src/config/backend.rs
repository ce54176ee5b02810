use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use warden_types::{WardenError, WardenResult};

use super::constants::*;
use super::types::RunMode;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    pub mode: RunMode,
    pub root: PathBuf,
    pub interpreter: String,
    pub entry: PathBuf,
    pub executable: PathBuf,
    pub args: Vec<String>,
    pub data_dir: PathBuf,
    pub data_dir_env: String,
}

impl Default for BackendConfig {
    fn default() -> Self {
        let data_dir = dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("warden");

        Self {
            mode: RunMode::default(),
            root: PathBuf::from("backend"),
            interpreter: DEFAULT_INTERPRETER.to_string(),
            entry: PathBuf::from(DEFAULT_ENTRY),
            executable: PathBuf::from(DEFAULT_EXECUTABLE),
            args: Vec::new(),
            data_dir,
            data_dir_env: DEFAULT_DATA_DIR_ENV.to_string(),
        }
    }
}

impl BackendConfig {
    pub fn artifact_path(&self) -> PathBuf {
        match self.mode {
            RunMode::Development => self.root.join(&self.entry),
            RunMode::Production => self.root.join(&self.executable),
        }
    }

    pub fn working_dir(&self) -> PathBuf {
        let artifact = self.artifact_path();
        artifact
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// Process name the reclaimer may kill on sight. Development mode has
    /// none: the interpreter name is shared with unrelated programs.
    pub fn reclaimable_process_name(&self) -> Option<String> {
        match self.mode {
            RunMode::Development => None,
            RunMode::Production => self
                .executable
                .file_name()
                .map(|name| name.to_string_lossy().to_string()),
        }
    }

    pub fn validate(&self) -> WardenResult<()> {
        match self.mode {
            RunMode::Development => {
                if self.interpreter.trim().is_empty() {
                    return Err(WardenError::Config(
                        "Development mode requires an interpreter".into(),
                    ));
                }
                if self.entry.as_os_str().is_empty() {
                    return Err(WardenError::Config(
                        "Development mode requires an entry module".into(),
                    ));
                }
            }
            RunMode::Production => {
                if self.executable.as_os_str().is_empty() {
                    return Err(WardenError::Config(
                        "Production mode requires a backend executable".into(),
                    ));
                }
                if self.data_dir_env.trim().is_empty() {
                    return Err(WardenError::Config(
                        "data_dir_env cannot be empty".into(),
                    ));
                }
            }
        }
        Ok(())
    }
}
