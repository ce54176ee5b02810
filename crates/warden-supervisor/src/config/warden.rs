use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use warden_types::{WardenError, WardenResult};

use super::backend::BackendConfig;
use super::logging::LoggingConfig;
use super::supervisor::SupervisorConfig;
use super::types::{LogLevel, RunMode};

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WardenConfig {
    pub supervisor: SupervisorConfig,
    pub backend: BackendConfig,
    pub logging: LoggingConfig,
}

impl WardenConfig {
    pub fn load(path: impl AsRef<Path>) -> WardenResult<Self> {
        let path = path.as_ref();

        let mut config = if path.exists() {
            let contents = std::fs::read_to_string(path)
                .map_err(|e| WardenError::Config(format!("Failed to read config: {}", e)))?;

            toml::from_str(&contents)
                .map_err(|e| WardenError::Config(format!("Failed to parse config: {}", e)))?
        } else {
            info!("Config file not found, using defaults");
            Self::default()
        };

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> WardenResult<()> {
        let contents = toml::to_string_pretty(self)?;

        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| WardenError::Config(format!("Failed to create config dir: {}", e)))?;
        }

        std::fs::write(path.as_ref(), contents)
            .map_err(|e| WardenError::Config(format!("Failed to write config: {}", e)))?;

        info!("Configuration saved to {:?}", path.as_ref());
        Ok(())
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(mode) = std::env::var("WARDEN_MODE") {
            match RunMode::parse(&mode) {
                Some(parsed) => self.backend.mode = parsed,
                None => warn!("Ignoring unknown WARDEN_MODE value: {}", mode),
            }
        }

        if let Ok(port) = std::env::var("WARDEN_PORT") {
            if let Ok(p) = port.parse() {
                self.supervisor.port = p;
            }
        }

        if let Ok(path) = std::env::var("WARDEN_HEALTH_PATH") {
            self.supervisor.health_path = path;
        }

        if let Ok(threshold) = std::env::var("WARDEN_FAILURE_THRESHOLD") {
            if let Ok(t) = threshold.parse() {
                self.supervisor.failure_threshold = t;
            }
        }

        if let Ok(root) = std::env::var("WARDEN_BACKEND_ROOT") {
            self.backend.root = PathBuf::from(root);
        }

        if let Ok(dir) = std::env::var("WARDEN_DATA_DIR") {
            self.backend.data_dir = PathBuf::from(dir);
        }

        if let Ok(python) = std::env::var("WARDEN_PYTHON") {
            if !python.trim().is_empty() {
                self.backend.interpreter = python.trim().to_string();
            }
        }

        if let Ok(level) = std::env::var("WARDEN_LOG_LEVEL") {
            self.logging.level = LogLevel::parse(&level);
        }

        if std::env::var("WARDEN_LOG_JSON").is_ok() {
            self.logging.json = true;
        }
    }

    pub fn validate(&self) -> WardenResult<()> {
        self.supervisor.validate()?;
        self.backend.validate()?;

        if self.supervisor.watchdog_timeout_ms > self.supervisor.watchdog_interval_ms {
            warn!(
                "watchdog_timeout_ms ({}) exceeds watchdog_interval_ms ({}); probes will run back to back",
                self.supervisor.watchdog_timeout_ms, self.supervisor.watchdog_interval_ms
            );
        }

        Ok(())
    }
}

impl std::fmt::Display for WardenConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Mode: {}", self.backend.mode)?;
        writeln!(f, "Artifact: {}", self.backend.artifact_path().display())?;
        writeln!(f, "Health: {}", self.supervisor.health_url())?;
        writeln!(
            f,
            "Readiness: {} attempts every {}ms (timeout {}ms)",
            self.supervisor.readiness_max_attempts,
            self.supervisor.readiness_interval_ms,
            self.supervisor.readiness_timeout_ms
        )?;
        write!(
            f,
            "Watchdog: every {}ms (timeout {}ms), threshold {}",
            self.supervisor.watchdog_interval_ms,
            self.supervisor.watchdog_timeout_ms,
            self.supervisor.failure_threshold
        )
    }
}
