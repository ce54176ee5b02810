use serde::{Deserialize, Serialize};
use std::time::Duration;
use warden_types::{WardenError, WardenResult, DEFAULT_BACKEND_PORT, DEFAULT_HEALTH_PATH, LOOPBACK_HOST};

use super::constants::*;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SupervisorConfig {
    pub port: u16,
    pub health_path: String,
    pub readiness_max_attempts: u32,
    pub readiness_interval_ms: u64,
    pub readiness_timeout_ms: u64,
    pub watchdog_interval_ms: u64,
    pub watchdog_timeout_ms: u64,
    pub failure_threshold: u32,
    pub settle_delay_ms: u64,
    pub stop_grace_ms: u64,
    pub reclaim_on_restart: bool,
}

impl Default for SupervisorConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_BACKEND_PORT,
            health_path: DEFAULT_HEALTH_PATH.to_string(),
            readiness_max_attempts: DEFAULT_READINESS_MAX_ATTEMPTS,
            readiness_interval_ms: DEFAULT_READINESS_INTERVAL_MS,
            readiness_timeout_ms: DEFAULT_READINESS_TIMEOUT_MS,
            watchdog_interval_ms: DEFAULT_WATCHDOG_INTERVAL_MS,
            watchdog_timeout_ms: DEFAULT_WATCHDOG_TIMEOUT_MS,
            failure_threshold: DEFAULT_FAILURE_THRESHOLD,
            settle_delay_ms: DEFAULT_SETTLE_DELAY_MS,
            stop_grace_ms: DEFAULT_STOP_GRACE_MS,
            reclaim_on_restart: true,
        }
    }
}

impl SupervisorConfig {
    pub fn health_url(&self) -> String {
        format!("http://{}:{}{}", LOOPBACK_HOST, self.port, self.health_path)
    }

    pub fn readiness_interval(&self) -> Duration {
        Duration::from_millis(self.readiness_interval_ms)
    }

    pub fn readiness_timeout(&self) -> Duration {
        Duration::from_millis(self.readiness_timeout_ms)
    }

    pub fn watchdog_interval(&self) -> Duration {
        Duration::from_millis(self.watchdog_interval_ms)
    }

    pub fn watchdog_timeout(&self) -> Duration {
        Duration::from_millis(self.watchdog_timeout_ms)
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    pub fn stop_grace(&self) -> Duration {
        Duration::from_millis(self.stop_grace_ms)
    }

    pub fn validate(&self) -> WardenResult<()> {
        if self.port == 0 {
            return Err(WardenError::Config("Backend port cannot be 0".into()));
        }

        if !self.health_path.starts_with('/') {
            return Err(WardenError::Config(format!(
                "Health path must start with '/': {}",
                self.health_path
            )));
        }

        if self.readiness_max_attempts == 0 {
            return Err(WardenError::Config(
                "readiness_max_attempts must be at least 1".into(),
            ));
        }

        if self.failure_threshold == 0 {
            return Err(WardenError::Config(
                "failure_threshold must be at least 1".into(),
            ));
        }

        let durations = [
            ("readiness_interval_ms", self.readiness_interval_ms),
            ("readiness_timeout_ms", self.readiness_timeout_ms),
            ("watchdog_interval_ms", self.watchdog_interval_ms),
            ("watchdog_timeout_ms", self.watchdog_timeout_ms),
            ("settle_delay_ms", self.settle_delay_ms),
            ("stop_grace_ms", self.stop_grace_ms),
        ];
        for (name, value) in durations {
            if value == 0 {
                return Err(WardenError::Config(format!("{} must be greater than 0", name)));
            }
        }

        Ok(())
    }
}
