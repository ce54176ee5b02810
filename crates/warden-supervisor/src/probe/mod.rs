mod readiness;

pub use readiness::await_ready;

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::trace;
use warden_types::{HealthCheckResult, WardenError, WardenResult};

use crate::config::SupervisorConfig;

#[async_trait]
pub trait HealthProbe: Send + Sync {
    async fn check(&self, timeout: Duration) -> HealthCheckResult;
}

/// Runs one probe and enforces `timeout` even if the probe ignores it.
pub async fn probe_once(probe: &dyn HealthProbe, timeout: Duration) -> HealthCheckResult {
    match tokio::time::timeout(timeout, probe.check(timeout)).await {
        Ok(result) => result,
        Err(_) => HealthCheckResult::Timeout,
    }
}

pub struct HttpHealthProbe {
    client: Client,
    url: String,
}

impl HttpHealthProbe {
    pub fn new(url: impl Into<String>) -> WardenResult<Self> {
        let client = Client::builder()
            .no_proxy()
            .build()
            .map_err(|e| WardenError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client, url: url.into() })
    }

    pub fn from_config(config: &SupervisorConfig) -> WardenResult<Self> {
        Self::new(config.health_url())
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl HealthProbe for HttpHealthProbe {
    async fn check(&self, timeout: Duration) -> HealthCheckResult {
        match self.client.get(&self.url).timeout(timeout).send().await {
            Ok(response) => {
                let status = response.status().as_u16();
                trace!("GET {} -> {}", self.url, status);
                HealthCheckResult::from_status(status)
            }
            Err(e) if e.is_timeout() => {
                trace!("GET {} timed out after {:?}", self.url, timeout);
                HealthCheckResult::Timeout
            }
            Err(e) => {
                trace!("GET {} failed: {}", self.url, e);
                HealthCheckResult::Unreachable
            }
        }
    }
}
