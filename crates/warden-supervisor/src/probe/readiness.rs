use tracing::{debug, info, warn};

use super::{probe_once, HealthProbe};
use crate::config::SupervisorConfig;

/// Polls until the backend answers 200 or the attempt budget is spent.
///
/// A failed attempt is followed by `readiness_interval` before the next one;
/// there is no delay after the last attempt.
pub async fn await_ready(probe: &dyn HealthProbe, config: &SupervisorConfig) -> bool {
    let max_attempts = config.readiness_max_attempts;

    for attempt in 1..=max_attempts {
        let result = probe_once(probe, config.readiness_timeout()).await;
        if result.is_healthy() {
            info!("Backend ready after {} attempt(s)", attempt);
            return true;
        }

        debug!(
            "Readiness attempt {}/{} failed: {}",
            attempt, max_attempts, result
        );

        if attempt < max_attempts {
            tokio::time::sleep(config.readiness_interval()).await;
        }
    }

    warn!(
        "Backend did not become ready within {} attempts",
        max_attempts
    );
    false
}
