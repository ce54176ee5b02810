use tracing::{info, warn};
use warden_types::{RestartChoice, SupervisorState, WardenError, WardenResult};

use super::core::{Readiness, Supervisor};
use super::types::{RecoveryTrigger, SupervisorExit};
use crate::reclaim::reclaim;

pub(super) const RESTARTING_MESSAGE: &str = "Restarting backend…";

impl Supervisor {
    /// Handles one failure episode. Returns `Some` when the session is over,
    /// `None` once a fresh backend is back in `Monitoring`.
    pub(super) async fn recover(
        &mut self,
        trigger: RecoveryTrigger,
    ) -> WardenResult<Option<SupervisorExit>> {
        // No watchdog probe may run from here until the relaunch is ready.
        self.watchdog.stop();
        let failures = self.watchdog.take_failures();
        self.transition(SupervisorState::Recovering);

        let reason = trigger.to_string();
        warn!("Recovery triggered: {} ({} failed checks)", reason, failures);
        self.last_error = Some(reason.clone());
        self.publish_status();

        if self.shell.show_restart_prompt(&reason).await == RestartChoice::Quit {
            info!("Restart declined, shutting down");
            self.transition(SupervisorState::Terminated);
            self.stop_process().await;
            return Ok(Some(SupervisorExit::Quit));
        }

        self.stop_process().await;
        self.shell.show_transient_state(RESTARTING_MESSAGE).await;

        if self.config.reclaim_on_restart {
            reclaim(
                self.reclaimer.as_ref(),
                self.config.port,
                self.config.settle_delay(),
            )
            .await;
        }

        self.transition(SupervisorState::Launching);
        self.launch()
            .await
            .map_err(|e| WardenError::RecoveryFailed(e.to_string()))?;

        self.transition(SupervisorState::AwaitingReady);
        match self.wait_until_ready().await {
            Readiness::Ready => {}
            Readiness::NotReady => {
                return Err(WardenError::RecoveryFailed(format!(
                    "backend not ready after {} attempts",
                    self.config.readiness_max_attempts
                )))
            }
            Readiness::Exited(report) => {
                return Err(WardenError::RecoveryFailed(format!(
                    "{} before becoming ready",
                    report
                )))
            }
        }

        self.restart_count += 1;
        self.enter_monitoring();
        info!("Backend recovered (restart #{})", self.restart_count);
        self.shell.notify_ready_to_display().await;
        Ok(None)
    }
}
