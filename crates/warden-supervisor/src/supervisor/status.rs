use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use warden_types::SupervisorState;

use super::shutdown::ShutdownTrigger;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SupervisorStatus {
    pub state: SupervisorState,
    pub pid: Option<u32>,
    pub generation: u64,
    pub consecutive_failures: u32,
    pub restart_count: u32,
    pub watchdog_active: bool,
    pub last_error: Option<String>,
    pub started_at: DateTime<Utc>,
}

impl SupervisorStatus {
    pub fn new(started_at: DateTime<Utc>) -> Self {
        Self {
            state: SupervisorState::Idle,
            pid: None,
            generation: 0,
            consecutive_failures: 0,
            restart_count: 0,
            watchdog_active: false,
            last_error: None,
            started_at,
        }
    }

    pub fn uptime_secs(&self) -> i64 {
        (Utc::now() - self.started_at).num_seconds().max(0)
    }
}

#[derive(Clone)]
pub struct SupervisorHandle {
    shutdown: ShutdownTrigger,
    status: watch::Receiver<SupervisorStatus>,
}

impl SupervisorHandle {
    pub(super) fn new(shutdown: ShutdownTrigger, status: watch::Receiver<SupervisorStatus>) -> Self {
        Self { shutdown, status }
    }

    pub fn shutdown(&self) {
        self.shutdown.trigger();
    }

    pub fn is_shutting_down(&self) -> bool {
        self.shutdown.is_triggered()
    }

    pub fn status(&self) -> SupervisorStatus {
        self.status.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SupervisorStatus> {
        self.status.clone()
    }

    /// Waits until the supervisor reports `state`. Returns `None` if the
    /// supervisor went away first.
    pub async fn wait_for_state(&self, state: SupervisorState) -> Option<SupervisorStatus> {
        let mut rx = self.subscribe();
        let status = rx.wait_for(|status| status.state == state).await.ok()?.clone();
        Some(status)
    }
}
