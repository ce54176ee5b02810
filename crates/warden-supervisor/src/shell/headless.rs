use async_trait::async_trait;
use tracing::{error, info, warn};
use warden_types::RestartChoice;

use super::Shell;

#[derive(Clone, Debug, Default)]
pub struct HeadlessShell;

impl HeadlessShell {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Shell for HeadlessShell {
    async fn show_restart_prompt(&self, reason: &str) -> RestartChoice {
        warn!("Backend failure ({}), restarting without prompt", reason);
        RestartChoice::Restart
    }

    async fn show_transient_state(&self, message: &str) {
        info!("{}", message);
    }

    async fn show_fatal_error(&self, message: &str) {
        error!("{}", message);
    }

    async fn notify_ready_to_display(&self) {
        info!("Backend ready to display");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_headless_always_restarts() {
        let shell = HeadlessShell::new();
        assert_eq!(
            shell.show_restart_prompt("unresponsive").await,
            RestartChoice::Restart
        );
    }
}
