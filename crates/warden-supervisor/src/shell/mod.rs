mod console;
mod headless;

pub use console::ConsoleShell;
pub use headless::HeadlessShell;

use async_trait::async_trait;
use warden_types::RestartChoice;

#[async_trait]
pub trait Shell: Send + Sync {
    /// Asks whether to restart the backend. A dismissed prompt restarts.
    async fn show_restart_prompt(&self, reason: &str) -> RestartChoice;

    async fn show_transient_state(&self, message: &str);

    async fn show_fatal_error(&self, message: &str);

    async fn notify_ready_to_display(&self);
}
