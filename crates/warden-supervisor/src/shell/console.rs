use async_trait::async_trait;
use dialoguer::theme::ColorfulTheme;
use dialoguer::Confirm;
use tracing::warn;
use warden_types::RestartChoice;

use super::Shell;

fn failure_line(reason: &str) -> String {
    format!("\x1b[38;5;196m[-]\x1b[0m Backend failure: {}", reason)
}

#[derive(Clone, Debug, Default)]
pub struct ConsoleShell;

impl ConsoleShell {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Shell for ConsoleShell {
    async fn show_restart_prompt(&self, reason: &str) -> RestartChoice {
        println!("\n{}", failure_line(reason));

        let answer = tokio::task::spawn_blocking(|| {
            Confirm::with_theme(&ColorfulTheme::default())
                .with_prompt("Restart the backend?")
                .default(true)
                .interact_opt()
        })
        .await;

        let answer = match answer {
            Ok(Ok(answer)) => answer,
            Ok(Err(e)) => {
                warn!("Restart prompt unavailable ({}), restarting", e);
                None
            }
            Err(e) => {
                warn!("Restart prompt failed ({}), restarting", e);
                None
            }
        };

        let choice = RestartChoice::from_prompt(answer);
        if choice == RestartChoice::Quit {
            println!("\x1b[38;5;245mShutting down.\x1b[0m");
        }
        choice
    }

    async fn show_transient_state(&self, message: &str) {
        println!("\x1b[38;5;226m[*]\x1b[0m {}", message);
    }

    async fn show_fatal_error(&self, message: &str) {
        eprintln!("\x1b[38;5;196m[-]\x1b[0m Fatal: {}", message);
    }

    async fn notify_ready_to_display(&self) {
        println!("\x1b[38;5;46m[+]\x1b[0m Backend ready");
    }
}
