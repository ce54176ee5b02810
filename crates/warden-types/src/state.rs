use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SupervisorState {
    #[default]
    Idle,
    Cleaning,
    Launching,
    AwaitingReady,
    Monitoring,
    Recovering,
    Terminated,
}

impl SupervisorState {
    /// Allowed edges of the supervision state machine. Any live state may
    /// fall through to `Terminated` (quit, shutdown or a fatal error).
    pub fn can_transition_to(self, next: SupervisorState) -> bool {
        use SupervisorState::*;

        match (self, next) {
            (Terminated, _) => false,
            (_, Terminated) => true,
            (Idle, Cleaning)
            | (Cleaning, Launching)
            | (Launching, AwaitingReady)
            | (AwaitingReady, Monitoring)
            | (Monitoring, Recovering)
            | (Recovering, Launching) => true,
            _ => false,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, SupervisorState::Terminated)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SupervisorState::Idle => "idle",
            SupervisorState::Cleaning => "cleaning",
            SupervisorState::Launching => "launching",
            SupervisorState::AwaitingReady => "awaiting_ready",
            SupervisorState::Monitoring => "monitoring",
            SupervisorState::Recovering => "recovering",
            SupervisorState::Terminated => "terminated",
        }
    }
}

impl fmt::Display for SupervisorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RestartChoice {
    Restart,
    Quit,
}

impl RestartChoice {
    /// A dismissed prompt restarts; only an explicit cancel quits.
    pub fn from_prompt(answer: Option<bool>) -> Self {
        match answer {
            Some(false) => RestartChoice::Quit,
            Some(true) | None => RestartChoice::Restart,
        }
    }
}
