use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExitReport {
    pub generation: u64,
    pub pid: Option<u32>,
    pub code: Option<i32>,
    /// Set when the stop was requested by the supervisor or a shutdown was
    /// in progress when the process went away.
    pub deliberate: bool,
}

impl fmt::Display for ExitReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pid = self
            .pid
            .map(|p| p.to_string())
            .unwrap_or_else(|| "?".to_string());
        match self.code {
            Some(code) => write!(f, "backend (pid {}) exited with code {}", pid, code),
            None => write!(f, "backend (pid {}) was terminated by a signal", pid),
        }
    }
}
