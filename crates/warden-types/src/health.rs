use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "result", content = "status")]
pub enum HealthCheckResult {
    Ok,
    Unreachable,
    Timeout,
    BadStatus(u16),
}

impl HealthCheckResult {
    pub fn is_healthy(&self) -> bool {
        matches!(self, HealthCheckResult::Ok)
    }

    pub fn from_status(status: u16) -> Self {
        if status == 200 {
            HealthCheckResult::Ok
        } else {
            HealthCheckResult::BadStatus(status)
        }
    }
}

impl fmt::Display for HealthCheckResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HealthCheckResult::Ok => write!(f, "ok"),
            HealthCheckResult::Unreachable => write!(f, "unreachable"),
            HealthCheckResult::Timeout => write!(f, "timeout"),
            HealthCheckResult::BadStatus(code) => write!(f, "status {}", code),
        }
    }
}
