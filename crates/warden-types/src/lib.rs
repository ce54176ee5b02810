#![forbid(unsafe_code)]
#![warn(clippy::all)]

mod error;
mod exit;
mod health;
mod state;

pub use error::{WardenError, WardenResult};
pub use exit::ExitReport;
pub use health::HealthCheckResult;
pub use state::{RestartChoice, SupervisorState};

pub const DEFAULT_BACKEND_PORT: u16 = 8765;

pub const DEFAULT_HEALTH_PATH: &str = "/health";

pub const LOOPBACK_HOST: &str = "127.0.0.1";
