#![allow(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod launcher;
pub mod probe;
pub mod reclaim;
pub mod shell;
pub mod supervisor;
pub mod watchdog;

#[cfg(test)]
mod testing;

pub use config::{BackendConfig, LogLevel, LoggingConfig, RunMode, SupervisorConfig, WardenConfig};
pub use launcher::{LaunchPlan, LaunchRequest, Launcher, ProcessHandle, ProcessLauncher};
pub use probe::{await_ready, probe_once, HealthProbe, HttpHealthProbe};
pub use reclaim::{platform_reclaimer, reclaim, Reclaimer};
pub use shell::{ConsoleShell, HeadlessShell, Shell};
pub use supervisor::{
    RecoveryTrigger, ShutdownToken, ShutdownTrigger, Supervisor, SupervisorExit, SupervisorHandle,
    SupervisorParts, SupervisorStatus,
};
pub use watchdog::{FailureCounter, Watchdog, WatchdogVerdict};
