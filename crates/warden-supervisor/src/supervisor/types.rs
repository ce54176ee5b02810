use std::fmt;
use warden_types::ExitReport;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SupervisorExit {
    Quit,
    Shutdown,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RecoveryTrigger {
    Unresponsive { failures: u32 },
    UnexpectedExit(ExitReport),
}

impl fmt::Display for RecoveryTrigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecoveryTrigger::Unresponsive { failures } => write!(
                f,
                "backend did not answer {} consecutive health checks",
                failures
            ),
            RecoveryTrigger::UnexpectedExit(report) => write!(f, "{}", report),
        }
    }
}
