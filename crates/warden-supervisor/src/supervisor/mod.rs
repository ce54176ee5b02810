mod core;
mod recovery;
mod shutdown;
mod status;
mod types;

pub use self::core::{Supervisor, SupervisorParts};
pub use shutdown::{ShutdownToken, ShutdownTrigger};
pub use status::{SupervisorHandle, SupervisorStatus};
pub use types::{RecoveryTrigger, SupervisorExit};
