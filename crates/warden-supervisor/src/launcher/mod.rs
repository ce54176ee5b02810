mod handle;
mod plan;

pub use handle::ProcessHandle;
pub use plan::LaunchPlan;

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use warden_types::{ExitReport, WardenError, WardenResult};

use crate::config::BackendConfig;
use crate::supervisor::ShutdownToken;

#[derive(Clone)]
pub struct LaunchRequest {
    pub generation: u64,
    pub exits: mpsc::UnboundedSender<ExitReport>,
    pub shutdown: ShutdownToken,
}

#[async_trait]
pub trait Launcher: Send + Sync {
    async fn launch(&self, request: LaunchRequest) -> WardenResult<ProcessHandle>;
}

pub struct ProcessLauncher {
    backend: BackendConfig,
    capture_output: bool,
}

impl ProcessLauncher {
    pub fn new(backend: BackendConfig, capture_output: bool) -> Self {
        Self { backend, capture_output }
    }
}

#[async_trait]
impl Launcher for ProcessLauncher {
    async fn launch(&self, request: LaunchRequest) -> WardenResult<ProcessHandle> {
        let plan = LaunchPlan::for_backend(&self.backend)?;
        info!("Launching backend ({} mode): {}", plan.mode, plan);

        let mut child = plan
            .command(self.capture_output)
            .spawn()
            .map_err(|e| WardenError::Launch(format!("Failed to start {}: {}", plan, e)))?;

        if let Some(stdout) = child.stdout.take() {
            tokio::spawn(forward_output(stdout, "stdout"));
        }
        if let Some(stderr) = child.stderr.take() {
            tokio::spawn(forward_output(stderr, "stderr"));
        }

        let handle =
            ProcessHandle::watch_child(child, request.generation, request.exits, request.shutdown);
        debug!(
            "Backend generation {} running as pid {:?}",
            handle.generation(),
            handle.pid()
        );
        Ok(handle)
    }
}

async fn forward_output<R>(stream: R, name: &'static str)
where
    R: AsyncRead + Unpin + Send + 'static,
{
    let mut lines = BufReader::new(stream).lines();
    loop {
        match lines.next_line().await {
            Ok(Some(line)) => info!(target: "backend", stream = name, "{}", line),
            Ok(None) => break,
            Err(e) => {
                warn!("Stopped reading backend {}: {}", name, e);
                break;
            }
        }
    }
}
