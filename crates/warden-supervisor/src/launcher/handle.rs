use std::io;
use std::process::ExitStatus;
use std::time::Duration;
use tokio::process::Child;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use warden_types::ExitReport;

use crate::supervisor::ShutdownToken;

/// A handle dropped without `stop` still takes its process down.
const DROPPED_HANDLE_GRACE: Duration = Duration::from_secs(3);

/// Exclusive reference to one running backend process.
///
/// The child itself is owned by a monitor task that waits for it to exit and
/// reports exactly one [`ExitReport`]. The handle keeps the stop channel and
/// the monitor's join handle.
pub struct ProcessHandle {
    generation: u64,
    pid: Option<u32>,
    stop_tx: Option<oneshot::Sender<Duration>>,
    monitor: Option<JoinHandle<ExitReport>>,
    report: Option<ExitReport>,
}

enum Wake {
    Exited(io::Result<ExitStatus>),
    StopRequested(Duration),
}

impl ProcessHandle {
    pub fn new(
        generation: u64,
        pid: Option<u32>,
        stop_tx: oneshot::Sender<Duration>,
        monitor: JoinHandle<ExitReport>,
    ) -> Self {
        Self {
            generation,
            pid,
            stop_tx: Some(stop_tx),
            monitor: Some(monitor),
            report: None,
        }
    }

    pub fn watch_child(
        child: Child,
        generation: u64,
        exits: mpsc::UnboundedSender<ExitReport>,
        shutdown: ShutdownToken,
    ) -> Self {
        let pid = child.id();
        let (stop_tx, stop_rx) = oneshot::channel();
        let monitor = tokio::spawn(monitor_child(child, generation, stop_rx, exits, shutdown));
        Self::new(generation, pid, stop_tx, monitor)
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn pid(&self) -> Option<u32> {
        self.pid
    }

    pub fn is_alive(&self) -> bool {
        self.monitor
            .as_ref()
            .is_some_and(|monitor| !monitor.is_finished())
    }

    /// Asks the monitor to stop the process: graceful signal first, forceful
    /// kill once `grace` has elapsed. Later calls are no-ops.
    pub fn request_stop(&mut self, grace: Duration) {
        if let Some(stop_tx) = self.stop_tx.take() {
            let _ = stop_tx.send(grace);
        }
    }

    /// Waits for the monitor to finish. Cancel safe: if the future is dropped
    /// the handle keeps the monitor and a later call resumes the wait.
    pub async fn wait(&mut self) -> Option<ExitReport> {
        if let Some(monitor) = self.monitor.as_mut() {
            let outcome = monitor.await;
            self.monitor = None;
            match outcome {
                Ok(report) => self.report = Some(report),
                Err(e) => warn!("Exit monitor for generation {} failed: {}", self.generation, e),
            }
        }
        self.report.clone()
    }

    pub async fn stop(mut self, grace: Duration) -> Option<ExitReport> {
        self.request_stop(grace);
        self.wait().await
    }
}

impl std::fmt::Debug for ProcessHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProcessHandle")
            .field("generation", &self.generation)
            .field("pid", &self.pid)
            .field("alive", &self.is_alive())
            .finish()
    }
}

async fn monitor_child(
    mut child: Child,
    generation: u64,
    mut stop_rx: oneshot::Receiver<Duration>,
    exits: mpsc::UnboundedSender<ExitReport>,
    shutdown: ShutdownToken,
) -> ExitReport {
    let pid = child.id();

    let wake = tokio::select! {
        status = child.wait() => Wake::Exited(status),
        grace = &mut stop_rx => Wake::StopRequested(grace.unwrap_or(DROPPED_HANDLE_GRACE)),
    };

    let (status, requested) = match wake {
        Wake::Exited(status) => (status, false),
        Wake::StopRequested(grace) => (terminate(&mut child, pid, grace).await, true),
    };

    let code = match status {
        Ok(status) => status.code(),
        Err(e) => {
            warn!("Failed to collect backend exit status: {}", e);
            None
        }
    };

    let report = ExitReport {
        generation,
        pid,
        code,
        deliberate: requested || shutdown.is_cancelled(),
    };

    if report.deliberate {
        info!("{} (stop requested)", report);
    } else {
        warn!("{}", report);
    }

    let _ = exits.send(report.clone());
    report
}

async fn terminate(child: &mut Child, pid: Option<u32>, grace: Duration) -> io::Result<ExitStatus> {
    if let Ok(Some(status)) = child.try_wait() {
        return Ok(status);
    }

    if let Some(pid) = pid {
        debug!("Sending graceful stop to backend pid {}", pid);
        send_graceful_stop(pid).await;
    }

    match tokio::time::timeout(grace, child.wait()).await {
        Ok(status) => status,
        Err(_) => {
            warn!("Backend did not exit within {:?}, killing", grace);
            child.start_kill()?;
            child.wait().await
        }
    }
}

#[cfg(unix)]
async fn send_graceful_stop(pid: u32) {
    use nix::sys::signal::{kill, Signal};
    use nix::unistd::Pid;

    if let Err(e) = kill(Pid::from_raw(pid as i32), Signal::SIGTERM) {
        debug!("SIGTERM to {} failed: {}", pid, e);
    }
}

#[cfg(windows)]
async fn send_graceful_stop(pid: u32) {
    let result = tokio::process::Command::new("taskkill")
        .args(["/PID", &pid.to_string(), "/T"])
        .stdout(std::process::Stdio::null())
        .stderr(std::process::Stdio::null())
        .status()
        .await;
    if let Err(e) = result {
        debug!("taskkill for {} failed: {}", pid, e);
    }
}
