use async_trait::async_trait;
use nix::sys::signal::{kill, Signal};
use nix::unistd::Pid;
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, info, warn};
use warden_types::{WardenError, WardenResult};

use super::{parse_pid_lines, Reclaimer};

const TERM_WAIT: Duration = Duration::from_millis(500);

pub struct UnixReclaimer {
    process_name: Option<String>,
}

impl UnixReclaimer {
    pub fn new(process_name: Option<String>) -> Self {
        Self { process_name }
    }
}

#[async_trait]
impl Reclaimer for UnixReclaimer {
    async fn terminate_stale_processes(&self) -> WardenResult<usize> {
        let Some(name) = self.process_name.as_deref() else {
            debug!("No reclaimable process name configured");
            return Ok(0);
        };

        let output = list_pids("pgrep", &["-x", name]).await?;
        let pids = parse_pid_lines(&output, std::process::id());
        if !pids.is_empty() {
            info!("Terminating stale '{}' processes: {:?}", name, pids);
        }
        Ok(terminate_all(&pids).await)
    }

    async fn release_port(&self, port: u16) -> WardenResult<usize> {
        let filter = format!("-iTCP:{}", port);
        let output = list_pids("lsof", &["-nP", "-t", &filter, "-sTCP:LISTEN"]).await?;
        let pids = parse_pid_lines(&output, std::process::id());
        if !pids.is_empty() {
            info!("Port {} held by {:?}, terminating", port, pids);
        }
        Ok(terminate_all(&pids).await)
    }
}

/// Runs a listing tool. Exit status 1 with no output means "no matches" for
/// both `pgrep` and `lsof`.
async fn list_pids(program: &str, args: &[&str]) -> WardenResult<String> {
    let output = Command::new(program)
        .args(args)
        .output()
        .await
        .map_err(|e| WardenError::Cleanup(format!("Failed to run {}: {}", program, e)))?;

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    if !output.status.success() && !stdout.trim().is_empty() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(WardenError::Cleanup(format!(
            "{} exited with {}: {}",
            program,
            output.status,
            stderr.trim()
        )));
    }
    Ok(stdout)
}

async fn terminate_all(pids: &[u32]) -> usize {
    if pids.is_empty() {
        return 0;
    }

    let mut signalled = Vec::with_capacity(pids.len());
    for &pid in pids {
        match kill(Pid::from_raw(pid as i32), Signal::SIGTERM) {
            Ok(()) => signalled.push(pid),
            Err(e) => warn!("Failed to send SIGTERM to {}: {}", pid, e),
        }
    }

    tokio::time::sleep(TERM_WAIT).await;

    for &pid in &signalled {
        let target = Pid::from_raw(pid as i32);
        if kill(target, None::<Signal>).is_ok() {
            debug!("Process {} still alive, sending SIGKILL", pid);
            if let Err(e) = kill(target, Signal::SIGKILL) {
                warn!("Failed to send SIGKILL to {}: {}", pid, e);
            }
        }
    }

    signalled.len()
}
