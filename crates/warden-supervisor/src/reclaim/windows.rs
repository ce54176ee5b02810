use async_trait::async_trait;
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, info, warn};
use warden_types::{WardenError, WardenResult};

use super::{parse_netstat_listeners, Reclaimer};

const CREATE_NO_WINDOW: u32 = 0x0800_0000;

pub struct WindowsReclaimer {
    process_name: Option<String>,
}

impl WindowsReclaimer {
    pub fn new(process_name: Option<String>) -> Self {
        Self { process_name }
    }
}

#[async_trait]
impl Reclaimer for WindowsReclaimer {
    async fn terminate_stale_processes(&self) -> WardenResult<usize> {
        let Some(name) = self.process_name.as_deref() else {
            debug!("No reclaimable process name configured");
            return Ok(0);
        };

        // taskkill exits non-zero when no process matches
        if taskkill(&["/F", "/T", "/IM", name]).await? {
            info!("Terminated stale '{}' processes", name);
            Ok(1)
        } else {
            Ok(0)
        }
    }

    async fn release_port(&self, port: u16) -> WardenResult<usize> {
        let output = Command::new("netstat")
            .args(["-ano", "-p", "tcp"])
            .creation_flags(CREATE_NO_WINDOW)
            .output()
            .await
            .map_err(|e| WardenError::Cleanup(format!("Failed to run netstat: {}", e)))?;

        let listing = String::from_utf8_lossy(&output.stdout);
        let pids = parse_netstat_listeners(&listing, port, std::process::id());

        let mut terminated = 0;
        for pid in pids {
            info!("Port {} held by pid {}, terminating", port, pid);
            match taskkill(&["/F", "/T", "/PID", &pid.to_string()]).await {
                Ok(true) => terminated += 1,
                Ok(false) => warn!("taskkill could not terminate pid {}", pid),
                Err(e) => warn!("{}", e),
            }
        }
        Ok(terminated)
    }
}

async fn taskkill(args: &[&str]) -> WardenResult<bool> {
    let status = Command::new("taskkill")
        .args(args)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .creation_flags(CREATE_NO_WINDOW)
        .status()
        .await
        .map_err(|e| WardenError::Cleanup(format!("Failed to run taskkill: {}", e)))?;
    Ok(status.success())
}
