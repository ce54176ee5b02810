#[cfg(unix)]
mod unix;
#[cfg(windows)]
mod windows;

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};
use warden_types::WardenResult;

#[async_trait]
pub trait Reclaimer: Send + Sync {
    async fn terminate_stale_processes(&self) -> WardenResult<usize>;

    async fn release_port(&self, port: u16) -> WardenResult<usize>;
}

/// Runs both reclaim steps, then waits `settle` for the OS to release the
/// resources. Returns the number of processes terminated.
pub async fn reclaim(reclaimer: &dyn Reclaimer, port: u16, settle: Duration) -> usize {
    let mut terminated = 0;

    match reclaimer.terminate_stale_processes().await {
        Ok(count) => terminated += count,
        Err(e) => warn!("Stale process cleanup failed: {}", e),
    }

    match reclaimer.release_port(port).await {
        Ok(count) => terminated += count,
        Err(e) => warn!("Releasing port {} failed: {}", port, e),
    }

    if terminated > 0 {
        info!("Reclaimed {} stale backend process(es)", terminated);
    } else {
        debug!("Nothing to reclaim on port {}", port);
    }

    tokio::time::sleep(settle).await;
    terminated
}

pub fn platform_reclaimer(process_name: Option<String>) -> Arc<dyn Reclaimer> {
    #[cfg(unix)]
    let reclaimer = unix::UnixReclaimer::new(process_name);
    #[cfg(windows)]
    let reclaimer = windows::WindowsReclaimer::new(process_name);

    Arc::new(reclaimer)
}

/// One PID per line, as printed by `pgrep` and `lsof -t`.
pub fn parse_pid_lines(output: &str, own_pid: u32) -> Vec<u32> {
    let mut pids: Vec<u32> = output
        .lines()
        .filter_map(|line| line.trim().parse::<u32>().ok())
        .filter(|pid| *pid != 0 && *pid != own_pid)
        .collect();
    pids.sort_unstable();
    pids.dedup();
    pids
}

/// PIDs owning a LISTENING TCP socket on `port` in `netstat -ano` output.
pub fn parse_netstat_listeners(output: &str, port: u16, own_pid: u32) -> Vec<u32> {
    let mut pids: Vec<u32> = output
        .lines()
        .filter_map(|line| {
            let cols: Vec<&str> = line.split_whitespace().collect();
            if cols.len() < 5 || !cols[0].eq_ignore_ascii_case("tcp") {
                return None;
            }
            if !cols[3].eq_ignore_ascii_case("listening") {
                return None;
            }
            let (_, local_port) = cols[1].rsplit_once(':')?;
            if local_port.parse::<u16>().ok()? != port {
                return None;
            }
            cols[4].parse::<u32>().ok()
        })
        .filter(|pid| *pid != 0 && *pid != own_pid)
        .collect();
    pids.sort_unstable();
    pids.dedup();
    pids
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::RecordingReclaimer;

    #[test]
    fn test_parse_pid_lines() {
        let output = "4242\n  17 \n\nnot-a-pid\n4242\n";
        assert_eq!(parse_pid_lines(output, 1), vec![17, 4242]);
    }

    #[test]
    fn test_parse_pid_lines_skips_own_pid() {
        assert_eq!(parse_pid_lines("100\n200\n", 200), vec![100]);
        assert!(parse_pid_lines("", 1).is_empty());
    }

    #[test]
    fn test_parse_netstat_listeners() {
        let output = "
Active Connections

  Proto  Local Address          Foreign Address        State           PID
  TCP    0.0.0.0:135            0.0.0.0:0              LISTENING       1044
  TCP    127.0.0.1:8765         0.0.0.0:0              LISTENING       5120
  TCP    127.0.0.1:8765         127.0.0.1:50122        ESTABLISHED     5120
  TCP    127.0.0.1:50122        127.0.0.1:8765         ESTABLISHED     7788
  TCP    [::]:8765              [::]:0                 LISTENING       5120
  TCP    127.0.0.1:87650        0.0.0.0:0              LISTENING       9999
";
        assert_eq!(parse_netstat_listeners(output, 8765, 1), vec![5120]);
        assert!(parse_netstat_listeners(output, 8765, 5120).is_empty());
        assert_eq!(parse_netstat_listeners(output, 135, 1), vec![1044]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reclaim_swallows_errors_and_settles() {
        let reclaimer = RecordingReclaimer::failing();
        let settle = Duration::from_millis(500);

        let start = tokio::time::Instant::now();
        let terminated = reclaim(reclaimer.as_ref(), 8765, settle).await;

        assert_eq!(terminated, 0);
        assert!(start.elapsed() >= settle);
        assert_eq!(reclaimer.calls(), 1);
        assert_eq!(reclaimer.released_ports(), vec![8765]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reclaim_counts_terminated() {
        let reclaimer = RecordingReclaimer::with_counts(2, 1);
        let terminated = reclaim(reclaimer.as_ref(), 9000, Duration::from_millis(10)).await;
        assert_eq!(terminated, 3);
    }
}
