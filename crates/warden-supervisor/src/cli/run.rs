use super::status::write_status_file;
use super::utils::print_banner;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{error, info, warn};
use warden_supervisor::{
    platform_reclaimer, ConsoleShell, HeadlessShell, HttpHealthProbe, ProcessLauncher, Shell,
    Supervisor, SupervisorExit, SupervisorParts, SupervisorStatus, WardenConfig,
};
use warden_types::{WardenError, WardenResult};

pub async fn run_supervisor(
    config: WardenConfig,
    warden_dir: &Path,
    headless: bool,
    pid_file: Option<PathBuf>,
    status_file: Option<PathBuf>,
) -> WardenResult<SupervisorExit> {
    print_banner();
    info!("Starting warden v{}", env!("CARGO_PKG_VERSION"));
    info!("State directory: {:?}", warden_dir);
    info!("Backend: {} mode, {}", config.backend.mode, config.backend.artifact_path().display());

    std::fs::create_dir_all(warden_dir)
        .map_err(|e| WardenError::Config(format!("Failed to create state directory: {}", e)))?;

    if let Some(ref pid_path) = pid_file {
        let pid = std::process::id();
        std::fs::write(pid_path, pid.to_string())
            .map_err(|e| WardenError::Config(format!("Failed to write PID file: {}", e)))?;
        info!("PID file written: {:?}", pid_path);
    }

    let shell: Arc<dyn Shell> = if headless {
        Arc::new(HeadlessShell::new())
    } else {
        Arc::new(ConsoleShell::new())
    };

    let parts = SupervisorParts {
        launcher: Arc::new(ProcessLauncher::new(
            config.backend.clone(),
            config.logging.capture_backend_output,
        )),
        probe: Arc::new(HttpHealthProbe::from_config(&config.supervisor)?),
        reclaimer: platform_reclaimer(config.backend.reclaimable_process_name()),
        shell,
    };

    let supervisor = Supervisor::new(config.supervisor.clone(), parts);
    let handle = supervisor.handle();

    let signal_handle = handle.clone();
    tokio::spawn(async move {
        wait_for_shutdown().await;
        signal_handle.shutdown();
    });

    let status_writer = status_file.map(|path| {
        info!("Writing status to {:?}", path);
        tokio::spawn(write_status_updates(handle.subscribe(), path))
    });

    let result = supervisor.run().await;

    if let Some(writer) = status_writer {
        let _ = writer.await;
    }

    if let Some(ref pid_path) = pid_file {
        let _ = std::fs::remove_file(pid_path);
    }

    match &result {
        Ok(exit) => info!("Supervisor finished ({:?})", exit),
        Err(e) => error!("Supervisor failed: {}", e),
    }
    result
}

/// Mirrors every published status into `path` until the supervisor is gone.
async fn write_status_updates(mut rx: watch::Receiver<SupervisorStatus>, path: PathBuf) {
    loop {
        let status = rx.borrow_and_update().clone();
        if let Err(e) = write_status_file(&path, &status) {
            warn!("Failed to write status file: {}", e);
        }
        if rx.changed().await.is_err() {
            break;
        }
    }

    let last = rx.borrow().clone();
    if let Err(e) = write_status_file(&path, &last) {
        warn!("Failed to write final status: {}", e);
    }
}

async fn wait_for_shutdown() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        match (signal(SignalKind::terminate()), signal(SignalKind::interrupt())) {
            (Ok(mut sigterm), Ok(mut sigint)) => {
                tokio::select! {
                    _ = sigterm.recv() => { info!("Received SIGTERM"); }
                    _ = sigint.recv() => { info!("Received SIGINT"); }
                }
                return;
            }
            _ => warn!("Failed to install signal handlers, falling back to Ctrl+C"),
        }
    }

    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Received Ctrl+C"),
        Err(e) => {
            warn!("Ctrl+C handler unavailable: {}", e);
            std::future::pending::<()>().await;
        }
    }
}
