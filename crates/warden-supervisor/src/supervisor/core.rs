use chrono::Utc;
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tracing::{debug, error, info, warn};
use warden_types::{ExitReport, SupervisorState, WardenError, WardenResult};

use super::shutdown::{ShutdownToken, ShutdownTrigger};
use super::status::{SupervisorHandle, SupervisorStatus};
use super::types::{RecoveryTrigger, SupervisorExit};
use crate::config::SupervisorConfig;
use crate::launcher::{LaunchRequest, Launcher, ProcessHandle};
use crate::probe::{await_ready, probe_once, HealthProbe};
use crate::reclaim::{reclaim, Reclaimer};
use crate::shell::Shell;
use crate::watchdog::{Watchdog, WatchdogVerdict};

pub struct SupervisorParts {
    pub launcher: Arc<dyn Launcher>,
    pub probe: Arc<dyn HealthProbe>,
    pub reclaimer: Arc<dyn Reclaimer>,
    pub shell: Arc<dyn Shell>,
}

enum Event {
    WatchdogTick,
    Exited(ExitReport),
}

pub(super) enum Readiness {
    Ready,
    NotReady,
    Exited(ExitReport),
}

/// Owns the backend for the whole session: state, the single live process
/// handle and the watchdog all live here and are only touched from `run()`.
pub struct Supervisor {
    pub(super) config: SupervisorConfig,
    pub(super) launcher: Arc<dyn Launcher>,
    pub(super) probe: Arc<dyn HealthProbe>,
    pub(super) reclaimer: Arc<dyn Reclaimer>,
    pub(super) shell: Arc<dyn Shell>,
    pub(super) state: SupervisorState,
    pub(super) process: Option<ProcessHandle>,
    pub(super) generation: u64,
    pub(super) watchdog: Watchdog,
    pub(super) restart_count: u32,
    pub(super) last_error: Option<String>,
    exits_tx: mpsc::UnboundedSender<ExitReport>,
    exits_rx: mpsc::UnboundedReceiver<ExitReport>,
    shutdown_trigger: ShutdownTrigger,
    shutdown: ShutdownToken,
    status_tx: watch::Sender<SupervisorStatus>,
}

impl Supervisor {
    pub fn new(config: SupervisorConfig, parts: SupervisorParts) -> Self {
        let (exits_tx, exits_rx) = mpsc::unbounded_channel();
        let (shutdown_trigger, shutdown) = ShutdownToken::new();
        let (status_tx, _) = watch::channel(SupervisorStatus::new(Utc::now()));
        let watchdog = Watchdog::new(config.failure_threshold);

        Self {
            config,
            launcher: parts.launcher,
            probe: parts.probe,
            reclaimer: parts.reclaimer,
            shell: parts.shell,
            state: SupervisorState::Idle,
            process: None,
            generation: 0,
            watchdog,
            restart_count: 0,
            last_error: None,
            exits_tx,
            exits_rx,
            shutdown_trigger,
            shutdown,
            status_tx,
        }
    }

    pub fn handle(&self) -> SupervisorHandle {
        SupervisorHandle::new(self.shutdown_trigger.clone(), self.status_tx.subscribe())
    }

    pub fn state(&self) -> SupervisorState {
        self.state
    }

    /// Runs the session to completion. Returns `Ok` on quit or shutdown and
    /// the fatal error otherwise; in every case the backend is stopped and
    /// the state is `Terminated` on return.
    pub async fn run(mut self) -> WardenResult<SupervisorExit> {
        info!("Supervisor starting (backend on port {})", self.config.port);
        let mut shutdown = self.shutdown.clone();

        let outcome = tokio::select! {
            biased;
            _ = shutdown.cancelled() => None,
            result = self.drive() => Some(result),
        };

        match outcome {
            None => {
                self.shut_down().await;
                Ok(SupervisorExit::Shutdown)
            }
            Some(Ok(exit)) => Ok(exit),
            Some(Err(e)) => Err(self.fail(e).await),
        }
    }

    async fn drive(&mut self) -> WardenResult<SupervisorExit> {
        self.start().await?;
        self.monitor().await
    }

    async fn start(&mut self) -> WardenResult<()> {
        self.transition(SupervisorState::Cleaning);
        reclaim(
            self.reclaimer.as_ref(),
            self.config.port,
            self.config.settle_delay(),
        )
        .await;

        self.transition(SupervisorState::Launching);
        self.launch().await?;

        self.transition(SupervisorState::AwaitingReady);
        match self.wait_until_ready().await {
            Readiness::Ready => {}
            Readiness::NotReady => {
                return Err(WardenError::NotReady {
                    attempts: self.config.readiness_max_attempts,
                })
            }
            Readiness::Exited(report) => {
                return Err(WardenError::Launch(format!(
                    "{} before becoming ready",
                    report
                )))
            }
        }

        self.enter_monitoring();
        self.shell.notify_ready_to_display().await;
        Ok(())
    }

    async fn monitor(&mut self) -> WardenResult<SupervisorExit> {
        loop {
            let event = tokio::select! {
                _ = self.watchdog.tick() => Event::WatchdogTick,
                Some(report) = self.exits_rx.recv() => Event::Exited(report),
            };

            let trigger = match event {
                Event::WatchdogTick => self.check_health().await,
                Event::Exited(report) => self.on_exit(report),
            };

            if let Some(trigger) = trigger {
                if let Some(exit) = self.recover(trigger).await? {
                    return Ok(exit);
                }
            }
        }
    }

    async fn check_health(&mut self) -> Option<RecoveryTrigger> {
        let result = probe_once(self.probe.as_ref(), self.config.watchdog_timeout()).await;
        let previous = self.watchdog.failures();

        let trigger = match self.watchdog.record(&result) {
            WatchdogVerdict::Healthy => {
                if previous > 0 {
                    info!("Backend healthy again after {} failed check(s)", previous);
                }
                None
            }
            WatchdogVerdict::Failing { consecutive } => {
                warn!(
                    "Health check failed ({}/{}): {}",
                    consecutive, self.config.failure_threshold, result
                );
                None
            }
            WatchdogVerdict::Breached { consecutive } => {
                warn!(
                    "Health check failed ({}/{}): {}, backend unresponsive",
                    consecutive, self.config.failure_threshold, result
                );
                Some(RecoveryTrigger::Unresponsive {
                    failures: consecutive,
                })
            }
        };

        self.publish_status();
        trigger
    }

    fn on_exit(&mut self, report: ExitReport) -> Option<RecoveryTrigger> {
        let current = self.process.as_ref().map(ProcessHandle::generation);
        if current != Some(report.generation) {
            debug!("Ignoring exit of stale generation {}", report.generation);
            return None;
        }

        if report.deliberate {
            info!("Backend stopped: {}", report);
            return None;
        }

        Some(RecoveryTrigger::UnexpectedExit(report))
    }

    pub(super) async fn wait_until_ready(&mut self) -> Readiness {
        let generation = self.generation;
        let ready = await_ready(self.probe.as_ref(), &self.config);
        tokio::pin!(ready);

        loop {
            tokio::select! {
                is_ready = &mut ready => {
                    return if is_ready { Readiness::Ready } else { Readiness::NotReady };
                }
                Some(report) = self.exits_rx.recv() => {
                    if report.generation == generation && !report.deliberate {
                        warn!("Backend exited while awaiting readiness: {}", report);
                        return Readiness::Exited(report);
                    }
                    debug!("Ignoring exit of generation {} while awaiting readiness", report.generation);
                }
            }
        }
    }

    pub(super) async fn launch(&mut self) -> WardenResult<()> {
        if self.process.is_some() {
            return Err(WardenError::Internal(
                "Launch requested while a backend is still running".into(),
            ));
        }

        self.generation += 1;
        let request = LaunchRequest {
            generation: self.generation,
            exits: self.exits_tx.clone(),
            shutdown: self.shutdown.clone(),
        };

        let handle = self.launcher.launch(request).await?;
        info!(
            "Backend generation {} started (pid {:?})",
            handle.generation(),
            handle.pid()
        );
        self.process = Some(handle);
        self.publish_status();
        Ok(())
    }

    pub(super) fn enter_monitoring(&mut self) {
        self.transition(SupervisorState::Monitoring);
        self.watchdog.start(self.config.watchdog_interval());
        self.publish_status();
    }

    /// Stops the live backend, if any. The handle stays in place until its
    /// monitor has finished so an interrupted stop can be resumed.
    pub(super) async fn stop_process(&mut self) {
        let grace = self.config.stop_grace();
        let Some(handle) = self.process.as_mut() else {
            return;
        };

        info!("Stopping backend generation {}", handle.generation());
        handle.request_stop(grace);
        match handle.wait().await {
            Some(report) => debug!("Backend stop complete: {}", report),
            None => warn!("Backend stop did not produce an exit report"),
        }
        self.process = None;
        self.publish_status();
    }

    async fn shut_down(&mut self) {
        info!("Shutdown requested, stopping backend");
        self.watchdog.stop();
        self.stop_process().await;
        self.transition(SupervisorState::Terminated);
    }

    async fn fail(&mut self, err: WardenError) -> WardenError {
        error!("Supervisor failed: {}", err);
        self.watchdog.stop();
        self.last_error = Some(err.to_string());
        self.shell.show_fatal_error(&err.to_string()).await;
        self.stop_process().await;
        self.transition(SupervisorState::Terminated);
        err
    }

    pub(super) fn transition(&mut self, next: SupervisorState) {
        if self.state == next {
            return;
        }
        if !self.state.can_transition_to(next) {
            warn!("Unexpected state transition {} -> {}", self.state, next);
        }

        info!("Supervisor state: {} -> {}", self.state, next);
        self.state = next;
        self.publish_status();
    }

    pub(super) fn publish_status(&self) {
        let started_at = self.status_tx.borrow().started_at;
        self.status_tx.send_replace(SupervisorStatus {
            state: self.state,
            pid: self.process.as_ref().and_then(ProcessHandle::pid),
            generation: self.generation,
            consecutive_failures: self.watchdog.failures(),
            restart_count: self.restart_count,
            watchdog_active: self.watchdog.is_active(),
            last_error: self.last_error.clone(),
            started_at,
        });
    }
}
