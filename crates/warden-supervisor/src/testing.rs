use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use warden_types::{ExitReport, HealthCheckResult, RestartChoice, WardenError, WardenResult};

use crate::launcher::{LaunchRequest, Launcher, ProcessHandle};
use crate::probe::HealthProbe;
use crate::reclaim::Reclaimer;
use crate::shell::Shell;

pub struct ScriptedProbe {
    script: Mutex<VecDeque<HealthCheckResult>>,
    fallback: Mutex<HealthCheckResult>,
    calls: AtomicUsize,
    busy: Arc<AtomicBool>,
    calls_while_busy: AtomicUsize,
}

impl ScriptedProbe {
    pub fn new(fallback: HealthCheckResult) -> Arc<Self> {
        Self::with_script(Vec::new(), fallback)
    }

    pub fn with_script(
        script: impl IntoIterator<Item = HealthCheckResult>,
        fallback: HealthCheckResult,
    ) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(script.into_iter().collect()),
            fallback: Mutex::new(fallback),
            calls: AtomicUsize::new(0),
            busy: Arc::new(AtomicBool::new(false)),
            calls_while_busy: AtomicUsize::new(0),
        })
    }

    pub fn push(&self, results: impl IntoIterator<Item = HealthCheckResult>) {
        self.script.lock().extend(results);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Flag that marks a window in which no probe is expected.
    pub fn busy_flag(&self) -> Arc<AtomicBool> {
        self.busy.clone()
    }

    pub fn calls_while_busy(&self) -> usize {
        self.calls_while_busy.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl HealthProbe for ScriptedProbe {
    async fn check(&self, _timeout: Duration) -> HealthCheckResult {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.busy.load(Ordering::SeqCst) {
            self.calls_while_busy.fetch_add(1, Ordering::SeqCst);
        }
        let next = self.script.lock().pop_front();
        next.unwrap_or_else(|| *self.fallback.lock())
    }
}

#[derive(Default)]
pub struct FakeLauncher {
    launches: AtomicUsize,
    stops: Arc<AtomicUsize>,
    running: Arc<AtomicUsize>,
    fail_launch: AtomicBool,
    stubborn: bool,
    live: Mutex<Option<LiveFake>>,
}

struct LiveFake {
    generation: u64,
    crash_tx: mpsc::UnboundedSender<i32>,
    exits: mpsc::UnboundedSender<ExitReport>,
}

impl FakeLauncher {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn failing() -> Arc<Self> {
        let launcher = Self::default();
        launcher.fail_launch.store(true, Ordering::SeqCst);
        Arc::new(launcher)
    }

    /// Processes ignore the graceful stop and only die once the grace is up.
    pub fn stubborn() -> Arc<Self> {
        Arc::new(Self {
            stubborn: true,
            ..Self::default()
        })
    }

    pub fn set_failing(&self, failing: bool) {
        self.fail_launch.store(failing, Ordering::SeqCst);
    }

    pub fn launches(&self) -> usize {
        self.launches.load(Ordering::SeqCst)
    }

    pub fn stops(&self) -> usize {
        self.stops.load(Ordering::SeqCst)
    }

    pub fn running(&self) -> usize {
        self.running.load(Ordering::SeqCst)
    }

    pub fn live_generation(&self) -> Option<u64> {
        self.live.lock().as_ref().map(|live| live.generation)
    }

    /// Makes the most recent process exit on its own with `code`.
    pub fn crash(&self, code: i32) {
        if let Some(live) = self.live.lock().as_ref() {
            let _ = live.crash_tx.send(code);
        }
    }

    pub fn inject_exit(&self, report: ExitReport) {
        if let Some(live) = self.live.lock().as_ref() {
            let _ = live.exits.send(report);
        }
    }
}

#[async_trait]
impl Launcher for FakeLauncher {
    async fn launch(&self, request: LaunchRequest) -> WardenResult<ProcessHandle> {
        if self.fail_launch.load(Ordering::SeqCst) {
            return Err(WardenError::Launch("backend executable missing".into()));
        }

        let launch_no = self.launches.fetch_add(1, Ordering::SeqCst) as u32;
        let pid = 1000 + launch_no;
        let generation = request.generation;
        let (stop_tx, stop_rx) = oneshot::channel::<Duration>();
        let (crash_tx, mut crash_rx) = mpsc::unbounded_channel::<i32>();
        let stops = self.stops.clone();
        let running = self.running.clone();
        let stubborn = self.stubborn;
        let exits = request.exits.clone();
        let shutdown = request.shutdown.clone();

        running.fetch_add(1, Ordering::SeqCst);
        let monitor = tokio::spawn(async move {
            let (code, requested) = tokio::select! {
                grace = stop_rx => {
                    if stubborn {
                        tokio::time::sleep(grace.unwrap_or_default()).await;
                    }
                    (None, true)
                }
                Some(code) = crash_rx.recv() => (Some(code), false),
            };
            if requested {
                stops.fetch_add(1, Ordering::SeqCst);
            }
            running.fetch_sub(1, Ordering::SeqCst);

            let report = ExitReport {
                generation,
                pid: Some(pid),
                code,
                deliberate: requested || shutdown.is_cancelled(),
            };
            let _ = exits.send(report.clone());
            report
        });

        *self.live.lock() = Some(LiveFake {
            generation,
            crash_tx,
            exits: request.exits,
        });

        Ok(ProcessHandle::new(generation, Some(pid), stop_tx, monitor))
    }
}

pub struct RecordingShell {
    choices: Mutex<VecDeque<RestartChoice>>,
    prompt_delay: Duration,
    busy: Option<Arc<AtomicBool>>,
    prompts: Mutex<Vec<String>>,
    transient: Mutex<Vec<String>>,
    fatal: Mutex<Vec<String>>,
    ready: AtomicUsize,
}

impl RecordingShell {
    pub fn new(choices: impl IntoIterator<Item = RestartChoice>) -> Arc<Self> {
        Arc::new(Self::build(choices, Duration::ZERO, None))
    }

    pub fn restarting() -> Arc<Self> {
        Self::new(Vec::new())
    }

    /// Every prompt takes `delay` and raises `busy` while it is open.
    pub fn slow(
        choices: impl IntoIterator<Item = RestartChoice>,
        delay: Duration,
        busy: Arc<AtomicBool>,
    ) -> Arc<Self> {
        Arc::new(Self::build(choices, delay, Some(busy)))
    }

    fn build(
        choices: impl IntoIterator<Item = RestartChoice>,
        prompt_delay: Duration,
        busy: Option<Arc<AtomicBool>>,
    ) -> Self {
        Self {
            choices: Mutex::new(choices.into_iter().collect()),
            prompt_delay,
            busy,
            prompts: Mutex::new(Vec::new()),
            transient: Mutex::new(Vec::new()),
            fatal: Mutex::new(Vec::new()),
            ready: AtomicUsize::new(0),
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().clone()
    }

    pub fn transient_messages(&self) -> Vec<String> {
        self.transient.lock().clone()
    }

    pub fn fatal_errors(&self) -> Vec<String> {
        self.fatal.lock().clone()
    }

    pub fn ready_notifications(&self) -> usize {
        self.ready.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Shell for RecordingShell {
    async fn show_restart_prompt(&self, reason: &str) -> RestartChoice {
        self.prompts.lock().push(reason.to_string());
        if let Some(busy) = &self.busy {
            busy.store(true, Ordering::SeqCst);
        }
        if !self.prompt_delay.is_zero() {
            tokio::time::sleep(self.prompt_delay).await;
        }
        if let Some(busy) = &self.busy {
            busy.store(false, Ordering::SeqCst);
        }
        let next = self.choices.lock().pop_front();
        next.unwrap_or(RestartChoice::Restart)
    }

    async fn show_transient_state(&self, message: &str) {
        self.transient.lock().push(message.to_string());
    }

    async fn show_fatal_error(&self, message: &str) {
        self.fatal.lock().push(message.to_string());
    }

    async fn notify_ready_to_display(&self) {
        self.ready.fetch_add(1, Ordering::SeqCst);
    }
}

#[derive(Default)]
pub struct RecordingReclaimer {
    fail: bool,
    stale: usize,
    holders: usize,
    calls: AtomicUsize,
    ports: Mutex<Vec<u16>>,
}

impl RecordingReclaimer {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            fail: true,
            ..Self::default()
        })
    }

    pub fn with_counts(stale: usize, holders: usize) -> Arc<Self> {
        Arc::new(Self {
            stale,
            holders,
            ..Self::default()
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn released_ports(&self) -> Vec<u16> {
        self.ports.lock().clone()
    }
}

#[async_trait]
impl Reclaimer for RecordingReclaimer {
    async fn terminate_stale_processes(&self) -> WardenResult<usize> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(WardenError::Cleanup("pgrep not available".into()));
        }
        Ok(self.stale)
    }

    async fn release_port(&self, port: u16) -> WardenResult<usize> {
        self.ports.lock().push(port);
        if self.fail {
            return Err(WardenError::Cleanup(format!("port {} still busy", port)));
        }
        Ok(self.holders)
    }
}
