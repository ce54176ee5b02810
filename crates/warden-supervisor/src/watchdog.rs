use std::time::Duration;
use tokio::time::{interval_at, Instant, Interval, MissedTickBehavior};
use warden_types::HealthCheckResult;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FailureCounter(u32);

impl FailureCounter {
    pub fn increment(&mut self) -> u32 {
        self.0 = self.0.saturating_add(1);
        self.0
    }

    pub fn reset(&mut self) {
        self.0 = 0;
    }

    pub fn take(&mut self) -> u32 {
        std::mem::take(&mut self.0)
    }

    pub fn get(&self) -> u32 {
        self.0
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WatchdogVerdict {
    Healthy,
    Failing { consecutive: u32 },
    /// The threshold was reached; the watchdog has already stopped itself.
    Breached { consecutive: u32 },
}

pub struct Watchdog {
    threshold: u32,
    failures: FailureCounter,
    timer: Option<Interval>,
}

impl Watchdog {
    pub fn new(threshold: u32) -> Self {
        Self {
            threshold: threshold.max(1),
            failures: FailureCounter::default(),
            timer: None,
        }
    }

    /// Starts ticking every `period`, first tick one period from now.
    /// Restarting clears the failure counter.
    pub fn start(&mut self, period: Duration) {
        let mut timer = interval_at(Instant::now() + period, period);
        timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
        self.timer = Some(timer);
        self.failures.reset();
    }

    pub fn stop(&mut self) {
        self.timer = None;
    }

    pub fn is_active(&self) -> bool {
        self.timer.is_some()
    }

    /// Resolves on the next tick. Pending forever while stopped.
    pub async fn tick(&mut self) {
        match self.timer.as_mut() {
            Some(timer) => {
                timer.tick().await;
            }
            None => std::future::pending::<()>().await,
        }
    }

    pub fn record(&mut self, result: &HealthCheckResult) -> WatchdogVerdict {
        if result.is_healthy() {
            self.failures.reset();
            return WatchdogVerdict::Healthy;
        }

        let consecutive = self.failures.increment();
        if consecutive >= self.threshold {
            self.stop();
            WatchdogVerdict::Breached { consecutive }
        } else {
            WatchdogVerdict::Failing { consecutive }
        }
    }

    pub fn failures(&self) -> u32 {
        self.failures.get()
    }

    pub fn take_failures(&mut self) -> u32 {
        self.failures.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_counter_take_clears() {
        let mut counter = FailureCounter::default();
        counter.increment();
        counter.increment();
        assert_eq!(counter.take(), 2);
        assert_eq!(counter.get(), 0);
    }

    #[tokio::test]
    async fn test_breach_stops_watchdog() {
        let mut watchdog = Watchdog::new(3);
        watchdog.start(Duration::from_secs(5));

        assert_eq!(
            watchdog.record(&HealthCheckResult::Unreachable),
            WatchdogVerdict::Failing { consecutive: 1 }
        );
        assert_eq!(
            watchdog.record(&HealthCheckResult::Timeout),
            WatchdogVerdict::Failing { consecutive: 2 }
        );
        assert!(watchdog.is_active());
        assert_eq!(
            watchdog.record(&HealthCheckResult::BadStatus(503)),
            WatchdogVerdict::Breached { consecutive: 3 }
        );
        assert!(!watchdog.is_active());
    }

    #[test]
    fn test_success_resets_counter() {
        let mut watchdog = Watchdog::new(3);
        watchdog.record(&HealthCheckResult::Unreachable);
        watchdog.record(&HealthCheckResult::Unreachable);
        assert_eq!(watchdog.record(&HealthCheckResult::Ok), WatchdogVerdict::Healthy);
        assert_eq!(watchdog.failures(), 0);
        assert_eq!(
            watchdog.record(&HealthCheckResult::Unreachable),
            WatchdogVerdict::Failing { consecutive: 1 }
        );
    }

    #[tokio::test]
    async fn test_restart_clears_failures() {
        let mut watchdog = Watchdog::new(5);
        watchdog.record(&HealthCheckResult::Timeout);
        watchdog.start(Duration::from_secs(1));
        assert_eq!(watchdog.failures(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_tick_after_one_period() {
        let mut watchdog = Watchdog::new(3);
        let period = Duration::from_secs(5);
        let start = Instant::now();

        watchdog.start(period);
        watchdog.tick().await;
        assert!(start.elapsed() >= period);

        watchdog.tick().await;
        assert!(start.elapsed() >= period * 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stopped_watchdog_never_ticks() {
        let mut watchdog = Watchdog::new(3);
        let outcome = tokio::time::timeout(Duration::from_secs(3600), watchdog.tick()).await;
        assert!(outcome.is_err());
    }

    proptest! {
        #[test]
        fn prop_breach_only_after_threshold_consecutive_failures(
            threshold in 1u32..6,
            results in proptest::collection::vec(any::<bool>(), 0..64),
        ) {
            let mut watchdog = Watchdog::new(threshold);
            let mut run = 0u32;

            for healthy in results {
                let result = if healthy { HealthCheckResult::Ok } else { HealthCheckResult::Unreachable };
                let verdict = watchdog.record(&result);
                run = if healthy { 0 } else { run + 1 };

                match verdict {
                    WatchdogVerdict::Healthy => prop_assert!(healthy),
                    WatchdogVerdict::Failing { consecutive } => {
                        prop_assert_eq!(consecutive, run);
                        prop_assert!(run < threshold);
                    }
                    WatchdogVerdict::Breached { consecutive } => {
                        prop_assert_eq!(consecutive, threshold);
                        prop_assert_eq!(run, threshold);
                        break;
                    }
                }
            }
        }
    }
}
