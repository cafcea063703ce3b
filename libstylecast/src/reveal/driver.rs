//! Couples a [`RevealController`] with a [`Scheduler`].

use super::controller::{RevealController, RevealSnapshot, Schedule, TickOutcome};
use super::scheduler::{RevealTick, Scheduler};
use crate::error::RevealError;

/// Reveal controller plus the timer feeding it
///
/// Each operation first updates the controller (which invalidates the old
/// generation), then disarms the previous timer, then arms a new one if the
/// controller asks for it, all before returning. Dropping the driver disarms.
#[derive(Debug)]
pub struct RevealDriver<S: Scheduler> {
    controller: RevealController,
    scheduler: S,
}

impl<S: Scheduler> RevealDriver<S> {
    pub fn new(controller: RevealController, scheduler: S) -> Self {
        Self {
            controller,
            scheduler,
        }
    }

    pub fn start(&mut self, text: impl Into<String>, animate: bool) -> RevealSnapshot {
        let schedule = self.controller.start(text, animate);
        self.apply(schedule);
        self.controller.snapshot()
    }

    /// Deliver a tick from the scheduler
    pub fn on_tick(&mut self, tick: RevealTick) -> TickOutcome {
        let outcome = self.controller.tick(tick.generation);
        if outcome == TickOutcome::Completed {
            self.scheduler.disarm();
        }
        outcome
    }

    pub fn cancel(&mut self) -> RevealSnapshot {
        self.controller.cancel();
        self.scheduler.disarm();
        self.controller.snapshot()
    }

    /// Replay the last result; on rejection the running timer is left alone
    pub fn retry(&mut self) -> Result<RevealSnapshot, RevealError> {
        let schedule = self.controller.retry()?;
        self.apply(schedule);
        Ok(self.controller.snapshot())
    }

    pub fn clear(&mut self) -> RevealSnapshot {
        self.controller.clear();
        self.scheduler.disarm();
        self.controller.snapshot()
    }

    pub fn snapshot(&self) -> RevealSnapshot {
        self.controller.snapshot()
    }

    pub fn controller(&self) -> &RevealController {
        &self.controller
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn is_running(&self) -> bool {
        self.controller.session().is_running()
    }

    fn apply(&mut self, schedule: Schedule) {
        self.scheduler.disarm();
        if let Schedule::Arm {
            generation,
            cadence,
        } = schedule
        {
            self.scheduler.arm(generation, cadence);
        }
    }
}

impl<S: Scheduler> Drop for RevealDriver<S> {
    fn drop(&mut self) {
        self.controller.cancel();
        self.scheduler.disarm();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reveal::{ManualScheduler, RevealStatus};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    /// Counts disarms in a slot that outlives the driver
    struct CountingScheduler {
        armed: bool,
        disarms: Arc<AtomicUsize>,
    }

    impl Scheduler for CountingScheduler {
        fn arm(&mut self, _generation: u64, _cadence: Duration) {
            self.armed = true;
        }

        fn disarm(&mut self) {
            if std::mem::take(&mut self.armed) {
                self.disarms.fetch_add(1, Ordering::SeqCst);
            }
        }
    }

    fn driver() -> RevealDriver<ManualScheduler> {
        RevealDriver::new(
            RevealController::new(Duration::from_millis(30)),
            ManualScheduler::new(),
        )
    }

    #[test]
    fn test_start_arms_scheduler() {
        let mut driver = driver();
        let snapshot = driver.start("hey", true);
        assert_eq!(snapshot.status, RevealStatus::Running);
        assert_eq!(
            driver.scheduler().pending_tick(),
            Some(RevealTick {
                generation: snapshot.generation
            })
        );
    }

    #[test]
    fn test_completion_disarms() {
        let mut driver = driver();
        driver.start("ab", true);
        let tick = driver.scheduler().pending_tick().unwrap();

        assert_eq!(driver.on_tick(tick), TickOutcome::Advanced);
        assert!(driver.scheduler().is_armed());
        assert_eq!(driver.on_tick(tick), TickOutcome::Completed);
        assert!(!driver.scheduler().is_armed());
    }

    #[test]
    fn test_no_animate_never_arms() {
        let mut driver = driver();
        let snapshot = driver.start("instant", false);
        assert!(snapshot.is_completed());
        assert_eq!(driver.scheduler().arm_count(), 0);
    }

    #[test]
    fn test_restart_disarms_before_arming() {
        let mut driver = driver();
        driver.start("first", true);
        driver.start("second", true);
        assert_eq!(driver.scheduler().arm_count(), 2);
        assert_eq!(driver.scheduler().disarm_count(), 1);
    }

    #[test]
    fn test_rejected_retry_keeps_timer() {
        let mut driver = driver();
        driver.start("abc", true);
        let pending = driver.scheduler().pending_tick();

        assert_eq!(driver.retry(), Err(RevealError::AlreadyRunning));
        assert_eq!(driver.scheduler().pending_tick(), pending);
        assert_eq!(driver.scheduler().disarm_count(), 0);
    }

    #[test]
    fn test_clear_disarms() {
        let mut driver = driver();
        driver.start("abc", true);
        let snapshot = driver.clear();
        assert_eq!(snapshot.status, RevealStatus::Idle);
        assert!(!driver.scheduler().is_armed());
    }

    #[test]
    fn test_drop_disarms_running_session() {
        let disarms = Arc::new(AtomicUsize::new(0));
        let mut driver = RevealDriver::new(
            RevealController::new(Duration::from_millis(30)),
            CountingScheduler {
                armed: false,
                disarms: Arc::clone(&disarms),
            },
        );
        driver.start("still typing", true);
        assert!(driver.is_running());
        assert_eq!(disarms.load(Ordering::SeqCst), 0);

        drop(driver);
        assert_eq!(disarms.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_drop_after_completion_has_nothing_to_disarm() {
        let disarms = Arc::new(AtomicUsize::new(0));
        let mut driver = RevealDriver::new(
            RevealController::new(Duration::from_millis(30)),
            CountingScheduler {
                armed: false,
                disarms: Arc::clone(&disarms),
            },
        );
        driver.start("done", false);

        drop(driver);
        assert_eq!(disarms.load(Ordering::SeqCst), 0);
    }
}
