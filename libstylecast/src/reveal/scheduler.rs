//! Timers that deliver reveal ticks.

use std::sync::Arc;
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

/// A timer firing for the session identified by `generation`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RevealTick {
    pub generation: u64,
}

/// Source of repeating ticks for one session at a time
///
/// `arm` replaces any previously armed timer. After `disarm` returns, the
/// scheduler must not produce further ticks.
pub trait Scheduler {
    fn arm(&mut self, generation: u64, cadence: Duration);
    fn disarm(&mut self);
}

type TickSink = Arc<dyn Fn(RevealTick) -> bool + Send + Sync>;

/// Tokio-backed scheduler
///
/// Spawns one task per armed session. The task hands each tick to `sink`
/// and stops on its own once `sink` returns `false` (receiver gone).
pub struct TokioScheduler {
    handle: Handle,
    sink: TickSink,
    task: Option<JoinHandle<()>>,
}

impl TokioScheduler {
    pub fn new<F>(handle: Handle, sink: F) -> Self
    where
        F: Fn(RevealTick) -> bool + Send + Sync + 'static,
    {
        Self {
            handle,
            sink: Arc::new(sink),
            task: None,
        }
    }

    /// Scheduler on the runtime this is called from
    ///
    /// Returns `None` outside of a tokio runtime.
    pub fn current<F>(sink: F) -> Option<Self>
    where
        F: Fn(RevealTick) -> bool + Send + Sync + 'static,
    {
        Handle::try_current().ok().map(|handle| Self::new(handle, sink))
    }

    /// Scheduler feeding an unbounded tokio channel
    pub fn with_channel(handle: Handle, tx: tokio::sync::mpsc::UnboundedSender<RevealTick>) -> Self {
        Self::new(handle, move |tick| tx.send(tick).is_ok())
    }

    pub fn is_armed(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }
}

impl std::fmt::Debug for TokioScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokioScheduler")
            .field("armed", &self.is_armed())
            .finish()
    }
}

impl Scheduler for TokioScheduler {
    fn arm(&mut self, generation: u64, cadence: Duration) {
        self.disarm();

        let sink = Arc::clone(&self.sink);
        let task = self.handle.spawn(async move {
            let mut interval = interval_at(Instant::now() + cadence, cadence);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                if !sink(RevealTick { generation }) {
                    break;
                }
            }
        });
        self.task = Some(task);
    }

    fn disarm(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl Drop for TokioScheduler {
    fn drop(&mut self) {
        self.disarm();
    }
}

/// Scheduler that never fires on its own
///
/// Records what was armed so tests and single-stepping callers can deliver
/// ticks by hand.
#[derive(Debug, Clone, Default)]
pub struct ManualScheduler {
    armed: Option<(u64, Duration)>,
    arm_count: usize,
    disarm_count: usize,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// The tick the armed session expects next, if any
    pub fn pending_tick(&self) -> Option<RevealTick> {
        self.armed.map(|(generation, _)| RevealTick { generation })
    }

    pub fn cadence(&self) -> Option<Duration> {
        self.armed.map(|(_, cadence)| cadence)
    }

    pub fn is_armed(&self) -> bool {
        self.armed.is_some()
    }

    pub fn arm_count(&self) -> usize {
        self.arm_count
    }

    pub fn disarm_count(&self) -> usize {
        self.disarm_count
    }
}

impl Scheduler for ManualScheduler {
    fn arm(&mut self, generation: u64, cadence: Duration) {
        self.armed = Some((generation, cadence));
        self.arm_count += 1;
    }

    fn disarm(&mut self) {
        if self.armed.take().is_some() {
            self.disarm_count += 1;
        }
    }
}
