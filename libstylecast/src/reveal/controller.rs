//! The reveal state machine: one session, the last result, and a generation counter.

use std::time::Duration;

use tracing::{debug, info};

use super::session::{RevealSession, RevealStatus};
use crate::error::RevealError;

/// Delay between reveal steps when nothing else is configured
pub const DEFAULT_CADENCE: Duration = Duration::from_millis(30);

/// What the scheduler should do after a controller operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Schedule {
    /// Deliver ticks carrying `generation` every `cadence`
    Arm { generation: u64, cadence: Duration },
    /// No ticks are needed
    Idle,
}

/// Result of delivering a tick to the controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The tick belonged to a superseded session or arrived while nothing runs
    Stale,
    /// One more character is visible
    Advanced,
    /// The last character is visible and the session is done
    Completed,
}

/// Observation of the controller after any operation
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RevealSnapshot {
    pub revealed_text: String,
    pub status: RevealStatus,
    pub revealed_len: usize,
    pub total_len: usize,
    pub generation: u64,
    pub can_retry: bool,
}

impl RevealSnapshot {
    pub fn is_completed(&self) -> bool {
        self.status == RevealStatus::Completed
    }

    pub fn is_running(&self) -> bool {
        self.status == RevealStatus::Running
    }
}

/// Typewriter reveal controller
///
/// Owns the active [`RevealSession`] and the single-slot last result used by
/// [`retry`](Self::retry). Every operation that supersedes a session bumps
/// `generation`, and [`tick`](Self::tick) ignores ticks from older
/// generations, so a timer that fires late can never touch a newer session.
///
/// The controller performs no I/O. Pair it with a
/// [`Scheduler`](super::Scheduler) through a [`RevealDriver`](super::RevealDriver)
/// to get timed ticks.
#[derive(Debug, Clone)]
pub struct RevealController {
    session: RevealSession,
    last_result: String,
    generation: u64,
    cadence: Duration,
}

impl Default for RevealController {
    fn default() -> Self {
        Self::new(DEFAULT_CADENCE)
    }
}

impl RevealController {
    pub fn new(cadence: Duration) -> Self {
        Self {
            session: RevealSession::idle(),
            last_result: String::new(),
            generation: 0,
            cadence,
        }
    }

    /// Begin revealing `text`, cancelling whatever is running
    ///
    /// `text` always becomes the last result, including when this call is a
    /// replay. Returns [`Schedule::Idle`] when the session completes
    /// immediately (no animation, or empty text).
    pub fn start(&mut self, text: impl Into<String>, animate: bool) -> Schedule {
        self.cancel();

        let text = text.into();
        self.generation += 1;
        self.last_result.clone_from(&text);
        self.session = RevealSession::begin(text, animate);

        debug!(
            generation = self.generation,
            chars = self.session.total_len(),
            animate,
            "Reveal session started"
        );

        if self.session.is_running() {
            Schedule::Arm {
                generation: self.generation,
                cadence: self.cadence,
            }
        } else {
            Schedule::Idle
        }
    }

    /// Apply one scheduled step if `generation` is still current
    pub fn tick(&mut self, generation: u64) -> TickOutcome {
        if generation != self.generation || !self.session.is_running() {
            return TickOutcome::Stale;
        }

        self.session = std::mem::take(&mut self.session).step();

        if self.session.status() == RevealStatus::Completed {
            info!(
                generation = self.generation,
                chars = self.session.total_len(),
                "Reveal completed"
            );
            TickOutcome::Completed
        } else {
            TickOutcome::Advanced
        }
    }

    /// Stop a running session; no-op in any other state
    ///
    /// Already revealed characters stay visible.
    pub fn cancel(&mut self) {
        if !self.session.is_running() {
            return;
        }
        self.generation += 1;
        self.session = std::mem::take(&mut self.session).cancel();
        debug!(
            revealed = self.session.revealed_len(),
            total = self.session.total_len(),
            "Reveal cancelled"
        );
    }

    /// Replay the last result with animation
    ///
    /// Rejected without changing any state when there is nothing to replay or
    /// a session is still running.
    pub fn retry(&mut self) -> Result<Schedule, RevealError> {
        if self.last_result.is_empty() {
            return Err(RevealError::NothingToReplay);
        }
        if self.session.is_running() {
            return Err(RevealError::AlreadyRunning);
        }
        let text = self.last_result.clone();
        Ok(self.start(text, true))
    }

    /// Cancel and forget everything, including the last result
    pub fn clear(&mut self) {
        self.cancel();
        self.generation += 1;
        self.session = RevealSession::idle();
        self.last_result.clear();
        debug!("Reveal cleared");
    }

    pub fn can_retry(&self) -> bool {
        !self.last_result.is_empty() && !self.session.is_running()
    }

    pub fn snapshot(&self) -> RevealSnapshot {
        RevealSnapshot {
            revealed_text: self.session.revealed_text().to_string(),
            status: self.session.status(),
            revealed_len: self.session.revealed_len(),
            total_len: self.session.total_len(),
            generation: self.generation,
            can_retry: self.can_retry(),
        }
    }

    pub fn session(&self) -> &RevealSession {
        &self.session
    }

    pub fn status(&self) -> RevealStatus {
        self.session.status()
    }

    pub fn last_result(&self) -> &str {
        &self.last_result
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn cadence(&self) -> Duration {
        self.cadence
    }
}
