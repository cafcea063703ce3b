//! Typewriter reveal of transformation output
//!
//! A finished transformation is shown one character at a time. The pieces:
//!
//! - [`RevealSession`]: one run over a fixed string with a pure `step`
//! - [`RevealController`]: the state machine holding the active session, the
//!   last result for replay, and the generation counter that turns stale
//!   timer ticks into no-ops
//! - [`Scheduler`]: where ticks come from ([`TokioScheduler`] in binaries,
//!   [`ManualScheduler`] when stepping by hand)
//! - [`RevealDriver`]: keeps controller and scheduler in lockstep
//!
//! # Example
//!
//! ```
//! use libstylecast::reveal::{ManualScheduler, RevealController, RevealDriver, TickOutcome};
//!
//! let mut driver = RevealDriver::new(RevealController::default(), ManualScheduler::new());
//! driver.start("Hi!", true);
//!
//! while let Some(tick) = driver.scheduler().pending_tick() {
//!     if driver.on_tick(tick) == TickOutcome::Completed {
//!         break;
//!     }
//! }
//! assert_eq!(driver.snapshot().revealed_text, "Hi!");
//! ```

mod controller;
mod driver;
mod scheduler;
mod session;

pub use controller::{RevealController, RevealSnapshot, Schedule, TickOutcome, DEFAULT_CADENCE};
pub use driver::RevealDriver;
pub use scheduler::{ManualScheduler, RevealTick, Scheduler, TokioScheduler};
pub use session::{RevealSession, RevealStatus};
