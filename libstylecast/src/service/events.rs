//! Service events
//!
//! Transform and auth services announce what they did on a
//! `tokio::sync::broadcast` bus. The TUI bridges `SessionExpired` into its
//! action channel so a 401 from any request sends the user back to login.
//! Emitting never waits: with nobody listening the event is discarded, and a
//! subscriber that falls behind sees `RecvError::Lagged` instead of stalling
//! the sender.
//!
//! ```no_run
//! use libstylecast::service::events::{Event, EventBus};
//!
//! # async fn example() {
//! let bus = EventBus::default();
//! let mut events = bus.subscribe();
//!
//! bus.emit(Event::SessionExpired);
//! assert_eq!(events.recv().await.ok(), Some(Event::SessionExpired));
//! # }
//! ```

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

pub type EventReceiver = broadcast::Receiver<Event>;

/// Cloneable handle to the broadcast channel; clones share subscribers
#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<Event>,
}

impl EventBus {
    /// `capacity` events are buffered per subscriber before the oldest are lost
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Subscribe to events emitted after this call
    pub fn subscribe(&self) -> EventReceiver {
        self.sender.subscribe()
    }

    /// Emit an event to all subscribers
    ///
    /// Never blocks. With no subscribers the event is dropped; lagging
    /// subscribers lose the oldest events first.
    pub fn emit(&self, event: Event) {
        let _ = self.sender.send(event);
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(100)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    /// A transformation request was sent to the backend
    TransformStarted {
        persona: String,
        verbosity: u8,
        provider: Option<String>,
    },

    /// The backend returned transformed text
    TransformCompleted {
        /// Backend row id, when reported
        id: Option<i64>,
        /// Provider that produced the text
        provider: Option<String>,
        /// Length of the output in chars
        chars: usize,
    },

    /// The transformation failed; `error` is user-facing
    TransformFailed { error: String },

    /// The backend rejected the stored session; the token was cleared
    SessionExpired,

    /// A user signed in or registered
    LoggedIn { username: String, is_admin: bool },

    /// The local session was ended
    LoggedOut,
}
