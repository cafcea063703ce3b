//! Event handling infrastructure
//!
//! Polls terminal input and translates service events from the
//! `EventBus` into actions.

use std::time::Duration;

use crossterm::event::{self, Event as CrosstermEvent, KeyEvent, KeyEventKind};
use libstylecast::service::events::Event;

use crate::app::Action;

/// Terminal events that can be dispatched
#[derive(Debug, Clone)]
pub enum TuiEvent {
    /// Keyboard input (presses only)
    Key(KeyEvent),

    /// Terminal resize
    Resize(u16, u16),

    /// Nothing happened within the poll interval
    Tick,
}

impl From<TuiEvent> for Action {
    fn from(event: TuiEvent) -> Self {
        match event {
            TuiEvent::Key(key) => Action::Key(key),
            TuiEvent::Resize(w, h) => Action::Resize(w, h),
            TuiEvent::Tick => Action::Tick,
        }
    }
}

/// Action for a service event, if the UI reacts to it
///
/// Only session expiry matters here: the other events mirror results the
/// UI already gets from its own requests.
pub fn service_event_action(event: Event) -> Option<Action> {
    match event {
        Event::SessionExpired => Some(Action::SessionExpired),
        other => {
            tracing::trace!(?other, "Ignoring service event");
            None
        }
    }
}

/// Event handler that polls for terminal events
pub struct EventHandler {
    poll_interval: Duration,
}

impl EventHandler {
    pub fn new(poll_interval: Duration) -> Self {
        Self { poll_interval }
    }

    /// Poll for the next event, blocking up to the poll interval
    pub fn next(&self) -> std::io::Result<TuiEvent> {
        if event::poll(self.poll_interval)? {
            match event::read()? {
                CrosstermEvent::Key(key) if key.kind == KeyEventKind::Press => Ok(TuiEvent::Key(key)),
                CrosstermEvent::Resize(w, h) => Ok(TuiEvent::Resize(w, h)),
                _ => Ok(TuiEvent::Tick),
            }
        } else {
            Ok(TuiEvent::Tick)
        }
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_handler_interval() {
        let handler = EventHandler::new(Duration::from_millis(16));
        assert_eq!(handler.poll_interval(), Duration::from_millis(16));
    }

    #[test]
    fn test_only_session_expiry_becomes_an_action() {
        assert!(matches!(
            service_event_action(Event::SessionExpired),
            Some(Action::SessionExpired)
        ));
        assert!(service_event_action(Event::LoggedOut).is_none());
    }
}
