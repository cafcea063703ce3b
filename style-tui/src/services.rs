//! Service layer adapter for the TUI
//!
//! Bridges the async `StylecastService` to the synchronous event loop.
//!
//! # Architecture
//!
//! - `ServiceHandle` owns the service and a tokio runtime
//! - Every request runs as a task on that runtime and reports back by
//!   sending an [`Action`] on a crossbeam channel
//! - Service events (session expiry) are bridged from the tokio broadcast
//!   channel to the same crossbeam channel
//! - Reveal ticks from the [`TokioScheduler`] arrive there too, so the event
//!   loop drains a single queue
//!
//! # Example
//!
//! ```no_run
//! use style_tui::services::ServiceHandle;
//!
//! # fn example() -> style_tui::error::Result<()> {
//! let services = ServiceHandle::new()?;
//! let actions = services.actions();
//!
//! services.restore_session();
//!
//! // In the event loop
//! while let Ok(action) = actions.try_recv() {
//!     // reduce(state, action) ...
//! }
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use crossbeam_channel::{unbounded, Receiver, Sender};
use libstylecast::error::GatewayError;
use libstylecast::reveal::TokioScheduler;
use libstylecast::service::transform::failure_message;
use libstylecast::service::StylecastService;
use libstylecast::{Config, StylecastError, TransformRequest};
use secrecy::SecretString;
use tokio::sync::broadcast::error::RecvError;

use crate::app::event::service_event_action;
use crate::app::Action;
use crate::error::Result;

/// Service handle for TUI operations
pub struct ServiceHandle {
    service: Arc<StylecastService>,
    runtime: tokio::runtime::Runtime,
    tx: Sender<Action>,
    rx: Receiver<Action>,
}

impl ServiceHandle {
    /// Create a handle over a service built from the default configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the tokio
    /// runtime cannot be created.
    pub fn new() -> Result<Self> {
        Self::with_service(StylecastService::new()?)
    }

    /// Create a handle over an existing service
    ///
    /// Tests use this with a `MockGateway`-backed service.
    pub fn with_service(service: StylecastService) -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()?;
        let (tx, rx) = unbounded();

        let handle = Self {
            service: Arc::new(service),
            runtime,
            tx,
            rx,
        };
        handle.bridge_events();
        Ok(handle)
    }

    pub fn config(&self) -> &Config {
        self.service.config()
    }

    /// Receiver for every action produced in the background
    pub fn actions(&self) -> Receiver<Action> {
        self.rx.clone()
    }

    /// Sender for effects that report back from other threads (clipboard)
    pub fn sender(&self) -> Sender<Action> {
        self.tx.clone()
    }

    /// Reveal scheduler whose ticks arrive as [`Action::RevealTick`]
    pub fn reveal_scheduler(&self) -> TokioScheduler {
        let tx = self.tx.clone();
        TokioScheduler::new(self.runtime.handle().clone(), move |tick| {
            tx.send(Action::RevealTick(tick)).is_ok()
        })
    }

    /// Forward service events from the tokio broadcast channel
    fn bridge_events(&self) {
        let mut events = self.service.subscribe();
        let tx = self.tx.clone();
        self.runtime.spawn(async move {
            loop {
                match events.recv().await {
                    Ok(event) => {
                        if let Some(action) = service_event_action(event) {
                            if tx.send(action).is_err() {
                                break;
                            }
                        }
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::warn!("Event receiver lagged, skipped {} events", skipped);
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        });
    }

    /// Run `task` on the runtime and send the action it produces, if any
    fn spawn<F>(&self, task: F)
    where
        F: std::future::Future<Output = Option<Action>> + Send + 'static,
    {
        let tx = self.tx.clone();
        self.runtime.spawn(async move {
            if let Some(action) = task.await {
                let _ = tx.send(action);
            }
        });
    }

    /// Check the stored token against the backend
    pub fn restore_session(&self) {
        let service = Arc::clone(&self.service);
        let tx = self.tx.clone();
        self.spawn(async move {
            match service.auth().restore_session().await {
                Ok(user) => Some(Action::SessionRestored(user)),
                Err(e) => {
                    tracing::warn!("Could not restore session: {}", e);
                    let _ = tx.send(Action::ShowError(describe(&e)));
                    Some(Action::SessionRestored(None))
                }
            }
        });
    }

    pub fn login(&self, username: String, password: SecretString) {
        let service = Arc::clone(&self.service);
        self.spawn(async move {
            match service.auth().login(&username, &password).await {
                Ok(user) => Some(Action::LoginSucceeded(user)),
                Err(e) => Some(Action::LoginFailed(describe(&e))),
            }
        });
    }

    pub fn register(&self, username: String, email: String, password: SecretString) {
        let service = Arc::clone(&self.service);
        self.spawn(async move {
            match service.auth().register(&username, &email, &password).await {
                Ok(user) => Some(Action::LoginSucceeded(user)),
                Err(e) => Some(Action::LoginFailed(describe(&e))),
            }
        });
    }

    pub fn logout(&self) {
        let service = Arc::clone(&self.service);
        self.spawn(async move {
            if let Err(e) = service.auth().logout().await {
                tracing::warn!("Logout failed: {}", e);
            }
            Some(Action::LoggedOut)
        });
    }

    pub fn load_providers(&self) {
        let service = Arc::clone(&self.service);
        self.spawn(async move {
            match service.transform().providers().await {
                Ok(providers) => Some(Action::ProvidersLoaded(providers)),
                Err(e) => Some(Action::SetStatus(format!(
                    "Could not load providers: {}",
                    describe(&e)
                ))),
            }
        });
    }

    /// Submit a transformation tagged with the state's request number
    pub fn transform(&self, request: u64, body: TransformRequest) {
        let service = Arc::clone(&self.service);
        self.spawn(async move {
            match service.transform().submit(&body).await {
                Ok(response) => Some(Action::TransformSucceeded {
                    request,
                    text: response.transformed_text,
                    id: response.id,
                }),
                Err(e) => Some(Action::TransformFailed {
                    request,
                    error: failure_message(&e),
                }),
            }
        });
    }

    pub fn load_history(&self) {
        let service = Arc::clone(&self.service);
        self.spawn(async move {
            match service.history().fetch().await {
                Ok(rows) => Some(Action::HistoryLoaded(rows)),
                Err(e) => list_failure(e),
            }
        });
    }

    pub fn load_admin(&self) {
        let service = Arc::clone(&self.service);
        self.spawn(async move {
            match service.admin().dashboard().await {
                Ok(dashboard) => Some(Action::AdminLoaded(dashboard)),
                Err(e) => list_failure(e),
            }
        });
    }
}

/// Message for an error shown to the user
///
/// Gateway errors carry their own wording; the rest use their display form.
fn describe(error: &StylecastError) -> String {
    match error {
        StylecastError::Gateway(e) => e.user_message(),
        StylecastError::Credentials(message) | StylecastError::InvalidInput(message) => {
            message.clone()
        }
        other => other.to_string(),
    }
}

fn list_failure(error: StylecastError) -> Option<Action> {
    match error {
        StylecastError::Gateway(GatewayError::Forbidden(message)) => {
            Some(Action::AdminForbidden(message))
        }
        // Expiry already arrived through the event bridge
        e if e.is_unauthorized() => None,
        e => Some(Action::ShowError(describe(&e))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_prefers_plain_messages() {
        let err = StylecastError::Credentials("Invalid username or password".to_string());
        assert_eq!(describe(&err), "Invalid username or password");

        let err = StylecastError::Gateway(GatewayError::Rejected {
            status: 400,
            message: "Username already exists".to_string(),
        });
        assert_eq!(describe(&err), "Username already exists");
    }

    #[test]
    fn test_expired_listing_sends_nothing() {
        let err = StylecastError::Gateway(GatewayError::Unauthorized("expired".to_string()));
        assert!(list_failure(err).is_none());
    }

    #[test]
    fn test_forbidden_listing_becomes_admin_forbidden() {
        let action = list_failure(StylecastError::Gateway(GatewayError::Forbidden(
            "Admin access required".to_string(),
        )));
        assert!(
            matches!(action, Some(Action::AdminForbidden(ref m)) if m == "Admin access required")
        );
    }
}
