//! Transformation submission
//!
//! The one suspending operation in the client: validate locally, call the
//! gateway once, report the outcome. The returned text is handed to the
//! reveal controller by the caller; on failure the caller leaves the
//! controller alone.

use std::sync::Arc;

use tracing::{info, warn};

use super::auth::AuthService;
use super::events::{Event, EventBus};
use super::validation::ValidationService;
use crate::error::{GatewayError, Result, StylecastError};
use crate::gateway::BackendGateway;
use crate::types::{ProvidersResponse, TransformRequest, TransformResponse};

/// Fallback shown when a failure carries no usable message
pub const TRANSFORM_FAILED: &str = "Transformation failed";

#[derive(Clone)]
pub struct TransformService {
    gateway: Arc<dyn BackendGateway>,
    auth: AuthService,
    validation: ValidationService,
    events: EventBus,
}

impl TransformService {
    pub fn new(gateway: Arc<dyn BackendGateway>, auth: AuthService, events: EventBus) -> Self {
        Self {
            gateway,
            auth,
            validation: ValidationService::new(),
            events,
        }
    }

    /// Validate `request` and send it to the backend
    ///
    /// # Errors
    ///
    /// - `InvalidInput` when local validation fails; nothing is sent
    /// - `Gateway(Unauthorized)` after the stored session has been cleared
    /// - any other gateway error, after `Event::TransformFailed` was emitted
    pub async fn submit(&self, request: &TransformRequest) -> Result<TransformResponse> {
        self.validation.check(request)?;

        self.events.emit(Event::TransformStarted {
            persona: request.persona.clone(),
            verbosity: request.verbosity.level(),
            provider: request.provider.clone(),
        });
        info!(
            persona = %request.persona,
            verbosity = request.verbosity.level(),
            chars = request.text.chars().count(),
            "Submitting transformation"
        );

        match self.gateway.transform(request).await {
            Ok(response) => {
                let chars = response.transformed_text.chars().count();
                self.events.emit(Event::TransformCompleted {
                    id: response.id,
                    provider: response.api_provider.clone(),
                    chars,
                });
                info!(id = ?response.id, chars, "Transformation completed");
                Ok(response)
            }
            Err(e) if e.is_unauthorized() => Err(self.auth.check_expired(e)),
            Err(e) => {
                let message = failure_message(&e);
                warn!("Transformation failed: {}", e);
                self.events.emit(Event::TransformFailed { error: message });
                Err(e)
            }
        }
    }

    /// Providers configured on the backend
    pub async fn providers(&self) -> Result<ProvidersResponse> {
        self.gateway
            .providers()
            .await
            .map_err(|e| self.auth.check_expired(e))
    }
}

/// User-facing text for a failed submission
pub fn failure_message(error: &StylecastError) -> String {
    match error {
        StylecastError::Gateway(GatewayError::Decode(_)) => TRANSFORM_FAILED.to_string(),
        StylecastError::Gateway(gateway) => {
            let message = gateway.user_message();
            if message.trim().is_empty() {
                TRANSFORM_FAILED.to_string()
            } else {
                message
            }
        }
        StylecastError::InvalidInput(message) => message.clone(),
        other => format!("{}: {}", TRANSFORM_FAILED, other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_message_uses_server_text() {
        let err = StylecastError::Gateway(GatewayError::Rejected {
            status: 400,
            message: "Invalid API provider: foo".to_string(),
        });
        assert_eq!(failure_message(&err), "Invalid API provider: foo");
    }

    #[test]
    fn test_failure_message_fallback() {
        let err = StylecastError::Gateway(GatewayError::Decode("eof".to_string()));
        assert_eq!(failure_message(&err), TRANSFORM_FAILED);

        let err = StylecastError::Gateway(GatewayError::Rejected {
            status: 500,
            message: String::new(),
        });
        assert_eq!(failure_message(&err), TRANSFORM_FAILED);
    }
}
