//! Local input validation
//!
//! Everything here runs before any network call. A request that fails
//! validation never reaches the backend.

use crate::error::{Result, StylecastError};
use crate::types::{persona_info, TransformRequest};

/// Maximum input size in bytes (100KB)
pub const MAX_INPUT_LENGTH: usize = 100 * 1024;

/// Message shown for blank input, matching the backend's wording
pub const EMPTY_INPUT_MESSAGE: &str = "No text provided";

/// Outcome of validating a request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    /// Blocking problems
    pub errors: Vec<String>,
    /// Non-blocking notes (e.g., a persona this client has no label for)
    pub warnings: Vec<String>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Stateless validator shared by the CLI and TUI
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidationService;

impl ValidationService {
    pub fn new() -> Self {
        Self
    }

    /// Check a transformation request
    ///
    /// Verbosity needs no check here: [`Verbosity`](crate::types::Verbosity)
    /// can only hold levels 1 to 3.
    pub fn validate(&self, request: &TransformRequest) -> ValidationReport {
        let mut report = ValidationReport::default();

        if request.text.trim().is_empty() {
            report.errors.push(EMPTY_INPUT_MESSAGE.to_string());
        } else if request.text.len() > MAX_INPUT_LENGTH {
            report.errors.push(format!(
                "Text too large: {} bytes (maximum: {} bytes)",
                request.text.len(),
                MAX_INPUT_LENGTH
            ));
        }

        let persona = request.persona.trim();
        if persona.is_empty() {
            report.errors.push("No persona selected".to_string());
        } else if persona_info(persona).is_none() {
            report
                .warnings
                .push(format!("Unknown persona '{}' will be sent as-is", persona));
        }

        if let Some(provider) = &request.provider {
            if provider.trim().is_empty() {
                report.errors.push("Provider name cannot be blank".to_string());
            }
        }

        report
    }

    /// Like [`validate`](Self::validate) but fails with the first error
    pub fn check(&self, request: &TransformRequest) -> Result<()> {
        let report = self.validate(request);
        match report.errors.into_iter().next() {
            Some(error) => Err(StylecastError::InvalidInput(error)),
            None => Ok(()),
        }
    }

    /// Check registration fields before contacting the backend
    pub fn check_registration(&self, username: &str, email: &str, password: &str) -> Result<()> {
        if username.trim().is_empty() || email.trim().is_empty() || password.is_empty() {
            return Err(StylecastError::InvalidInput(
                "Missing required fields".to_string(),
            ));
        }
        self.check_email(email)
    }

    pub fn check_email(&self, email: &str) -> Result<()> {
        if !email.contains('@') {
            return Err(StylecastError::InvalidInput(format!(
                "Invalid email address: {}",
                email
            )));
        }
        Ok(())
    }

    /// Check login fields before contacting the backend
    pub fn check_login(&self, username: &str, password: &str) -> Result<()> {
        if username.trim().is_empty() || password.is_empty() {
            return Err(StylecastError::InvalidInput(
                "Missing required fields".to_string(),
            ));
        }
        Ok(())
    }
}
