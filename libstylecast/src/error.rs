//! Error types for Stylecast

use thiserror::Error;

pub type Result<T> = std::result::Result<T, StylecastError>;

#[derive(Error, Debug)]
pub enum StylecastError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Gateway error: {0}")]
    Gateway(#[from] GatewayError),

    #[error("Export error: {0}")]
    Export(#[from] ExportError),

    #[error("Reveal error: {0}")]
    Reveal(#[from] RevealError),

    #[error("Credential error: {0}")]
    Credentials(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl StylecastError {
    /// Returns the appropriate exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            StylecastError::InvalidInput(_) => 3,
            StylecastError::Reveal(_) => 3,
            StylecastError::Gateway(GatewayError::Unauthorized(_)) => 2,
            StylecastError::Gateway(GatewayError::Forbidden(_)) => 2,
            StylecastError::Gateway(_) => 1,
            StylecastError::Config(_) => 1,
            StylecastError::Export(_) => 1,
            StylecastError::Credentials(_) => 1,
        }
    }

    /// True when the backend rejected our credentials.
    ///
    /// The caller is expected to drop any stored token and send the user
    /// back to a login surface.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, StylecastError::Gateway(GatewayError::Unauthorized(_)))
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },
}

/// Failures talking to the backend API.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Request rejected ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid response: {0}")]
    Decode(String),
}

impl GatewayError {
    /// Message suitable for a user-facing notification.
    pub fn user_message(&self) -> String {
        match self {
            GatewayError::Unauthorized(_) => "Session expired. Please log in again.".to_string(),
            GatewayError::Forbidden(msg) => msg.clone(),
            GatewayError::Rejected { message, .. } => message.clone(),
            GatewayError::Network(msg) => format!("Could not reach the server: {}", msg),
            GatewayError::Decode(_) => "The server sent an unexpected response".to_string(),
        }
    }
}

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Nothing to export until the reveal has completed")]
    NotReady,

    #[error("Nothing to export: output is empty")]
    Empty,

    #[error("Failed to encode image: {0}")]
    Encode(String),

    #[error("Failed to write image: {0}")]
    Io(#[from] std::io::Error),
}

/// Rejected reveal controller invocations.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealError {
    #[error("No completed transformation to replay")]
    NothingToReplay,

    #[error("A reveal is already running")]
    AlreadyRunning,
}
