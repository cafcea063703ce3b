//! Backend API abstraction
//!
//! The transformation itself happens on the server. This module defines the
//! call boundary: [`TransformGateway`] for the transform request and provider
//! discovery, and [`BackendGateway`] for everything else the client reads
//! from the backend (accounts, history, admin listings).
//!
//! # Examples
//!
//! ```no_run
//! use libstylecast::gateway::{ApiClient, TransformGateway};
//! use libstylecast::types::{TransformRequest, Verbosity};
//! use std::time::Duration;
//!
//! # async fn example() -> libstylecast::error::Result<()> {
//! let client = ApiClient::new("http://127.0.0.1:5000", Duration::from_secs(60))?;
//!
//! let request = TransformRequest {
//!     text: "Taxes should be lower.".to_string(),
//!     persona: "friedman".to_string(),
//!     verbosity: Verbosity::Concise,
//!     provider: None,
//! };
//!
//! let response = client.transform(&request).await?;
//! println!("{}", response.transformed_text);
//! # Ok(())
//! # }
//! ```

use async_trait::async_trait;
use secrecy::SecretString;

use crate::error::Result;
use crate::types::{
    AuthResponse, ProvidersResponse, TransformRequest, TransformResponse, Transformation, User,
};

mod client;

// Mock gateway is available for all builds (not just tests) to support integration tests
pub mod mock;

pub use client::{map_error_status, ApiClient};
pub use mock::MockGateway;

/// Transformation request boundary
///
/// One request in, the complete transformed text out. The call is atomic from
/// the client's point of view: there is no partial output.
#[async_trait]
pub trait TransformGateway: Send + Sync {
    /// Submit text for transformation
    ///
    /// # Errors
    ///
    /// - `GatewayError::Unauthorized` when the backend no longer accepts the
    ///   session; callers must drop the stored token and ask the user to log in
    /// - `GatewayError::Rejected` for any other non-success status, carrying
    ///   the backend's message when it sent one
    /// - `GatewayError::Network` / `GatewayError::Decode` for transport and
    ///   body failures
    async fn transform(&self, request: &TransformRequest) -> Result<TransformResponse>;

    /// LLM providers the backend has configured, plus its default
    async fn providers(&self) -> Result<ProvidersResponse>;

    /// Short identifier used in logs
    fn name(&self) -> &str;
}

/// The rest of the backend surface used by the client
#[async_trait]
pub trait BackendGateway: TransformGateway {
    async fn login(&self, username: &str, password: &SecretString) -> Result<AuthResponse>;

    async fn register(
        &self,
        username: &str,
        email: &str,
        password: &SecretString,
    ) -> Result<AuthResponse>;

    async fn logout(&self) -> Result<()>;

    async fn current_user(&self) -> Result<User>;

    /// The signed-in user's transformations, newest first
    async fn history(&self) -> Result<Vec<Transformation>>;

    /// Every transformation (admins only)
    async fn admin_transformations(&self) -> Result<Vec<Transformation>>;

    /// Every account (admins only)
    async fn admin_users(&self) -> Result<Vec<User>>;

    /// Replace the bearer token sent with subsequent requests
    fn set_token(&self, token: Option<SecretString>);

    fn has_token(&self) -> bool;
}
