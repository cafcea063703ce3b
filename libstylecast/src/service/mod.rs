//! Service layer for Stylecast
//!
//! This module provides a clean, testable API for client logic that is
//! consumed by every interface (CLI tools and the TUI) without duplication.
//!
//! # Architecture
//!
//! `StylecastService` is the facade, coordinating specialized sub-services
//! that share one gateway, one token store and one event bus:
//!
//! - `AuthService`: login, registration, logout, session restore
//! - `TransformService`: validated transformation requests
//! - `HistoryService`: the user's gallery with client-side search
//! - `AdminService`: user and transformation listings for admins
//! - `ValidationService`: local checks that run before any request
//! - `EventBus`: event distribution
//!
//! # Example
//!
//! ```no_run
//! use libstylecast::service::StylecastService;
//! use libstylecast::types::{TransformRequest, Verbosity};
//!
//! # async fn example() -> libstylecast::Result<()> {
//! let service = StylecastService::new()?;
//! service.auth().restore_session().await?;
//!
//! let request = TransformRequest {
//!     text: "The economy is complicated.".to_string(),
//!     persona: "friedman".to_string(),
//!     verbosity: Verbosity::Moderate,
//!     provider: None,
//! };
//!
//! let response = service.transform().submit(&request).await?;
//! println!("{}", response.transformed_text);
//! # Ok(())
//! # }
//! ```

pub mod admin;
pub mod auth;
pub mod events;
pub mod history;
pub mod transform;
pub mod validation;

use std::sync::Arc;

use self::admin::AdminService;
use self::auth::AuthService;
use self::events::EventBus;
use self::history::HistoryService;
use self::transform::TransformService;
use self::validation::ValidationService;
use crate::credentials::TokenStore;
use crate::gateway::{ApiClient, BackendGateway};
use crate::{Config, Result};

/// Main service facade that coordinates all sub-services
///
/// All sub-services share the same `Arc<dyn BackendGateway>`, so a token set
/// by `auth()` is used by every later request.
pub struct StylecastService {
    config: Arc<Config>,
    auth: AuthService,
    transform: TransformService,
    history: HistoryService,
    admin: AdminService,
    validation: ValidationService,
    event_bus: EventBus,
}

impl StylecastService {
    /// Create a service with configuration from the default location
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the data
    /// directory cannot be resolved.
    pub fn new() -> Result<Self> {
        let config = Config::load()?;
        Self::from_config(config)
    }

    /// Create a service talking to the backend named in `config`
    pub fn from_config(config: Config) -> Result<Self> {
        let gateway: Arc<dyn BackendGateway> = Arc::new(ApiClient::from_config(&config)?);
        let store = TokenStore::new()?;
        Ok(Self::with_gateway(config, gateway, store))
    }

    /// Create a service over an explicit gateway and token store
    ///
    /// Used by tests with `MockGateway` and a temporary token file.
    pub fn with_gateway(config: Config, gateway: Arc<dyn BackendGateway>, store: TokenStore) -> Self {
        let config = Arc::new(config);
        let event_bus = EventBus::new(100);

        let auth = AuthService::new(Arc::clone(&gateway), store, event_bus.clone());
        let transform = TransformService::new(Arc::clone(&gateway), auth.clone(), event_bus.clone());
        let history = HistoryService::new(Arc::clone(&gateway), auth.clone());
        let admin = AdminService::new(gateway, auth.clone());

        Self {
            config,
            auth,
            transform,
            history,
            admin,
            validation: ValidationService::new(),
            event_bus,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn auth(&self) -> &AuthService {
        &self.auth
    }

    pub fn transform(&self) -> &TransformService {
        &self.transform
    }

    pub fn history(&self) -> &HistoryService {
        &self.history
    }

    pub fn admin(&self) -> &AdminService {
        &self.admin
    }

    pub fn validation(&self) -> &ValidationService {
        &self.validation
    }

    /// Subscribe to service events
    ///
    /// Multiple subscribers are supported.
    pub fn subscribe(&self) -> events::EventReceiver {
        self.event_bus.subscribe()
    }
}
