//! Stylecast - terminal client for the style transformation service
//!
//! This library holds everything the Stylecast tools share: the typewriter
//! reveal controller, the backend gateway, session token storage, image
//! export, and the service layer that ties them together.

pub mod config;
pub mod credentials;
pub mod error;
pub mod export;
pub mod gateway;
pub mod logging;
pub mod reveal;
pub mod service;
pub mod types;

// Re-export commonly used types
pub use config::Config;
pub use credentials::TokenStore;
pub use error::{Result, StylecastError};
pub use reveal::{RevealController, RevealDriver, RevealSnapshot, RevealStatus};
pub use types::{TransformRequest, TransformResponse, Transformation, User, Verbosity};
