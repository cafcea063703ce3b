//! Authentication service
//!
//! Signs users in and out and keeps the stored token and the gateway's
//! bearer token in step. Any 401 from the backend ends up in
//! [`AuthService::expire_session`], which drops the token everywhere.

use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};
use tracing::{info, warn};

use super::events::{Event, EventBus};
use super::validation::ValidationService;
use crate::credentials::TokenStore;
use crate::error::{GatewayError, Result, StylecastError};
use crate::gateway::BackendGateway;
use crate::types::{AuthResponse, User};

#[derive(Clone)]
pub struct AuthService {
    gateway: Arc<dyn BackendGateway>,
    store: TokenStore,
    validation: ValidationService,
    events: EventBus,
}

impl AuthService {
    pub fn new(gateway: Arc<dyn BackendGateway>, store: TokenStore, events: EventBus) -> Self {
        Self {
            gateway,
            store,
            validation: ValidationService::new(),
            events,
        }
    }

    /// Sign in and persist the issued token
    ///
    /// # Errors
    ///
    /// - `InvalidInput` when a field is empty (no request is sent)
    /// - `Credentials` with the backend's message when the username or
    ///   password is wrong
    pub async fn login(&self, username: &str, password: &SecretString) -> Result<User> {
        self.validation
            .check_login(username, password.expose_secret())?;

        let response = self
            .gateway
            .login(username.trim(), password)
            .await
            .map_err(bad_credentials)?;
        self.accept(response)
    }

    /// Create an account and sign in as it
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &SecretString,
    ) -> Result<User> {
        self.validation
            .check_registration(username, email, password.expose_secret())?;

        let response = self
            .gateway
            .register(username.trim(), email.trim(), password)
            .await?;
        self.accept(response)
    }

    /// End the session
    ///
    /// The local token is removed even if the backend call fails.
    pub async fn logout(&self) -> Result<()> {
        if self.gateway.has_token() {
            if let Err(e) = self.gateway.logout().await {
                warn!("Backend logout failed, clearing local session anyway: {}", e);
            }
        }
        self.gateway.set_token(None);
        self.store.clear()?;
        self.events.emit(Event::LoggedOut);
        info!("Logged out");
        Ok(())
    }

    /// The signed-in user according to the backend
    pub async fn current_user(&self) -> Result<User> {
        self.gateway
            .current_user()
            .await
            .map_err(|e| self.check_expired(e))
    }

    /// Resume a saved session
    ///
    /// Returns `Ok(None)` when there is no saved token or the backend no
    /// longer accepts it (the token is then removed). Transport errors are
    /// returned and the token is kept for the next attempt.
    pub async fn restore_session(&self) -> Result<Option<User>> {
        let Some(token) = self.store.load()? else {
            return Ok(None);
        };
        self.gateway.set_token(Some(token));

        match self.current_user().await {
            Ok(user) => {
                info!(username = %user.username, "Restored session");
                Ok(Some(user))
            }
            Err(e) if e.is_unauthorized() => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Hand the saved token to the gateway without asking the backend
    ///
    /// Returns whether a token was found. A stale token surfaces as a 401 on
    /// the next request and is then expired as usual.
    pub fn load_saved_token(&self) -> Result<bool> {
        match self.store.load()? {
            Some(token) => {
                self.gateway.set_token(Some(token));
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Forget the session after the backend answered 401
    pub fn expire_session(&self) {
        self.gateway.set_token(None);
        if let Err(e) = self.store.clear() {
            warn!("Failed to remove stored token: {}", e);
        }
        self.events.emit(Event::SessionExpired);
        warn!("Session expired, token cleared");
    }

    /// Pass `error` through, expiring the session first if it is a 401
    pub fn check_expired(&self, error: StylecastError) -> StylecastError {
        if error.is_unauthorized() {
            self.expire_session();
        }
        error
    }

    pub fn is_logged_in(&self) -> bool {
        self.gateway.has_token()
    }

    pub fn token_store(&self) -> &TokenStore {
        &self.store
    }

    fn accept(&self, response: AuthResponse) -> Result<User> {
        let token = SecretString::from(response.token);
        self.store.save(&token)?;
        self.gateway.set_token(Some(token));

        let user = response.user;
        self.events.emit(Event::LoggedIn {
            username: user.username.clone(),
            is_admin: user.is_admin,
        });
        info!(username = %user.username, admin = user.is_admin, "Signed in");
        Ok(user)
    }
}

/// A 401 from the login endpoint means wrong credentials, not an expired session
fn bad_credentials(error: StylecastError) -> StylecastError {
    match error {
        StylecastError::Gateway(GatewayError::Unauthorized(message)) => {
            StylecastError::Credentials(message)
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::MockGateway;
    use tempfile::TempDir;

    fn service(dir: &TempDir) -> (AuthService, MockGateway) {
        let mock = MockGateway::default();
        let service = AuthService::new(
            Arc::new(mock.clone()),
            TokenStore::at(dir.path().join("token")),
            EventBus::new(10),
        );
        (service, mock)
    }

    fn secret(s: &str) -> SecretString {
        SecretString::from(s.to_string())
    }

    #[tokio::test]
    async fn test_login_persists_token() {
        let dir = TempDir::new().unwrap();
        let (service, mock) = service(&dir);

        let user = service.login("alice", &secret("alice-pass")).await.unwrap();
        assert_eq!(user.username, "alice");
        assert!(service.token_store().exists());
        assert_eq!(mock.current_token().as_deref(), Some("mock-token-2"));
    }

    #[tokio::test]
    async fn test_login_wrong_password_is_credentials_error() {
        let dir = TempDir::new().unwrap();
        let (service, _) = service(&dir);

        let err = service.login("alice", &secret("wrong")).await.unwrap_err();
        assert!(matches!(err, StylecastError::Credentials(ref m) if m.contains("Invalid")));
        assert!(!service.token_store().exists());
    }

    #[tokio::test]
    async fn test_login_blank_fields_rejected_locally() {
        let dir = TempDir::new().unwrap();
        let (service, _) = service(&dir);
        let err = service.login(" ", &secret("x")).await.unwrap_err();
        assert_eq!(err.exit_code(), 3);
    }

    #[tokio::test]
    async fn test_register_bad_email_rejected_locally() {
        let dir = TempDir::new().unwrap();
        let (service, _) = service(&dir);
        let err = service
            .register("carol", "carol-at-example", &secret("pw"))
            .await
            .unwrap_err();
        assert!(matches!(err, StylecastError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_load_saved_token_reaches_gateway() {
        let dir = TempDir::new().unwrap();
        let (service, mock) = service(&dir);
        assert!(!service.load_saved_token().unwrap());

        service.token_store().save(&secret("mock-token-2")).unwrap();
        assert!(service.load_saved_token().unwrap());
        assert_eq!(mock.current_token().as_deref(), Some("mock-token-2"));
        assert!(service.is_logged_in());
    }

    #[tokio::test]
    async fn test_logout_clears_even_when_server_rejects() {
        let dir = TempDir::new().unwrap();
        let (service, mock) = service(&dir);
        service.login("alice", &secret("alice-pass")).await.unwrap();

        mock.expire_session();
        service.logout().await.unwrap();

        assert!(!service.token_store().exists());
        assert!(!service.is_logged_in());
    }

    #[tokio::test]
    async fn test_restore_session_roundtrip() {
        let dir = TempDir::new().unwrap();
        let (first, _) = service(&dir);
        first.login("admin", &secret("admin-pass")).await.unwrap();

        // Fresh service over the same token file
        let (restored, _) = service(&dir);
        let user = restored.restore_session().await.unwrap().unwrap();
        assert!(user.is_admin);
    }

    #[tokio::test]
    async fn test_restore_session_expired_token_removed() {
        let dir = TempDir::new().unwrap();
        let (service, mock) = service(&dir);
        service.login("alice", &secret("alice-pass")).await.unwrap();

        mock.expire_session();
        assert!(service.restore_session().await.unwrap().is_none());
        assert!(!service.token_store().exists());
    }
}
