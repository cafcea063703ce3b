//! Mock gateway implementation for testing
//!
//! A configurable in-memory stand-in for the backend. It can script
//! transform replies, simulate latency, expire the session, and records
//! every transform request so tests can assert on what was sent without a
//! server or network access.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use tokio::time::sleep;

use super::{BackendGateway, TransformGateway};
use crate::error::{GatewayError, Result};
use crate::types::{
    AuthResponse, ProvidersResponse, TransformRequest, TransformResponse, Transformation, User,
};

/// An account the mock backend knows about
#[derive(Debug, Clone)]
pub struct MockAccount {
    pub user: User,
    pub password: String,
}

impl MockAccount {
    pub fn new(id: i64, username: &str, password: &str, is_admin: bool) -> Self {
        Self {
            user: User {
                id,
                username: username.to_string(),
                email: format!("{}@example.com", username),
                is_admin,
                created_at: Some("2024-01-01 00:00:00".to_string()),
            },
            password: password.to_string(),
        }
    }

    fn token(&self) -> String {
        format!("mock-token-{}", self.user.id)
    }
}

/// Configuration for mock gateway behavior
#[derive(Debug, Clone)]
pub struct MockConfig {
    /// Reply used when the script queue is empty
    pub transform_reply: std::result::Result<String, GatewayError>,

    /// Replies consumed in order before falling back to `transform_reply`
    pub transform_script: Arc<Mutex<VecDeque<std::result::Result<String, GatewayError>>>>,

    /// Provider list and default
    pub providers: Vec<String>,
    pub default_provider: String,

    /// Known accounts (login, registration conflicts, admin listing)
    pub accounts: Arc<Mutex<Vec<MockAccount>>>,

    /// Rows returned by the history and admin endpoints
    pub transformations: Arc<Mutex<Vec<Transformation>>>,

    /// Delay before completing operations (simulates network latency)
    pub delay: Duration,

    /// When false, every authenticated endpoint answers 401
    pub session_valid: Arc<Mutex<bool>>,

    /// Number of times transform has been called
    pub transform_call_count: Arc<Mutex<usize>>,

    /// Requests received by transform (for verification)
    pub requests: Arc<Mutex<Vec<TransformRequest>>>,

    /// Bearer token currently held by the client side
    pub token: Arc<Mutex<Option<String>>>,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            transform_reply: Ok("Transformed text.".to_string()),
            transform_script: Arc::new(Mutex::new(VecDeque::new())),
            providers: vec!["openai".to_string(), "anthropic".to_string()],
            default_provider: "openai".to_string(),
            accounts: Arc::new(Mutex::new(vec![
                MockAccount::new(1, "admin", "admin-pass", true),
                MockAccount::new(2, "alice", "alice-pass", false),
            ])),
            transformations: Arc::new(Mutex::new(Vec::new())),
            delay: Duration::from_millis(0),
            session_valid: Arc::new(Mutex::new(true)),
            transform_call_count: Arc::new(Mutex::new(0)),
            requests: Arc::new(Mutex::new(Vec::new())),
            token: Arc::new(Mutex::new(None)),
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Mock backend for testing
#[derive(Debug, Clone, Default)]
pub struct MockGateway {
    config: MockConfig,
}

impl MockGateway {
    /// Create a new mock gateway with the given configuration
    pub fn new(config: MockConfig) -> Self {
        Self { config }
    }

    /// Create a mock whose transform always returns `text`
    pub fn replying(text: &str) -> Self {
        Self::new(MockConfig {
            transform_reply: Ok(text.to_string()),
            ..Default::default()
        })
    }

    /// Create a mock whose transform always fails with `error`
    pub fn failing(error: GatewayError) -> Self {
        Self::new(MockConfig {
            transform_reply: Err(error),
            ..Default::default()
        })
    }

    /// Create a mock with a delay on every call
    pub fn with_delay(text: &str, delay: Duration) -> Self {
        Self::new(MockConfig {
            transform_reply: Ok(text.to_string()),
            delay,
            ..Default::default()
        })
    }

    /// Queue a one-off transform reply
    pub fn push_reply(&self, reply: std::result::Result<String, GatewayError>) {
        lock(&self.config.transform_script).push_back(reply);
    }

    /// Seed the rows returned by history and admin endpoints
    pub fn set_transformations(&self, rows: Vec<Transformation>) {
        *lock(&self.config.transformations) = rows;
    }

    /// Make every authenticated endpoint answer 401 from now on
    pub fn expire_session(&self) {
        *lock(&self.config.session_valid) = false;
    }

    /// Get the number of times transform was called
    pub fn transform_call_count(&self) -> usize {
        *lock(&self.config.transform_call_count)
    }

    /// Get every request transform received
    pub fn requests(&self) -> Vec<TransformRequest> {
        lock(&self.config.requests).clone()
    }

    /// Token the client most recently installed
    pub fn current_token(&self) -> Option<String> {
        lock(&self.config.token).clone()
    }

    async fn simulate_latency(&self) {
        if !self.config.delay.is_zero() {
            sleep(self.config.delay).await;
        }
    }

    fn authenticated_account(&self) -> Result<MockAccount> {
        if !*lock(&self.config.session_valid) {
            return Err(GatewayError::Unauthorized("Invalid or expired token".to_string()).into());
        }
        let token = lock(&self.config.token)
            .clone()
            .ok_or_else(|| GatewayError::Unauthorized("Token is missing".to_string()))?;

        lock(&self.config.accounts)
            .iter()
            .find(|a| a.token() == token)
            .cloned()
            .ok_or_else(|| GatewayError::Unauthorized("Invalid or expired token".to_string()).into())
    }

    fn require_admin(&self) -> Result<MockAccount> {
        let account = self.authenticated_account()?;
        if !account.user.is_admin {
            return Err(GatewayError::Forbidden("Admin access required".to_string()).into());
        }
        Ok(account)
    }

    fn issue(&self, account: &MockAccount, message: &str) -> AuthResponse {
        *lock(&self.config.session_valid) = true;
        AuthResponse {
            message: Some(message.to_string()),
            user: account.user.clone(),
            token: account.token(),
        }
    }
}

#[async_trait]
impl TransformGateway for MockGateway {
    async fn transform(&self, request: &TransformRequest) -> Result<TransformResponse> {
        *lock(&self.config.transform_call_count) += 1;
        lock(&self.config.requests).push(request.clone());

        self.simulate_latency().await;
        self.authenticated_account()?;

        let scripted = lock(&self.config.transform_script).pop_front();
        let reply = scripted.unwrap_or_else(|| self.config.transform_reply.clone());

        match reply {
            Ok(text) => Ok(TransformResponse {
                transformed_text: text,
                id: Some(self.transform_call_count() as i64),
                api_provider: Some(
                    request
                        .provider
                        .clone()
                        .unwrap_or_else(|| self.config.default_provider.clone()),
                ),
            }),
            Err(error) => Err(error.into()),
        }
    }

    async fn providers(&self) -> Result<ProvidersResponse> {
        self.simulate_latency().await;
        self.authenticated_account()?;
        Ok(ProvidersResponse {
            providers: self.config.providers.clone(),
            default: self.config.default_provider.clone(),
        })
    }

    fn name(&self) -> &str {
        "mock"
    }
}

#[async_trait]
impl BackendGateway for MockGateway {
    async fn login(&self, username: &str, password: &SecretString) -> Result<AuthResponse> {
        self.simulate_latency().await;
        let account = lock(&self.config.accounts)
            .iter()
            .find(|a| a.user.username == username && a.password == password.expose_secret())
            .cloned()
            .ok_or_else(|| GatewayError::Unauthorized("Invalid username or password".to_string()))?;
        Ok(self.issue(&account, "Login successful"))
    }

    async fn register(
        &self,
        username: &str,
        email: &str,
        password: &SecretString,
    ) -> Result<AuthResponse> {
        self.simulate_latency().await;
        let account = {
            let mut accounts = lock(&self.config.accounts);
            if accounts.iter().any(|a| a.user.username == username) {
                return Err(GatewayError::Rejected {
                    status: 400,
                    message: "Username already exists".to_string(),
                }
                .into());
            }
            if accounts.iter().any(|a| a.user.email == email) {
                return Err(GatewayError::Rejected {
                    status: 400,
                    message: "Email already exists".to_string(),
                }
                .into());
            }
            let id = accounts.iter().map(|a| a.user.id).max().unwrap_or(0) + 1;
            let mut account = MockAccount::new(id, username, password.expose_secret(), false);
            account.user.email = email.to_string();
            accounts.push(account.clone());
            account
        };
        Ok(self.issue(&account, "Registration successful"))
    }

    async fn logout(&self) -> Result<()> {
        self.simulate_latency().await;
        self.authenticated_account()?;
        Ok(())
    }

    async fn current_user(&self) -> Result<User> {
        self.simulate_latency().await;
        Ok(self.authenticated_account()?.user)
    }

    async fn history(&self) -> Result<Vec<Transformation>> {
        self.simulate_latency().await;
        let account = self.authenticated_account()?;
        Ok(lock(&self.config.transformations)
            .iter()
            .filter(|t| t.user_id.map_or(true, |id| id == account.user.id))
            .cloned()
            .collect())
    }

    async fn admin_transformations(&self) -> Result<Vec<Transformation>> {
        self.simulate_latency().await;
        self.require_admin()?;
        Ok(lock(&self.config.transformations).clone())
    }

    async fn admin_users(&self) -> Result<Vec<User>> {
        self.simulate_latency().await;
        self.require_admin()?;
        Ok(lock(&self.config.accounts)
            .iter()
            .map(|a| a.user.clone())
            .collect())
    }

    fn set_token(&self, token: Option<SecretString>) {
        *lock(&self.config.token) = token.map(|t| t.expose_secret().to_string());
    }

    fn has_token(&self) -> bool {
        lock(&self.config.token).is_some()
    }
}
