//! HTTP client for the Stylecast backend

use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{RequestBuilder, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use super::{BackendGateway, TransformGateway};
use crate::config::Config;
use crate::error::{GatewayError, Result};
use crate::types::{
    AuthResponse, ErrorBody, ProvidersResponse, TransformRequest, TransformResponse,
    Transformation, User, UserEnvelope,
};

#[derive(Serialize)]
struct LoginBody<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct RegisterBody<'a> {
    username: &'a str,
    email: &'a str,
    password: &'a str,
}

/// reqwest-based gateway to the backend REST API
///
/// Holds the bearer token behind a lock so services sharing one client see
/// login and logout immediately.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    token: RwLock<Option<SecretString>>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(timeout)
            .user_agent(concat!("stylecast/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| GatewayError::Network(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: base_url.into(),
            token: RwLock::new(None),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(config.api.base_url.clone(), config.timeout())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    fn token_read(&self) -> RwLockReadGuard<'_, Option<SecretString>> {
        self.token.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn token_write(&self) -> RwLockWriteGuard<'_, Option<SecretString>> {
        self.token.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn authorize(&self, builder: RequestBuilder) -> RequestBuilder {
        match self.token_read().as_ref() {
            Some(token) => builder.bearer_auth(token.expose_secret()),
            None => builder,
        }
    }

    async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder, endpoint: &str) -> Result<T> {
        debug!(endpoint, "Sending backend request");

        let response = self
            .authorize(builder)
            .send()
            .await
            .map_err(|e| GatewayError::Network(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| GatewayError::Network(e.to_string()))?;

        if status.is_success() {
            return serde_json::from_str(&body).map_err(|e| {
                GatewayError::Decode(format!("{} returned unexpected JSON: {}", endpoint, e)).into()
            });
        }

        let error = map_error_status(status, &body);
        warn!(endpoint, status = status.as_u16(), "Backend request failed: {}", error);
        Err(error.into())
    }
}

/// Classify a non-success response
///
/// The message comes from the backend's `{"error": "..."}` body when present,
/// otherwise from the HTTP reason phrase.
pub fn map_error_status(status: StatusCode, body: &str) -> GatewayError {
    let message = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .map(|b| b.error)
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .map(str::to_string)
                .unwrap_or_else(|| format!("HTTP {}", status.as_u16()))
        });

    match status {
        StatusCode::UNAUTHORIZED => GatewayError::Unauthorized(message),
        StatusCode::FORBIDDEN => GatewayError::Forbidden(message),
        _ => GatewayError::Rejected {
            status: status.as_u16(),
            message,
        },
    }
}

#[async_trait]
impl TransformGateway for ApiClient {
    async fn transform(&self, request: &TransformRequest) -> Result<TransformResponse> {
        let builder = self.http.post(self.url("/api/transform")).json(request);
        self.send(builder, "/api/transform").await
    }

    async fn providers(&self) -> Result<ProvidersResponse> {
        let builder = self.http.get(self.url("/api/config/providers"));
        self.send(builder, "/api/config/providers").await
    }

    fn name(&self) -> &str {
        "api"
    }
}

#[async_trait]
impl BackendGateway for ApiClient {
    async fn login(&self, username: &str, password: &SecretString) -> Result<AuthResponse> {
        let body = LoginBody {
            username,
            password: password.expose_secret(),
        };
        let builder = self.http.post(self.url("/api/auth/login")).json(&body);
        self.send(builder, "/api/auth/login").await
    }

    async fn register(
        &self,
        username: &str,
        email: &str,
        password: &SecretString,
    ) -> Result<AuthResponse> {
        let body = RegisterBody {
            username,
            email,
            password: password.expose_secret(),
        };
        let builder = self.http.post(self.url("/api/auth/register")).json(&body);
        self.send(builder, "/api/auth/register").await
    }

    async fn logout(&self) -> Result<()> {
        let builder = self.http.get(self.url("/api/auth/logout"));
        let _: serde_json::Value = self.send(builder, "/api/auth/logout").await?;
        Ok(())
    }

    async fn current_user(&self) -> Result<User> {
        let builder = self.http.get(self.url("/api/auth/user"));
        let envelope: UserEnvelope = self.send(builder, "/api/auth/user").await?;
        Ok(envelope.user)
    }

    async fn history(&self) -> Result<Vec<Transformation>> {
        let builder = self.http.get(self.url("/api/history"));
        self.send(builder, "/api/history").await
    }

    async fn admin_transformations(&self) -> Result<Vec<Transformation>> {
        let builder = self.http.get(self.url("/api/admin/transformations"));
        self.send(builder, "/api/admin/transformations").await
    }

    async fn admin_users(&self) -> Result<Vec<User>> {
        let builder = self.http.get(self.url("/api/admin/users"));
        self.send(builder, "/api/admin/users").await
    }

    fn set_token(&self, token: Option<SecretString>) {
        *self.token_write() = token;
    }

    fn has_token(&self) -> bool {
        self.token_read().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_401_uses_server_message() {
        let err = map_error_status(StatusCode::UNAUTHORIZED, r#"{"error": "Token is missing"}"#);
        assert_eq!(err, GatewayError::Unauthorized("Token is missing".to_string()));
    }

    #[test]
    fn test_map_403() {
        let err = map_error_status(StatusCode::FORBIDDEN, r#"{"error": "Admin access required"}"#);
        assert_eq!(err, GatewayError::Forbidden("Admin access required".to_string()));
    }

    #[test]
    fn test_map_other_status_falls_back_to_reason() {
        let err = map_error_status(StatusCode::INTERNAL_SERVER_ERROR, "<html>oops</html>");
        assert_eq!(
            err,
            GatewayError::Rejected {
                status: 500,
                message: "Internal Server Error".to_string()
            }
        );
    }

    #[test]
    fn test_map_blank_error_field_falls_back() {
        let err = map_error_status(StatusCode::BAD_REQUEST, r#"{"error": "  "}"#);
        assert_eq!(
            err,
            GatewayError::Rejected {
                status: 400,
                message: "Bad Request".to_string()
            }
        );
    }

    #[test]
    fn test_url_joins_without_double_slash() {
        let client = ApiClient::new("http://localhost:5000/", Duration::from_secs(5)).unwrap();
        assert_eq!(client.url("/api/history"), "http://localhost:5000/api/history");
    }

    #[test]
    fn test_token_set_and_clear() {
        let client = ApiClient::new("http://localhost:5000", Duration::from_secs(5)).unwrap();
        assert!(!client.has_token());
        client.set_token(Some(SecretString::from("abc".to_string())));
        assert!(client.has_token());
        client.set_token(None);
        assert!(!client.has_token());
    }
}
