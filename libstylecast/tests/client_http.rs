//! ApiClient against a local mock HTTP server

use std::time::Duration;

use libstylecast::error::{GatewayError, StylecastError};
use libstylecast::gateway::{ApiClient, BackendGateway, TransformGateway};
use libstylecast::types::{TransformRequest, Verbosity};
use secrecy::SecretString;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer) -> ApiClient {
    ApiClient::new(server.uri(), Duration::from_secs(5)).unwrap()
}

fn request() -> TransformRequest {
    TransformRequest {
        text: "Taxes are high".to_string(),
        persona: "friedman".to_string(),
        verbosity: Verbosity::Moderate,
        provider: Some("openai".to_string()),
    }
}

fn gateway_error(err: StylecastError) -> GatewayError {
    match err {
        StylecastError::Gateway(e) => e,
        other => panic!("expected gateway error, got {:?}", other),
    }
}

#[tokio::test]
async fn transform_posts_wire_format_with_bearer_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/transform"))
        .and(header("authorization", "Bearer tok-1"))
        .and(body_json(serde_json::json!({
            "text": "Taxes are high",
            "persona": "friedman",
            "verbosity": 2,
            "api_provider": "openai"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            r#"{"transformed_text": "Taxes are theft.", "id": 41, "api_provider": "openai"}"#,
            "application/json",
        ))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&server);
    client.set_token(Some(SecretString::from("tok-1".to_string())));

    let response = client.transform(&request()).await.unwrap();
    assert_eq!(response.transformed_text, "Taxes are theft.");
    assert_eq!(response.id, Some(41));
}

#[tokio::test]
async fn unauthorized_is_distinct() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/transform"))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_raw(r#"{"error": "Invalid or expired token"}"#, "application/json"),
        )
        .mount(&server)
        .await;

    let err = client(&server).transform(&request()).await.unwrap_err();
    assert!(err.is_unauthorized());
    assert_eq!(err.exit_code(), 2);
    assert_eq!(
        gateway_error(err),
        GatewayError::Unauthorized("Invalid or expired token".to_string())
    );
}

#[tokio::test]
async fn server_error_message_is_surfaced() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/transform"))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_raw(r#"{"error": "Invalid API provider: foo"}"#, "application/json"),
        )
        .mount(&server)
        .await;

    let err = client(&server).transform(&request()).await.unwrap_err();
    assert_eq!(
        gateway_error(err),
        GatewayError::Rejected {
            status: 400,
            message: "Invalid API provider: foo".to_string()
        }
    );
}

#[tokio::test]
async fn malformed_success_body_is_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/transform"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("not json", "text/plain"))
        .mount(&server)
        .await;

    let err = client(&server).transform(&request()).await.unwrap_err();
    assert!(matches!(gateway_error(err), GatewayError::Decode(_)));
}

#[tokio::test]
async fn unreachable_server_is_network_error() {
    // Nothing listens on port 9 locally
    let client = ApiClient::new("http://127.0.0.1:9", Duration::from_secs(2)).unwrap();
    let err = client.transform(&request()).await.unwrap_err();
    assert!(matches!(gateway_error(err), GatewayError::Network(_)));
}

#[tokio::test]
async fn login_and_current_user() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .and(body_json(serde_json::json!({"username": "alice", "password": "pw"})))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            r#"{"message": "Login successful",
                "user": {"id": 2, "username": "alice", "email": "a@example.com", "is_admin": false},
                "token": "tok-alice"}"#,
            "application/json",
        ))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/auth/user"))
        .and(header("authorization", "Bearer tok-alice"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            r#"{"user": {"id": 2, "username": "alice", "email": "a@example.com", "is_admin": false}}"#,
            "application/json",
        ))
        .mount(&server)
        .await;

    let client = client(&server);
    let auth = client
        .login("alice", &SecretString::from("pw".to_string()))
        .await
        .unwrap();
    assert_eq!(auth.token, "tok-alice");

    client.set_token(Some(SecretString::from(auth.token)));
    let user = client.current_user().await.unwrap();
    assert_eq!(user.username, "alice");
}

#[tokio::test]
async fn history_and_admin_lists() {
    let server = MockServer::start().await;
    let rows = r#"[
        {"id": 2, "input_text": "b", "output_text": "B", "verbosity_level": 1,
         "created_at": "2024-05-13 09:31:00", "username": "alice"},
        {"id": 1, "input_text": "a", "output_text": "A", "verbosity_level": 3,
         "created_at": "2024-05-13 09:30:00"}
    ]"#;
    Mock::given(method("GET"))
        .and(path("/api/history"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(rows, "application/json"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/admin/users"))
        .respond_with(
            ResponseTemplate::new(403)
                .set_body_raw(r#"{"error": "Admin access required"}"#, "application/json"),
        )
        .mount(&server)
        .await;

    let client = client(&server);
    let history = client.history().await.unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].username.as_deref(), Some("alice"));

    let err = client.admin_users().await.unwrap_err();
    assert_eq!(
        gateway_error(err),
        GatewayError::Forbidden("Admin access required".to_string())
    );
}

#[tokio::test]
async fn providers_endpoint() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/config/providers"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            r#"{"providers": ["openai", "gemini"], "default": "openai"}"#,
            "application/json",
        ))
        .mount(&server)
        .await;

    let providers = client(&server).providers().await.unwrap();
    assert_eq!(providers.providers, vec!["openai", "gemini"]);
    assert_eq!(providers.default, "openai");
}
