//! Service layer integration tests over MockGateway

use std::sync::Arc;
use std::time::Duration;

use libstylecast::error::{GatewayError, StylecastError};
use libstylecast::gateway::MockGateway;
use libstylecast::reveal::{ManualScheduler, RevealController, RevealDriver, RevealStatus};
use libstylecast::service::admin::UserQuery;
use libstylecast::service::events::Event;
use libstylecast::service::history::HistoryQuery;
use libstylecast::service::StylecastService;
use libstylecast::types::{TransformRequest, Transformation, Verbosity};
use libstylecast::{Config, TokenStore};
use secrecy::SecretString;
use tempfile::TempDir;

fn setup(mock: &MockGateway) -> (TempDir, StylecastService) {
    let dir = TempDir::new().unwrap();
    let service = StylecastService::with_gateway(
        Config::default(),
        Arc::new(mock.clone()),
        TokenStore::at(dir.path().join("token")),
    );
    (dir, service)
}

async fn login(service: &StylecastService, username: &str, password: &str) {
    service
        .auth()
        .login(username, &SecretString::from(password.to_string()))
        .await
        .unwrap();
}

fn request(text: &str) -> TransformRequest {
    TransformRequest {
        text: text.to_string(),
        persona: "hitchens".to_string(),
        verbosity: Verbosity::Verbose,
        provider: None,
    }
}

fn row(id: i64, user_id: i64, input: &str) -> Transformation {
    Transformation {
        id,
        input_text: input.to_string(),
        output_text: format!("{} (styled)", input),
        verbosity_level: 1,
        created_at: "2024-05-13 09:30:00".to_string(),
        persona: Some("trump".to_string()),
        api_provider: Some("openai".to_string()),
        user_id: Some(user_id),
        username: None,
    }
}

#[tokio::test]
async fn test_blank_input_never_reaches_gateway() {
    let mock = MockGateway::replying("unused");
    let (_dir, service) = setup(&mock);
    login(&service, "alice", "alice-pass").await;

    let err = service.transform().submit(&request("   ")).await.unwrap_err();
    assert!(matches!(err, StylecastError::InvalidInput(ref m) if m == "No text provided"));
    assert_eq!(mock.transform_call_count(), 0);
}

#[tokio::test]
async fn test_successful_submit_emits_events_and_feeds_reveal() {
    let mock = MockGateway::replying("God is not great.");
    let (_dir, service) = setup(&mock);
    login(&service, "alice", "alice-pass").await;
    let mut events = service.subscribe();

    let response = service.transform().submit(&request("Religion")).await.unwrap();
    assert_eq!(mock.requests()[0].verbosity, Verbosity::Verbose);

    assert!(matches!(events.recv().await.unwrap(), Event::TransformStarted { .. }));
    assert!(matches!(
        events.recv().await.unwrap(),
        Event::TransformCompleted { chars: 17, .. }
    ));

    let mut driver = RevealDriver::new(RevealController::default(), ManualScheduler::new());
    driver.start(response.transformed_text, false);
    assert_eq!(driver.snapshot().revealed_text, "God is not great.");
}

#[tokio::test]
async fn test_failure_leaves_previous_result_untouched() {
    let mock = MockGateway::replying("First result.");
    let (_dir, service) = setup(&mock);
    login(&service, "alice", "alice-pass").await;

    let mut driver = RevealDriver::new(
        RevealController::new(Duration::from_millis(30)),
        ManualScheduler::new(),
    );
    let first = service.transform().submit(&request("one")).await.unwrap();
    driver.start(first.transformed_text, false);
    let before = driver.snapshot();

    mock.push_reply(Err(GatewayError::Rejected {
        status: 500,
        message: "Model overloaded".to_string(),
    }));
    let mut events = service.subscribe();
    let result = service.transform().submit(&request("two")).await;
    assert!(result.is_err());

    // Integration layer only calls start on success
    assert_eq!(driver.snapshot(), before);
    assert_eq!(driver.snapshot().status, RevealStatus::Completed);

    let _started = events.recv().await.unwrap();
    assert_eq!(
        events.recv().await.unwrap(),
        Event::TransformFailed {
            error: "Model overloaded".to_string()
        }
    );
}

#[tokio::test]
async fn test_unauthorized_clears_stored_session() {
    let mock = MockGateway::replying("unused");
    let (_dir, service) = setup(&mock);
    login(&service, "alice", "alice-pass").await;
    assert!(service.auth().token_store().exists());

    mock.expire_session();
    let mut events = service.subscribe();
    let err = service.transform().submit(&request("text")).await.unwrap_err();

    assert!(err.is_unauthorized());
    assert!(!service.auth().is_logged_in());
    assert!(!service.auth().token_store().exists());

    let _started = events.recv().await.unwrap();
    assert_eq!(events.recv().await.unwrap(), Event::SessionExpired);
}

#[tokio::test]
async fn test_history_filters_client_side() {
    let mock = MockGateway::default();
    mock.set_transformations(vec![
        row(3, 2, "Taxes are high"),
        row(2, 2, "Weather report"),
        row(1, 1, "Admin only row"),
    ]);
    let (_dir, service) = setup(&mock);
    login(&service, "alice", "alice-pass").await;

    let all = service.history().list(&HistoryQuery::default()).await.unwrap();
    assert_eq!(all.len(), 2);

    let query = HistoryQuery {
        search: Some("WEATHER".to_string()),
        ..Default::default()
    };
    let found = service.history().list(&query).await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, 2);
}

#[tokio::test]
async fn test_admin_dashboard_requires_admin() {
    let mock = MockGateway::default();
    mock.set_transformations(vec![row(1, 2, "x")]);
    let (_dir, service) = setup(&mock);

    login(&service, "alice", "alice-pass").await;
    let err = service.admin().dashboard().await.unwrap_err();
    assert!(matches!(
        err,
        StylecastError::Gateway(GatewayError::Forbidden(_))
    ));
    // Forbidden is not a session problem
    assert!(service.auth().is_logged_in());

    service.auth().logout().await.unwrap();
    login(&service, "admin", "admin-pass").await;
    let dashboard = service.admin().dashboard().await.unwrap();
    assert_eq!(dashboard.users.len(), 2);
    assert_eq!(dashboard.transformations.len(), 1);

    let admins = service
        .admin()
        .users(&UserQuery {
            admins_only: true,
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(admins.len(), 1);
}

#[tokio::test]
async fn test_register_then_transform() {
    let mock = MockGateway::replying("Welcome aboard.");
    let (_dir, service) = setup(&mock);

    let user = service
        .auth()
        .register("carol", "carol@example.com", &SecretString::from("pw".to_string()))
        .await
        .unwrap();
    assert!(!user.is_admin);

    let response = service.transform().submit(&request("hi")).await.unwrap();
    assert_eq!(response.transformed_text, "Welcome aboard.");
}
