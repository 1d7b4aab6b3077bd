use buildium_core::backend::client::SESSION_TOKEN_HEADER;
use buildium_core::{
    BackendClient, CredentialStore, Environment, EnvironmentProfile, Error, SessionConfig,
};
use std::path::Path;
use url::Url;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const API_KEY: &str = "test-anon-key";

fn client_for(server: &MockServer, token: &str, config_path: &Path) -> BackendClient {
    let profile = EnvironmentProfile::custom(
        Environment::Local,
        Url::parse(&server.uri()).unwrap(),
        API_KEY,
    );
    BackendClient::with_profile(
        profile,
        SessionConfig {
            environment: Environment::Local,
            auth_token: token.to_string(),
        },
        CredentialStore::at(config_path),
    )
}

#[tokio::test]
async fn test_login_success_persists_token() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join(".buildium/config.json");

    Mock::given(method("POST"))
        .and(path("/functions/v1/login"))
        .and(header("authorization", format!("Bearer {}", API_KEY).as_str()))
        .and(body_json(serde_json::json!({
            "email": "dev@example.com",
            "password": "hunter2"
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"token": "session-abc"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let mut client = client_for(&server, "", &config_path);
    client.login("dev@example.com", "hunter2").await.unwrap();

    assert_eq!(client.session().auth_token, "session-abc");
    assert!(client.verify_auth_token().is_ok());

    let loaded = CredentialStore::at(&config_path).load();
    assert_eq!(loaded.config.auth_token, "session-abc");
    assert_eq!(loaded.config.environment, Environment::Local);
}

#[tokio::test]
async fn test_login_rejected_leaves_session_untouched() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("config.json");

    Mock::given(method("POST"))
        .and(path("/functions/v1/login"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid credentials"))
        .mount(&server)
        .await;

    let mut client = client_for(&server, "previous-token", &config_path);
    let err = client.login("dev@example.com", "wrong").await.unwrap_err();

    match err {
        Error::Remote { status, body } => {
            assert_eq!(status, 401);
            assert_eq!(body, "invalid credentials");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(client.session().auth_token, "previous-token");
    assert!(!config_path.exists());
}

#[tokio::test]
async fn test_login_malformed_body_is_protocol_error() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("config.json");

    Mock::given(method("POST"))
        .and(path("/functions/v1/login"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let mut client = client_for(&server, "", &config_path);
    let err = client.login("dev@example.com", "hunter2").await.unwrap_err();

    assert!(matches!(err, Error::Protocol(_)));
    assert_eq!(client.session().auth_token, "");
    assert!(!config_path.exists());
}

#[tokio::test]
async fn test_login_empty_token_is_protocol_error() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();

    Mock::given(method("POST"))
        .and(path("/functions/v1/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"token": ""})))
        .mount(&server)
        .await;

    let mut client = client_for(&server, "", &dir.path().join("config.json"));
    let err = client.login("dev@example.com", "hunter2").await.unwrap_err();
    assert!(matches!(err, Error::Protocol(_)));
}

#[tokio::test]
async fn test_get_project_sends_key_and_session_token() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();

    Mock::given(method("POST"))
        .and(path("/functions/v1/get-project"))
        .and(header("authorization", format!("Bearer {}", API_KEY).as_str()))
        .and(header(SESSION_TOKEN_HEADER, "session-abc"))
        .and(body_json(serde_json::json!({"projectId": "proj-1"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "projectId": "proj-1",
            "name": "Redis in Go",
            "tutorialId": "tut-9"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, "session-abc", &dir.path().join("config.json"));
    let project = client.get_project("proj-1").await.unwrap();

    assert_eq!(project.project_id, "proj-1");
    assert_eq!(project.name, "Redis in Go");
    assert_eq!(project.tutorial_id, "tut-9");
}

#[tokio::test]
async fn test_get_project_non_200_is_remote_error() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();

    Mock::given(method("POST"))
        .and(path("/functions/v1/get-project"))
        .respond_with(ResponseTemplate::new(404).set_body_string("project not found"))
        .mount(&server)
        .await;

    let client = client_for(&server, "session-abc", &dir.path().join("config.json"));
    let err = client.get_project("missing").await.unwrap_err();

    match err {
        Error::Remote { status, body } => {
            assert_eq!(status, 404);
            assert_eq!(body, "project not found");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_get_project_wrong_shape_is_protocol_error() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();

    Mock::given(method("POST"))
        .and(path("/functions/v1/get-project"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"projectId": 12})),
        )
        .mount(&server)
        .await;

    let client = client_for(&server, "session-abc", &dir.path().join("config.json"));
    let err = client.get_project("proj-1").await.unwrap_err();
    assert!(matches!(err, Error::Protocol(_)));
}

#[tokio::test]
async fn test_get_tutorial() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();

    Mock::given(method("POST"))
        .and(path("/functions/v1/get-tutorial"))
        .and(header(SESSION_TOKEN_HEADER, "session-abc"))
        .and(body_json(serde_json::json!({"tutorialId": "tut-9"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "tutorialId": "tut-9",
            "name": "Build your own Redis",
            "stages": 7,
            "dockerImage": "buildium/redis-harness:1.2"
        })))
        .mount(&server)
        .await;

    let client = client_for(&server, "session-abc", &dir.path().join("config.json"));
    let tutorial = client.get_tutorial("tut-9").await.unwrap();

    assert_eq!(tutorial.stage_count, 7);
    assert_eq!(tutorial.docker_image, "buildium/redis-harness:1.2");
}

#[tokio::test]
async fn test_get_tutorial_errors_keep_status() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();

    Mock::given(method("POST"))
        .and(path("/functions/v1/get-tutorial"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let client = client_for(&server, "session-abc", &dir.path().join("config.json"));
    let err = client.get_tutorial("tut-9").await.unwrap_err();
    assert!(matches!(err, Error::Remote { status: 500, .. }));
}

#[tokio::test]
async fn test_get_tutorial_malformed_body_is_protocol_error() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();

    Mock::given(method("POST"))
        .and(path("/functions/v1/get-tutorial"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json at all"))
        .mount(&server)
        .await;

    let client = client_for(&server, "session-abc", &dir.path().join("config.json"));
    let err = client.get_tutorial("tut-9").await.unwrap_err();
    assert!(matches!(err, Error::Protocol(_)));
}

#[tokio::test]
async fn test_get_tutorial_wrong_shape_is_protocol_error() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();

    Mock::given(method("POST"))
        .and(path("/functions/v1/get-tutorial"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"tutorialId": "tut-9"})),
        )
        .mount(&server)
        .await;

    let client = client_for(&server, "session-abc", &dir.path().join("config.json"));
    let err = client.get_tutorial("tut-9").await.unwrap_err();
    assert!(matches!(err, Error::Protocol(_)));
}

#[tokio::test]
async fn test_authenticated_calls_require_token_without_request() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let client = client_for(&server, "", &dir.path().join("config.json"));
    assert!(client.get_project("proj-1").await.unwrap_err().is_auth());
    assert!(client.get_tutorial("tut-9").await.unwrap_err().is_auth());
}
