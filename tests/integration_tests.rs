use flightdesk::{ApiClient, ApiError, Config, MemorySessionStore, Navigator, Session, SessionStore};
use serde_json::json;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Navigator that records every forced navigation
#[derive(Default)]
struct RecordingNavigator {
    paths: Mutex<Vec<String>>,
}

impl RecordingNavigator {
    fn seen(&self) -> Vec<String> {
        self.paths.lock().unwrap().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn replace(&self, path: &str) {
        self.paths.lock().unwrap().push(path.to_string());
    }
}

fn client_for(server: &MockServer) -> (ApiClient, Arc<MemorySessionStore>, Arc<RecordingNavigator>) {
    let session = Arc::new(MemorySessionStore::new());
    let navigator = Arc::new(RecordingNavigator::default());
    let client = ApiClient::with_config(Config::new(server.uri()))
        .with_session_store(session.clone())
        .with_navigator(navigator.clone());

    (client, session, navigator)
}

fn session_invalid(message: &str) -> ResponseTemplate {
    ResponseTemplate::new(401).set_body_json(json!({"data": {"message": message}}))
}

#[tokio::test]
async fn success_passes_through_without_session_mutation() {
    let server = MockServer::start().await;
    let (client, session, _) = client_for(&server);
    session.set(Session::new("tok1"));

    Mock::given(method("GET"))
        .and(path("/profile"))
        .and(header("authorization", "Bearer tok1"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"data": {"email": "admin@example.test"}})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let response = client.profile().await.unwrap();

    assert_eq!(response.get_string("email").as_deref(), Some("admin@example.test"));
    assert_eq!(session.get(), Some(Session::new("tok1")));
}

#[tokio::test]
async fn login_persists_admin_token_and_attaches_it() {
    let server = MockServer::start().await;
    let (client, session, _) = client_for(&server);

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"data": {"accessToken": "tok1", "role": "ADMIN"}})),
        )
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/profile"))
        .and(header("authorization", "Bearer tok1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {}})))
        .expect(1)
        .mount(&server)
        .await;

    client
        .login(&json!({"email": "admin@example.test", "password": "hunter2"}))
        .await
        .unwrap();

    assert_eq!(session.get().unwrap().access_token, "tok1");

    client.profile().await.unwrap();
}

#[tokio::test]
async fn non_admin_token_is_not_persisted() {
    let server = MockServer::start().await;
    let (client, session, _) = client_for(&server);

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"data": {"accessToken": "tok1", "role": "USER"}})),
        )
        .mount(&server)
        .await;

    client.login(&json!({"email": "u@example.test", "password": "x"})).await.unwrap();

    assert_eq!(session.get(), None);
}

#[tokio::test]
async fn expired_token_refreshes_once_and_retries() {
    let server = MockServer::start().await;
    let (client, session, navigator) = client_for(&server);
    session.set(Session::new("tok1"));

    Mock::given(method("GET"))
        .and(path("/airline/5"))
        .and(header("authorization", "Bearer tok1"))
        .respond_with(session_invalid("jwt expired"))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/auth/refresh-token"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"data": {"accessToken": "tok2", "role": "ADMIN"}})),
        )
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/airline/5"))
        .and(header("authorization", "Bearer tok2"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"data": {"title": "Foo"}})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let response = client.airline("5").await.unwrap();

    assert_eq!(response.get_string("title").as_deref(), Some("Foo"));
    assert_eq!(session.get().unwrap().access_token, "tok2");
    assert!(navigator.seen().is_empty());
}

#[tokio::test]
async fn failed_retry_propagates_without_second_refresh() {
    let server = MockServer::start().await;
    let (client, session, _) = client_for(&server);
    session.set(Session::new("tok1"));

    // both the first attempt and the single retry fail the same way
    Mock::given(method("GET"))
        .and(path("/airline/5"))
        .respond_with(session_invalid("jwt expired"))
        .expect(2)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/auth/refresh-token"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"data": {"accessToken": "tok2", "role": "ADMIN"}})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let error = client.airline("5").await.unwrap_err();

    match error {
        ApiError::Api { status, ref message, .. } => {
            assert_eq!(status, 401);
            assert_eq!(message, "jwt expired");
        }
        other => panic!("expected ApiError::Api, got {:?}", other),
    }
}

#[tokio::test]
async fn terminal_refresh_failure_wipes_session_and_navigates_home() {
    let server = MockServer::start().await;
    let (client, session, navigator) = client_for(&server);
    session.set(Session::new("tok1"));

    Mock::given(method("GET"))
        .and(path("/airline/5"))
        .respond_with(session_invalid("jwt expired"))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/auth/refresh-token"))
        .respond_with(session_invalid("Refresh token unavailable"))
        .expect(1)
        .mount(&server)
        .await;

    let error = client.airline("5").await.unwrap_err();

    assert!(matches!(error, ApiError::SessionTerminated));
    assert_eq!(session.get(), None);
    assert_eq!(navigator.seen(), vec!["/home".to_string()]);
}

#[tokio::test]
async fn business_errors_pass_through_without_refresh() {
    let server = MockServer::start().await;
    let (client, session, _) = client_for(&server);
    session.set(Session::new("tok1"));

    Mock::given(method("GET"))
        .and(path("/airline/5"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({"data": {"message": "Airline not found"}})),
        )
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/auth/refresh-token"))
        .respond_with(session_invalid("jwt expired"))
        .expect(0)
        .mount(&server)
        .await;

    let error = client.airline("5").await.unwrap_err();

    assert_eq!(error.status_code(), Some(404));
    assert_eq!(session.get(), Some(Session::new("tok1")));
}

#[tokio::test]
async fn timeout_surfaces_as_transport_error() {
    let server = MockServer::start().await;
    let session = Arc::new(MemorySessionStore::new());
    let client = ApiClient::with_config(
        Config::new(server.uri()).with_timeout(Duration::from_millis(250)),
    )
    .with_session_store(session.clone());
    session.set(Session::new("tok1"));

    Mock::given(method("GET"))
        .and(path("/profile"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"data": {}}))
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/auth/refresh-token"))
        .respond_with(session_invalid("jwt expired"))
        .expect(0)
        .mount(&server)
        .await;

    let error = client.profile().await.unwrap_err();

    assert!(error.is_timeout(), "expected timeout, got {:?}", error);
    assert_eq!(session.get(), Some(Session::new("tok1")));
}

#[tokio::test]
async fn non_json_error_body_becomes_http_error() {
    let server = MockServer::start().await;
    let (client, _, _) = client_for(&server);

    Mock::given(method("GET"))
        .and(path("/profile"))
        .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
        .mount(&server)
        .await;

    let error = client.profile().await.unwrap_err();

    match error {
        ApiError::Http { status, ref body, .. } => {
            assert_eq!(status, 502);
            assert_eq!(body, "Bad Gateway");
        }
        other => panic!("expected ApiError::Http, got {:?}", other),
    }
}
