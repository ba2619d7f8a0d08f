//! HTTP backend tests against a local axum server

use agent_console::backend::PollOutcome;
use agent_console::session::{LifecyclePhase, SESSION_EXPIRED_MESSAGE};
use agent_console::{
    AgentConfig, BotState, ConsoleError, ConsoleState, HttpBackend, SessionBackend,
    SessionController, SharedConsoleState,
};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicU16, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;

#[derive(Default)]
struct MockBackend {
    create_status: AtomicU16,
    state_status: AtomicU16,
    state_calls: AtomicUsize,
    last_body: Mutex<Option<Value>>,
    last_state_id: Mutex<Option<String>>,
}

impl MockBackend {
    fn new() -> Arc<Self> {
        let backend = Self::default();
        backend.create_status.store(200, Ordering::SeqCst);
        backend.state_status.store(200, Ordering::SeqCst);
        Arc::new(backend)
    }
}

async fn create_session(
    State(mock): State<Arc<MockBackend>>,
    Json(body): Json<Value>,
) -> Response {
    *mock.last_body.lock().unwrap() = Some(body);
    let status = mock.create_status.load(Ordering::SeqCst);
    if status != 200 {
        return StatusCode::from_u16(status).unwrap().into_response();
    }
    Json(json!({
        "session_id": "abc",
        "room_url": "https://rooms.example/abc",
        "token": "tok-1",
    }))
    .into_response()
}

async fn session_state(
    State(mock): State<Arc<MockBackend>>,
    Path(id): Path<String>,
) -> Response {
    mock.state_calls.fetch_add(1, Ordering::SeqCst);
    *mock.last_state_id.lock().unwrap() = Some(id);
    let status = mock.state_status.load(Ordering::SeqCst);
    if status != 200 {
        return StatusCode::from_u16(status).unwrap().into_response();
    }
    Json(json!({
        "state": "listening",
        "round_trip_latency_ms": 120,
        "error_message": null,
    }))
    .into_response()
}

async fn spawn_backend(mock: Arc<MockBackend>) -> String {
    let app = Router::new()
        .route("/sessions", post(create_session))
        .route("/sessions/{id}/state", get(session_state))
        .route("/health", get(|| async { "ok" }))
        .with_state(mock);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}", addr)
}

fn client(url: &str) -> HttpBackend {
    HttpBackend::new(url, Duration::from_secs(5)).unwrap()
}

/// Wait until `check` holds or give up after two seconds
async fn wait_for(shared: &SharedConsoleState, check: impl Fn(&ConsoleState) -> bool) -> bool {
    for _ in 0..200 {
        if check(&shared.read()) {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    false
}

#[tokio::test]
async fn test_create_session_sends_config_verbatim() {
    let mock = MockBackend::new();
    let url = spawn_backend(Arc::clone(&mock)).await;

    let mut config = AgentConfig::default();
    config.llm.temperature = 1.2;
    config.interruptibility_pct = 40;

    let session = client(&url).create_session(&config).await.unwrap();
    assert_eq!(session.session_id, "abc");
    assert_eq!(session.room_url, "https://rooms.example/abc");
    assert_eq!(session.token, "tok-1");

    let body = mock.last_body.lock().unwrap().clone().unwrap();
    assert_eq!(body["llm"]["temperature"], json!(1.2));
    assert_eq!(body["llm"]["max_tokens"], json!(512));
    assert_eq!(body["stt"]["temperature"], json!(0.0));
    assert_eq!(body["tts"]["speed"], json!(1.0));
    assert_eq!(body["interruptibility_pct"], json!(40));
    assert_eq!(body, serde_json::to_value(&config).unwrap());
}

#[tokio::test]
async fn test_create_session_server_error() {
    let mock = MockBackend::new();
    mock.create_status.store(500, Ordering::SeqCst);
    let url = spawn_backend(mock).await;

    let err = client(&url)
        .create_session(&AgentConfig::default())
        .await
        .unwrap_err();
    assert_eq!(err, ConsoleError::SessionCreate { status: 500 });
}

#[tokio::test]
async fn test_fetch_state_outcomes() {
    let mock = MockBackend::new();
    let url = spawn_backend(Arc::clone(&mock)).await;
    let backend = client(&url);

    match backend.fetch_state("abc").await.unwrap() {
        PollOutcome::State(report) => {
            assert_eq!(report.state, BotState::Listening);
            assert_eq!(report.round_trip_latency_ms, Some(120.0));
            assert!(report.error_message.is_none());
        }
        other => panic!("expected state, got {:?}", other),
    }
    assert_eq!(mock.last_state_id.lock().unwrap().as_deref(), Some("abc"));

    mock.state_status.store(404, Ordering::SeqCst);
    assert_eq!(backend.fetch_state("abc").await.unwrap(), PollOutcome::Expired);

    mock.state_status.store(503, Ordering::SeqCst);
    assert_eq!(
        backend.fetch_state("abc").await.unwrap_err(),
        ConsoleError::StateFetch { status: 503 }
    );
}

#[tokio::test]
async fn test_health_probe() {
    let url = spawn_backend(MockBackend::new()).await;
    assert!(client(&url).health().await.unwrap());
    assert!(client(&format!("{}/", url)).health().await.unwrap());
}

#[tokio::test]
async fn test_unreachable_backend_is_http_error() {
    // Bind then drop to get a port nothing listens on
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = client(&format!("http://{}", addr))
        .health()
        .await
        .unwrap_err();
    assert!(matches!(err, ConsoleError::Http(_)));
    assert!(err.is_recoverable());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_session_runs_until_backend_forgets_it() {
    let mock = MockBackend::new();
    let url = spawn_backend(Arc::clone(&mock)).await;

    let shared = SharedConsoleState::default();
    let controller = SessionController::new(
        shared.clone(),
        Arc::new(client(&url)),
        tokio::runtime::Handle::current(),
        Duration::from_millis(20),
    );

    assert!(controller.start_session());
    assert!(
        wait_for(&shared, |s| s
            .session
            .report
            .as_ref()
            .is_some_and(|r| r.state == BotState::Listening))
        .await
    );
    assert_eq!(shared.read().session.phase(), LifecyclePhase::Active);
    assert_eq!(controller.polling_session().as_deref(), Some("abc"));

    mock.state_status.store(404, Ordering::SeqCst);
    assert!(wait_for(&shared, |s| s.session.phase() == LifecyclePhase::Idle).await);
    {
        let state = shared.read();
        assert_eq!(
            state.session.expiry_message.as_deref(),
            Some(SESSION_EXPIRED_MESSAGE)
        );
        assert_eq!(
            state.session.report.as_ref().map(|r| r.state),
            Some(BotState::Idle)
        );
    }

    // The loop stops on 404
    tokio::time::sleep(Duration::from_millis(60)).await;
    let calls = mock.state_calls.load(Ordering::SeqCst);
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(mock.state_calls.load(Ordering::SeqCst), calls);

    controller.shutdown();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_failed_create_shows_message() {
    let mock = MockBackend::new();
    mock.create_status.store(500, Ordering::SeqCst);
    let url = spawn_backend(Arc::clone(&mock)).await;

    let shared = SharedConsoleState::default();
    let controller = SessionController::new(
        shared.clone(),
        Arc::new(client(&url)),
        tokio::runtime::Handle::current(),
        Duration::from_millis(20),
    );

    controller.start_session();
    assert!(wait_for(&shared, |s| s.session.create_error.is_some()).await);

    let state = shared.read();
    assert_eq!(state.session.phase(), LifecyclePhase::Idle);
    assert_eq!(
        state.session.create_error.as_deref(),
        Some("Failed to start session. Check backend logs.")
    );
    assert_eq!(mock.state_calls.load(Ordering::SeqCst), 0);
}
