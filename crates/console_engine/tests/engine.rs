use std::time::{Duration, Instant};

use console_engine::{ClientSettings, EngineEvent, EngineHandle, ExecutionStatus, TaskQuery};
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const WAIT: Duration = Duration::from_secs(3);

fn engine_for(server: &MockServer) -> EngineHandle {
    EngineHandle::new(ClientSettings::new(server.uri())).expect("engine")
}

fn page(page: u32) -> TaskQuery {
    TaskQuery {
        page,
        page_size: 15,
        filter: None,
    }
}

fn drain_for(engine: &EngineHandle, window: Duration) -> Vec<EngineEvent> {
    let deadline = Instant::now() + window;
    let mut events = Vec::new();
    while let Some(remaining) = deadline.checked_duration_since(Instant::now()) {
        match engine.recv_timeout(remaining) {
            Some(event) => events.push(event),
            None => break,
        }
    }
    events
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn execution_fetch_is_tagged_with_request_id() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/replication/executions/42"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "id": 42, "status": "InProgress" })),
        )
        .mount(&server)
        .await;

    let engine = engine_for(&server);
    engine.fetch_execution(5, 42);

    match engine.recv_timeout(WAIT) {
        Some(EngineEvent::ExecutionFetched { request_id, result }) => {
            assert_eq!(request_id, 5);
            assert_eq!(result.unwrap().status, ExecutionStatus::InProgress);
        }
        other => panic!("unexpected event: {other:?}"),
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn superseded_task_fetch_never_reports() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/replication/executions/42/tasks"))
        .and(query_param("page", "2"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(400))
                .set_body_json(json!([{ "id": 2, "status": "Pending" }])),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/replication/executions/42/tasks"))
        .and(query_param("page", "1"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("X-Total-Count", "16")
                .set_body_json(json!([{ "id": 1, "status": "Pending" }])),
        )
        .mount(&server)
        .await;

    let engine = engine_for(&server);
    engine.fetch_tasks(1, 42, page(2));
    engine.fetch_tasks(2, 42, page(1));

    let events = drain_for(&engine, Duration::from_millis(1200));
    assert_eq!(events.len(), 1, "only the latest fetch reports: {events:?}");
    match &events[0] {
        EngineEvent::TasksFetched { request_id, result } => {
            assert_eq!(*request_id, 2);
            let page = result.as_ref().unwrap();
            assert_eq!(page.tasks[0].id, 1);
            assert_eq!(page.total_count, Some(16));
        }
        other => panic!("unexpected event: {other:?}"),
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn failed_stop_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/api/replication/executions/42"))
        .respond_with(ResponseTemplate::new(403).set_body_string("forbidden"))
        .mount(&server)
        .await;

    let engine = engine_for(&server);
    engine.stop_execution(42);

    match engine.recv_timeout(WAIT) {
        Some(EngineEvent::ExecutionStopped {
            execution_id,
            result,
        }) => {
            assert_eq!(execution_id, 42);
            assert_eq!(result.unwrap_err().status(), Some(403));
        }
        other => panic!("unexpected event: {other:?}"),
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn project_lookup_echoes_query() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/projects"))
        .and(query_param("name", "lib"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([{ "project_id": 1, "name": "library" }])),
        )
        .mount(&server)
        .await;

    let engine = engine_for(&server);
    engine.lookup_projects("lib");

    match engine.recv_timeout(WAIT) {
        Some(EngineEvent::ProjectsFetched { query, result }) => {
            assert_eq!(query, "lib");
            assert_eq!(result.unwrap()[0].name, "library");
        }
        other => panic!("unexpected event: {other:?}"),
    }
}

#[test]
fn polling_runs_once_and_stops_on_cancel() {
    let engine = EngineHandle::new(ClientSettings::new("http://127.0.0.1:9")).unwrap();
    engine.start_polling(42, Duration::from_millis(50));
    engine.start_polling(42, Duration::from_millis(50));

    let ticks = drain_for(&engine, Duration::from_millis(280));
    assert!(
        (2..=6).contains(&ticks.len()),
        "one timer expected, got {} ticks",
        ticks.len()
    );
    assert!(ticks
        .iter()
        .all(|event| *event == EngineEvent::PollTick { execution_id: 42 }));

    engine.cancel_polling();
    std::thread::sleep(Duration::from_millis(100));
    while engine.try_recv().is_some() {}
    assert!(drain_for(&engine, Duration::from_millis(250)).is_empty());
}

#[test]
fn shutdown_is_idempotent() {
    let mut engine = EngineHandle::new(ClientSettings::new("http://127.0.0.1:9")).unwrap();
    engine.start_polling(1, Duration::from_millis(10));
    engine.shutdown();
    engine.shutdown();
    while engine.try_recv().is_some() {}
    engine.fetch_execution(1, 1);
    assert!(engine.recv_timeout(Duration::from_millis(100)).is_none());
}
