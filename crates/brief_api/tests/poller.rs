use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use brief_api::{spawn_status_watch, ApiClient, ApiError, ApiSettings, PollEvent, PollerSettings};
use brief_core::ProjectStatus;
use pretty_assertions::assert_eq;
use tokio::runtime::Handle;
use tokio::sync::mpsc::{self, UnboundedReceiver};
use tokio::time::timeout;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

/// Serves one scripted response per request, then repeats the last one.
struct ScriptedProject {
    responses: Mutex<VecDeque<ResponseTemplate>>,
    fallback: ResponseTemplate,
}

impl ScriptedProject {
    fn new(responses: Vec<ResponseTemplate>, fallback: ResponseTemplate) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            fallback,
        }
    }
}

impl Respond for ScriptedProject {
    fn respond(&self, _request: &Request) -> ResponseTemplate {
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| self.fallback.clone())
    }
}

fn project_body(status: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(
        format!(r#"{{"Id":"p-1","title":"Oak tables","main_keyword":"oak table","status":"{status}"}}"#),
        "application/json",
    )
}

fn failure() -> ResponseTemplate {
    ResponseTemplate::new(500).set_body_string("workflow crashed")
}

async fn mount_script(server: &MockServer, responses: Vec<ResponseTemplate>, fallback: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path("/webhook/api/project"))
        .and(query_param("id", "p-1"))
        .respond_with(ScriptedProject::new(responses, fallback))
        .mount(server)
        .await;
}

fn client(server: &MockServer) -> ApiClient {
    ApiClient::new(ApiSettings {
        base_url: server.uri(),
        webhook_path: "/webhook".to_string(),
        ..ApiSettings::default()
    })
}

fn fast_cadence() -> PollerSettings {
    PollerSettings {
        interval: Duration::from_millis(25),
        max_failures: 5,
    }
}

async fn next_event(rx: &mut UnboundedReceiver<PollEvent>) -> Option<PollEvent> {
    timeout(Duration::from_secs(5), rx.recv())
        .await
        .expect("watch should act within the timeout")
}

fn status_of(event: Option<PollEvent>) -> ProjectStatus {
    match event {
        Some(PollEvent::Snapshot(project)) => project.status,
        other => panic!("expected a snapshot, got {other:?}"),
    }
}

async fn request_count(server: &MockServer) -> usize {
    server.received_requests().await.expect("recording on").len()
}

#[tokio::test]
async fn activation_fetches_immediately() {
    let server = MockServer::start().await;
    mount_script(&server, vec![], project_body("searching")).await;
    let (tx, mut rx) = mpsc::unbounded_channel();

    // An interval this long cannot fire during the test; the snapshot below
    // can only come from the activation fetch.
    let cadence = PollerSettings {
        interval: Duration::from_secs(60),
        max_failures: 5,
    };
    let _handle = spawn_status_watch(
        &Handle::current(),
        client(&server),
        "p-1".to_string(),
        cadence,
        tx,
    );

    assert_eq!(status_of(next_event(&mut rx).await), ProjectStatus::Searching);
    assert_eq!(request_count(&server).await, 1);
}

#[tokio::test]
async fn cancelling_between_ticks_stops_further_fetches() {
    let server = MockServer::start().await;
    mount_script(&server, vec![], project_body("searching")).await;
    let (tx, mut rx) = mpsc::unbounded_channel();

    let handle = spawn_status_watch(
        &Handle::current(),
        client(&server),
        "p-1".to_string(),
        PollerSettings {
            interval: Duration::from_millis(100),
            max_failures: 5,
        },
        tx,
    );

    assert_eq!(status_of(next_event(&mut rx).await), ProjectStatus::Searching);
    handle.cancel();

    assert_eq!(next_event(&mut rx).await, None);
    assert_eq!(request_count(&server).await, 1);
}

#[tokio::test]
async fn scripted_sequence_is_delivered_in_order_and_stops_on_done() {
    let server = MockServer::start().await;
    mount_script(
        &server,
        vec![
            project_body("searching"),
            project_body("analyzing"),
            project_body("done"),
        ],
        project_body("done"),
    )
    .await;
    let (tx, mut rx) = mpsc::unbounded_channel();

    let _handle = spawn_status_watch(
        &Handle::current(),
        client(&server),
        "p-1".to_string(),
        fast_cadence(),
        tx,
    );

    assert_eq!(status_of(next_event(&mut rx).await), ProjectStatus::Searching);
    assert_eq!(status_of(next_event(&mut rx).await), ProjectStatus::Analyzing);
    assert_eq!(status_of(next_event(&mut rx).await), ProjectStatus::Done);

    // The terminal snapshot closed the watch: the channel ends and no
    // further request is issued.
    assert_eq!(next_event(&mut rx).await, None);
    assert_eq!(request_count(&server).await, 3);
}

#[tokio::test]
async fn competitors_found_is_terminal_for_the_watch() {
    let server = MockServer::start().await;
    mount_script(&server, vec![], project_body("competitors_found")).await;
    let (tx, mut rx) = mpsc::unbounded_channel();

    let _handle = spawn_status_watch(
        &Handle::current(),
        client(&server),
        "p-1".to_string(),
        fast_cadence(),
        tx,
    );

    assert_eq!(
        status_of(next_event(&mut rx).await),
        ProjectStatus::CompetitorsFound
    );
    assert_eq!(next_event(&mut rx).await, None);
    assert_eq!(request_count(&server).await, 1);
}

#[tokio::test]
async fn failure_counter_resets_on_success() {
    let server = MockServer::start().await;
    mount_script(
        &server,
        vec![
            failure(),
            failure(),
            project_body("searching"),
            failure(),
            failure(),
            project_body("done"),
        ],
        project_body("done"),
    )
    .await;
    let (tx, mut rx) = mpsc::unbounded_channel();

    let cadence = PollerSettings {
        interval: Duration::from_millis(25),
        max_failures: 3,
    };
    let _handle = spawn_status_watch(
        &Handle::current(),
        client(&server),
        "p-1".to_string(),
        cadence,
        tx,
    );

    // Four failures in total, but never three in a row: the watch survives.
    assert!(matches!(
        next_event(&mut rx).await,
        Some(PollEvent::FetchFailed(ApiError::Status { code: 500, .. }))
    ));
    assert!(matches!(
        next_event(&mut rx).await,
        Some(PollEvent::FetchFailed(_))
    ));
    assert_eq!(status_of(next_event(&mut rx).await), ProjectStatus::Searching);
    assert!(matches!(
        next_event(&mut rx).await,
        Some(PollEvent::FetchFailed(_))
    ));
    assert!(matches!(
        next_event(&mut rx).await,
        Some(PollEvent::FetchFailed(_))
    ));
    assert_eq!(status_of(next_event(&mut rx).await), ProjectStatus::Done);
    assert_eq!(next_event(&mut rx).await, None);
}

#[tokio::test]
async fn abandons_after_max_consecutive_failures() {
    let server = MockServer::start().await;
    mount_script(&server, vec![], failure()).await;
    let (tx, mut rx) = mpsc::unbounded_channel();

    let cadence = PollerSettings {
        interval: Duration::from_millis(25),
        max_failures: 3,
    };
    let _handle = spawn_status_watch(
        &Handle::current(),
        client(&server),
        "p-1".to_string(),
        cadence,
        tx,
    );

    assert!(matches!(
        next_event(&mut rx).await,
        Some(PollEvent::FetchFailed(_))
    ));
    assert!(matches!(
        next_event(&mut rx).await,
        Some(PollEvent::FetchFailed(_))
    ));
    assert_eq!(
        next_event(&mut rx).await,
        Some(PollEvent::Abandoned { failures: 3 })
    );
    assert_eq!(next_event(&mut rx).await, None);
    assert_eq!(request_count(&server).await, 3);
}

#[tokio::test]
async fn cancellation_discards_the_inflight_fetch() {
    let server = MockServer::start().await;
    mount_script(
        &server,
        vec![],
        project_body("searching").set_delay(Duration::from_millis(400)),
    )
    .await;
    let (tx, mut rx) = mpsc::unbounded_channel();

    let handle = spawn_status_watch(
        &Handle::current(),
        client(&server),
        "p-1".to_string(),
        PollerSettings {
            interval: Duration::from_millis(20),
            max_failures: 5,
        },
        tx,
    );

    // Let the first fetch get underway, then cancel while it hangs.
    tokio::time::sleep(Duration::from_millis(60)).await;
    handle.cancel();
    assert!(handle.is_cancelled());
    // Cancelling again is harmless.
    handle.cancel();

    assert_eq!(next_event(&mut rx).await, None);
}

#[tokio::test]
async fn dropping_the_handle_cancels_the_watch() {
    let server = MockServer::start().await;
    mount_script(&server, vec![], project_body("searching")).await;
    let (tx, mut rx) = mpsc::unbounded_channel();

    let handle = spawn_status_watch(
        &Handle::current(),
        client(&server),
        "p-1".to_string(),
        PollerSettings {
            interval: Duration::from_millis(200),
            max_failures: 5,
        },
        tx,
    );
    drop(handle);

    // The token is cancelled before the watch task first runs, so not even
    // the activation fetch goes out.
    assert_eq!(next_event(&mut rx).await, None);
    assert_eq!(request_count(&server).await, 0);
}
