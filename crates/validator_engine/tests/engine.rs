mod common;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use validator_engine::{
    EngineEvent, EngineHandle, FailureKind, RequestFailure, RequestId, SubmitSettings, Submitter,
    ValidationReply, ValidationRequest,
};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::{refused_base, settings_for, url_only};

const WAIT: Duration = Duration::from_secs(10);

fn next_event(engine: &EngineHandle) -> EngineEvent {
    engine.recv_timeout(WAIT).expect("engine event")
}

#[tokio::test]
async fn engine_sends_exactly_one_request_per_submit() {
    validator_logging::initialize_for_tests();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/validate"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "message": "OK: looks valid" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let engine = EngineHandle::new(settings_for(&server)).expect("engine");
    assert!(engine.try_recv().is_none());
    assert!(engine.submit(1, url_only("https://github.com/octo/repo")));

    let event = tokio::task::spawn_blocking(move || next_event(&engine))
        .await
        .expect("join");
    assert_eq!(
        event,
        EngineEvent::SubmissionSettled {
            request_id: 1,
            result: Ok(ValidationReply {
                status: 200,
                message: Some("OK: looks valid".to_string()),
            }),
        }
    );

    server.verify().await;
}

#[tokio::test]
async fn engine_reports_refused_connection() {
    let settings = SubmitSettings::for_base(&refused_base()).expect("settings");
    let engine = EngineHandle::new(settings).expect("engine");
    assert!(engine.submit(4, url_only("")));

    let event = tokio::task::spawn_blocking(move || next_event(&engine))
        .await
        .expect("join");
    match event {
        EngineEvent::SubmissionSettled { request_id, result } => {
            assert_eq!(request_id, 4);
            assert_eq!(result.unwrap_err().kind, FailureKind::Network);
        }
    }
}

struct CountingSubmitter {
    calls: AtomicUsize,
}

#[async_trait::async_trait]
impl Submitter for CountingSubmitter {
    async fn submit(
        &self,
        _request_id: RequestId,
        request: &ValidationRequest,
    ) -> Result<ValidationReply, RequestFailure> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(ValidationReply {
            status: 200,
            message: Some(format!("checked {}", request.url)),
        })
    }
}

#[test]
fn engine_runs_a_custom_submitter() {
    let submitter = Arc::new(CountingSubmitter {
        calls: AtomicUsize::new(0),
    });
    let engine = EngineHandle::with_submitter(submitter.clone()).expect("engine");

    assert!(engine.submit(11, url_only("repo-a")));
    let event = next_event(&engine);
    assert_eq!(
        event,
        EngineEvent::SubmissionSettled {
            request_id: 11,
            result: Ok(ValidationReply {
                status: 200,
                message: Some("checked repo-a".to_string()),
            }),
        }
    );
    assert_eq!(submitter.calls.load(Ordering::SeqCst), 1);
}

#[test]
fn split_handle_delivers_to_a_blocked_reader() {
    let submitter = Arc::new(CountingSubmitter {
        calls: AtomicUsize::new(0),
    });
    let engine = EngineHandle::with_submitter(submitter.clone()).expect("engine");
    let (commands, events) = engine.into_parts();

    let reader = std::thread::spawn(move || events.recv_timeout(WAIT));
    // Submitting from another clone must not wait on the reader.
    let sender = commands.clone();
    assert!(sender.submit(21, url_only("repo-b")));

    let event = reader.join().expect("reader thread").expect("engine event");
    assert_eq!(
        event,
        EngineEvent::SubmissionSettled {
            request_id: 21,
            result: Ok(ValidationReply {
                status: 200,
                message: Some("checked repo-b".to_string()),
            }),
        }
    );
}

#[test]
fn dropping_every_command_sender_closes_the_event_channel() {
    let submitter = Arc::new(CountingSubmitter {
        calls: AtomicUsize::new(0),
    });
    let engine = EngineHandle::with_submitter(submitter).expect("engine");
    let (commands, events) = engine.into_parts();
    drop(commands);

    assert_eq!(
        events.recv_timeout(WAIT),
        Err(std::sync::mpsc::RecvTimeoutError::Disconnected)
    );
}
