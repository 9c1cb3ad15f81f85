use std::sync::mpsc;
use std::thread;

use validator_core::{Effect, Msg, RequirementsFile, SubmissionPayload, ValidationOutcome};
use validator_engine::{
    EngineCommands, EngineEvent, EngineHandle, RequirementsUpload, ValidationRequest,
};
use validator_logging::{validator_error, validator_info, validator_warn};

use super::app::AppEvent;

pub struct EffectRunner {
    engine: EngineCommands,
    event_tx: mpsc::Sender<AppEvent>,
}

impl EffectRunner {
    pub fn new(engine: EngineHandle, event_tx: mpsc::Sender<AppEvent>) -> Self {
        let (engine, engine_events) = engine.into_parts();
        spawn_event_loop(engine_events, event_tx.clone());
        Self { engine, event_tx }
    }

    pub fn enqueue(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::SubmitValidation {
                    request_id,
                    payload,
                } => {
                    validator_info!(
                        "SubmitValidation request_id={} url_len={} file_len={:?}",
                        request_id,
                        payload.url.len(),
                        payload.requirements.as_ref().map(|file| file.bytes.len())
                    );
                    if !self.engine.submit(request_id, to_request(payload)) {
                        // Settle it here so the form does not stay pending forever.
                        validator_error!("engine stopped; request_id={} dropped", request_id);
                        let _ = self.event_tx.send(AppEvent::Dispatch(Msg::ValidationSettled {
                            request_id,
                            outcome: ValidationOutcome::Failed,
                        }));
                    }
                }
            }
        }
    }
}

/// Forwards engine settlements into the app loop until either side hangs up.
fn spawn_event_loop(engine_events: mpsc::Receiver<EngineEvent>, event_tx: mpsc::Sender<AppEvent>) {
    thread::spawn(move || {
        while let Ok(event) = engine_events.recv() {
            let msg = match event {
                EngineEvent::SubmissionSettled { request_id, result } => {
                    let outcome = match result {
                        Ok(reply) => ValidationOutcome::Accepted {
                            message: reply.message,
                        },
                        Err(failure) => {
                            validator_warn!("request_id={} failed: {}", request_id, failure);
                            ValidationOutcome::Failed
                        }
                    };
                    Msg::ValidationSettled {
                        request_id,
                        outcome,
                    }
                }
            };
            if event_tx.send(AppEvent::Dispatch(msg)).is_err() {
                break;
            }
        }
    });
}

fn to_request(payload: SubmissionPayload) -> ValidationRequest {
    ValidationRequest {
        url: payload.url,
        requirements: payload.requirements.map(to_upload),
    }
}

fn to_upload(file: RequirementsFile) -> RequirementsUpload {
    RequirementsUpload {
        file_name: file.name,
        bytes: file.bytes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;
    use validator_engine::{
        FailureKind, RequestFailure, RequestId, Submitter, ValidationReply,
    };

    struct RecordingSubmitter {
        seen: Mutex<Vec<(RequestId, ValidationRequest)>>,
        fail: bool,
    }

    #[async_trait::async_trait]
    impl Submitter for RecordingSubmitter {
        async fn submit(
            &self,
            request_id: RequestId,
            request: &ValidationRequest,
        ) -> Result<ValidationReply, RequestFailure> {
            self.seen.lock().unwrap().push((request_id, request.clone()));
            if self.fail {
                Err(RequestFailure {
                    kind: FailureKind::HttpStatus(500),
                    message: "500 Internal Server Error".to_string(),
                })
            } else {
                Ok(ValidationReply {
                    status: 200,
                    message: Some("OK: looks valid".to_string()),
                })
            }
        }
    }

    fn runner(fail: bool) -> (EffectRunner, Arc<RecordingSubmitter>, mpsc::Receiver<AppEvent>) {
        let submitter = Arc::new(RecordingSubmitter {
            seen: Mutex::new(Vec::new()),
            fail,
        });
        let engine = EngineHandle::with_submitter(submitter.clone()).unwrap();
        let (tx, rx) = mpsc::channel();
        (EffectRunner::new(engine, tx), submitter, rx)
    }

    #[test]
    fn submit_effect_reaches_engine_and_settles() {
        let (runner, submitter, rx) = runner(false);
        runner.enqueue(vec![Effect::SubmitValidation {
            request_id: 5,
            payload: SubmissionPayload {
                url: String::new(),
                requirements: Some(RequirementsFile::new("reqs.txt", b"abc".to_vec())),
            },
        }]);

        let event = rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert_eq!(
            event,
            AppEvent::Dispatch(Msg::ValidationSettled {
                request_id: 5,
                outcome: ValidationOutcome::Accepted {
                    message: Some("OK: looks valid".to_string()),
                },
            })
        );

        let seen = submitter.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].1.url, "");
        let upload = seen[0].1.requirements.as_ref().unwrap();
        assert_eq!(upload.file_name, "reqs.txt");
        assert_eq!(upload.bytes, b"abc");
    }

    #[test]
    fn failures_collapse_to_failed_outcome() {
        let (runner, _submitter, rx) = runner(true);
        runner.enqueue(vec![Effect::SubmitValidation {
            request_id: 1,
            payload: SubmissionPayload {
                url: "https://github.com/octo/repo".to_string(),
                requirements: None,
            },
        }]);

        let event = rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert_eq!(
            event,
            AppEvent::Dispatch(Msg::ValidationSettled {
                request_id: 1,
                outcome: ValidationOutcome::Failed,
            })
        );
    }

    #[test]
    fn dropping_the_runner_stops_the_engine() {
        let (runner, _submitter, rx) = runner(false);
        drop(runner);

        // The forwarding thread holds the last sender; it only exits once the
        // engine thread has shut down and closed its event channel.
        assert_eq!(
            rx.recv_timeout(Duration::from_secs(5)),
            Err(mpsc::RecvTimeoutError::Disconnected)
        );
    }

    #[test]
    fn no_effects_means_no_requests() {
        let (runner, submitter, rx) = runner(false);
        runner.enqueue(Vec::new());

        assert!(rx.recv_timeout(Duration::from_millis(100)).is_err());
        assert!(submitter.seen.lock().unwrap().is_empty());
    }
}
