use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use validator_logging::{validator_debug, validator_info};

use crate::submit::{ReqwestSubmitter, Submitter};
use crate::{EngineError, EngineEvent, RequestId, SubmitSettings, ValidationRequest};

enum EngineCommand {
    Submit {
        request_id: RequestId,
        request: ValidationRequest,
    },
}

/// Sending half of an engine. The engine thread and its runtime stop once
/// every clone has been dropped.
#[derive(Clone)]
pub struct EngineCommands {
    cmd_tx: mpsc::Sender<EngineCommand>,
}

impl EngineCommands {
    /// Queues one submission. Returns `false` if the engine thread is gone.
    pub fn submit(&self, request_id: RequestId, request: ValidationRequest) -> bool {
        self.cmd_tx
            .send(EngineCommand::Submit {
                request_id,
                request,
            })
            .is_ok()
    }
}

/// Runs submissions on a background Tokio runtime and reports settlements over a channel.
pub struct EngineHandle {
    commands: EngineCommands,
    event_rx: mpsc::Receiver<EngineEvent>,
}

impl EngineHandle {
    pub fn new(settings: SubmitSettings) -> Result<Self, EngineError> {
        let submitter = ReqwestSubmitter::new(settings)?;
        Self::with_submitter(Arc::new(submitter))
    }

    pub fn with_submitter(submitter: Arc<dyn Submitter>) -> Result<Self, EngineError> {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .thread_name("validator-engine-worker")
            .build()?;

        thread::Builder::new()
            .name("validator-engine".to_string())
            .spawn(move || {
                while let Ok(command) = cmd_rx.recv() {
                    let submitter = submitter.clone();
                    let event_tx = event_tx.clone();
                    runtime.spawn(async move {
                        handle_command(submitter.as_ref(), command, event_tx).await;
                    });
                }
                validator_info!("engine command channel closed; shutting down runtime");
            })?;

        Ok(Self {
            commands: EngineCommands { cmd_tx },
            event_rx,
        })
    }

    /// Queues one submission. Returns `false` if the engine thread is gone.
    pub fn submit(&self, request_id: RequestId, request: ValidationRequest) -> bool {
        self.commands.submit(request_id, request)
    }

    /// Blocks until the next event. Returns `None` once the engine has shut down.
    pub fn recv(&self) -> Option<EngineEvent> {
        self.event_rx.recv().ok()
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineEvent> {
        self.event_rx.recv_timeout(timeout).ok()
    }

    /// Splits the handle so submissions and events can live on different threads.
    pub fn into_parts(self) -> (EngineCommands, mpsc::Receiver<EngineEvent>) {
        (self.commands, self.event_rx)
    }
}

async fn handle_command(
    submitter: &dyn Submitter,
    command: EngineCommand,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    match command {
        EngineCommand::Submit {
            request_id,
            request,
        } => {
            let result = submitter.submit(request_id, &request).await;
            validator_debug!("request_id={} settled ok={}", request_id, result.is_ok());
            let _ = event_tx.send(EngineEvent::SubmissionSettled { request_id, result });
        }
    }
}
