use std::fmt;

pub type RequestId = u64;

/// File part of a submission.
#[derive(Clone, PartialEq, Eq)]
pub struct RequirementsUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl fmt::Debug for RequirementsUpload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequirementsUpload")
            .field("file_name", &self.file_name)
            .field("len", &self.bytes.len())
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationRequest {
    pub url: String,
    pub requirements: Option<RequirementsUpload>,
}

/// A 2xx answer from the validation endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReply {
    pub status: u16,
    /// The `message` field, when the body was a JSON object carrying a string there.
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    SubmissionSettled {
        request_id: RequestId,
        result: Result<ValidationReply, RequestFailure>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct RequestFailure {
    pub kind: FailureKind,
    pub message: String,
}

impl RequestFailure {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidEndpoint,
    Encoding,
    HttpStatus(u16),
    Timeout,
    TooLarge { max_bytes: u64, actual: Option<u64> },
    Network,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidEndpoint => write!(f, "invalid endpoint"),
            FailureKind::Encoding => write!(f, "payload encoding error"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::TooLarge { max_bytes, actual } => {
                write!(f, "response too large (max {max_bytes}, actual {actual:?})")
            }
            FailureKind::Network => write!(f, "network error"),
        }
    }
}

/// Startup failures of the engine itself, as opposed to per-request failures.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("failed to build http client: {0}")]
    Client(#[from] reqwest::Error),
    #[error("failed to start engine runtime: {0}")]
    Runtime(#[from] std::io::Error),
}
