//! Validator engine: endpoint configuration, multipart submission and effect execution.
mod config;
mod engine;
mod payload;
mod submit;
mod types;

pub use config::{
    resolve_base_url, validate_endpoint, ConfigError, SubmitSettings, BASE_URL_ENV,
    DEFAULT_BASE_URL, DEFAULT_MAX_RESPONSE_BYTES,
};
pub use engine::{EngineCommands, EngineHandle};
pub use payload::{build_form, REQUIREMENTS_FIELD, URL_FIELD};
pub use submit::{ReqwestSubmitter, Submitter};
pub use types::{
    EngineError, EngineEvent, FailureKind, RequestFailure, RequestId, RequirementsUpload,
    ValidationReply, ValidationRequest,
};
