//! Validator core: pure form state machine and view-model helpers.
mod effect;
mod msg;
mod state;
mod update;
mod view_model;

pub use effect::{Effect, SubmissionPayload};
pub use msg::{Msg, ValidationOutcome};
pub use state::{
    FormState, RequestId, RequirementsFile, SubmissionState, FAILURE_MESSAGE, PLACEHOLDER_RESULT,
    SUCCESS_FALLBACK,
};
pub use update::update;
pub use view_model::FormViewModel;
