use crate::{RequestId, RequirementsFile};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Issue one POST to the validation endpoint.
    SubmitValidation {
        request_id: RequestId,
        payload: SubmissionPayload,
    },
}

/// Multipart body contents, built fresh for every submission.
///
/// `url` is always sent, even when empty; `requirements` only when a file was chosen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionPayload {
    pub url: String,
    pub requirements: Option<RequirementsFile>,
}
