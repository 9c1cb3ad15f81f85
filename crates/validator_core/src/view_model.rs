use crate::SubmissionState;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FormViewModel {
    pub url: String,
    pub file_name: Option<String>,
    /// Raw text or markdown, rendered by the front end.
    pub result: String,
    pub submission: SubmissionState,
    pub submitting: bool,
    pub submit_enabled: bool,
    pub dirty: bool,
}
