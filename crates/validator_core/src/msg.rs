#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User edited the repository URL input.
    UrlChanged(String),
    /// User picked a requirements file, or dismissed the picker (`None`).
    FileChosen(Option<crate::RequirementsFile>),
    /// User pressed Validate.
    SubmitClicked,
    /// The outbound request for `request_id` resolved.
    ValidationSettled {
        request_id: crate::RequestId,
        outcome: ValidationOutcome,
    },
    /// UI/render tick to coalesce rendering.
    Tick,
    /// Fallback for placeholder wiring.
    NoOp,
}

/// What the form learns from a settled request.
///
/// Failure causes are not distinguished here; the engine logs the detail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationOutcome {
    Accepted { message: Option<String> },
    Failed,
}
