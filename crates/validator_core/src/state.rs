use std::fmt;

use crate::view_model::FormViewModel;
use crate::SubmissionPayload;

pub type RequestId = u64;

/// Shown before the first submission settles.
pub const PLACEHOLDER_RESULT: &str =
    "Submit a repository URL or a requirements file to see the validation report.";
/// Shown when the server answers 2xx without a usable `message`.
pub const SUCCESS_FALLBACK: &str = "Success";
/// Shown for every failed request, whatever the cause.
pub const FAILURE_MESSAGE: &str = "Validation failed or server error.";

/// A user-chosen file, held in memory until submission.
#[derive(Clone, PartialEq, Eq)]
pub struct RequirementsFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl RequirementsFile {
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }
}

// Keep file contents out of debug output; they can be large.
impl fmt::Debug for RequirementsFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequirementsFile")
            .field("name", &self.name)
            .field("len", &self.bytes.len())
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmissionState {
    #[default]
    Idle,
    Pending {
        request_id: RequestId,
    },
    Settled,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormState {
    url: String,
    file: Option<RequirementsFile>,
    result: String,
    submission: SubmissionState,
    next_request_id: RequestId,
    dirty: bool,
}

impl Default for FormState {
    fn default() -> Self {
        Self {
            url: String::new(),
            file: None,
            result: PLACEHOLDER_RESULT.to_string(),
            submission: SubmissionState::Idle,
            next_request_id: 1,
            dirty: false,
        }
    }
}

impl FormState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> FormViewModel {
        let submitting = matches!(self.submission, SubmissionState::Pending { .. });
        FormViewModel {
            url: self.url.clone(),
            file_name: self.file.as_ref().map(|file| file.name.clone()),
            result: self.result.clone(),
            submission: self.submission,
            submitting,
            submit_enabled: !submitting,
            dirty: self.dirty,
        }
    }

    pub fn submission(&self) -> SubmissionState {
        self.submission
    }

    pub fn result(&self) -> &str {
        &self.result
    }

    /// Returns whether a render is due and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn set_url(&mut self, url: String) {
        if self.url != url {
            self.url = url;
            self.dirty = true;
        }
    }

    pub(crate) fn set_file(&mut self, file: Option<RequirementsFile>) {
        if self.file != file {
            self.file = file;
            self.dirty = true;
        }
    }

    /// Moves to `Pending` and returns the request id plus the payload to send.
    ///
    /// Returns `None` while another request is still pending.
    pub(crate) fn begin_submission(&mut self) -> Option<(RequestId, SubmissionPayload)> {
        if matches!(self.submission, SubmissionState::Pending { .. }) {
            return None;
        }
        let request_id = self.next_request_id;
        self.next_request_id += 1;
        self.submission = SubmissionState::Pending { request_id };
        self.dirty = true;
        let payload = SubmissionPayload {
            url: self.url.clone(),
            requirements: self.file.clone(),
        };
        Some((request_id, payload))
    }

    /// Records the displayed result if `request_id` is the one in flight.
    ///
    /// Returns `false` for stale or unknown settlements, which leave the state untouched.
    pub(crate) fn settle(&mut self, request_id: RequestId, result: String) -> bool {
        match self.submission {
            SubmissionState::Pending { request_id: pending } if pending == request_id => {
                self.submission = SubmissionState::Settled;
                self.result = result;
                self.dirty = true;
                true
            }
            _ => false,
        }
    }
}
