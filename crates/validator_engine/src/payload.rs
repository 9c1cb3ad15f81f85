use reqwest::multipart::{Form, Part};

use crate::{FailureKind, RequestFailure, ValidationRequest};

pub const URL_FIELD: &str = "url";
pub const REQUIREMENTS_FIELD: &str = "requirements";

/// Encodes a request as multipart form data.
///
/// The `url` part is always present; `requirements` only when a file was chosen.
pub fn build_form(request: &ValidationRequest) -> Result<Form, RequestFailure> {
    let mut form = Form::new().text(URL_FIELD, request.url.clone());

    if let Some(upload) = &request.requirements {
        let mime = mime_guess::from_path(&upload.file_name).first_or_octet_stream();
        let part = Part::bytes(upload.bytes.clone())
            .file_name(upload.file_name.clone())
            .mime_str(mime.as_ref())
            .map_err(|err| RequestFailure::new(FailureKind::Encoding, err.to_string()))?;
        form = form.part(REQUIREMENTS_FIELD, part);
    }

    Ok(form)
}
