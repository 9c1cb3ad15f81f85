use futures_util::StreamExt;
use validator_logging::{validator_debug, validator_info, validator_warn};

use crate::payload::build_form;
use crate::{
    EngineError, FailureKind, RequestFailure, RequestId, SubmitSettings, ValidationReply,
    ValidationRequest,
};

#[async_trait::async_trait]
pub trait Submitter: Send + Sync {
    /// Sends one request to the validation endpoint. Never retries.
    async fn submit(
        &self,
        request_id: RequestId,
        request: &ValidationRequest,
    ) -> Result<ValidationReply, RequestFailure>;
}

#[derive(Debug, Clone)]
pub struct ReqwestSubmitter {
    settings: SubmitSettings,
    client: reqwest::Client,
}

impl ReqwestSubmitter {
    pub fn new(settings: SubmitSettings) -> Result<Self, EngineError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = settings.connect_timeout {
            builder = builder.connect_timeout(timeout);
        }
        if let Some(timeout) = settings.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;
        Ok(Self { settings, client })
    }

    async fn read_body(&self, response: reqwest::Response) -> Result<Vec<u8>, RequestFailure> {
        let max_bytes = self.settings.max_response_bytes;
        if let Some(content_len) = response.content_length() {
            if content_len > max_bytes {
                return Err(RequestFailure::new(
                    FailureKind::TooLarge {
                        max_bytes,
                        actual: Some(content_len),
                    },
                    "response too large",
                ));
            }
        }

        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            let next_len = bytes.len() as u64 + chunk.len() as u64;
            if next_len > max_bytes {
                return Err(RequestFailure::new(
                    FailureKind::TooLarge {
                        max_bytes,
                        actual: Some(next_len),
                    },
                    "response too large",
                ));
            }
            bytes.extend_from_slice(&chunk);
        }
        Ok(bytes)
    }
}

#[async_trait::async_trait]
impl Submitter for ReqwestSubmitter {
    async fn submit(
        &self,
        request_id: RequestId,
        request: &ValidationRequest,
    ) -> Result<ValidationReply, RequestFailure> {
        let form = build_form(request)?;
        validator_info!(
            "POST {} request_id={} url_len={} requirements={:?}",
            self.settings.endpoint,
            request_id,
            request.url.len(),
            request
                .requirements
                .as_ref()
                .map(|upload| (upload.file_name.as_str(), upload.bytes.len()))
        );

        let response = self
            .client
            .post(self.settings.endpoint.clone())
            .multipart(form)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(RequestFailure::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }

        let body = self.read_body(response).await?;
        let message = extract_message(&body);
        if message.is_none() {
            validator_debug!(
                "request_id={} returned {} without a string message ({} bytes)",
                request_id,
                status,
                body.len()
            );
        }

        Ok(ValidationReply {
            status: status.as_u16(),
            message,
        })
    }
}

/// Pulls a string `message` out of a JSON object body.
///
/// Non-JSON bodies, non-object JSON and non-string messages count as absent.
fn extract_message(body: &[u8]) -> Option<String> {
    match serde_json::from_slice::<serde_json::Value>(body) {
        Ok(serde_json::Value::Object(fields)) => fields
            .get("message")
            .and_then(serde_json::Value::as_str)
            .map(str::to_owned),
        Ok(_) => None,
        Err(err) => {
            validator_warn!("validation reply is not JSON: {}", err);
            None
        }
    }
}

fn map_reqwest_error(err: reqwest::Error) -> RequestFailure {
    if err.is_timeout() {
        return RequestFailure::new(FailureKind::Timeout, err.to_string());
    }
    if err.is_builder() {
        return RequestFailure::new(FailureKind::InvalidEndpoint, err.to_string());
    }
    RequestFailure::new(FailureKind::Network, err.to_string())
}
