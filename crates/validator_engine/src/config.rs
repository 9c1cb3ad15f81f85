use std::time::Duration;

use url::Url;
use validator_logging::validator_warn;

/// Environment variable consulted for the validator base address.
pub const BASE_URL_ENV: &str = "VALIDATOR_BASE_URL";
/// Used when no base address is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";
pub const DEFAULT_MAX_RESPONSE_BYTES: u64 = 16 * 1024 * 1024;

const VALIDATE_PATH: &str = "validate";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid validator base url {value:?}: {message}")]
    InvalidBaseUrl { value: String, message: String },
    #[error("unsupported scheme {scheme:?} in validator base url (expected http or https)")]
    UnsupportedScheme { scheme: String },
}

/// Resolves the configured base address, falling back to [`DEFAULT_BASE_URL`]
/// when the value is missing or blank.
pub fn resolve_base_url(configured: Option<&str>) -> Result<Url, ConfigError> {
    let raw = match configured.map(str::trim).filter(|value| !value.is_empty()) {
        Some(value) => value,
        None => {
            validator_warn!(
                "{} not set; falling back to {}",
                BASE_URL_ENV,
                DEFAULT_BASE_URL
            );
            DEFAULT_BASE_URL
        }
    };

    let url = Url::parse(raw).map_err(|err| ConfigError::InvalidBaseUrl {
        value: raw.to_string(),
        message: err.to_string(),
    })?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ConfigError::UnsupportedScheme {
            scheme: other.to_string(),
        }),
    }
}

/// Appends `/validate` to the base path, keeping any query string intact.
pub fn validate_endpoint(base: &Url) -> Result<Url, ConfigError> {
    if base.cannot_be_a_base() {
        return Err(ConfigError::InvalidBaseUrl {
            value: base.to_string(),
            message: "url cannot be used as a base".to_string(),
        });
    }
    let mut endpoint = base.clone();
    let path = format!("{}/{}", base.path().trim_end_matches('/'), VALIDATE_PATH);
    endpoint.set_path(&path);
    Ok(endpoint)
}

#[derive(Debug, Clone)]
pub struct SubmitSettings {
    pub endpoint: Url,
    /// `None` leaves the connection attempt unbounded.
    pub connect_timeout: Option<Duration>,
    /// `None` leaves the whole request unbounded.
    pub request_timeout: Option<Duration>,
    pub max_response_bytes: u64,
}

impl SubmitSettings {
    pub fn for_base(base: &Url) -> Result<Self, ConfigError> {
        Ok(Self {
            endpoint: validate_endpoint(base)?,
            connect_timeout: None,
            request_timeout: None,
            max_response_bytes: DEFAULT_MAX_RESPONSE_BYTES,
        })
    }
}
