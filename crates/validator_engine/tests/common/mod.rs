#![allow(dead_code)]

use url::Url;
use validator_engine::{RequirementsUpload, SubmitSettings, ValidationRequest};
use wiremock::MockServer;

pub fn settings_for(server: &MockServer) -> SubmitSettings {
    let base = Url::parse(&server.uri()).expect("mock server uri");
    SubmitSettings::for_base(&base).expect("settings")
}

/// A base address nothing listens on.
pub fn refused_base() -> Url {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().expect("local addr").port();
    drop(listener);
    Url::parse(&format!("http://127.0.0.1:{port}")).expect("url")
}

pub fn url_only(url: &str) -> ValidationRequest {
    ValidationRequest {
        url: url.to_string(),
        requirements: None,
    }
}

pub fn with_file(url: &str, file_name: &str, bytes: &[u8]) -> ValidationRequest {
    ValidationRequest {
        url: url.to_string(),
        requirements: Some(RequirementsUpload {
            file_name: file_name.to_string(),
            bytes: bytes.to_vec(),
        }),
    }
}

/// Header block of the multipart section for field `name`, if present.
pub fn part_headers(body: &str, name: &str) -> Option<String> {
    let marker = format!("name=\"{name}\"");
    let start = body.find(&marker)?;
    let line_start = body[..start].rfind("\r\n").map_or(0, |idx| idx + 2);
    let end = body[start..].find("\r\n\r\n")? + start;
    Some(body[line_start..end].to_string())
}

/// Value of the multipart section for field `name`, if present.
pub fn part_value(body: &str, name: &str) -> Option<String> {
    let marker = format!("name=\"{name}\"");
    let start = body.find(&marker)?;
    let value_start = body[start..].find("\r\n\r\n")? + start + 4;
    let value_end = body[value_start..].find("\r\n--")? + value_start;
    Some(body[value_start..value_end].to_string())
}
