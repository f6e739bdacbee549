//! Shared HTTP plumbing for both API clients.
//!
//! Single attempt per call — the pipeline is best-effort batch work and
//! carries no retry policy. Status classification and JSON parsing live
//! here so the adapters stay thin.

use std::time::Duration;

use crate::error::ClientError;

pub(crate) const USER_AGENT: &str = concat!("mailbridge/", env!("CARGO_PKG_VERSION"));

pub(crate) fn build_http(timeout: Duration) -> reqwest::blocking::Client {
    reqwest::blocking::Client::builder()
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .build()
        .expect("failed to build HTTP client")
}

/// Send a request, classify the status, and parse the body as JSON.
pub(crate) fn send_json(
    req: reqwest::blocking::RequestBuilder,
    source: &str,
) -> Result<serde_json::Value, ClientError> {
    let resp = send_checked(req, source)?;
    resp.json()
        .map_err(|e| ClientError::Parse(format!("{source}: invalid JSON response: {e}")))
}

/// Send a request, classify the status, and return the body as text.
pub(crate) fn send_text(
    req: reqwest::blocking::RequestBuilder,
    source: &str,
) -> Result<String, ClientError> {
    let resp = send_checked(req, source)?;
    resp.text()
        .map_err(|e| ClientError::Network(format!("{source}: failed to read body: {e}")))
}

fn send_checked(
    req: reqwest::blocking::RequestBuilder,
    source: &str,
) -> Result<reqwest::blocking::Response, ClientError> {
    let resp = req
        .send()
        .map_err(|e| ClientError::Network(format!("{source}: {e}")))?;

    let status = resp.status().as_u16();
    if !resp.status().is_success() {
        let body = resp.text().unwrap_or_default();
        let msg = extract_message(&body).unwrap_or(body);
        return Err(ClientError::Http(status, format!("{source}: {msg}")));
    }

    Ok(resp)
}

/// Pull a human-readable message out of a JSON error body, if there is one.
fn extract_message(body: &str) -> Option<String> {
    let json: serde_json::Value = serde_json::from_str(body).ok()?;
    json["message"]
        .as_str()
        .or_else(|| json["error"].as_str())
        .or_else(|| json["error"]["message"].as_str())
        .map(String::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extract_message_flat() {
        assert_eq!(
            extract_message(r#"{"message":"Key not found"}"#).as_deref(),
            Some("Key not found"),
        );
    }

    #[test]
    fn extract_message_nested() {
        assert_eq!(
            extract_message(r#"{"error":{"message":"bad id"}}"#).as_deref(),
            Some("bad id"),
        );
    }

    #[test]
    fn extract_message_non_json() {
        assert!(extract_message("<html>gateway timeout</html>").is_none());
    }
}
