use axum::http::StatusCode;
use serde_json::Value;

use crate::error::AppError;

// The web provider only accepts requests that look like they come from a
// browser; it rejects bare client UAs and standard JSON content types.
const WEB_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";
const WEB_CONTENT_TYPE: &str = "application/json+protobuf";
const WEB_CLIENT_HINTS: &[(&str, &str)] = &[
    (
        "sec-ch-ua",
        "\"Google Chrome\";v=\"131\", \"Chromium\";v=\"131\", \"Not_A Brand\";v=\"24\"",
    ),
    ("sec-ch-ua-mobile", "?0"),
    ("sec-ch-ua-platform", "\"Windows\""),
];

const WEB_TIMEOUT_MS: u64 = 30_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpstreamErrorKind {
    Network,
    Http,
}

impl UpstreamErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            UpstreamErrorKind::Network => "network",
            UpstreamErrorKind::Http => "http",
        }
    }
}

#[derive(Debug, Clone, thiserror::Error)]
#[error("{message}")]
pub struct UpstreamCallError {
    pub kind: UpstreamErrorKind,
    pub status: Option<StatusCode>,
    pub message: String,
}

impl UpstreamCallError {
    pub fn new(kind: UpstreamErrorKind, status: Option<StatusCode>, message: String) -> Self {
        Self {
            kind,
            status,
            message,
        }
    }
}

impl From<UpstreamCallError> for AppError {
    fn from(err: UpstreamCallError) -> Self {
        match err.kind {
            UpstreamErrorKind::Network => AppError::upstream_unreachable(err.message),
            UpstreamErrorKind::Http => {
                AppError::new(StatusCode::BAD_GATEWAY, "upstream_status", err.message)
            }
        }
    }
}

/// Opens the streaming chat call and hands back the raw response for the
/// relay to consume. A non-success status is surfaced here, body included,
/// so the relay never starts on a failed exchange.
pub async fn call_chat_stream(
    client: &reqwest::Client,
    url: &str,
    api_key: &str,
    body: &Value,
) -> Result<reqwest::Response, UpstreamCallError> {
    let resp = client
        .post(url)
        .bearer_auth(api_key)
        .json(body)
        .send()
        .await
        .map_err(|err| UpstreamCallError::new(UpstreamErrorKind::Network, None, err.to_string()))?;
    let status = resp.status();
    if !status.is_success() {
        let text = resp.text().await.unwrap_or_default();
        return Err(UpstreamCallError::new(
            UpstreamErrorKind::Http,
            Some(status),
            format!("upstream status {}: {}", status, text),
        ));
    }
    Ok(resp)
}

/// Single-shot web translation call. Returns the raw body text; the caller
/// owns decoding so a shape mismatch can be reported with the body intact.
pub async fn call_web_translate(
    client: &reqwest::Client,
    url: &str,
    api_key: &str,
    body: String,
) -> Result<String, UpstreamCallError> {
    let mut req = client
        .post(url)
        .timeout(std::time::Duration::from_millis(WEB_TIMEOUT_MS))
        .header("content-type", WEB_CONTENT_TYPE)
        .header("x-goog-api-key", api_key)
        .header("user-agent", WEB_USER_AGENT)
        .body(body);
    for (k, v) in WEB_CLIENT_HINTS {
        req = req.header(*k, *v);
    }
    let resp = req
        .send()
        .await
        .map_err(|err| UpstreamCallError::new(UpstreamErrorKind::Network, None, err.to_string()))?;
    let status = resp.status();
    let text = resp.text().await.map_err(|err| {
        UpstreamCallError::new(UpstreamErrorKind::Network, Some(status), err.to_string())
    })?;
    if !status.is_success() {
        return Err(UpstreamCallError::new(
            UpstreamErrorKind::Http,
            Some(status),
            format!("upstream status {}: {}", status, text),
        ));
    }
    Ok(text)
}
