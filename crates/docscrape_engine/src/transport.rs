//! HTTP transport bound to a single backend origin.
//!
//! Two failure channels exist and are kept apart: a non-2xx status becomes
//! [`TransportError::Backend`], while a connection or timeout problem becomes
//! [`TransportError::Unreachable`]. Domain-level `success: false` answers are
//! regular 2xx replies and are left to the caller. No retries are attempted.
use std::time::Duration;

use docscrape_core::{Endpoint, FailureKind, Method};
use futures_util::StreamExt;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use url::Url;

const DETAIL_PREVIEW_CHARS: usize = 200;
const ERROR_BODY_BYTES: u64 = 16 * 1024;

#[derive(Debug, Clone)]
pub struct TransportSettings {
    pub base_url: String,
    pub connect_timeout: Duration,
    /// Whole-request limit. Scrapes drive a real browser on the backend and
    /// can take minutes.
    pub request_timeout: Duration,
    pub max_response_bytes: u64,
}

impl Default for TransportSettings {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8001".to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(600),
            max_response_bytes: 64 * 1024 * 1024,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    #[error("backend returned {status}: {detail}")]
    Backend { status: u16, detail: String },
    #[error("backend unreachable: {0}")]
    Unreachable(String),
    #[error("malformed backend response: {0}")]
    Malformed(String),
    #[error("backend response exceeds {max_bytes} bytes")]
    TooLarge { max_bytes: u64 },
    #[error("invalid backend endpoint: {0}")]
    InvalidEndpoint(String),
}

impl TransportError {
    pub fn failure_kind(&self) -> FailureKind {
        match self {
            TransportError::Backend { status, .. } => FailureKind::BackendStatus(*status),
            TransportError::Unreachable(_) | TransportError::InvalidEndpoint(_) => {
                FailureKind::Unreachable
            }
            TransportError::Malformed(_) | TransportError::TooLarge { .. } => {
                FailureKind::Malformed
            }
        }
    }
}

/// A 2xx reply from the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub status: u16,
    pub body: Vec<u8>,
}

impl Reply {
    pub fn json(status: u16, value: &serde_json::Value) -> Self {
        Self {
            status,
            body: value.to_string().into_bytes(),
        }
    }

    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, TransportError> {
        serde_json::from_slice(&self.body).map_err(|err| TransportError::Malformed(err.to_string()))
    }
}

#[async_trait::async_trait]
pub trait Transport: Send + Sync {
    async fn call(
        &self,
        endpoint: Endpoint,
        payload: Option<serde_json::Value>,
    ) -> Result<Reply, TransportError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    settings: TransportSettings,
    base: Url,
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(settings: TransportSettings) -> Result<Self, TransportError> {
        let base = parse_base_url(&settings.base_url)?;
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| TransportError::Unreachable(err.to_string()))?;
        Ok(Self {
            settings,
            base,
            client,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    fn url_for(&self, endpoint: Endpoint) -> Result<Url, TransportError> {
        self.base
            .join(endpoint.path.trim_start_matches('/'))
            .map_err(|err| TransportError::InvalidEndpoint(format!("{}: {err}", endpoint.path)))
    }

    async fn read_body(&self, response: reqwest::Response) -> Result<Vec<u8>, TransportError> {
        let max_bytes = self.settings.max_response_bytes;
        if response.content_length().is_some_and(|len| len > max_bytes) {
            return Err(TransportError::TooLarge { max_bytes });
        }

        let mut body = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            if body.len() as u64 + chunk.len() as u64 > max_bytes {
                return Err(TransportError::TooLarge { max_bytes });
            }
            body.extend_from_slice(&chunk);
        }
        Ok(body)
    }

    /// Reads at most `ERROR_BODY_BYTES` of an error reply. The status is the
    /// error; the body only feeds the detail text.
    async fn read_error_body(&self, response: reqwest::Response) -> Vec<u8> {
        let limit = ERROR_BODY_BYTES.min(self.settings.max_response_bytes) as usize;
        let mut body = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(Ok(chunk)) = stream.next().await {
            let room = limit - body.len();
            if chunk.len() >= room {
                body.extend_from_slice(&chunk[..room]);
                break;
            }
            body.extend_from_slice(&chunk);
        }
        body
    }
}

#[async_trait::async_trait]
impl Transport for ReqwestTransport {
    async fn call(
        &self,
        endpoint: Endpoint,
        payload: Option<serde_json::Value>,
    ) -> Result<Reply, TransportError> {
        let url = self.url_for(endpoint)?;
        let mut request = match endpoint.method {
            Method::Get => self.client.get(url),
            Method::Post => self.client.post(url),
        }
        .header(ACCEPT, "application/json");
        if let Some(payload) = payload {
            request = request
                .header(CONTENT_TYPE, "application/json")
                .body(payload.to_string());
        }

        let response = request.send().await.map_err(map_reqwest_error)?;
        let status = response.status();
        if !status.is_success() {
            let body = self.read_error_body(response).await;
            return Err(TransportError::Backend {
                status: status.as_u16(),
                detail: extract_detail(&body, status),
            });
        }

        let body = self.read_body(response).await?;
        Ok(Reply {
            status: status.as_u16(),
            body,
        })
    }
}

fn parse_base_url(raw: &str) -> Result<Url, TransportError> {
    let mut base =
        Url::parse(raw.trim()).map_err(|err| TransportError::InvalidEndpoint(format!("{raw}: {err}")))?;
    if !matches!(base.scheme(), "http" | "https") {
        return Err(TransportError::InvalidEndpoint(format!(
            "{raw}: unsupported scheme {}",
            base.scheme()
        )));
    }
    // Joining relative paths must keep any path prefix of the origin.
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    Ok(base)
}

/// FastAPI reports errors as `{"detail": ...}`; fall back to the raw body and
/// then to the status reason.
fn extract_detail(body: &[u8], status: StatusCode) -> String {
    if let Ok(serde_json::Value::Object(map)) = serde_json::from_slice::<serde_json::Value>(body) {
        for key in ["detail", "message"] {
            match map.get(key) {
                Some(serde_json::Value::String(text)) if !text.trim().is_empty() => {
                    return text.clone();
                }
                Some(serde_json::Value::Null) | None => {}
                Some(other) => return other.to_string(),
            }
        }
    }

    let text = String::from_utf8_lossy(body);
    let text = text.trim();
    if !text.is_empty() {
        return text.chars().take(DETAIL_PREVIEW_CHARS).collect();
    }
    status
        .canonical_reason()
        .map(ToOwned::to_owned)
        .unwrap_or_else(|| status.to_string())
}

fn map_reqwest_error(err: reqwest::Error) -> TransportError {
    if err.is_timeout() {
        return TransportError::Unreachable(format!("timed out: {err}"));
    }
    if err.is_decode() {
        return TransportError::Malformed(err.to_string());
    }
    TransportError::Unreachable(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_keeps_path_prefix() {
        let transport = ReqwestTransport::new(TransportSettings {
            base_url: "http://localhost:8001/api".into(),
            ..TransportSettings::default()
        })
        .unwrap();

        let url = transport.url_for(Endpoint::CHECK_AUTH).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8001/api/check-auth");
        let root = transport.url_for(Endpoint::HEALTH).unwrap();
        assert_eq!(root.as_str(), "http://localhost:8001/api/");
    }

    #[test]
    fn rejects_non_http_origin() {
        let err = ReqwestTransport::new(TransportSettings {
            base_url: "ftp://example.com".into(),
            ..TransportSettings::default()
        })
        .unwrap_err();
        assert!(matches!(err, TransportError::InvalidEndpoint(_)));
        assert_eq!(err.failure_kind(), FailureKind::Unreachable);
    }

    #[test]
    fn detail_prefers_fastapi_field_then_body_then_reason() {
        let status = StatusCode::INTERNAL_SERVER_ERROR;
        assert_eq!(extract_detail(br#"{"detail":"driver crashed"}"#, status), "driver crashed");
        assert_eq!(
            extract_detail(br#"{"detail":[{"loc":["body","url"]}]}"#, status),
            r#"[{"loc":["body","url"]}]"#
        );
        assert_eq!(extract_detail(b"  upstream exploded ", status), "upstream exploded");
        assert_eq!(extract_detail(b"", status), "Internal Server Error");
    }
}
