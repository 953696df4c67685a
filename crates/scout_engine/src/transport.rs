use std::time::Duration;

use futures_util::StreamExt;
use reqwest::header::CONTENT_TYPE;
use scout_core::RequestError;
use scout_logging::scout_debug;
use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::{
    ContributorsResponse, EngineError, HealthStatus, RecommendationsResponse,
    SuggestionsResponse, UserProfile,
};

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000";

#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub base_url: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    /// Larger response bodies are rejected as transport errors.
    pub max_body_bytes: u64,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE_URL.to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            max_body_bytes: 5 * 1024 * 1024,
        }
    }
}

/// Backend calls. Every call resolves to `Err(RequestError::Cancelled)` as
/// soon as `cancel` fires.
#[async_trait::async_trait]
pub trait Transport: Send + Sync {
    async fn health(&self, cancel: &CancellationToken) -> Result<HealthStatus, RequestError>;

    async fn contributors(
        &self,
        owner: &str,
        repo: &str,
        limit: u32,
        cancel: &CancellationToken,
    ) -> Result<ContributorsResponse, RequestError>;

    async fn suggestions(
        &self,
        query: &str,
        limit: u32,
        cancel: &CancellationToken,
    ) -> Result<SuggestionsResponse, RequestError>;

    async fn recommendations(
        &self,
        query: &str,
        limit: u32,
        cancel: &CancellationToken,
    ) -> Result<RecommendationsResponse, RequestError>;

    async fn profile(
        &self,
        username: &str,
        cancel: &CancellationToken,
    ) -> Result<UserProfile, RequestError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
    base_url: Url,
    max_body_bytes: u64,
}

impl ReqwestTransport {
    pub fn new(settings: ClientSettings) -> Result<Self, EngineError> {
        let base_url = Url::parse(&settings.base_url)
            .map_err(|err| EngineError::InvalidBaseUrl(format!("{}: {err}", settings.base_url)))?;
        if base_url.cannot_be_a_base() {
            return Err(EngineError::InvalidBaseUrl(settings.base_url));
        }
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| EngineError::Client(err.to_string()))?;
        Ok(Self {
            client,
            base_url,
            max_body_bytes: settings.max_body_bytes,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, RequestError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| RequestError::Transport("base url cannot carry a path".to_string()))?
            .pop_if_empty()
            .push("api")
            .extend(segments);
        Ok(url)
    }

    async fn send<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
        cancel: &CancellationToken,
    ) -> Result<T, RequestError> {
        let exchange = async {
            let response = request.send().await.map_err(map_reqwest_error)?;
            let status = response.status();
            let body = self.read_body(response).await?;
            if !status.is_success() {
                return Err(RequestError::Remote {
                    status: status.as_u16(),
                    detail: extract_detail(&body),
                });
            }
            serde_json::from_slice(&body)
                .map_err(|err| RequestError::Transport(format!("invalid response body: {err}")))
        };

        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                scout_debug!("request aborted by cancellation");
                Err(RequestError::Cancelled)
            }
            result = exchange => result,
        }
    }

    async fn read_body(&self, response: reqwest::Response) -> Result<Vec<u8>, RequestError> {
        if let Some(content_len) = response.content_length() {
            if content_len > self.max_body_bytes {
                return Err(self.too_large(content_len));
            }
        }
        let mut body = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            let next_len = body.len() as u64 + chunk.len() as u64;
            if next_len > self.max_body_bytes {
                return Err(self.too_large(next_len));
            }
            body.extend_from_slice(&chunk);
        }
        Ok(body)
    }

    fn too_large(&self, len: u64) -> RequestError {
        RequestError::Transport(format!(
            "response body of {len} bytes exceeds {} bytes",
            self.max_body_bytes
        ))
    }
}

#[async_trait::async_trait]
impl Transport for ReqwestTransport {
    async fn health(&self, cancel: &CancellationToken) -> Result<HealthStatus, RequestError> {
        let url = self.endpoint(&["health"])?;
        self.send(self.client.get(url), cancel).await
    }

    async fn contributors(
        &self,
        owner: &str,
        repo: &str,
        limit: u32,
        cancel: &CancellationToken,
    ) -> Result<ContributorsResponse, RequestError> {
        let mut url = self.endpoint(&["contributors", owner, repo])?;
        url.query_pairs_mut()
            .append_pair("limit", &limit.to_string());
        self.send(self.client.get(url), cancel).await
    }

    async fn suggestions(
        &self,
        query: &str,
        limit: u32,
        cancel: &CancellationToken,
    ) -> Result<SuggestionsResponse, RequestError> {
        let mut url = self.endpoint(&["suggestions"])?;
        url.query_pairs_mut()
            .append_pair("q", query)
            .append_pair("limit", &limit.to_string());
        self.send(self.client.get(url), cancel).await
    }

    async fn recommendations(
        &self,
        query: &str,
        limit: u32,
        cancel: &CancellationToken,
    ) -> Result<RecommendationsResponse, RequestError> {
        let url = self.endpoint(&["recommendations"])?;
        let body = serde_json::json!({ "query": query, "limit": limit }).to_string();
        let request = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .body(body);
        self.send(request, cancel).await
    }

    async fn profile(
        &self,
        username: &str,
        cancel: &CancellationToken,
    ) -> Result<UserProfile, RequestError> {
        let url = self.endpoint(&["profile", username])?;
        self.send(self.client.get(url), cancel).await
    }
}

fn map_reqwest_error(err: reqwest::Error) -> RequestError {
    if err.is_timeout() {
        return RequestError::Timeout;
    }
    RequestError::Transport(err.to_string())
}

/// Pulls the `detail` string out of an error body, if there is one.
fn extract_detail(body: &[u8]) -> Option<String> {
    let value: serde_json::Value = serde_json::from_slice(body).ok()?;
    value
        .get("detail")
        .and_then(serde_json::Value::as_str)
        .map(str::trim)
        .filter(|detail| !detail.is_empty())
        .map(ToOwned::to_owned)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_keeps_base_path_and_escapes_segments() {
        let transport = ReqwestTransport::new(ClientSettings {
            base_url: "http://example.com/scout/".to_string(),
            ..ClientSettings::default()
        })
        .unwrap();
        let url = transport.endpoint(&["profile", "a b"]).unwrap();
        assert_eq!(url.as_str(), "http://example.com/scout/api/profile/a%20b");
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let err = ReqwestTransport::new(ClientSettings {
            base_url: "not a url".to_string(),
            ..ClientSettings::default()
        })
        .unwrap_err();
        assert!(matches!(err, EngineError::InvalidBaseUrl(_)));
    }

    #[test]
    fn detail_is_read_from_json_bodies_only() {
        assert_eq!(
            extract_detail(br#"{"detail": " not found "}"#).as_deref(),
            Some("not found")
        );
        assert_eq!(extract_detail(br#"{"detail": [{"loc": "q"}]}"#), None);
        assert_eq!(extract_detail(b"<html>"), None);
    }
}
