//! HttpRetrievalClient - REST client for the document QA service.
//!
//! Endpoints: `POST /chat`, `GET /tree/{index}`, `GET /indices`.

use crate::viewer::viewer_url;
use async_trait::async_trait;
use docqa_core::config::ClientConfig;
use docqa_core::retrieval::{ChatRequest, ChatResponse, IndexList, RetrievalService};
use docqa_core::ui::DocumentTree;
use docqa_core::{DocqaError, Result};
use reqwest::{Client, StatusCode, Url};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Retrieval service reached over HTTP.
#[derive(Clone)]
pub struct HttpRetrievalClient {
    client: Client,
    base_url: Url,
}

impl HttpRetrievalClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| DocqaError::config(format!("Invalid API base URL '{base_url}': {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(DocqaError::config(format!(
                "'{base_url}' cannot be used as a base URL"
            )));
        }
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DocqaError::config(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self { client, base_url })
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        Self::new(
            &config.api_base_url,
            Duration::from_secs(config.request_timeout_secs),
        )
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                DocqaError::config(format!("'{}' cannot be used as a base URL", self.base_url))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn read_json<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
        what: &str,
    ) -> Result<T> {
        let response = request.send().await.map_err(|err| {
            DocqaError::network(
                None,
                format!("{what} request failed: {err}"),
                err.is_connect() || err.is_timeout(),
            )
        })?;

        if !response.status().is_success() {
            let status = response.status();
            let body_text = response
                .text()
                .await
                .unwrap_or_else(|_| format!("Failed to read {what} error body"));
            return Err(map_http_error(status, body_text));
        }

        response
            .json()
            .await
            .map_err(|err| DocqaError::service(format!("Failed to parse {what} response: {err}")))
    }
}

#[async_trait]
impl RetrievalService for HttpRetrievalClient {
    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse> {
        let url = self.endpoint(&["chat"])?;
        tracing::debug!(
            "[HttpRetrievalClient] POST {} ({} indices, deep={})",
            url,
            request.index_filenames.len(),
            request.use_deep_traversal
        );
        self.read_json(self.client.post(url).json(&request), "chat")
            .await
    }

    async fn fetch_tree(&self, index_filename: &str) -> Result<DocumentTree> {
        let url = self.endpoint(&["tree", index_filename])?;
        tracing::debug!("[HttpRetrievalClient] GET {}", url);
        self.read_json(self.client.get(url), "tree").await
    }

    async fn list_indices(&self) -> Result<Vec<String>> {
        let url = self.endpoint(&["indices"])?;
        tracing::debug!("[HttpRetrievalClient] GET {}", url);
        let list: IndexList = self.read_json(self.client.get(url), "indices").await?;
        Ok(list.into_vec())
    }

    fn document_url(&self, file: &str, page: u32) -> Result<String> {
        Ok(viewer_url(&self.base_url, file, page)?.into())
    }
}

/// Error body shape of the service (`{"detail": ...}`).
#[derive(Deserialize)]
struct ErrorResponse {
    detail: serde_json::Value,
}

fn map_http_error(status: StatusCode, body: String) -> DocqaError {
    let message = match serde_json::from_str::<ErrorResponse>(&body) {
        Ok(ErrorResponse {
            detail: serde_json::Value::String(detail),
        }) => detail,
        Ok(ErrorResponse { detail }) => detail.to_string(),
        Err(_) if body.trim().is_empty() => status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string(),
        Err(_) => body,
    };

    let is_retryable = matches!(
        status,
        StatusCode::TOO_MANY_REQUESTS
            | StatusCode::INTERNAL_SERVER_ERROR
            | StatusCode::BAD_GATEWAY
            | StatusCode::SERVICE_UNAVAILABLE
            | StatusCode::GATEWAY_TIMEOUT
    );

    DocqaError::network(Some(status.as_u16()), message, is_retryable)
}
