//! HttpRagBackend - REST implementation of [`RagBackend`].
//!
//! Talks JSON to `/documents`, `/query` and `/health`, and multipart to
//! `/upload`. Every failure is mapped into [`FinragError`]; nothing here
//! panics on a bad response.

use async_trait::async_trait;
use finrag_core::backend::{
    DocumentListResponse, FileSelection, HealthReport, QueryAnswer, QueryRequest, QueryResponse,
    RagBackend, UploadReceipt, UploadResponse,
};
use finrag_core::config::ClientConfig;
use finrag_core::document::DocumentEntry;
use finrag_core::error::{FinragError, Result};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Backend client over HTTP.
#[derive(Clone)]
pub struct HttpRagBackend {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl HttpRagBackend {
    /// Creates a client for `base_url` with the given request timeout.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FinragError::config(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self::with_client(client, base_url, timeout))
    }

    /// Wraps an already configured client. `timeout` is only used to report
    /// [`FinragError::Timeout`]; the client's own timeout governs requests.
    pub fn with_client(client: Client, base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout,
        }
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        Self::new(config.normalized_base_url(), config.request_timeout())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn map_send_error(&self, err: reqwest::Error) -> FinragError {
        if err.is_timeout() {
            FinragError::Timeout {
                seconds: self.timeout.as_secs(),
            }
        } else if err.is_decode() {
            FinragError::Decode(err.to_string())
        } else {
            FinragError::transport(err.to_string())
        }
    }

    /// Reads the body and decodes it as `T`, mapping non-2xx statuses first.
    async fn decode<T: DeserializeOwned>(&self, response: Response) -> Result<T> {
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|err| self.map_send_error(err))?;

        if !status.is_success() {
            return Err(map_http_error(status, &body));
        }

        serde_json::from_str(&body).map_err(|err| {
            FinragError::Decode(format!("Failed to parse backend response: {err}"))
        })
    }
}

#[async_trait]
impl RagBackend for HttpRagBackend {
    async fn list_documents(&self) -> Result<Vec<DocumentEntry>> {
        let url = self.url("documents");
        tracing::debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|err| self.map_send_error(err))?;

        let parsed: DocumentListResponse = self.decode(response).await?;
        parsed.into_documents()
    }

    async fn query(&self, request: &QueryRequest) -> Result<QueryAnswer> {
        let url = self.url("query");
        tracing::debug!(
            symbol = %request.symbol,
            scoped = request.document_ids.is_some(),
            "POST {}",
            url
        );

        let response = self
            .client
            .post(url)
            .json(request)
            .send()
            .await
            .map_err(|err| self.map_send_error(err))?;

        let parsed: QueryResponse = self.decode(response).await?;
        parsed.into_answer()
    }

    async fn upload(&self, file: FileSelection) -> Result<UploadReceipt> {
        let url = self.url("upload");
        tracing::debug!(file = %file.name, bytes = file.bytes.len(), "POST {}", url);

        let part = Part::bytes(file.bytes)
            .file_name(file.name)
            .mime_str(&file.mime_type)
            .map_err(|err| FinragError::transport(format!("Invalid mime type: {err}")))?;
        let form = Form::new().part("file", part);

        let response = self
            .client
            .post(url)
            .multipart(form)
            .send()
            .await
            .map_err(|err| self.map_send_error(err))?;

        let parsed: UploadResponse = self.decode(response).await?;
        parsed.into_receipt()
    }

    async fn health(&self) -> Result<HealthReport> {
        let url = self.url("health");
        tracing::debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|err| self.map_send_error(err))?;

        self.decode(response).await
    }
}

/// FastAPI error body: `{"detail": "..."}`.
#[derive(Deserialize)]
struct ErrorDetail {
    detail: serde_json::Value,
}

fn map_http_error(status: StatusCode, body: &str) -> FinragError {
    let message = serde_json::from_str::<ErrorDetail>(body)
        .map(|wrapper| match wrapper.detail {
            serde_json::Value::String(text) => text,
            other => other.to_string(),
        })
        .unwrap_or_else(|_| body.trim().to_string());

    FinragError::Http {
        status: status.as_u16(),
        message,
    }
}
