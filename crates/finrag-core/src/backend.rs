//! Boundary to the remote question-answering service.
//!
//! [`RagBackend`] is the seam between the session controller and the
//! transport. The wire types in this module mirror the backend's JSON bodies
//! and know how to turn themselves into domain results, so every backend
//! implementation interprets `success` flags and missing fields the same way.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::document::DocumentEntry;
use crate::error::{FinragError, Result};

/// Remote operations the client depends on.
#[async_trait]
pub trait RagBackend: Send + Sync {
    /// `GET /documents`
    async fn list_documents(&self) -> Result<Vec<DocumentEntry>>;

    /// `POST /query`
    async fn query(&self, request: &QueryRequest) -> Result<QueryAnswer>;

    /// `POST /upload` (multipart, field `file`)
    async fn upload(&self, file: FileSelection) -> Result<UploadReceipt>;

    /// `GET /health`
    async fn health(&self) -> Result<HealthReport>;
}

/// Body of `POST /query`.
///
/// `document_ids` is serialized as `null` (never omitted) when nothing is
/// selected; that is how the backend chooses live data over documents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryRequest {
    pub question: String,
    pub symbol: String,
    pub document_ids: Option<Vec<String>>,
}

/// Body returned by `POST /query`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct QueryResponse {
    #[serde(default)]
    pub answer: Option<String>,
    #[serde(default)]
    pub route_taken: Option<String>,
    #[serde(default)]
    pub success: Option<bool>,
}

/// A successful answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryAnswer {
    pub answer: String,
    pub route: Option<String>,
}

impl QueryResponse {
    /// A response without `answer` or with `success: false` is a failure.
    pub fn into_answer(self) -> Result<QueryAnswer> {
        if self.success == Some(false) {
            return Err(FinragError::backend(
                self.answer
                    .unwrap_or_else(|| "Query reported failure".to_string()),
            ));
        }
        let answer = self.answer.ok_or(FinragError::MissingField("answer"))?;
        Ok(QueryAnswer {
            answer,
            route: self.route_taken,
        })
    }
}

/// Body returned by `GET /documents`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DocumentListResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub documents: Option<Vec<DocumentEntry>>,
    #[serde(default)]
    pub error: Option<String>,
}

impl DocumentListResponse {
    /// An absent `documents` field on success means an empty list.
    pub fn into_documents(self) -> Result<Vec<DocumentEntry>> {
        if self.success {
            Ok(self.documents.unwrap_or_default())
        } else {
            Err(FinragError::backend(
                self.error
                    .unwrap_or_else(|| "Document listing reported failure".to_string()),
            ))
        }
    }
}

/// Body returned by `POST /upload`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UploadResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub document_id: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Confirmation of a stored upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadReceipt {
    pub document_id: String,
    pub message: Option<String>,
}

impl UploadResponse {
    pub fn into_receipt(self) -> Result<UploadReceipt> {
        if !self.success {
            return Err(FinragError::backend(
                self.message.unwrap_or_else(|| "Upload failed".to_string()),
            ));
        }
        let document_id = self
            .document_id
            .ok_or(FinragError::MissingField("document_id"))?;
        Ok(UploadReceipt {
            document_id,
            message: self.message,
        })
    }
}

/// Body returned by `GET /health`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HealthReport {
    pub status: String,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl HealthReport {
    pub fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}

/// A file picked by the user for upload.
#[derive(Clone, PartialEq, Eq)]
pub struct FileSelection {
    /// Display name, also sent as the multipart file name.
    pub name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl FileSelection {
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            bytes,
        }
    }
}

impl std::fmt::Debug for FileSelection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileSelection")
            .field("name", &self.name)
            .field("mime_type", &self.mime_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}
