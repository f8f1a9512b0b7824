//! Local mirror of the documents the backend knows about.

use serde::{Deserialize, Deserializer, Serialize};

/// One document as reported by `GET /documents`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentEntry {
    /// Backend-assigned id, stable across refreshes.
    pub document_id: String,
    /// Number of indexed chunks. Informational only.
    #[serde(default, deserialize_with = "lenient_chunk_count")]
    pub chunk_count: u64,
}

/// The index stores metadata numbers as floats and may return `null`; a
/// count that is not a non-negative whole number reads as 0.
fn lenient_chunk_count<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let count = match Option::<serde_json::Number>::deserialize(deserializer)? {
        Some(number) => number
            .as_u64()
            .or_else(|| {
                number
                    .as_f64()
                    .filter(|n| n.is_finite() && *n >= 0.0 && n.fract() == 0.0)
                    .map(|n| n as u64)
            })
            .unwrap_or(0),
        None => 0,
    };
    Ok(count)
}

impl DocumentEntry {
    pub fn new(document_id: impl Into<String>, chunk_count: u64) -> Self {
        Self {
            document_id: document_id.into(),
            chunk_count,
        }
    }
}

/// Cached document list.
///
/// The registry is never merged or diffed: a successful refresh replaces it
/// as a whole, a failed one leaves it as it was.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentRegistry {
    documents: Vec<DocumentEntry>,
}

impl DocumentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the whole registry with `documents`.
    pub fn replace(&mut self, documents: Vec<DocumentEntry>) {
        self.documents = documents;
    }

    pub fn documents(&self) -> &[DocumentEntry] {
        &self.documents
    }

    pub fn get(&self, document_id: &str) -> Option<&DocumentEntry> {
        self.documents
            .iter()
            .find(|doc| doc.document_id == document_id)
    }

    pub fn contains(&self, document_id: &str) -> bool {
        self.get(document_id).is_some()
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}
