//! Scripted in-memory backend for session controller tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, OnceLock};
use std::time::Duration;

use finrag_application::SessionSnapshot;
use finrag_core::backend::{
    FileSelection, HealthReport, QueryAnswer, QueryRequest, RagBackend, UploadReceipt,
};
use finrag_core::document::DocumentEntry;
use finrag_core::error::{FinragError, Result};
use tokio::sync::{oneshot, watch};

/// Backend that replays queued responses and records every request.
///
/// Unscripted calls fall back to: empty document list, transport error for
/// queries and uploads.
#[derive(Default)]
pub struct ScriptedBackend {
    documents: Mutex<VecDeque<Result<Vec<DocumentEntry>>>>,
    answers: Mutex<VecDeque<Result<QueryAnswer>>>,
    uploads: Mutex<VecDeque<Result<UploadReceipt>>>,
    list_gates: Mutex<VecDeque<oneshot::Receiver<()>>>,
    query_gates: Mutex<VecDeque<oneshot::Receiver<()>>>,
    upload_gates: Mutex<VecDeque<oneshot::Receiver<()>>>,
    observer: OnceLock<watch::Receiver<SessionSnapshot>>,
    pub list_calls: AtomicUsize,
    pub query_requests: Mutex<Vec<QueryRequest>>,
    pub uploaded_files: Mutex<Vec<FileSelection>>,
    /// Session state as seen at the start of each `list_documents` call.
    pub seen_during_list: Mutex<Vec<SessionSnapshot>>,
}

impl ScriptedBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_documents(&self, result: Result<Vec<DocumentEntry>>) {
        self.documents.lock().unwrap().push_back(result);
    }

    pub fn push_answer(&self, result: Result<QueryAnswer>) {
        self.answers.lock().unwrap().push_back(result);
    }

    pub fn push_upload(&self, result: Result<UploadReceipt>) {
        self.uploads.lock().unwrap().push_back(result);
    }

    /// The next `list_documents` call waits until the returned sender fires.
    pub fn gate_next_list(&self) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.list_gates.lock().unwrap().push_back(rx);
        tx
    }

    pub fn gate_next_query(&self) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.query_gates.lock().unwrap().push_back(rx);
        tx
    }

    pub fn gate_next_upload(&self) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.upload_gates.lock().unwrap().push_back(rx);
        tx
    }

    /// Lets `list_documents` record the controller state it runs under.
    pub fn observe(&self, receiver: watch::Receiver<SessionSnapshot>) {
        let _ = self.observer.set(receiver);
    }

    pub fn list_call_count(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn recorded_queries(&self) -> Vec<QueryRequest> {
        self.query_requests.lock().unwrap().clone()
    }
}

async fn pass_gate(gates: &Mutex<VecDeque<oneshot::Receiver<()>>>) {
    let gate = gates.lock().unwrap().pop_front();
    if let Some(gate) = gate {
        let _ = gate.await;
    }
}

#[async_trait::async_trait]
impl RagBackend for ScriptedBackend {
    async fn list_documents(&self) -> Result<Vec<DocumentEntry>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(observer) = self.observer.get() {
            let seen = observer.borrow().clone();
            self.seen_during_list.lock().unwrap().push(seen);
        }
        let result = self
            .documents
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(Vec::new()));
        pass_gate(&self.list_gates).await;
        result
    }

    async fn query(&self, request: &QueryRequest) -> Result<QueryAnswer> {
        self.query_requests.lock().unwrap().push(request.clone());
        let result = self
            .answers
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(FinragError::transport("connection refused")));
        pass_gate(&self.query_gates).await;
        result
    }

    async fn upload(&self, file: FileSelection) -> Result<UploadReceipt> {
        self.uploaded_files.lock().unwrap().push(file);
        let result = self
            .uploads
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(FinragError::transport("connection refused")));
        pass_gate(&self.upload_gates).await;
        result
    }

    async fn health(&self) -> Result<HealthReport> {
        Ok(HealthReport {
            status: "healthy".to_string(),
            timestamp: None,
            error: None,
        })
    }
}

pub fn answer(text: &str, route: &str) -> QueryAnswer {
    QueryAnswer {
        answer: text.to_string(),
        route: Some(route.to_string()),
    }
}

pub fn receipt(document_id: &str) -> UploadReceipt {
    UploadReceipt {
        document_id: document_id.to_string(),
        message: Some("Document uploaded successfully".to_string()),
    }
}

pub fn pdf(name: &str) -> FileSelection {
    FileSelection::new(name, "application/pdf", b"%PDF-1.7".to_vec())
}

/// Waits (bounded) until the session state satisfies `predicate`.
pub async fn wait_until<F>(receiver: &mut watch::Receiver<SessionSnapshot>, predicate: F)
where
    F: FnMut(&SessionSnapshot) -> bool,
{
    tokio::time::timeout(Duration::from_secs(5), receiver.wait_for(predicate))
        .await
        .expect("timed out waiting for session state")
        .expect("session state channel closed");
}
