use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use finrag_core::backend::{FileSelection, HealthReport, QueryRequest, RagBackend};
use finrag_core::config::ClientConfig;
use finrag_core::error::Result;
use finrag_core::message::MessageKind;
use tokio::sync::watch;

use super::snapshot::SessionSnapshot;

/// Shown instead of the underlying error when a query fails.
pub const QUERY_FAILURE_TEXT: &str = "Sorry, something went wrong. Please try again.";

/// Result of an intent that may be refused before doing any work.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// The flow ran to its terminal state (which may be a logged failure).
    Completed,
    /// Nothing happened.
    Ignored(IgnoreReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// Input was empty or whitespace only.
    EmptyInput,
    /// No file was picked.
    NoFile,
    /// A query is already in flight.
    QueryInFlight,
    /// An upload is already in flight.
    UploadInFlight,
    /// The initial document load already ran.
    AlreadyStarted,
    /// The controller was disposed.
    Disposed,
}

#[derive(Debug, Clone, Copy)]
enum BusyFlag {
    Query,
    Upload,
    Documents,
}

/// Clears a busy flag when dropped, on every exit path of a flow.
struct BusyGuard<'a> {
    controller: &'a SessionController,
    flag: BusyFlag,
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        let flag = self.flag;
        self.controller.update(|state| match flag {
            BusyFlag::Query => state.is_loading = false,
            BusyFlag::Upload => state.is_uploading = false,
            BusyFlag::Documents => {
                state.pending_refreshes = state.pending_refreshes.saturating_sub(1)
            }
        });
    }
}

/// Owns one conversation with the backend.
///
/// The controller is the only writer of its [`SessionSnapshot`]. Views read
/// it through [`snapshot`](Self::snapshot) or [`subscribe`](Self::subscribe)
/// and call the intent methods; every method takes `&self`, so the
/// controller is usually shared as `Arc<SessionController>` and intents are
/// spawned as tasks.
///
/// State updates are short synchronous closures and never span an `.await`,
/// so each one is atomic with respect to the others.
pub struct SessionController {
    session_id: String,
    backend: Arc<dyn RagBackend>,
    state: watch::Sender<SessionSnapshot>,
    started: AtomicBool,
    disposed: AtomicBool,
}

impl SessionController {
    /// Creates a controller without touching the backend.
    pub fn new(backend: Arc<dyn RagBackend>, symbol: impl Into<String>) -> Self {
        let (state, _) = watch::channel(SessionSnapshot::new(symbol));
        let session_id = uuid::Uuid::new_v4().to_string();
        tracing::debug!("[Session {}] created", session_id);

        Self {
            session_id,
            backend,
            state,
            started: AtomicBool::new(false),
            disposed: AtomicBool::new(false),
        }
    }

    pub fn with_config(backend: Arc<dyn RagBackend>, config: &ClientConfig) -> Self {
        Self::new(backend, config.default_symbol.clone())
    }

    /// Creates a controller and spawns its initial document load.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(backend: Arc<dyn RagBackend>, config: &ClientConfig) -> Arc<Self> {
        let controller = Arc::new(Self::with_config(backend, config));
        let loader = Arc::clone(&controller);
        tokio::spawn(async move {
            loader.load_on_start().await;
        });
        controller
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    // ============================================================================
    // Read side
    // ============================================================================

    pub fn snapshot(&self) -> SessionSnapshot {
        self.state.borrow().clone()
    }

    /// Receiver notified after every state change.
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.state.subscribe()
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::SeqCst)
    }

    // ============================================================================
    // Lifecycle
    // ============================================================================

    /// Initial document load. Runs at most once per controller.
    pub async fn load_on_start(&self) -> Dispatch {
        if self.started.swap(true, Ordering::SeqCst) {
            return Dispatch::Ignored(IgnoreReason::AlreadyStarted);
        }
        self.refresh_documents().await
    }

    /// Marks the controller disposed.
    ///
    /// In-flight calls still finish, but their results are dropped and no
    /// further state change happens.
    pub fn dispose(&self) {
        if !self.disposed.swap(true, Ordering::SeqCst) {
            tracing::debug!("[Session {}] disposed", self.session_id);
        }
    }

    // ============================================================================
    // Synchronous intents
    // ============================================================================

    pub fn set_input(&self, text: impl Into<String>) {
        let text = text.into();
        self.update(|state| state.input = text);
    }

    pub fn set_symbol(&self, symbol: impl Into<String>) {
        let symbol = symbol.into();
        self.update(|state| state.symbol = symbol);
    }

    pub fn set_upload_form_visible(&self, visible: bool) {
        self.update(|state| state.show_upload = visible);
    }

    /// Toggles a document in the selection set.
    ///
    /// Returns whether the document is selected afterwards.
    pub fn toggle_selection(&self, document_id: &str) -> bool {
        let mut selected = false;
        self.update(|state| selected = state.selection.toggle(document_id));
        selected
    }

    // ============================================================================
    // Remote operations
    // ============================================================================

    /// Replaces the document registry with the backend's list.
    ///
    /// Failures are logged only; the previous registry stays in place.
    /// Overlapping refreshes are not deduplicated, the last to return wins.
    pub async fn refresh_documents(&self) -> Dispatch {
        if !self.update(|state| state.pending_refreshes += 1) {
            return Dispatch::Ignored(IgnoreReason::Disposed);
        }
        let _busy = self.busy(BusyFlag::Documents);

        match self.backend.list_documents().await {
            Ok(documents) => {
                tracing::info!(
                    "[Session {}] document list refreshed ({} documents)",
                    self.session_id,
                    documents.len()
                );
                self.update(|state| state.registry.replace(documents));
            }
            Err(e) => {
                tracing::warn!("[Session {}] error loading documents: {}", self.session_id, e);
            }
        }

        Dispatch::Completed
    }

    /// Sends the current input as a question.
    ///
    /// The user message is appended and the input cleared before the request
    /// goes out. Exactly one assistant or error message follows.
    pub async fn send_query(&self) -> Dispatch {
        let mut outcome = Dispatch::Completed;
        let mut request = None;

        self.try_update(|state| {
            if state.input.trim().is_empty() {
                outcome = Dispatch::Ignored(IgnoreReason::EmptyInput);
                return false;
            }
            if state.is_loading {
                outcome = Dispatch::Ignored(IgnoreReason::QueryInFlight);
                return false;
            }

            let question = std::mem::take(&mut state.input);
            state.log.record(MessageKind::User, question.clone(), None);
            state.is_loading = true;
            request = Some(QueryRequest {
                question,
                symbol: state.symbol.clone(),
                document_ids: state.selection.as_query_scope(),
            });
            true
        });

        let Some(request) = request else {
            return self.refused(outcome);
        };
        let _busy = self.busy(BusyFlag::Query);

        match self.backend.query(&request).await {
            Ok(answer) => {
                tracing::info!(
                    "[Session {}] query answered via {}",
                    self.session_id,
                    answer.route.as_deref().unwrap_or("unknown route")
                );
                self.update(|state| {
                    state
                        .log
                        .record(MessageKind::Assistant, answer.answer, answer.route);
                });
            }
            Err(e) => {
                tracing::warn!("[Session {}] query failed: {}", self.session_id, e);
                self.update(|state| {
                    state.log.record(MessageKind::Error, QUERY_FAILURE_TEXT, None);
                });
            }
        }

        Dispatch::Completed
    }

    /// Uploads a picked file and refreshes the registry on success.
    ///
    /// On success the refresh is awaited before the upload form is hidden
    /// and before the "list refreshed" notice is appended. A failed upload
    /// appends a single error message and never refreshes.
    pub async fn upload_document(&self, file: Option<FileSelection>) -> Dispatch {
        let Some(file) = file else {
            return Dispatch::Ignored(IgnoreReason::NoFile);
        };
        let file_name = file.name.clone();

        let mut outcome = Dispatch::Completed;
        let accepted = self.try_update(|state| {
            if state.is_uploading {
                outcome = Dispatch::Ignored(IgnoreReason::UploadInFlight);
                return false;
            }
            state.is_uploading = true;
            state.log.record(
                MessageKind::System,
                format!("📤 Uploading \"{}\"...", file_name),
                None,
            );
            true
        });
        if !accepted {
            return self.refused(outcome);
        }
        let _busy = self.busy(BusyFlag::Upload);

        match self.backend.upload(file).await {
            Ok(receipt) => {
                tracing::info!(
                    "[Session {}] uploaded {} as {}",
                    self.session_id,
                    file_name,
                    receipt.document_id
                );
                let recorded = self.update(|state| {
                    state.log.record(
                        MessageKind::System,
                        format!(
                            "✅ Document uploaded successfully! Document ID: {}",
                            receipt.document_id
                        ),
                        None,
                    );
                });
                if !recorded {
                    return Dispatch::Completed;
                }

                self.refresh_documents().await;
                self.set_upload_form_visible(false);
                self.update(|state| {
                    state.log.record(
                        MessageKind::System,
                        format!(
                            "🔄 Document list refreshed - {} is now available for selection",
                            file_name
                        ),
                        None,
                    );
                });
            }
            Err(e) => {
                tracing::warn!("[Session {}] upload of {} failed: {}", self.session_id, file_name, e);
                self.update(|state| {
                    state.log.record(
                        MessageKind::Error,
                        format!("❌ Upload failed: {}", e.user_detail()),
                        None,
                    );
                });
            }
        }

        Dispatch::Completed
    }

    /// Asks the backend for its health. Does not touch session state.
    pub async fn check_health(&self) -> Result<HealthReport> {
        self.backend.health().await
    }

    // ============================================================================
    // Internals
    // ============================================================================

    /// Applies `f` unless the controller is disposed. Returns whether it ran.
    fn update<F>(&self, f: F) -> bool
    where
        F: FnOnce(&mut SessionSnapshot),
    {
        self.try_update(|state| {
            f(state);
            true
        })
    }

    /// Applies `f` unless disposed; `f` reports whether it changed anything.
    ///
    /// Returns `false` when disposed or when `f` made no change.
    fn try_update<F>(&self, f: F) -> bool
    where
        F: FnOnce(&mut SessionSnapshot) -> bool,
    {
        if self.is_disposed() {
            return false;
        }
        self.state.send_if_modified(f)
    }

    /// Maps a refused update to its reason, accounting for disposal.
    fn refused(&self, outcome: Dispatch) -> Dispatch {
        if self.is_disposed() {
            Dispatch::Ignored(IgnoreReason::Disposed)
        } else {
            outcome
        }
    }

    fn busy(&self, flag: BusyFlag) -> BusyGuard<'_> {
        BusyGuard {
            controller: self,
            flag,
        }
    }
}

impl Drop for SessionController {
    fn drop(&mut self) {
        self.dispose();
    }
}
