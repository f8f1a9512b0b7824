use finrag_core::conversation::ConversationLog;
use finrag_core::document::DocumentRegistry;
use finrag_core::selection::SelectionSet;

/// Everything the view needs to render one frame of a session.
///
/// The controller keeps the live copy; callers only ever get clones.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub log: ConversationLog,
    pub registry: DocumentRegistry,
    pub selection: SelectionSet,
    /// Text currently in the input box.
    pub input: String,
    /// Ticker symbol sent with every query.
    pub symbol: String,
    /// A query is in flight.
    pub is_loading: bool,
    /// An upload is in flight.
    pub is_uploading: bool,
    /// The upload form is shown.
    pub show_upload: bool,
    pub(crate) pending_refreshes: u32,
}

/// Where the next query will be answered from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Routing {
    LiveData,
    Documents(usize),
}

impl SessionSnapshot {
    pub(crate) fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            ..Self::default()
        }
    }

    /// A document refresh is in flight.
    pub fn is_loading_documents(&self) -> bool {
        self.pending_refreshes > 0
    }

    pub fn routing(&self) -> Routing {
        if self.selection.is_empty() {
            Routing::LiveData
        } else {
            Routing::Documents(self.selection.len())
        }
    }

    /// Selected ids the registry no longer lists.
    pub fn stale_selections(&self) -> Vec<&str> {
        self.selection
            .ids()
            .iter()
            .filter(|id| !self.registry.contains(id))
            .map(String::as_str)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use finrag_core::document::DocumentEntry;

    #[test]
    fn test_routing_follows_selection() {
        let mut snapshot = SessionSnapshot::new("AAPL");
        assert_eq!(snapshot.routing(), Routing::LiveData);

        snapshot.selection.toggle("A");
        snapshot.selection.toggle("B");
        assert_eq!(snapshot.routing(), Routing::Documents(2));
    }

    #[test]
    fn test_stale_selections_lists_missing_ids() {
        let mut snapshot = SessionSnapshot::new("AAPL");
        snapshot.registry.replace(vec![DocumentEntry::new("A", 3)]);
        snapshot.selection.toggle("A");
        snapshot.selection.toggle("gone");

        assert_eq!(snapshot.stale_selections(), vec!["gone"]);
    }

    #[test]
    fn test_loading_documents_tracks_pending_count() {
        let mut snapshot = SessionSnapshot::new("AAPL");
        assert!(!snapshot.is_loading_documents());
        snapshot.pending_refreshes = 2;
        assert!(snapshot.is_loading_documents());
    }
}
