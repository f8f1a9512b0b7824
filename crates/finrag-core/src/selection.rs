//! Documents the user scoped queries to.

/// Set of selected document ids, kept in insertion order.
///
/// Ids are not checked against the registry, and a refresh never prunes
/// them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionSet {
    ids: Vec<String>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes `document_id` if selected, adds it otherwise.
    ///
    /// Returns whether the id is selected after the call.
    pub fn toggle(&mut self, document_id: &str) -> bool {
        if let Some(pos) = self.ids.iter().position(|id| id == document_id) {
            self.ids.remove(pos);
            false
        } else {
            self.ids.push(document_id.to_string());
            true
        }
    }

    pub fn contains(&self, document_id: &str) -> bool {
        self.ids.iter().any(|id| id == document_id)
    }

    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    /// The query scoping parameter: `None` when nothing is selected.
    ///
    /// The backend answers from live market data for `None` and from the
    /// listed documents otherwise.
    pub fn as_query_scope(&self) -> Option<Vec<String>> {
        if self.ids.is_empty() {
            None
        } else {
            Some(self.ids.clone())
        }
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}
