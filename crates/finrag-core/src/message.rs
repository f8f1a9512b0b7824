//! Conversation message types.
//!
//! A [`Message`] is immutable once created; the conversation log only ever
//! appends new ones.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Route tag the backend uses when an answer came from live market data.
pub const LIVE_DATA_ROUTE: &str = "financial_agent_yfinance";

/// Who (or what) produced a message. Determines rendering style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    /// Text typed by the user.
    User,
    /// Answer returned by the backend.
    Assistant,
    /// Client-generated progress notice.
    System,
    /// Client-generated failure notice.
    Error,
}

impl MessageKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageKind::User => "user",
            MessageKind::Assistant => "assistant",
            MessageKind::System => "system",
            MessageKind::Error => "error",
        }
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identifier of a message, unique within one conversation log.
///
/// Ids are handed out by the log in creation order, so comparing two ids
/// also tells which message came first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MessageId(pub u64);

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single entry in the conversation log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    pub kind: MessageKind,
    /// Display text. Assistant content is the backend answer verbatim.
    pub content: String,
    /// Backend pipeline that produced an assistant answer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub route: Option<String>,
    /// Local wall-clock time at creation, already formatted for display.
    pub timestamp: String,
}

impl Message {
    /// Builds a message stamped with the current local time.
    pub fn new(id: MessageId, kind: MessageKind, content: impl Into<String>) -> Self {
        Self {
            id,
            kind,
            content: content.into(),
            route: None,
            timestamp: display_timestamp(),
        }
    }

    /// Attaches a route tag. Only meaningful for assistant messages.
    pub fn with_route(mut self, route: Option<String>) -> Self {
        self.route = route;
        self
    }

    /// Badge for the route tag, if this message carries one.
    pub fn route_badge(&self) -> Option<RouteBadge> {
        self.route.as_deref().map(RouteBadge::from_route)
    }
}

/// Display classification of a backend route tag.
///
/// The tag itself stays opaque; this only picks a label for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteBadge {
    LiveData,
    Documents,
}

impl RouteBadge {
    pub fn from_route(route: &str) -> Self {
        if route == LIVE_DATA_ROUTE {
            RouteBadge::LiveData
        } else {
            RouteBadge::Documents
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RouteBadge::LiveData => "📈 Live Data",
            RouteBadge::Documents => "📄 Documents",
        }
    }
}

fn display_timestamp() -> String {
    chrono::Local::now().format("%-I:%M:%S %p").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_message_has_timestamp_and_no_route() {
        let message = Message::new(MessageId(1), MessageKind::User, "hello");
        assert_eq!(message.kind, MessageKind::User);
        assert_eq!(message.content, "hello");
        assert!(message.route.is_none());
        assert!(!message.timestamp.is_empty());
    }

    #[test]
    fn test_route_badge_labels() {
        let live = Message::new(MessageId(1), MessageKind::Assistant, "$190")
            .with_route(Some(LIVE_DATA_ROUTE.to_string()));
        assert_eq!(live.route_badge(), Some(RouteBadge::LiveData));
        assert_eq!(RouteBadge::LiveData.label(), "📈 Live Data");

        let docs = Message::new(MessageId(2), MessageKind::Assistant, "Revenue grew")
            .with_route(Some("document_agent".to_string()));
        assert_eq!(docs.route_badge(), Some(RouteBadge::Documents));

        let plain = Message::new(MessageId(3), MessageKind::System, "note");
        assert_eq!(plain.route_badge(), None);
    }

    #[test]
    fn test_message_ids_order_by_sequence() {
        assert!(MessageId(1) < MessageId(2));
        assert_eq!(MessageId(7).to_string(), "7");
    }

    #[test]
    fn test_kind_serializes_snake_case() {
        let json = serde_json::to_string(&MessageKind::Assistant).unwrap();
        assert_eq!(json, "\"assistant\"");
    }
}
