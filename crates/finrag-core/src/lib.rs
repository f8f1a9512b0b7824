pub mod backend;
pub mod config;
pub mod conversation;
pub mod document;
pub mod error;
pub mod message;
pub mod selection;

// Re-export common error type
pub use error::{FinragError, Result};

pub use backend::{FileSelection, QueryRequest, RagBackend};
pub use config::ClientConfig;
pub use conversation::ConversationLog;
pub use document::{DocumentEntry, DocumentRegistry};
pub use message::{Message, MessageId, MessageKind, RouteBadge};
pub use selection::SelectionSet;
