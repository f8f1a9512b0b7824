//! Append-only conversation log.

use crate::error::{FinragError, Result};
use crate::message::{Message, MessageId, MessageKind};

/// Ordered, append-only sequence of messages.
///
/// Creation order, storage order and display order are the same thing.
/// There is deliberately no API to edit or remove an entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversationLog {
    messages: Vec<Message>,
    next_id: u64,
}

impl ConversationLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a fully formed message.
    ///
    /// The id counter is advanced past the message's id so later
    /// [`record`](Self::record) calls never hand out a duplicate. An id with
    /// no successor (`u64::MAX`) is rejected and the log is left unchanged.
    pub fn append(&mut self, message: Message) -> Result<()> {
        let after = message.id.0.checked_add(1).ok_or_else(|| {
            FinragError::invalid_input(format!(
                "message id {} leaves no room for later messages",
                message.id.0
            ))
        })?;
        self.next_id = self.next_id.max(after);
        self.messages.push(message);
        Ok(())
    }

    /// Builds a message with the next free id and appends it.
    pub fn record(
        &mut self,
        kind: MessageKind,
        content: impl Into<String>,
        route: Option<String>,
    ) -> &Message {
        let message = Message::new(self.next_message_id(), kind, content).with_route(route);
        self.next_id = self.next_id.saturating_add(1);
        self.messages.push(message);
        // just pushed
        &self.messages[self.messages.len() - 1]
    }

    /// The id the next recorded message will receive.
    pub fn next_message_id(&self) -> MessageId {
        MessageId(self.next_id)
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn iter(&self) -> impl Iterator<Item = &Message> {
        self.messages.iter()
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
