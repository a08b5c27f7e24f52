use crate::types::{ChatId, MessageId};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("Message [{message_id}] in chat [{chat_id}] no longer exists")]
    MessageGone {
        chat_id: ChatId,
        message_id: MessageId
    },
    #[error("Another instance is consuming the same event stream")]
    Conflict,
    #[error("Delivery to chat [{chat_id}] failed: {reason}")]
    Delivery {
        chat_id: ChatId,
        reason: String
    },
    #[error("Transport I/O error: {0}")]
    Io(#[from] std::io::Error)
}

impl TransportError {
    pub fn delivery(chat_id: ChatId, reason: impl Into<String>) -> Self {
        Self::Delivery { chat_id, reason: reason.into() }
    }
}
