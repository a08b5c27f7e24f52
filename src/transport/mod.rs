//! The boundary to whatever chat system delivers events and shows replies.

mod console;
mod errors;
mod message;
#[cfg(test)]
pub mod mock;

use std::future::Future;

use crate::types::{ChatId, MessageId};

pub use console::ConsoleTransport;
pub use errors::TransportError;
pub use message::{Button, ChatEvent, EventKind, Keyboard, OutgoingMessage};

/// Outbound half of a chat system.
pub trait ChatTransport: Send + Sync + 'static {
    /// Sends a message and returns the id the chat system gave it.
    fn send(&self, chat_id: ChatId, message: OutgoingMessage) -> impl Future<Output = Result<MessageId, TransportError>> + Send;

    /// Removes a previously sent (or received) message.
    fn delete(&self, chat_id: ChatId, message_id: MessageId) -> impl Future<Output = Result<(), TransportError>> + Send;
}

/// Inbound half of a chat system. `Ok(None)` means the stream has ended.
pub trait EventSource: Send {
    fn next_event(&mut self) -> impl Future<Output = Result<Option<ChatEvent>, TransportError>> + Send;
}
