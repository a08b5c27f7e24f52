use crate::transport::{ChatEvent, ChatTransport, EventSource, OutgoingMessage, TransportError};
use crate::types::{ChatId, MessageId};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::{Mutex, PoisonError};

#[derive(Debug, Clone)]
pub struct SentMessage {
    pub chat_id: ChatId,
    pub message_id: MessageId,
    pub message: OutgoingMessage
}

/// Records every send and delete for assertions.
#[derive(Default)]
pub struct RecordingTransport {
    next_id: AtomicI64,
    sent: Mutex<Vec<SentMessage>>,
    deleted: Mutex<Vec<MessageId>>,
    fail_deletes: AtomicBool,
    fail_sends: AtomicBool
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_deletes(&self) {
        self.fail_deletes.store(true, Ordering::Relaxed);
    }

    pub fn fail_sends(&self) {
        self.fail_sends.store(true, Ordering::Relaxed);
    }

    pub fn sent(&self) -> Vec<SentMessage> {
        self.sent.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn deleted(&self) -> Vec<MessageId> {
        self.deleted.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn last_text(&self) -> String {
        self.sent().last().map(|sent| sent.message.text.clone()).unwrap_or_default()
    }

    pub fn texts(&self) -> Vec<String> {
        self.sent().into_iter().map(|sent| sent.message.text).collect()
    }

    /// Payloads of every button on every message sent so far.
    pub fn payloads(&self) -> Vec<String> {
        self.sent().into_iter()
            .filter_map(|sent| sent.message.keyboard)
            .flat_map(|keyboard| keyboard.rows.into_iter().flatten().map(|button| button.payload))
            .collect()
    }

    pub fn clear(&self) {
        self.sent.lock().unwrap_or_else(PoisonError::into_inner).clear();
        self.deleted.lock().unwrap_or_else(PoisonError::into_inner).clear();
    }
}

impl ChatTransport for RecordingTransport {
    async fn send(&self, chat_id: ChatId, message: OutgoingMessage) -> Result<MessageId, TransportError> {
        if self.fail_sends.load(Ordering::Relaxed) {
            return Err(TransportError::delivery(chat_id, "send disabled"));
        }

        let message_id = 1000 + self.next_id.fetch_add(1, Ordering::Relaxed);
        self.sent.lock().unwrap_or_else(PoisonError::into_inner).push(SentMessage { chat_id, message_id, message });

        Ok(message_id)
    }

    async fn delete(&self, chat_id: ChatId, message_id: MessageId) -> Result<(), TransportError> {
        if self.fail_deletes.load(Ordering::Relaxed) {
            return Err(TransportError::MessageGone { chat_id, message_id });
        }

        self.deleted.lock().unwrap_or_else(PoisonError::into_inner).push(message_id);

        Ok(())
    }
}

/// Replays a fixed script of results, then reports end of stream.
pub struct ScriptedSource {
    script: VecDeque<Result<Option<ChatEvent>, TransportError>>
}

impl ScriptedSource {
    pub fn new(events: impl IntoIterator<Item = ChatEvent>) -> Self {
        Self { script: events.into_iter().map(|event| Ok(Some(event))).collect() }
    }

    pub fn from_results(results: impl IntoIterator<Item = Result<Option<ChatEvent>, TransportError>>) -> Self {
        Self { script: results.into_iter().collect() }
    }
}

impl EventSource for ScriptedSource {
    async fn next_event(&mut self) -> Result<Option<ChatEvent>, TransportError> {
        self.script.pop_front().unwrap_or(Ok(None))
    }
}
