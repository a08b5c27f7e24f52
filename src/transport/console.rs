use crate::transport::{ChatEvent, ChatTransport, EventSource, OutgoingMessage, TransportError};
use crate::types::{ChatId, MessageId};
use dashmap::DashSet;
use std::io::{stdout, ErrorKind, Write};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Stdin};

/// The console acts as a single chat.
pub const CONSOLE_CHAT_ID: ChatId = 1;

/// Prefix that turns an input line into a button press.
const BUTTON_PREFIX: char = '@';

#[derive(Default)]
struct MessageLedger {
    next_id: AtomicI64,
    live: DashSet<MessageId>
}

impl MessageLedger {
    fn register(&self) -> MessageId {
        let message_id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        self.live.insert(message_id);
        message_id
    }
}

/// Renders replies on stdout.
///
/// Each message is printed with its id; buttons are listed underneath as the
/// `@PAYLOAD` line that presses them.
#[derive(Default)]
pub struct ConsoleTransport {
    ledger: Arc<MessageLedger>
}

impl ConsoleTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// An event source over stdin that shares this transport's message ids.
    pub fn stdin_source(&self) -> ConsoleSource<BufReader<Stdin>> {
        self.source(BufReader::new(tokio::io::stdin()))
    }

    pub fn source<R: AsyncBufRead + Unpin + Send>(&self, reader: R) -> ConsoleSource<R> {
        ConsoleSource {
            reader,
            ledger: self.ledger.clone()
        }
    }
}

impl ChatTransport for ConsoleTransport {
    async fn send(&self, chat_id: ChatId, message: OutgoingMessage) -> Result<MessageId, TransportError> {
        let message_id = self.ledger.register();

        render(message_id, &message)
            .map_err(|error| TransportError::delivery(chat_id, error.to_string()))?;

        Ok(message_id)
    }

    async fn delete(&self, chat_id: ChatId, message_id: MessageId) -> Result<(), TransportError> {
        if self.ledger.live.remove(&message_id).is_none() {
            return Err(TransportError::MessageGone { chat_id, message_id });
        }

        let mut output = stdout().lock();
        writeln!(output, "[#{message_id} removed]")?;
        output.flush()?;

        Ok(())
    }
}

fn render(message_id: MessageId, message: &OutgoingMessage) -> std::io::Result<()> {
    let mut output = stdout().lock();

    writeln!(output, "[#{message_id}] {}", message.text)?;

    for button in message.keyboard.iter().flat_map(|keyboard| keyboard.buttons()) {
        writeln!(output, "    {BUTTON_PREFIX}{}  {}", button.payload, button.label)?;
    }

    output.flush()
}

/// Reads one event per line: `/command args`, `@PAYLOAD`, or plain text.
pub struct ConsoleSource<R> {
    reader: R,
    ledger: Arc<MessageLedger>
}

impl<R: AsyncBufRead + Unpin + Send> EventSource for ConsoleSource<R> {
    async fn next_event(&mut self) -> Result<Option<ChatEvent>, TransportError> {
        let mut line = String::new();

        match self.reader.read_line(&mut line).await {
            Ok(0) => return Ok(None),
            Ok(_) => {}
            //NOTE: Another process attached to the same terminal can leave stdin non-blocking
            Err(error) if error.kind() == ErrorKind::WouldBlock => return Err(TransportError::Conflict),
            Err(error) => return Err(error.into())
        }

        let line = line.trim_end_matches(['\r', '\n']);

        //NOTE: A button press is not a message of its own, and the console cannot tell which keyboard it came from
        let event = match line.strip_prefix(BUTTON_PREFIX) {
            Some(payload) => ChatEvent::button(CONSOLE_CHAT_ID, None, payload.trim()),
            None => ChatEvent::from_text(CONSOLE_CHAT_ID, Some(self.ledger.register()), line)
        };

        Ok(Some(event))
    }
}
