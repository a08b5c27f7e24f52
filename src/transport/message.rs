use crate::types::{ChatId, MessageId};

/// What a chat participant did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventKind {
    /// `/name args`, with any `@botname` suffix stripped from `name`.
    Command {
        name: String,
        args: String
    },
    Text(String),
    /// The opaque payload of a pressed inline button.
    Button(String)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatEvent {
    pub chat_id: ChatId,
    /// The message that carried the event, when the chat system exposes one.
    pub message_id: Option<MessageId>,
    pub kind: EventKind
}

impl ChatEvent {
    /// Classifies a raw text message as a command or plain text.
    pub fn from_text(chat_id: ChatId, message_id: Option<MessageId>, raw: &str) -> Self {
        let kind = match raw.trim_start().strip_prefix('/') {
            Some(command) if !command.is_empty() => {
                let (head, args) = command.split_once(char::is_whitespace).unwrap_or((command, ""));
                let name = head.split('@').next().unwrap_or(head).to_lowercase();

                EventKind::Command { name, args: args.trim().to_string() }
            }
            _ => EventKind::Text(raw.to_string())
        };

        Self { chat_id, message_id, kind }
    }

    pub fn button(chat_id: ChatId, message_id: Option<MessageId>, payload: impl Into<String>) -> Self {
        Self { chat_id, message_id, kind: EventKind::Button(payload.into()) }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Button {
    pub label: String,
    pub payload: String
}

impl Button {
    pub fn new(label: impl Into<String>, payload: impl ToString) -> Self {
        Self { label: label.into(), payload: payload.to_string() }
    }
}

/// Inline buttons laid out in rows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Keyboard {
    pub rows: Vec<Vec<Button>>
}

impl Keyboard {
    pub fn new(rows: Vec<Vec<Button>>) -> Self {
        Self { rows }
    }

    /// One button per row.
    pub fn column(buttons: impl IntoIterator<Item = Button>) -> Self {
        Self { rows: buttons.into_iter().map(|button| vec![button]).collect() }
    }

    pub fn buttons(&self) -> impl Iterator<Item = &Button> {
        self.rows.iter().flatten()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMessage {
    pub text: String,
    pub keyboard: Option<Keyboard>
}

impl OutgoingMessage {
    pub fn text(text: impl Into<String>) -> Self {
        Self { text: text.into(), keyboard: None }
    }

    pub fn with_keyboard(text: impl Into<String>, keyboard: Keyboard) -> Self {
        Self { text: text.into(), keyboard: Some(keyboard) }
    }
}
