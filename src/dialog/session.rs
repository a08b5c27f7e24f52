use crate::models::{RecordDraft, RecordField};
use crate::types::{MessageId, RecordId, Status};
use std::collections::VecDeque;
use std::mem;

/// Most transient prompts a session remembers for cleanup.
pub const CLEANUP_CAPACITY: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterKind {
    Name,
    Bank,
    AnyField
}

impl FilterKind {
    /// The single column searched, or `None` for an any-field search.
    pub fn field(&self) -> Option<RecordField> {
        match self {
            FilterKind::Name => Some(RecordField::FullName),
            FilterKind::Bank => Some(RecordField::Bank),
            FilterKind::AnyField => None
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddStep {
    Bank,
    Name,
    Phone,
    Card,
    Status,
    Funds
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditStep {
    ChooseStatus,
    /// Waiting for the funds that go with an already chosen status.
    Funds(Status)
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FlowState {
    #[default]
    Idle,
    Add(AddStep),
    Filter(FilterKind),
    EditStatus {
        record_id: RecordId,
        step: EditStep
    }
}

/// Message handles to delete once a flow ends.
///
/// Bounded: when full, the oldest handle is forgotten and its message stays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanupQueue {
    handles: VecDeque<MessageId>,
    capacity: usize
}

impl Default for CleanupQueue {
    fn default() -> Self {
        Self::with_capacity(CLEANUP_CAPACITY)
    }
}

impl CleanupQueue {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            handles: VecDeque::with_capacity(capacity),
            capacity
        }
    }

    /// Queues a handle, returning the one pushed out if the queue was full.
    pub fn push(&mut self, message_id: MessageId) -> Option<MessageId> {
        let evicted = if self.handles.len() >= self.capacity {
            self.handles.pop_front()
        } else {
            None
        };

        self.handles.push_back(message_id);

        evicted
    }

    pub fn drain(&mut self) -> Vec<MessageId> {
        self.handles.drain(..).collect()
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }
}

/// Conversation state for one chat.
///
/// Lives only while a flow is active; [`Session::finish`] drops everything and
/// hands back the messages that still need deleting.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub state: FlowState,
    /// The partially entered record of an Add flow.
    pub draft: RecordDraft,
    cleanup: CleanupQueue
}

impl Session {
    pub fn is_active(&self) -> bool {
        self.state != FlowState::Idle
    }

    pub fn begin_add(&mut self) {
        self.state = FlowState::Add(AddStep::Bank);
        self.draft = RecordDraft::default();
    }

    pub fn begin_filter(&mut self, kind: FilterKind) {
        self.state = FlowState::Filter(kind);
    }

    pub fn begin_edit(&mut self, record_id: RecordId) {
        self.state = FlowState::EditStatus { record_id, step: EditStep::ChooseStatus };
    }

    pub fn track(&mut self, message_id: MessageId) {
        self.cleanup.push(message_id);
    }

    #[cfg(test)]
    pub fn pending_cleanup(&self) -> usize {
        self.cleanup.len()
    }

    /// Resets to idle, returning the queued message handles.
    pub fn finish(&mut self) -> Vec<MessageId> {
        let mut finished = mem::take(self);
        finished.cleanup.drain()
    }
}
