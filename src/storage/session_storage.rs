use crate::dialog::Session;
use crate::types::ChatId;
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::oneshot;

/// Parked dialog sessions, keyed by chat.
///
/// A session is checked out with `load` for the duration of one event and
/// returned with `save`; idle sessions are not kept.
///
/// Only one actor may work on a chat at a time. Each actor takes a
/// [`ChatClaim`] when it is spawned and waits on it before touching the
/// chat's session, so an actor respawned after eviction queues behind the one
/// it replaced.
#[derive(Default)]
pub struct SessionStorage {
    sessions: DashMap<ChatId, Session>,
    owners: DashMap<ChatId, Owner>,
    next_generation: AtomicU64
}

struct Owner {
    generation: u64,
    finished: oneshot::Receiver<()>
}

/// Ownership of one chat, handed from actor to actor in spawn order.
pub struct ChatClaim {
    chat_id: ChatId,
    generation: u64,
    previous: Option<oneshot::Receiver<()>>,
    //NOTE: Never sent on, dropping it tells the next owner this one is done
    _done: oneshot::Sender<()>
}

impl ChatClaim {
    /// Resolves once the chat's previous owner has released it. Safe to cancel
    /// and call again.
    pub async fn wait_for_previous(&mut self) {
        if let Some(previous) = self.previous.as_mut() {
            previous.await.ok();
            self.previous = None;
        }
    }
}

impl SessionStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(&self, chat_id: ChatId) -> Session {
        self.sessions.remove(&chat_id)
            .map(|(_, session)| session)
            .unwrap_or_default()
    }

    pub fn save(&self, chat_id: ChatId, session: Session) {
        if session.is_active() {
            self.sessions.insert(chat_id, session);
        } else {
            self.sessions.remove(&chat_id);
        }
    }

    pub fn active_count(&self) -> usize {
        self.sessions.len()
    }

    /// Queues a new owner for `chat_id` behind whoever holds it now.
    pub fn claim(&self, chat_id: ChatId) -> ChatClaim {
        let (done, finished) = oneshot::channel();
        let generation = self.next_generation.fetch_add(1, Ordering::Relaxed);

        let previous = self.owners.insert(chat_id, Owner { generation, finished })
            .map(|owner| owner.finished);

        ChatClaim {
            chat_id,
            generation,
            previous,
            _done: done
        }
    }

    /// Hands the chat to the next owner, forgetting it if there is none.
    pub fn release(&self, claim: ChatClaim) {
        self.owners.remove_if(&claim.chat_id, |_, owner| owner.generation == claim.generation);
    }
}
