use crate::actors::ChatActor;
use crate::dialog::DialogController;
use crate::storage::{SessionStorage, Storage};
use crate::transport::{ChatEvent, ChatTransport, EventSource, TransportError};
use crate::types::ChatId;
use moka::future::Cache;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::sleep;
use tracing::{debug, error, info, warn};

pub const DEFAULT_ACTOR_CAPACITY: u64 = 10_000;
pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(30 * 60);

const DEFAULT_RETRY_DELAY: Duration = Duration::from_millis(500);
const MAX_CONSECUTIVE_FAILURES: u32 = 5;

/// Routes chat events to one actor per chat.
///
/// A chat's events are handled in order by its actor while different chats
/// run in parallel. Actors are evicted after the idle timeout or when the
/// cache is full, and respawned on the next event; the new actor starts only
/// after the evicted one has drained its queue.
pub struct Dispatcher<S: Storage, T: ChatTransport> {
    controller: Arc<DialogController<S, T>>,
    sessions: Arc<SessionStorage>,
    actor_capacity: u64,
    idle_timeout: Duration,
    retry_delay: Duration
}

impl<S: Storage, T: ChatTransport> Dispatcher<S, T> {
    pub fn new(controller: Arc<DialogController<S, T>>, sessions: Arc<SessionStorage>) -> Self {
        Self {
            controller,
            sessions,
            actor_capacity: DEFAULT_ACTOR_CAPACITY,
            idle_timeout: DEFAULT_IDLE_TIMEOUT,
            retry_delay: DEFAULT_RETRY_DELAY
        }
    }

    pub fn with_actor_capacity(mut self, actor_capacity: u64) -> Self {
        self.actor_capacity = actor_capacity;
        self
    }

    pub fn with_idle_timeout(mut self, idle_timeout: Duration) -> Self {
        self.idle_timeout = idle_timeout;
        self
    }

    /// Base delay before polling the source again after a failure.
    #[cfg(test)]
    pub fn with_retry_delay(mut self, retry_delay: Duration) -> Self {
        self.retry_delay = retry_delay;
        self
    }

    /// Consumes events until the source ends, then waits for every actor to
    /// finish its queue. Returns the number of events dispatched.
    ///
    /// # Errors
    /// The last source error once it failed several times in a row. Actors are
    /// still drained before returning.
    pub async fn run(&self, mut source: impl EventSource) -> Result<usize, TransportError> {
        let (guard_sender, mut guard_receiver) = mpsc::channel::<()>(1);
        let actors: Cache<ChatId, mpsc::UnboundedSender<ChatEvent>> = Cache::builder()
            .max_capacity(self.actor_capacity)
            .time_to_idle(self.idle_timeout)
            .build();

        let mut dispatched = 0;
        let mut consecutive_failures = 0;

        // NOTE: Keyed by chat id so a chat's flow state is only ever touched by its own actor
        let outcome = loop {
            match source.next_event().await {
                Ok(Some(event)) => {
                    consecutive_failures = 0;
                    self.dispatch(&actors, &guard_sender, event).await;
                    dispatched += 1;
                }
                Ok(None) => break Ok(dispatched),
                Err(error @ TransportError::Conflict) => {
                    warn!("{error}; continuing");
                    sleep(self.retry_delay).await;
                }
                Err(error) => {
                    consecutive_failures += 1;

                    if consecutive_failures >= MAX_CONSECUTIVE_FAILURES {
                        error!("Event source failed {consecutive_failures} times in a row, stopping: {error}");
                        break Err(error);
                    }

                    warn!("Event source failed (attempt {consecutive_failures}), retrying: {error}");
                    sleep(self.retry_delay * consecutive_failures).await;
                }
            }
        };

        //NOTE: Provide a graceful shutdown and wait for all actors to finish processing their individual queues
        drop(actors);
        drop(guard_sender);

        while guard_receiver.recv().await.is_some() {}

        info!("Dispatcher stopped after {dispatched} events, {} flows left open", self.sessions.active_count());

        outcome
    }

    async fn dispatch(&self, actors: &Cache<ChatId, mpsc::UnboundedSender<ChatEvent>>, guard_sender: &mpsc::Sender<()>, event: ChatEvent) {
        let chat_id = event.chat_id;

        let actor = actors.get_with(chat_id, async {
            debug!("Spawning chat actor for chat [{chat_id}]");
            ChatActor::spawn(chat_id, self.controller.clone(), self.sessions.clone(), guard_sender.clone())
        }).await;

        if let Err(rejected) = actor.send(event) {
            error!("Chat actor for chat [{chat_id}] could not accept an event, respawning");
            actors.invalidate(&chat_id).await;

            let actor = ChatActor::spawn(chat_id, self.controller.clone(), self.sessions.clone(), guard_sender.clone());

            if actor.send(rejected.0).is_err() {
                error!("Event for chat [{chat_id}] was dropped");
            }

            actors.insert(chat_id, actor).await;
        }
    }
}
