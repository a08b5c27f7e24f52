use std::sync::Arc;

use tokio::spawn;
use tokio::sync::mpsc;
use tracing::debug;

use crate::dialog::DialogController;
use crate::storage::{SessionStorage, Storage};
use crate::transport::{ChatEvent, ChatTransport};
use crate::types::ChatId;

pub struct ChatActor;

impl ChatActor {
    /// Spawns a new actor for one chat and returns its input channel.
    ///
    /// Events are handled strictly in arrival order. An actor that replaces an
    /// evicted one for the same chat waits until the old actor has drained its
    /// queue. The task ends once every sender is dropped and the queue is
    /// drained, releasing `guard_sender`.
    pub fn spawn<S: Storage, T: ChatTransport>(
        chat_id: ChatId,
        controller: Arc<DialogController<S, T>>,
        sessions: Arc<SessionStorage>,
        guard_sender: mpsc::Sender<()>
    ) -> mpsc::UnboundedSender<ChatEvent> {
        let (sender, mut receiver) = mpsc::unbounded_channel::<ChatEvent>();
        let mut claim = sessions.claim(chat_id);

        spawn(async move {
            claim.wait_for_previous().await;

            while let Some(event) = receiver.recv().await {
                let mut session = sessions.load(chat_id);

                controller.handle(&mut session, event).await;

                //NOTE: Sessions that reached idle are dropped here rather than parked
                sessions.save(chat_id, session);
            }

            sessions.release(claim);

            debug!("Chat actor for chat [{chat_id}] stopped");

            drop(guard_sender);
        });

        sender
    }
}
