use super::ChatActor;
use crate::dialog::DialogController;
use crate::storage::{MemoryStorage, RecordStore, SessionStorage};
use crate::transport::mock::RecordingTransport;
use crate::transport::ChatEvent;
use crate::types::Status;
use anyhow::Result;
use std::sync::Arc;
use tokio::sync::mpsc;

fn create_controller() -> (Arc<DialogController<MemoryStorage, RecordingTransport>>, Arc<RecordStore<MemoryStorage>>, Arc<RecordingTransport>) {
    let store = Arc::new(RecordStore::new(MemoryStorage::new()));
    let transport = Arc::new(RecordingTransport::new());
    let controller = Arc::new(DialogController::new(store.clone(), transport.clone()));

    (controller, store, transport)
}

#[tokio::test]
async fn test_actors_keep_chat_sessions_isolated() -> Result<()> {
    let (controller, _, transport) = create_controller();
    let sessions = Arc::new(SessionStorage::new());
    let (guard_sender, mut guard_receiver) = mpsc::channel::<()>(1);

    let chat_1 = ChatActor::spawn(1, controller.clone(), sessions.clone(), guard_sender.clone());
    let chat_2 = ChatActor::spawn(2, controller.clone(), sessions.clone(), guard_sender.clone());
    drop(guard_sender);

    chat_1.send(ChatEvent::from_text(1, Some(1), "/add"))?;
    chat_2.send(ChatEvent::from_text(2, Some(1), "/search"))?;
    chat_1.send(ChatEvent::from_text(1, Some(2), "Mbank"))?;

    drop(chat_1);
    drop(chat_2);

    //NOTE: Resolves once both actors drained their queues and released the guard
    assert!(guard_receiver.recv().await.is_none());

    assert_eq!(sessions.active_count(), 2);
    assert_eq!(sessions.load(1).draft.bank, "Mbank");
    assert!(sessions.load(2).is_active());
    assert_eq!(transport.sent().iter().filter(|sent| sent.chat_id == 1).count(), 2);

    Ok(())
}

#[tokio::test]
async fn test_actor_drops_finished_sessions() -> Result<()> {
    let (controller, store, _) = create_controller();
    let sessions = Arc::new(SessionStorage::new());
    let (guard_sender, mut guard_receiver) = mpsc::channel::<()>(1);

    let actor = ChatActor::spawn(7, controller, sessions.clone(), guard_sender);

    actor.send(ChatEvent::from_text(7, Some(1), "/add"))?;
    actor.send(ChatEvent::from_text(7, Some(2), "/cancel"))?;
    drop(actor);

    assert!(guard_receiver.recv().await.is_none());

    assert_eq!(sessions.active_count(), 0);
    assert!(store.load()?.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_replacement_actor_waits_for_the_one_it_replaces() -> Result<()> {
    let (controller, store, _) = create_controller();
    let sessions = Arc::new(SessionStorage::new());
    let (guard_sender, mut guard_receiver) = mpsc::channel::<()>(1);

    let evicted = ChatActor::spawn(3, controller.clone(), sessions.clone(), guard_sender.clone());
    evicted.send(ChatEvent::from_text(3, Some(1), "/add"))?;
    evicted.send(ChatEvent::from_text(3, Some(2), "Mbank"))?;

    let replacement = ChatActor::spawn(3, controller, sessions.clone(), guard_sender);
    replacement.send(ChatEvent::from_text(3, Some(3), "Late Arrival"))?;
    replacement.send(ChatEvent::from_text(3, Some(4), "0700112233"))?;
    replacement.send(ChatEvent::from_text(3, Some(5), "4177 0000"))?;
    replacement.send(ChatEvent::button(3, None, format!("STATUS_CHOICE_{}", Status::Resting.index())))?;

    drop(replacement);
    drop(evicted);

    assert!(guard_receiver.recv().await.is_none());

    let records = store.load()?;
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].bank, "Mbank");
    assert_eq!(records[0].full_name, "Late Arrival");
    assert_eq!(sessions.active_count(), 0);

    Ok(())
}
