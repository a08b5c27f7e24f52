use super::Dispatcher;
use crate::dialog::DialogController;
use crate::storage::{MemoryStorage, RecordStore, SessionStorage};
use crate::transport::mock::{RecordingTransport, ScriptedSource};
use crate::transport::{ChatEvent, TransportError};
use crate::types::{ChatId, Status};
use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;

struct Fixture {
    dispatcher: Dispatcher<MemoryStorage, RecordingTransport>,
    store: Arc<RecordStore<MemoryStorage>>,
    transport: Arc<RecordingTransport>,
    sessions: Arc<SessionStorage>
}

fn create_fixture() -> Fixture {
    create_fixture_with_capacity(16)
}

fn create_fixture_with_capacity(actor_capacity: u64) -> Fixture {
    let store = Arc::new(RecordStore::new(MemoryStorage::new()));
    let transport = Arc::new(RecordingTransport::new());
    let sessions = Arc::new(SessionStorage::new());
    let controller = Arc::new(DialogController::new(store.clone(), transport.clone()));

    let dispatcher = Dispatcher::new(controller, sessions.clone())
        .with_actor_capacity(actor_capacity)
        .with_idle_timeout(Duration::from_secs(60))
        .with_retry_delay(Duration::from_millis(1));

    Fixture { dispatcher, store, transport, sessions }
}

fn add_flow(chat_id: ChatId, name: &str) -> Vec<ChatEvent> {
    let mut events: Vec<ChatEvent> = ["/add", "Mbank", name, "0700112233", "4177 0000"].iter()
        .enumerate()
        .map(|(index, line)| ChatEvent::from_text(chat_id, Some(index as i64 + 1), line))
        .collect();

    events.push(ChatEvent::button(chat_id, None, format!("STATUS_CHOICE_{}", Status::Resting.index())));

    events
}

/// Interleaves two scripts event by event.
fn interleave(first: Vec<ChatEvent>, second: Vec<ChatEvent>) -> Vec<ChatEvent> {
    let mut merged = Vec::new();
    let mut second = second.into_iter();

    for event in first {
        merged.push(event);
        merged.extend(second.next());
    }

    merged.extend(second);
    merged
}

#[tokio::test]
async fn test_interleaved_chats_complete_independent_flows() -> Result<()> {
    let fixture = create_fixture();
    let script = interleave(add_flow(1, "First Person"), add_flow(2, "Second Person"));

    let dispatched = fixture.dispatcher.run(ScriptedSource::new(script)).await?;

    let mut names: Vec<String> = fixture.store.load()?.into_iter().map(|record| record.full_name).collect();
    names.sort();

    assert_eq!(dispatched, 12);
    assert_eq!(names, vec!["First Person".to_string(), "Second Person".to_string()]);
    assert_eq!(fixture.sessions.active_count(), 0);

    let mut ids: Vec<String> = fixture.store.load()?.into_iter().map(|record| record.id).collect();
    ids.sort();
    assert_eq!(ids, vec!["1".to_string(), "2".to_string()]);

    Ok(())
}

#[tokio::test]
async fn test_flows_survive_actor_eviction_when_the_cache_is_full() -> Result<()> {
    let fixture = create_fixture_with_capacity(1);
    let script = interleave(add_flow(1, "First Person"), add_flow(2, "Second Person"));

    fixture.dispatcher.run(ScriptedSource::new(script)).await?;

    let mut records = fixture.store.load()?;
    records.sort_by(|left, right| left.full_name.cmp(&right.full_name));

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].full_name, "First Person");
    assert_eq!(records[1].full_name, "Second Person");

    for record in &records {
        assert_eq!(record.bank, "Mbank");
        assert_eq!(record.phone, "+996700112233");
        assert_eq!(record.status, Status::Resting);
    }

    assert_eq!(fixture.sessions.active_count(), 0);

    Ok(())
}

#[tokio::test]
async fn test_unfinished_flows_stay_parked_after_shutdown() -> Result<()> {
    let fixture = create_fixture();
    let script = vec![
        ChatEvent::from_text(5, Some(1), "/add"),
        ChatEvent::from_text(5, Some(2), "Mbank"),
    ];

    fixture.dispatcher.run(ScriptedSource::new(script)).await?;

    assert_eq!(fixture.sessions.active_count(), 1);
    assert!(fixture.store.load()?.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_conflicts_are_not_fatal() -> Result<()> {
    let fixture = create_fixture();
    let script = vec![
        Err(TransportError::Conflict),
        Ok(Some(ChatEvent::from_text(1, Some(1), "/start"))),
        Err(TransportError::Conflict),
        Err(TransportError::Conflict),
        Err(TransportError::Conflict),
        Err(TransportError::Conflict),
        Err(TransportError::Conflict),
        Ok(Some(ChatEvent::from_text(1, Some(2), "/help"))),
    ];

    let dispatched = fixture.dispatcher.run(ScriptedSource::from_results(script)).await?;

    assert_eq!(dispatched, 2);
    assert_eq!(fixture.transport.sent().len(), 2);

    Ok(())
}

#[tokio::test]
async fn test_transient_failures_are_retried() -> Result<()> {
    let fixture = create_fixture();
    let script = vec![
        Err(TransportError::delivery(0, "timeout")),
        Err(TransportError::delivery(0, "timeout")),
        Ok(Some(ChatEvent::from_text(1, Some(1), "/menu"))),
    ];

    let dispatched = fixture.dispatcher.run(ScriptedSource::from_results(script)).await?;

    assert_eq!(dispatched, 1);

    Ok(())
}

#[tokio::test]
async fn test_repeated_failures_stop_the_loop() -> Result<()> {
    let fixture = create_fixture();
    let mut script = vec![Ok(Some(ChatEvent::from_text(1, Some(1), "/start")))];
    script.extend((0..10).map(|_| Err(TransportError::delivery(0, "unreachable"))));

    let result = fixture.dispatcher.run(ScriptedSource::from_results(script)).await;

    assert!(matches!(result, Err(TransportError::Delivery { .. })));
    //NOTE: Events dispatched before the failure were still handled
    assert_eq!(fixture.transport.sent().len(), 1);

    Ok(())
}
