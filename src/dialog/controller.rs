use crate::dialog::action::{ButtonAction, Command, UnknownPayload};
use crate::dialog::errors::DialogError;
use crate::dialog::render;
use crate::dialog::session::{AddStep, EditStep, FilterKind, FlowState, Session};
use crate::models::Record;
use crate::storage::{RecordStore, Storage, StoreError};
use crate::transport::{ChatEvent, ChatTransport, EventKind, OutgoingMessage};
use crate::types::{ChatId, MessageId, RecordId, Status};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Drives one chat's dialog: interprets each event against the session state
/// and turns completed flows into record store mutations.
///
/// Nothing reaches the store before a flow finalizes, so an abandoned flow
/// leaves no trace besides the prompts it already sent.
pub struct DialogController<S: Storage, T: ChatTransport> {
    store: Arc<RecordStore<S>>,
    transport: Arc<T>
}

impl<S: Storage, T: ChatTransport> DialogController<S, T> {
    pub fn new(store: Arc<RecordStore<S>>, transport: Arc<T>) -> Self {
        Self { store, transport }
    }

    /// Handles one event to completion.
    ///
    /// Failures never escape: they are logged, the flow is abandoned and the
    /// user is told, so the caller can keep serving the chat.
    pub async fn handle(&self, session: &mut Session, event: ChatEvent) {
        let chat_id = event.chat_id;

        if let Err(error) = self.route(session, event).await {
            error!("Dialog for chat [{chat_id}] failed, abandoning the flow: {error}");

            self.release(chat_id, session.finish()).await;

            if let Err(error) = self.transport.send(chat_id, render::menu_message(render::FAILURE)).await {
                warn!("Could not report the failure to chat [{chat_id}]: {error}");
            }
        }
    }

    async fn route(&self, session: &mut Session, event: ChatEvent) -> Result<(), DialogError> {
        let ChatEvent { chat_id, message_id, kind } = event;

        match kind {
            EventKind::Command { name, args } => {
                self.on_command(session, chat_id, message_id, Command::parse(&name, &args)).await
            }
            EventKind::Button(payload) => match payload.parse::<ButtonAction>() {
                Ok(action) => self.on_button(session, chat_id, message_id, action).await,
                Err(UnknownPayload(payload)) => {
                    warn!("Ignoring unknown button payload [{payload}] for chat [{chat_id}]");
                    Ok(())
                }
            },
            EventKind::Text(text) => self.on_text(session, chat_id, message_id, &text).await
        }
    }

    async fn on_command(&self, session: &mut Session, chat_id: ChatId, message_id: Option<MessageId>, command: Command) -> Result<(), DialogError> {
        match command {
            Command::Start => self.send(chat_id, render::menu_message(render::WELCOME)).await,
            Command::Help => self.send(chat_id, OutgoingMessage::text(render::HELP)).await,
            Command::Menu => self.send(chat_id, render::menu_message(render::MENU_TITLE)).await,
            Command::List => self.list_all(chat_id).await,
            Command::View(record_id) => match required_id(record_id) {
                Some(record_id) => self.view(chat_id, &record_id).await,
                None => self.send(chat_id, OutgoingMessage::text(render::MISSING_ID)).await
            },
            Command::Add => self.begin_add(session, chat_id).await,
            Command::Filter(kind) => self.begin_filter(session, chat_id, kind).await,
            Command::FilterStatus => self.offer_status_filter(chat_id).await,
            Command::Cancel => self.cancel(session, chat_id, message_id).await,
            Command::Delete(record_id) => match required_id(record_id) {
                Some(record_id) => self.delete(chat_id, None, &record_id).await,
                None => self.send(chat_id, OutgoingMessage::text(render::MISSING_ID)).await
            },
            Command::Edit(record_id) => match required_id(record_id) {
                Some(record_id) => self.begin_edit(session, chat_id, record_id).await,
                None => self.send(chat_id, OutgoingMessage::text(render::MISSING_ID)).await
            },
            Command::Unknown(name) => {
                debug!("Unknown command [/{name}] for chat [{chat_id}]");
                self.send(chat_id, OutgoingMessage::text(render::UNKNOWN_COMMAND)).await
            }
        }
    }

    async fn on_button(&self, session: &mut Session, chat_id: ChatId, message_id: Option<MessageId>, action: ButtonAction) -> Result<(), DialogError> {
        match action {
            ButtonAction::AddRecord => self.begin_add(session, chat_id).await,
            ButtonAction::ListRecords => self.list_all(chat_id).await,
            ButtonAction::Filter(kind) => self.begin_filter(session, chat_id, kind).await,
            ButtonAction::FilterStatus => self.offer_status_filter(chat_id).await,
            ButtonAction::FilterStatusValue(index) => match Status::from_index(index) {
                Ok(status) => self.filter_by_status(chat_id, status).await,
                Err(error) => {
                    warn!("Ignoring status filter for chat [{chat_id}]: {error}");
                    Ok(())
                }
            },
            ButtonAction::StatusChoice(index) => self.choose_add_status(session, chat_id, index).await,
            ButtonAction::EditStatus(record_id) => self.begin_edit(session, chat_id, record_id).await,
            ButtonAction::EditStatusChoice(index) => self.choose_edit_status(session, chat_id, index).await,
            ButtonAction::View(record_id) => self.view(chat_id, &record_id).await,
            ButtonAction::Delete(record_id) => self.delete(chat_id, message_id, &record_id).await,
            ButtonAction::BackToMenu => {
                self.discard(chat_id, message_id).await;
                self.send(chat_id, render::menu_message(render::MENU_TITLE)).await
            }
        }
    }

    async fn on_text(&self, session: &mut Session, chat_id: ChatId, message_id: Option<MessageId>, text: &str) -> Result<(), DialogError> {
        let value = text.trim();

        match session.state.clone() {
            FlowState::Idle => {
                debug!("Ignoring text outside of a flow for chat [{chat_id}]");
                Ok(())
            }
            FlowState::Add(AddStep::Status) | FlowState::EditStatus { step: EditStep::ChooseStatus, .. } => {
                self.prompt(session, chat_id, OutgoingMessage::text(render::CHOOSE_WITH_BUTTONS)).await
            }
            _ if value.is_empty() => self.reprompt(session, chat_id).await,
            FlowState::Add(step) => {
                self.discard(chat_id, message_id).await;
                self.advance_add(session, chat_id, step, value.to_string()).await
            }
            FlowState::Filter(kind) => self.run_filter(session, chat_id, kind, value).await,
            FlowState::EditStatus { record_id, step: EditStep::Funds(status) } => {
                self.discard(chat_id, message_id).await;
                self.finish_edit(session, chat_id, &record_id, status, Some(value.to_string())).await
            }
        }
    }

    async fn begin_add(&self, session: &mut Session, chat_id: ChatId) -> Result<(), DialogError> {
        self.abandon(session, chat_id).await;
        session.begin_add();

        debug!("Add flow started for chat [{chat_id}]");

        self.prompt(session, chat_id, OutgoingMessage::text(render::add_prompt(AddStep::Bank))).await
    }

    async fn advance_add(&self, session: &mut Session, chat_id: ChatId, step: AddStep, value: String) -> Result<(), DialogError> {
        let next = match step {
            AddStep::Bank => {
                session.draft.bank = value;
                AddStep::Name
            }
            AddStep::Name => {
                session.draft.full_name = value;
                AddStep::Phone
            }
            AddStep::Phone => {
                session.draft.phone = value;
                AddStep::Card
            }
            AddStep::Card => {
                session.draft.card = value;
                AddStep::Status
            }
            AddStep::Funds => {
                session.draft.remaining_funds = Some(value);
                return self.finish_add(session, chat_id).await;
            }
            AddStep::Status => return Ok(())
        };

        session.state = FlowState::Add(next);

        let message = match next {
            AddStep::Status => OutgoingMessage::with_keyboard(
                render::add_prompt(next),
                render::status_keyboard(ButtonAction::StatusChoice)
            ),
            _ => OutgoingMessage::text(render::add_prompt(next))
        };

        self.prompt(session, chat_id, message).await
    }

    async fn choose_add_status(&self, session: &mut Session, chat_id: ChatId, index: usize) -> Result<(), DialogError> {
        if session.state != FlowState::Add(AddStep::Status) {
            debug!("Ignoring stale status choice for chat [{chat_id}]");
            return Ok(());
        }

        let status = match Status::from_index(index) {
            Ok(status) => status,
            Err(error) => {
                warn!("Ignoring status choice for chat [{chat_id}]: {error}");
                return Ok(());
            }
        };

        session.draft.status = Some(status);

        if status.requires_funds() {
            session.state = FlowState::Add(AddStep::Funds);
            return self.prompt(session, chat_id, OutgoingMessage::text(render::FUNDS_PROMPT)).await;
        }

        self.finish_add(session, chat_id).await
    }

    async fn finish_add(&self, session: &mut Session, chat_id: ChatId) -> Result<(), DialogError> {
        let mut draft = std::mem::take(&mut session.draft);
        draft.normalize();

        let record = self.store.add(draft)?;

        info!("Record [{}] added from chat [{chat_id}]", record.id);

        self.release(chat_id, session.finish()).await;
        self.send(chat_id, OutgoingMessage::with_keyboard(render::added(&record), render::after_add_actions())).await
    }

    async fn begin_filter(&self, session: &mut Session, chat_id: ChatId, kind: FilterKind) -> Result<(), DialogError> {
        self.abandon(session, chat_id).await;
        session.begin_filter(kind);

        self.prompt(session, chat_id, OutgoingMessage::text(render::filter_prompt(kind))).await
    }

    async fn run_filter(&self, session: &mut Session, chat_id: ChatId, kind: FilterKind, term: &str) -> Result<(), DialogError> {
        let records = match kind.field() {
            Some(field) => self.store.filter_by_field_substring(field, term)?,
            None => self.store.filter_by_any_field_substring(term)?
        };

        debug!("Filter [{kind:?}] for chat [{chat_id}] matched {} records", records.len());

        self.release(chat_id, session.finish()).await;
        self.send_results(chat_id, &records, &format!("🔍 Found: {}", records.len())).await
    }

    async fn offer_status_filter(&self, chat_id: ChatId) -> Result<(), DialogError> {
        let message = OutgoingMessage::with_keyboard(
            "📌 Filter by status\n\nChoose a status:",
            render::status_keyboard(ButtonAction::FilterStatusValue)
        );

        self.send(chat_id, message).await
    }

    async fn filter_by_status(&self, chat_id: ChatId, status: Status) -> Result<(), DialogError> {
        let records = self.store.filter_by_status(status)?;
        let title = format!("{} Status: {status}\n\nFound: {}", status.emoji(), records.len());

        self.send_results(chat_id, &records, &title).await
    }

    async fn begin_edit(&self, session: &mut Session, chat_id: ChatId, record_id: RecordId) -> Result<(), DialogError> {
        self.abandon(session, chat_id).await;

        let Some(record) = self.store.find_by_id(&record_id)? else {
            return self.send(chat_id, OutgoingMessage::text(render::NOT_FOUND)).await;
        };

        session.begin_edit(record_id);

        let message = OutgoingMessage::with_keyboard(
            format!(
                "✏️ Changing the status of account #{}\n\nCurrent: {} {}\n\nChoose a new status:",
                record.id,
                record.status.emoji(),
                record.status
            ),
            render::status_keyboard(ButtonAction::EditStatusChoice)
        );

        self.prompt(session, chat_id, message).await
    }

    async fn choose_edit_status(&self, session: &mut Session, chat_id: ChatId, index: usize) -> Result<(), DialogError> {
        let FlowState::EditStatus { record_id, step: EditStep::ChooseStatus } = session.state.clone() else {
            debug!("Ignoring stale edit status choice for chat [{chat_id}]");
            return Ok(());
        };

        let status = match Status::from_index(index) {
            Ok(status) => status,
            Err(error) => {
                warn!("Ignoring edit status choice for chat [{chat_id}]: {error}");
                return Ok(());
            }
        };

        if status.requires_funds() {
            session.state = FlowState::EditStatus { record_id, step: EditStep::Funds(status) };
            return self.prompt(session, chat_id, OutgoingMessage::text(render::FUNDS_PROMPT)).await;
        }

        self.finish_edit(session, chat_id, &record_id, status, None).await
    }

    async fn finish_edit(&self, session: &mut Session, chat_id: ChatId, record_id: &str, status: Status, funds: Option<String>) -> Result<(), DialogError> {
        self.release(chat_id, session.finish()).await;

        match self.store.update_status(record_id, status, funds) {
            Ok(record) => {
                info!("Record [{record_id}] set to [{status}] from chat [{chat_id}]");
                self.send(chat_id, render::menu_message(render::status_updated(&record))).await
            }
            //NOTE: The record can disappear between entering the flow and finishing it
            Err(StoreError::NotFound(_)) => self.send(chat_id, OutgoingMessage::text(render::NOT_FOUND)).await,
            Err(error) => Err(error.into())
        }
    }

    async fn cancel(&self, session: &mut Session, chat_id: ChatId, message_id: Option<MessageId>) -> Result<(), DialogError> {
        if !session.is_active() {
            return self.send(chat_id, OutgoingMessage::text(render::NOTHING_TO_CANCEL)).await;
        }

        debug!("Flow cancelled for chat [{chat_id}]");

        self.release(chat_id, session.finish()).await;
        self.discard(chat_id, message_id).await;

        self.send(chat_id, render::menu_message(render::CANCELLED)).await
    }

    async fn list_all(&self, chat_id: ChatId) -> Result<(), DialogError> {
        let records = self.store.load()?;

        if records.is_empty() {
            return self.send(chat_id, render::menu_message(render::EMPTY_STORE)).await;
        }

        self.send_results(chat_id, &records, &format!("📋 All accounts ({}):", records.len())).await
    }

    async fn view(&self, chat_id: ChatId, record_id: &str) -> Result<(), DialogError> {
        let message = match self.store.find_by_id(record_id)? {
            Some(record) => OutgoingMessage::with_keyboard(render::format_record(&record), render::record_actions(&record.id)),
            None => OutgoingMessage::text(render::NOT_FOUND)
        };

        self.send(chat_id, message).await
    }

    /// Deletes a record. `details` is the record card the delete button sat on.
    async fn delete(&self, chat_id: ChatId, details: Option<MessageId>, record_id: &str) -> Result<(), DialogError> {
        let Some(record) = self.store.delete_by_id(record_id)? else {
            return self.send(chat_id, OutgoingMessage::text(render::NOT_FOUND)).await;
        };

        info!("Record [{record_id}] deleted from chat [{chat_id}]");

        self.discard(chat_id, details).await;
        self.send(chat_id, render::menu_message(render::deleted(&record))).await
    }

    async fn send_results(&self, chat_id: ChatId, records: &[Record], title: &str) -> Result<(), DialogError> {
        if records.is_empty() {
            return self.send(chat_id, render::menu_message(render::NO_MATCHES)).await;
        }

        for page in render::result_pages(records, title) {
            self.send(chat_id, page).await?;
        }

        Ok(())
    }

    async fn reprompt(&self, session: &mut Session, chat_id: ChatId) -> Result<(), DialogError> {
        let prompt = match session.state {
            FlowState::Add(step) => render::add_prompt(step),
            FlowState::Filter(kind) => render::filter_prompt(kind),
            _ => render::FUNDS_PROMPT
        };

        self.prompt(session, chat_id, OutgoingMessage::text(format!("{}\n\n{prompt}", render::EMPTY_FIELD))).await
    }

    /// Sends a transient prompt that is deleted when the flow ends.
    async fn prompt(&self, session: &mut Session, chat_id: ChatId, message: OutgoingMessage) -> Result<(), DialogError> {
        let message_id = self.transport.send(chat_id, message).await?;
        session.track(message_id);

        Ok(())
    }

    async fn send(&self, chat_id: ChatId, message: OutgoingMessage) -> Result<(), DialogError> {
        self.transport.send(chat_id, message).await?;

        Ok(())
    }

    /// Ends any active flow before another one starts.
    async fn abandon(&self, session: &mut Session, chat_id: ChatId) {
        if session.is_active() {
            debug!("Abandoning flow [{:?}] for chat [{chat_id}]", session.state);
            self.release(chat_id, session.finish()).await;
        }
    }

    async fn release(&self, chat_id: ChatId, handles: Vec<MessageId>) {
        for message_id in handles {
            self.discard(chat_id, Some(message_id)).await;
        }
    }

    async fn discard(&self, chat_id: ChatId, message_id: Option<MessageId>) {
        let Some(message_id) = message_id else {
            return;
        };

        if let Err(error) = self.transport.delete(chat_id, message_id).await {
            debug!("Cleanup skipped for chat [{chat_id}]: {error}");
        }
    }
}

fn required_id(record_id: String) -> Option<RecordId> {
    let record_id = record_id.trim().to_string();
    (!record_id.is_empty()).then_some(record_id)
}
