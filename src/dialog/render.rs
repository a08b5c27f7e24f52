use crate::dialog::action::ButtonAction;
use crate::dialog::session::{AddStep, FilterKind};
use crate::models::Record;
use crate::transport::{Button, Keyboard, OutgoingMessage};
use crate::types::Status;

/// Largest number of record buttons attached to one message.
pub const MAX_BUTTONS_PER_MESSAGE: usize = 25;

const NAME_LABEL_CHARS: usize = 25;
const RULE: &str = "━━━━━━━━━━━━━━━━━━━━";

pub const WELCOME: &str = "👋 Welcome!\n\n\
    I keep the registry of accounts (LK).\n\n\
    ✨ What I can do:\n\
    • add new accounts\n\
    • list every record\n\
    • search and filter\n\
    • change statuses\n\n\
    Pick an action below 👇";

pub const HELP: &str = "📖 Commands\n\n\
    /start - show the main menu\n\
    /menu - open the menu\n\
    /help - this help\n\n\
    /add_lk - add a new account\n\
    /lk - list every account\n\
    /view <id> - show one account\n\
    /edit <id> - change an account's status\n\
    /delete <id> - delete an account\n\n\
    /search - search every field\n\
    /filter_name - filter by name\n\
    /filter_bank - filter by bank\n\
    /filter_status - filter by status\n\n\
    /cancel - cancel the current operation";

pub const MENU_TITLE: &str = "📱 Main menu";
pub const EMPTY_FIELD: &str = "⚠️ This field cannot be empty!";
pub const CHOOSE_WITH_BUTTONS: &str = "👆 Please choose a status with the buttons above.";
pub const FUNDS_PROMPT: &str = "💰 Enter the remaining funds (amount or comment):";
pub const CANCELLED: &str = "❌ Operation cancelled";
pub const NOTHING_TO_CANCEL: &str = "ℹ️ There is no operation to cancel.";
pub const NOT_FOUND: &str = "❌ Error\n\nNo account with that ID.";
pub const NO_MATCHES: &str = "🔍 Search results\n\n❌ No matches found.";
pub const EMPTY_STORE: &str = "📭 The registry is empty\n\nAdd the first account with the ➕ button!";
pub const MISSING_ID: &str = "⚠️ Please give an account ID, for example: /view 12";
pub const UNKNOWN_COMMAND: &str = "🤔 Unknown command. Send /help for the list.";
pub const FAILURE: &str = "❌ Something went wrong, the operation was abandoned.";

pub fn add_prompt(step: AddStep) -> &'static str {
    match step {
        AddStep::Bank => "➕ Adding a new account\n\n🏦 Step 1/5: Enter the bank name:",
        AddStep::Name => "👤 Step 2/5: Enter the full name:",
        AddStep::Phone => "📞 Step 3/5: Enter the phone number:",
        AddStep::Card => "💳 Step 4/5: Enter the card number:",
        AddStep::Status => "📌 Step 5/5: Choose a status:",
        AddStep::Funds => FUNDS_PROMPT
    }
}

pub fn filter_prompt(kind: FilterKind) -> &'static str {
    match kind {
        FilterKind::Name => "👤 Search by name\n\nEnter a name or part of it:",
        FilterKind::Bank => "🏦 Search by bank\n\nEnter a bank name or part of it:",
        FilterKind::AnyField => "🔍 Search every field\n\nEnter a query (name, bank, phone, card...):"
    }
}

pub fn main_menu() -> Keyboard {
    Keyboard::new(vec![
        vec![Button::new("➕ Add account", ButtonAction::AddRecord)],
        vec![Button::new("📋 Show all accounts", ButtonAction::ListRecords)],
        vec![
            Button::new("🔍 Search", ButtonAction::Filter(FilterKind::AnyField)),
            Button::new("👤 By name", ButtonAction::Filter(FilterKind::Name)),
        ],
        vec![
            Button::new("🏦 By bank", ButtonAction::Filter(FilterKind::Bank)),
            Button::new("📌 By status", ButtonAction::FilterStatus),
        ],
    ])
}

pub fn menu_message(text: impl Into<String>) -> OutgoingMessage {
    OutgoingMessage::with_keyboard(text, main_menu())
}

/// One button per status, in display order, with the payload built by `action`.
pub fn status_keyboard(action: fn(usize) -> ButtonAction) -> Keyboard {
    Keyboard::column(Status::ALL.iter().map(|status| {
        Button::new(format!("{} {}", status.emoji(), status), action(status.index()))
    }))
}

pub fn record_actions(record_id: &str) -> Keyboard {
    Keyboard::new(vec![
        vec![Button::new("✏️ Change status", ButtonAction::EditStatus(record_id.to_string()))],
        vec![
            Button::new("🗑 Delete", ButtonAction::Delete(record_id.to_string())),
            Button::new("⬅ Menu", ButtonAction::BackToMenu),
        ],
    ])
}

pub fn after_add_actions() -> Keyboard {
    Keyboard::new(vec![
        vec![Button::new("📋 All accounts", ButtonAction::ListRecords)],
        vec![Button::new("⬅ Menu", ButtonAction::BackToMenu)],
    ])
}

pub fn format_record(record: &Record) -> String {
    let mut text = format!(
        "{RULE}\n🆔 ID: {}\n🏦 Bank: {}\n👤 Name: {}\n📞 Phone: {}\n💳 Card: {}\n{} Status: {}\n",
        record.id,
        record.bank,
        record.full_name,
        record.phone,
        record.card,
        record.status.emoji(),
        record.status
    );

    if let Some(funds) = &record.remaining_funds {
        text.push_str(&format!("💰 Remaining: {funds}\n"));
    }

    text.push_str(RULE);
    text
}

pub fn record_button(record: &Record) -> Button {
    let name: String = record.full_name.chars().take(NAME_LABEL_CHARS).collect();
    Button::new(format!("{} {} | {}", record.status.emoji(), record.id, name), ButtonAction::View(record.id.clone()))
}

/// Splits records into messages of at most [`MAX_BUTTONS_PER_MESSAGE`] buttons.
///
/// The first page is titled `title`; later pages are numbered continuations.
pub fn result_pages(records: &[Record], title: &str) -> Vec<OutgoingMessage> {
    records.chunks(MAX_BUTTONS_PER_MESSAGE)
        .enumerate()
        .map(|(index, chunk)| {
            let heading = if index == 0 {
                title.to_string()
            } else {
                format!("📄 Continued ({}):", index + 1)
            };

            OutgoingMessage::with_keyboard(heading, Keyboard::column(chunk.iter().map(record_button)))
        })
        .collect()
}

pub fn added(record: &Record) -> String {
    format!(
        "✅ Done!\n\nAccount #{} was added.\n\n{} Status: {}\n👤 {}",
        record.id,
        record.status.emoji(),
        record.status,
        record.full_name
    )
}

pub fn status_updated(record: &Record) -> String {
    match &record.remaining_funds {
        Some(funds) => format!("✅ Updated\n\n{} Status: {}\n💰 Remaining: {funds}", record.status.emoji(), record.status),
        None => format!("✅ Status updated\n\n{} New status: {}", record.status.emoji(), record.status)
    }
}

pub fn deleted(record: &Record) -> String {
    format!("🗑 Deleted\n\nAccount #{} was removed.\n👤 {}", record.id, record.full_name)
}
