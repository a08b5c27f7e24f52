use crate::dialog::session::FilterKind;
use crate::types::RecordId;
use std::fmt;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// A slash command, resolved from its name and aliases.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Start,
    Help,
    Menu,
    List,
    View(String),
    Add,
    Filter(FilterKind),
    FilterStatus,
    Cancel,
    Delete(String),
    Edit(String),
    Unknown(String)
}

impl Command {
    pub fn parse(name: &str, args: &str) -> Self {
        let argument = args.trim().to_string();

        match name {
            "start" => Command::Start,
            "help" => Command::Help,
            "menu" => Command::Menu,
            "lk" | "list" => Command::List,
            "view" => Command::View(argument),
            "add" | "add_lk" => Command::Add,
            "filter_name" => Command::Filter(FilterKind::Name),
            "filter_bank" => Command::Filter(FilterKind::Bank),
            "search" => Command::Filter(FilterKind::AnyField),
            "filter_status" => Command::FilterStatus,
            "cancel" => Command::Cancel,
            "delete" => Command::Delete(argument),
            "edit" => Command::Edit(argument),
            other => Command::Unknown(other.to_string())
        }
    }
}

/// A decoded inline-button payload.
///
/// Status choices carry an index into `Status::ALL`; record actions carry the
/// record id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ButtonAction {
    AddRecord,
    ListRecords,
    Filter(FilterKind),
    FilterStatus,
    FilterStatusValue(usize),
    StatusChoice(usize),
    EditStatus(RecordId),
    EditStatusChoice(usize),
    View(RecordId),
    Delete(RecordId),
    BackToMenu
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownPayload(pub String);

fn digits(value: &str) -> Option<&str> {
    (!value.is_empty() && value.chars().all(|character| character.is_ascii_digit())).then_some(value)
}

fn index(value: &str) -> Option<usize> {
    digits(value).and_then(|value| value.parse().ok())
}

impl FromStr for ButtonAction {
    type Err = UnknownPayload;

    fn from_str(payload: &str) -> Result<Self, Self::Err> {
        let action = match payload {
            "ADD_LK" => Some(ButtonAction::AddRecord),
            "LIST_LK" => Some(ButtonAction::ListRecords),
            "SEARCH_ANY" => Some(ButtonAction::Filter(FilterKind::AnyField)),
            "FILTER_NAME" => Some(ButtonAction::Filter(FilterKind::Name)),
            "FILTER_BANK" => Some(ButtonAction::Filter(FilterKind::Bank)),
            "FILTER_STATUS" => Some(ButtonAction::FilterStatus),
            "BACK_MENU" => Some(ButtonAction::BackToMenu),
            _ => None
        };

        let action = action
            .or_else(|| payload.strip_prefix("FILTER_STATUS_VALUE_").and_then(index).map(ButtonAction::FilterStatusValue))
            .or_else(|| payload.strip_prefix("STATUS_CHOICE_").and_then(index).map(ButtonAction::StatusChoice))
            .or_else(|| payload.strip_prefix("EDIT_STATUS_CHOICE_").and_then(index).map(ButtonAction::EditStatusChoice))
            .or_else(|| payload.strip_prefix("EDIT_STATUS_").and_then(digits).map(|id| ButtonAction::EditStatus(id.to_string())))
            .or_else(|| payload.strip_prefix("VIEW_").and_then(digits).map(|id| ButtonAction::View(id.to_string())))
            .or_else(|| payload.strip_prefix("DELETE_").and_then(digits).map(|id| ButtonAction::Delete(id.to_string())));

        action.ok_or_else(|| UnknownPayload(payload.to_string()))
    }
}

impl Display for ButtonAction {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ButtonAction::AddRecord => write!(formatter, "ADD_LK"),
            ButtonAction::ListRecords => write!(formatter, "LIST_LK"),
            ButtonAction::Filter(FilterKind::AnyField) => write!(formatter, "SEARCH_ANY"),
            ButtonAction::Filter(FilterKind::Name) => write!(formatter, "FILTER_NAME"),
            ButtonAction::Filter(FilterKind::Bank) => write!(formatter, "FILTER_BANK"),
            ButtonAction::FilterStatus => write!(formatter, "FILTER_STATUS"),
            ButtonAction::FilterStatusValue(index) => write!(formatter, "FILTER_STATUS_VALUE_{index}"),
            ButtonAction::StatusChoice(index) => write!(formatter, "STATUS_CHOICE_{index}"),
            ButtonAction::EditStatus(record_id) => write!(formatter, "EDIT_STATUS_{record_id}"),
            ButtonAction::EditStatusChoice(index) => write!(formatter, "EDIT_STATUS_CHOICE_{index}"),
            ButtonAction::View(record_id) => write!(formatter, "VIEW_{record_id}"),
            ButtonAction::Delete(record_id) => write!(formatter, "DELETE_{record_id}"),
            ButtonAction::BackToMenu => write!(formatter, "BACK_MENU")
        }
    }
}
