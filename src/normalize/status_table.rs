use crate::types::Status;

/// Lowercase status spellings seen in exports and manual entry.
const SYNONYMS: [(&str, Status); 36] = [
    ("new-white", Status::NewWhite),
    ("new-not white", Status::NewNotWhite),
    ("in-progress", Status::InProgress),
    ("resting", Status::Resting),
    ("departed", Status::Departed),
    ("blocked", Status::Blocked),
    ("rest", Status::Resting),
    ("block", Status::Blocked),
    ("lost", Status::Blocked),
    ("departure", Status::Departed),
    ("active", Status::InProgress),
    ("active/binance", Status::InProgress),
    ("active\\binance", Status::InProgress),
    ("virtual", Status::InProgress),
    ("at-drop", Status::InProgress),
    ("changed-number", Status::InProgress),
    ("awaiting-card", Status::NewWhite),
    ("awaiting-reply", Status::NewWhite),
    ("need to white", Status::NewWhite),
    ("status", Status::NewWhite),
    ("у дропа", Status::InProgress),
    ("в работе", Status::InProgress),
    ("актив", Status::InProgress),
    ("актив/бинанс", Status::InProgress),
    ("актив\\бинанс", Status::InProgress),
    ("виртуалка", Status::InProgress),
    ("сменил номер", Status::InProgress),
    ("отдых", Status::Resting),
    ("на отдыхе", Status::Resting),
    ("блок", Status::Blocked),
    ("заблокирован", Status::Blocked),
    ("потерялся", Status::Blocked),
    ("вылет", Status::Departed),
    ("ждем карту", Status::NewWhite),
    ("ждем ответа", Status::NewWhite),
    ("статус", Status::NewWhite)
];

/// Fragments that mark a free-standing column as a status rather than a card.
const STATUS_KEYWORDS: [&str; 10] = ["rest", "block", "depart", "active", "drop", "отдых", "блок", "вылет", "актив", "дропа"];

/// Status assigned when the table has no entry for the input.
pub const DEFAULT_STATUS: Status = Status::InProgress;

/// Exact, case-insensitive lookup in the synonym table.
pub fn lookup_status(raw: &str) -> Option<Status> {
    let key = raw.trim().to_lowercase();

    SYNONYMS.iter()
        .find(|(synonym, _)| *synonym == key)
        .map(|(_, status)| *status)
}

/// Maps free text to a status, defaulting to `in-progress`.
pub fn map_status(raw: &str) -> Status {
    lookup_status(raw).unwrap_or(DEFAULT_STATUS)
}

/// Whether a column reads as a status: a table hit or a known keyword fragment.
pub fn looks_like_status(raw: &str) -> bool {
    let lowered = raw.trim().to_lowercase();

    lookup_status(&lowered).is_some() || STATUS_KEYWORDS.iter().any(|keyword| lowered.contains(keyword))
}
