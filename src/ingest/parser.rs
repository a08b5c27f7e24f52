use crate::ingest::errors::IngestError;
use crate::models::RecordDraft;
use crate::normalize::{detect_bank, looks_like_status, map_status, normalize_card, normalize_phone};
use csv::ReaderBuilder;
use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

static WIDE_GAP: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s{3,}").expect("literal pattern is valid"));
static NARROW_GAP: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s{2,}").expect("literal pattern is valid"));

const TABULAR_COLUMNS: usize = 4;

/// Drafts parsed from bulk text, plus the 1-based numbers of unusable lines.
#[derive(Debug, Default)]
pub struct ParsedRows {
    pub drafts: Vec<RecordDraft>,
    pub skipped: Vec<usize>
}

fn tokenize(line: &str) -> Vec<String> {
    let line = line.replace('"', "");

    let parts: Vec<&str> = if line.contains('\t') {
        line.split('\t').collect()
    } else {
        let wide: Vec<&str> = WIDE_GAP.split(&line).collect();

        if wide.len() < TABULAR_COLUMNS {
            NARROW_GAP.split(&line).collect()
        } else {
            wide
        }
    };

    parts.into_iter()
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(str::to_string)
        .collect()
}

/// Assigns tokens to fields by column count and normalizes them.
fn draft_from_tokens(tokens: Vec<String>) -> Option<RecordDraft> {
    let mut tokens = tokens.into_iter();
    let full_name = tokens.next()?;
    let phone = tokens.next().unwrap_or_default();
    let third = tokens.next();
    let fourth = tokens.next();

    let (card, status) = match (third, fourth) {
        (Some(card), Some(status)) => (card, status),
        (Some(third), None) if looks_like_status(&third) => (String::new(), third),
        (Some(card), None) => (card, String::new()),
        (None, _) => (String::new(), String::new())
    };

    let status = map_status(&status);
    let card = normalize_card(&card);

    Some(RecordDraft {
        bank: detect_bank(&full_name, &card),
        phone: normalize_phone(&phone),
        remaining_funds: status.requires_funds().then(|| "0".to_string()),
        status: Some(status),
        full_name,
        card
    })
}

/// Parses freeform rows, one record per line.
///
/// Lines are split on tabs when present, otherwise on runs of three or more
/// spaces, falling back to runs of two when that gives fewer than four columns.
pub fn parse_rows(text: &str) -> ParsedRows {
    let mut parsed = ParsedRows::default();

    for (index, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }

        match draft_from_tokens(tokenize(line)) {
            Some(draft) => parsed.drafts.push(draft),
            None => {
                debug!("Line [{}] has no usable columns, skipping", index + 1);
                parsed.skipped.push(index + 1);
            }
        }
    }

    parsed
}

/// Converts a comma-delimited export into tab-delimited lines for [`parse_rows`].
///
/// The header row is dropped and every row is cut or padded to four columns.
pub fn parse_tabular(csv: &str) -> Result<String, IngestError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(csv.as_bytes());

    let mut lines = Vec::new();

    for row in reader.records() {
        let row = row?;
        let mut columns: Vec<&str> = row.iter().take(TABULAR_COLUMNS).collect();
        columns.resize(TABULAR_COLUMNS, "");

        lines.push(columns.join("\t"));
    }

    Ok(lines.join("\n"))
}
