use crate::ingest::errors::IngestError;
use crate::ingest::parser::{parse_rows, parse_tabular};
use crate::models::RecordDraft;
use crate::storage::{RecordStore, Snapshot, Storage, StoreError};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestMode {
    /// Append to the existing store, skipping phones it already holds.
    Merge,
    /// Clear the store and reload it from the batch, ids restarting at `"1"`.
    Replace
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Duplicate {
    pub full_name: String,
    pub phone: String
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct IngestReport {
    pub imported: usize,
    pub duplicates: Vec<Duplicate>,
    /// 1-based line numbers that yielded no record.
    pub skipped: Vec<usize>
}

/// Parses `text` and commits the resulting records in one store write.
pub fn ingest<S: Storage>(store: &RecordStore<S>, text: &str, mode: IngestMode) -> Result<IngestReport, IngestError> {
    let parsed = parse_rows(text);

    let mut report = store.mutate(|snapshot| {
        match mode {
            IngestMode::Merge => merge(snapshot, parsed.drafts),
            IngestMode::Replace => {
                snapshot.clear();
                append(snapshot, parsed.drafts)
            }
        }
    })?;

    report.skipped = parsed.skipped;

    info!(
        "Ingest [{mode:?}] finished: {} imported, {} duplicates, {} skipped",
        report.imported,
        report.duplicates.len(),
        report.skipped.len()
    );

    Ok(report)
}

/// Reads an import file, routing `.csv` files through [`parse_tabular`].
pub fn ingest_file<S: Storage>(store: &RecordStore<S>, path: &Path, mode: IngestMode) -> Result<IngestReport, IngestError> {
    let raw = fs::read_to_string(path)
        .map_err(|source| IngestError::Read { path: path.to_path_buf(), source })?;

    let is_tabular = path.extension()
        .is_some_and(|extension| extension.eq_ignore_ascii_case("csv"));

    let text = if is_tabular { parse_tabular(&raw)? } else { raw };

    ingest(store, &text, mode)
}

fn merge(snapshot: &mut Snapshot, drafts: Vec<RecordDraft>) -> Result<IngestReport, StoreError> {
    let mut phones: HashSet<String> = snapshot.records.iter()
        .filter(|record| !record.phone.is_empty())
        .map(|record| record.phone.clone())
        .collect();

    let mut report = IngestReport::default();
    let mut fresh = Vec::with_capacity(drafts.len());

    for draft in drafts {
        //NOTE: Phone is the only dedup key, records without one are always kept
        if !draft.phone.is_empty() && !phones.insert(draft.phone.clone()) {
            warn!("Skipping duplicate [{}] with phone [{}]", draft.full_name, draft.phone);
            report.duplicates.push(Duplicate { full_name: draft.full_name, phone: draft.phone });
            continue;
        }

        fresh.push(draft);
    }

    report.imported = append(snapshot, fresh)?.imported;

    Ok(report)
}

fn append(snapshot: &mut Snapshot, drafts: Vec<RecordDraft>) -> Result<IngestReport, StoreError> {
    let mut report = IngestReport::default();

    for draft in drafts {
        let record = draft.into_record(snapshot.next_id())?;
        debug!("Imported [{}] as record [{}]", record.full_name, record.id);

        snapshot.push(record);
        report.imported += 1;
    }

    Ok(report)
}
