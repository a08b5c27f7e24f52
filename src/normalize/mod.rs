//! Pure transforms from raw, loosely typed field text to canonical values.
//!
//! Every table here is closed: unknown input falls back to one documented
//! default instead of failing.

mod bank;
mod phone;
mod status_table;
#[cfg(test)]
mod tests;

pub use bank::detect_bank;
pub use phone::normalize_phone;
pub use status_table::{looks_like_status, lookup_status, map_status, DEFAULT_STATUS};

/// Collapses whitespace runs to single spaces and trims both ends.
pub fn normalize_card(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}
