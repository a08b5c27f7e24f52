use super::{Status, StatusError};
use anyhow::Result;
use std::str::FromStr;

#[test]
fn test_status_parses_canonical_labels_case_insensitively() -> Result<()> {
    let test_cases = vec![
        ("NEW-white", Status::NewWhite),
        ("new-not white", Status::NewNotWhite),
        ("  In-Progress ", Status::InProgress),
        ("RESTING", Status::Resting),
        ("departed", Status::Departed),
        ("Blocked", Status::Blocked),
    ];

    for (input, expected) in test_cases {
        assert_eq!(Status::from_str(input)?, expected);
    }

    Ok(())
}

#[test]
fn test_status_rejects_unknown_labels() {
    assert_eq!(Status::from_str("archived"), Err(StatusError::Unknown("archived".to_string())));
    assert!(Status::from_str("").is_err());
}

#[test]
fn test_only_departed_and_blocked_require_funds() {
    let requiring: Vec<Status> = Status::ALL.iter().copied().filter(Status::requires_funds).collect();

    assert_eq!(requiring, vec![Status::Departed, Status::Blocked]);
}

#[test]
fn test_status_index_round_trips_through_display_order() -> Result<()> {
    for (index, status) in Status::ALL.iter().enumerate() {
        assert_eq!(status.index(), index);
        assert_eq!(Status::from_index(index)?, *status);
    }

    assert_eq!(Status::from_index(6), Err(StatusError::IndexOutOfRange(6)));

    Ok(())
}

#[test]
fn test_status_serializes_as_canonical_label() -> Result<()> {
    assert_eq!(serde_json::to_string(&Status::NewNotWhite)?, "\"NEW-not white\"");
    assert_eq!(serde_json::to_string(&Status::InProgress)?, "\"in-progress\"");

    Ok(())
}

#[test]
fn test_status_deserialization_accepts_synonyms() -> Result<()> {
    let status: Status = serde_json::from_str("\"rest\"")?;
    assert_eq!(status, Status::Resting);

    let status: Status = serde_json::from_str("\"заблокирован\"")?;
    assert_eq!(status, Status::Blocked);

    Ok(())
}

#[test]
fn test_unknown_stored_status_loads_as_in_progress() -> Result<()> {
    let status: Status = serde_json::from_str("\"на проверке\"")?;
    assert_eq!(status, Status::InProgress);

    let status: Status = serde_json::from_str("\"\"")?;
    assert_eq!(status, Status::InProgress);

    Ok(())
}
