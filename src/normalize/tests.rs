use super::{detect_bank, looks_like_status, lookup_status, map_status, normalize_card, normalize_phone};
use crate::types::Status;
use rand::seq::SliceRandom;
use rand::Rng;

#[test]
fn test_phone_normalization_covers_every_rule() {
    let test_cases = vec![
        ("", ""),
        ("   ", ""),
        ("n/a", ""),
        ("+996 700 112 233", "+996700112233"),
        ("996700112233", "+996700112233"),
        ("755 202 976", "+996755202976"),
        ("0700112233", "+996700112233"),
        ("8 (0700) 11-22-33", "+996700112233"),
        ("+7 912 345 67 89", "+79123456789"),
        ("12345", "12345"),
        ("+12", "+12"),
    ];

    for (input, expected) in test_cases {
        assert_eq!(normalize_phone(input), expected, "input: {input:?}");
    }
}

#[test]
fn test_phone_normalization_is_idempotent_on_random_input() {
    let alphabet: Vec<char> = "0123456789+ -()9966abc".chars().collect();
    let mut rng = rand::thread_rng();

    for _ in 0..2_000 {
        let length = rng.gen_range(0..18);
        let raw: String = (0..length)
            .filter_map(|_| alphabet.choose(&mut rng).copied())
            .collect();

        let once = normalize_phone(&raw);

        assert_eq!(normalize_phone(&once), once, "raw: {raw:?}");
    }
}

#[test]
fn test_card_normalization_collapses_whitespace() {
    assert_eq!(normalize_card("  4177  4901\t5776   8559 "), "4177 4901 5776 8559");
    assert_eq!(normalize_card(""), "");
    assert_eq!(normalize_card("   "), "");
}

#[test]
fn test_bank_detection_prefers_name_tokens_over_card_prefix() {
    assert_eq!(detect_bank("Binance account Ivanov", "4714 0000"), "Binance");
    assert_eq!(detect_bank("Болотов (Бинанс)", ""), "Binance");
    assert_eq!(detect_bank("Манас Иванов", "4714 1111"), "Mbank");
}

#[test]
fn test_bank_detection_falls_back_to_card_prefix_then_default() {
    assert_eq!(detect_bank("Ivanov", "4177 4901 5776 8559"), "Mbank");
    assert_eq!(detect_bank("Ivanov", "9356123412341234"), "Mbank");
    assert_eq!(detect_bank("Ivanov", "4714 2222 3333 4444"), "Other bank");
    assert_eq!(detect_bank("Ivanov", "5555 2222 3333 4444"), "Mbank");
    assert_eq!(detect_bank("Ivanov", ""), "Mbank");
}

#[test]
fn test_status_mapping_uses_synonym_table() {
    let test_cases = vec![
        ("rest", Status::Resting),
        ("BLOCK", Status::Blocked),
        ("lost", Status::Blocked),
        ("departure", Status::Departed),
        ("active", Status::InProgress),
        ("changed-number", Status::InProgress),
        ("awaiting-card", Status::NewWhite),
        ("awaiting-reply", Status::NewWhite),
        ("у дропа", Status::InProgress),
        ("Вылет", Status::Departed),
        ("NEW-not white", Status::NewNotWhite),
    ];

    for (input, expected) in test_cases {
        assert_eq!(map_status(input), expected, "input: {input:?}");
    }
}

#[test]
fn test_unmapped_status_defaults_to_in_progress() {
    assert_eq!(map_status("something else"), Status::InProgress);
    assert_eq!(map_status(""), Status::InProgress);
    assert_eq!(lookup_status("something else"), None);
}

#[test]
fn test_status_keyword_detection() {
    assert!(looks_like_status("resting"));
    assert!(looks_like_status("Blocked forever"));
    assert!(looks_like_status("у дропа"));
    assert!(!looks_like_status("4177123412341234"));
    assert!(!looks_like_status("Ivanov"));
}
