pub const MBANK: &str = "Mbank";
pub const BINANCE: &str = "Binance";
pub const OTHER_BANK: &str = "Other bank";

/// Lowercase name fragments that identify a bank outright.
const NAME_TOKENS: [(&str, &str); 6] = [
    ("mbank", MBANK),
    ("мбанк", MBANK),
    ("manas", MBANK),
    ("манас", MBANK),
    ("binance", BINANCE),
    ("бинанс", BINANCE)
];

const MBANK_CARD_PREFIXES: [&str; 3] = ["4177", "9450", "9356"];
const OTHER_CARD_PREFIX: &str = "4714";

/// Guesses the issuing bank from the holder name and card number.
///
/// Name tokens win over card prefixes; anything unrecognized is attributed to
/// the primary bank.
pub fn detect_bank(name: &str, card: &str) -> String {
    let name = name.to_lowercase();

    if let Some((_, bank)) = NAME_TOKENS.iter().find(|(token, _)| name.contains(token)) {
        return bank.to_string();
    }

    let card: String = card.chars().filter(|character| !character.is_whitespace()).collect();

    if MBANK_CARD_PREFIXES.iter().any(|prefix| card.starts_with(prefix)) {
        return MBANK.to_string();
    }

    if card.starts_with(OTHER_CARD_PREFIX) {
        return OTHER_BANK.to_string();
    }

    MBANK.to_string()
}
