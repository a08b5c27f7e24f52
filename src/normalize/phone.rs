/// Country calling code assumed for numbers written without one.
pub const HOME_PREFIX: &str = "996";

const LOCAL_DIGITS: usize = 9;

/// Canonicalizes a phone number to `+996XXXXXXXXX` where the shape allows it.
///
/// Only ASCII digits and `+` survive cleaning. Numbers of ten or more digits
/// that do not start with the home prefix keep their last nine digits; the
/// leading excess is assumed to be a dialing prefix. This is a heuristic and
/// will mangle genuinely longer foreign numbers written without `+`.
/// Shapes that match no rule are returned cleaned but otherwise unchanged.
pub fn normalize_phone(raw: &str) -> String {
    let cleaned: String = raw.chars()
        .filter(|character| character.is_ascii_digit() || *character == '+')
        .collect();

    if cleaned.is_empty() {
        return cleaned;
    }

    if cleaned.strip_prefix('+').is_some_and(|rest| rest.starts_with(HOME_PREFIX)) {
        return cleaned;
    }

    if cleaned.starts_with(HOME_PREFIX) {
        return format!("+{cleaned}");
    }

    let all_digits = cleaned.chars().all(|character| character.is_ascii_digit());

    if all_digits && cleaned.len() == LOCAL_DIGITS {
        return format!("+{HOME_PREFIX}{cleaned}");
    }

    if all_digits && cleaned.len() > LOCAL_DIGITS {
        let local = &cleaned[cleaned.len() - LOCAL_DIGITS..];
        return format!("+{HOME_PREFIX}{local}");
    }

    cleaned
}
