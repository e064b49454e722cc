//! Phone number normalization for SMS recipients.

/// Normalize a phone number to E.164.
///
/// - keeps digits only; fewer than 7 digits → None
/// - input already prefixed with `+` → `+<digits>`
/// - 12 digits starting with `91` → `+91…`
/// - 10 digits → `default_cc` + digits
/// - anything else → `default_cc` + digits
pub fn normalize_e164(raw: &str, default_cc: &str) -> Option<String> {
    let trimmed = raw.trim();
    let digits: String = trimmed.chars().filter(|c| c.is_ascii_digit()).collect();

    if digits.len() < 7 {
        return None;
    }

    if trimmed.starts_with('+') {
        return Some(format!("+{digits}"));
    }

    if digits.len() == 12 && digits.starts_with("91") {
        return Some(format!("+{digits}"));
    }

    let cc = if default_cc.starts_with('+') {
        default_cc.to_string()
    } else {
        format!("+{default_cc}")
    };

    Some(format!("{cc}{digits}"))
}
