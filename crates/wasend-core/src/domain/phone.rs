/// Queries with at least this many digits are dialed directly even without a
/// leading `+`.
pub const RAW_PHONE_MIN_DIGITS: usize = 8;

/// E.164 caps international numbers at 15 digits.
pub const MAX_DIAL_DIGITS: usize = 15;

pub fn sanitize_digits(input: &str) -> Option<String> {
    let digits: String = input.chars().filter(|ch| ch.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }
    Some(digits)
}

/// Turns a stored or typed phone number into the digits-only international
/// form expected in a chat link.
pub fn normalize_for_dialing(raw: &str, default_country_code: Option<&str>) -> Option<String> {
    let trimmed = raw.trim();
    let mut digits = sanitize_digits(trimmed)?;

    if let Some(rest) = digits.strip_prefix("00") {
        digits = rest.to_string();
    } else if !trimmed.starts_with('+') {
        if let Some(code) = default_country_code {
            if let Some(rest) = digits.strip_prefix('0') {
                digits = format!("{}{}", code, rest);
            }
        }
    }

    if digits.is_empty() || digits.len() > MAX_DIAL_DIGITS {
        return None;
    }
    Some(digits)
}

/// Returns the sanitized digits when the query should be treated as a phone
/// number rather than a contact name.
pub fn looks_like_phone(query: &str) -> Option<String> {
    let trimmed = query.trim();
    let digits = sanitize_digits(trimmed)?;
    if trimmed.starts_with('+') || digits.len() >= RAW_PHONE_MIN_DIGITS {
        Some(digits)
    } else {
        None
    }
}
