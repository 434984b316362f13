use anyhow::{anyhow, Result};
use chrono::Utc;
use std::str::FromStr;
use wasend_core::domain::ContactId;

pub fn now_utc() -> i64 {
    Utc::now().timestamp()
}

pub fn parse_contact_id(raw: &str) -> Result<ContactId> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(anyhow!("contact id cannot be empty"));
    }
    ContactId::from_str(trimmed).map_err(|_| anyhow!("invalid contact id"))
}

/// Joins trailing positional words into one message, the way a shell user
/// would expect `wasend send Ada see you soon` to behave.
pub fn join_words(words: &[String]) -> Option<String> {
    let joined = words.join(" ");
    if joined.trim().is_empty() {
        None
    } else {
        Some(joined)
    }
}
