//! Name validation for user-named collections and decks.

use rustrict::CensorStr;

use crate::config::NameRules;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("name must not be empty")]
    Empty,
    #[error("name is {len} characters long, the limit is {max}")]
    TooLong { len: usize, max: usize },
    #[error("name contains a disallowed word")]
    Disallowed,
    #[error("invalid user id: {0:?}")]
    InvalidUserId(String),
}

/// Trim `raw` and check it against `rules`. Returns the trimmed name.
///
/// Length is counted in characters. The profanity filter catches
/// obfuscated spellings; configured blocked words match whole words,
/// case-insensitively.
pub fn validate_name(raw: &str, rules: &NameRules) -> Result<String, ValidationError> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(ValidationError::Empty);
    }

    let len = name.chars().count();
    if len > rules.max_len {
        return Err(ValidationError::TooLong {
            len,
            max: rules.max_len,
        });
    }

    if rules.profanity_filter && name.is_inappropriate() {
        tracing::debug!("rejected name flagged by the profanity filter");
        return Err(ValidationError::Disallowed);
    }

    let lowered = name.to_lowercase();
    let blocked = lowered
        .split(|c: char| !c.is_alphanumeric())
        .filter(|word| !word.is_empty())
        .any(|word| {
            rules
                .blocked_words
                .iter()
                .any(|blocked| blocked.eq_ignore_ascii_case(word))
        });
    if blocked {
        tracing::debug!("rejected name with a blocked word");
        return Err(ValidationError::Disallowed);
    }

    Ok(name.to_string())
}
