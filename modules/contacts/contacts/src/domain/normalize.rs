//! Pure input normalization: canonical phones and XSS-safe text.
//!
//! Nothing here touches the store; every function is deterministic.

use std::fmt;

const COUNTRY_PREFIX: &str = "+7";
const NATIONAL_DIGITS: usize = 10;

/// A phone number in canonical `+7XXXXXXXXXX` form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CanonicalPhone(String);

impl CanonicalPhone {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for CanonicalPhone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CanonicalPhone {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// The raw input could not be brought to canonical form.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("'{raw}' is not a +7 phone number")]
pub struct PhoneRejected {
    pub raw: String,
}

/// Normalize a raw phone to canonical `+7` form.
///
/// Every non-digit is dropped first, so `+7 (999) 123-45-67`, `8 999 123 45 67`
/// and `9991234567` all land on `+79991234567`. Empty or whitespace-only input
/// means "no phone" and yields `Ok(None)`.
///
/// # Errors
/// Returns `PhoneRejected` when the digits are neither 10 long nor 11 long
/// with a leading `7` or `8`.
pub fn normalize_phone(raw: &str) -> Result<Option<CanonicalPhone>, PhoneRejected> {
    if raw.trim().is_empty() {
        return Ok(None);
    }

    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();

    let national = match digits.len() {
        11 if digits.starts_with('7') || digits.starts_with('8') => &digits[1..],
        NATIONAL_DIGITS => digits.as_str(),
        _ => {
            return Err(PhoneRejected {
                raw: raw.to_owned(),
            });
        }
    };

    Ok(Some(CanonicalPhone(format!("{COUNTRY_PREFIX}{national}"))))
}

/// Make free text safe to store and echo back into HTML.
///
/// Markup tags are stripped, surrounding whitespace trimmed, and the five
/// HTML-special characters escaped. Not idempotent: `&` becomes `&amp;` on
/// every pass, so apply it to inbound values only.
#[must_use]
pub fn sanitize_text(raw: &str) -> String {
    let stripped = strip_tags(raw);
    escape_html(stripped.trim())
}

/// `sanitize_text` for optional fields; blank results collapse to `None`.
#[must_use]
pub fn sanitize_optional(raw: Option<&str>) -> Option<String> {
    raw.map(sanitize_text).filter(|s| !s.is_empty())
}

/// A `<` opens a tag only when followed by a letter, `/`, `!` or `?`; any
/// other `<` is plain text and gets escaped later.
fn opens_tag(next: Option<&char>) -> bool {
    next.is_some_and(|n| n.is_ascii_alphabetic() || matches!(n, '/' | '!' | '?'))
}

fn strip_tags(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut in_tag = false;
    let mut quote: Option<char> = None;

    let mut chars = raw.chars().peekable();
    while let Some(c) = chars.next() {
        if in_tag {
            match (quote, c) {
                (Some(q), _) if c == q => quote = None,
                (Some(_), _) => {}
                (None, '"' | '\'') => quote = Some(c),
                (None, '>') => in_tag = false,
                (None, _) => {}
            }
        } else if c == '<' && opens_tag(chars.peek()) {
            in_tag = true;
        } else {
            out.push(c);
        }
    }

    out
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            _ => out.push(c),
        }
    }
    out
}
