use tracing::trace;

use crate::common::metadata::ContentType;

// Content classifier
//------------------------------------------------------------------------------

/// Determines the semantic content type of a raw decoded string. Total: every
/// input classifies, `PlainText` for unrecognized prose and `Unknown` for
/// structured-looking-but-unparseable blocks.
///
/// The rules run in a fixed order and the first match wins: micro-format
/// literal prefixes before URI schemes before the looser URL/email/phone
/// heuristics, so a `WIFI:` payload can never be swallowed by the URL rule.
pub fn classify(raw: &str) -> ContentType {
    let content_type = classify_rules(raw.trim());
    trace!(content_type = content_type.as_token(), "classified scan");
    content_type
}

fn classify_rules(raw: &str) -> ContentType {
    if raw.starts_with("WIFI:") {
        return ContentType::WifiCredential;
    }
    if raw.starts_with("MECARD:") {
        return ContentType::ContactCard;
    }
    if raw.starts_with("BEGIN:VCARD") {
        return if raw.contains("END:VCARD") { ContentType::ContactCard } else { ContentType::Unknown };
    }
    if raw.starts_with("BEGIN:VEVENT") {
        return if raw.contains("END:VEVENT") { ContentType::CalendarEvent } else { ContentType::Unknown };
    }
    // calendar wrapper some generators emit around the event block
    if raw.starts_with("BEGIN:VCALENDAR") {
        return if raw.contains("BEGIN:VEVENT") && raw.contains("END:VEVENT") {
            ContentType::CalendarEvent
        } else {
            ContentType::Unknown
        };
    }
    if starts_with_ignore_case(raw, "geo:") {
        return ContentType::GeoLocation;
    }
    if starts_with_ignore_case(raw, "mailto:") {
        return ContentType::Email;
    }
    if starts_with_ignore_case(raw, "tel:") {
        return ContentType::PhoneNumber;
    }
    if starts_with_ignore_case(raw, "sms:") || starts_with_ignore_case(raw, "smsto:") {
        return ContentType::Sms;
    }
    if is_url_shaped(raw) {
        return ContentType::Url;
    }
    if is_email_shaped(raw) {
        return ContentType::Email;
    }
    if is_phone_shaped(raw) {
        return ContentType::PhoneNumber;
    }
    ContentType::PlainText
}

// Grammar helpers
//------------------------------------------------------------------------------

pub(crate) fn starts_with_ignore_case(raw: &str, prefix: &str) -> bool {
    raw.len() >= prefix.len()
        && raw.as_bytes()[..prefix.len()].eq_ignore_ascii_case(prefix.as_bytes())
}

/// General URL grammar: an alphanumeric scheme, `://`, something after it, no
/// whitespace anywhere.
pub(crate) fn is_url_shaped(raw: &str) -> bool {
    if raw.contains(char::is_whitespace) {
        return false;
    }
    let Some(idx) = raw.find("://") else {
        return false;
    };
    if idx == 0 || raw.len() == idx + 3 {
        return false;
    }
    let scheme = &raw[..idx];
    scheme.as_bytes()[0].is_ascii_alphabetic() && scheme.bytes().all(|b| b.is_ascii_alphanumeric())
}

/// Bare address shape: one `@`, plausible local part, dotted domain.
pub(crate) fn is_email_shaped(raw: &str) -> bool {
    let Some((local, domain)) = raw.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.is_empty() || domain.contains('@') || !domain.contains('.') {
        return false;
    }
    if !local.chars().all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '%' | '+' | '-')) {
        return false;
    }
    domain
        .split('.')
        .all(|label| !label.is_empty() && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-'))
}

/// Bare dial-string shape: digits plus grouping punctuation, one optional
/// leading `+`, 5 to 15 digits total.
pub(crate) fn is_phone_shaped(raw: &str) -> bool {
    let mut digits = 0usize;
    for (i, c) in raw.chars().enumerate() {
        match c {
            '0'..='9' => digits += 1,
            ' ' | '-' | '(' | ')' => {}
            '+' if i == 0 => {}
            _ => return false,
        }
    }
    (5..=15).contains(&digits)
}
