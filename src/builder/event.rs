use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{Date, Duration, OffsetDateTime, PrimitiveDateTime, UtcOffset};

use crate::builder::contact::LINE_END;
use crate::common::escape::{escape, EscapeRuleset};
use crate::template::{FieldValues, Template};

// Calendar event rendering
//------------------------------------------------------------------------------

/// An event without an end time gets this duration; the target format
/// requires DTEND.
pub(crate) const DEFAULT_EVENT_DURATION: Duration = Duration::hours(1);

/// Accepts the iCalendar basic form (`20260805T120000`, optional trailing
/// `Z`), RFC 3339, and bare dates in either spelling (midnight UTC).
/// Everything is normalized to UTC.
pub(crate) fn parse_date_time(raw: &str) -> Option<OffsetDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = OffsetDateTime::parse(raw, &Rfc3339) {
        return Some(dt.to_offset(UtcOffset::UTC));
    }
    let stripped = raw.strip_suffix(&['Z', 'z'][..]).unwrap_or(raw);
    let basic = format_description!("[year][month][day]T[hour][minute][second]");
    if let Ok(dt) = PrimitiveDateTime::parse(stripped, &basic) {
        return Some(dt.assume_utc());
    }
    let extended = format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]");
    if let Ok(dt) = PrimitiveDateTime::parse(stripped, &extended) {
        return Some(dt.assume_utc());
    }
    let basic_date = format_description!("[year][month][day]");
    if let Ok(date) = Date::parse(stripped, &basic_date) {
        return Some(date.midnight().assume_utc());
    }
    let extended_date = format_description!("[year]-[month]-[day]");
    if let Ok(date) = Date::parse(stripped, &extended_date) {
        return Some(date.midnight().assume_utc());
    }
    None
}

/// Basic date-time representation, always UTC: `YYYYMMDDTHHMMSSZ`.
pub(crate) fn format_date_time(dt: OffsetDateTime) -> String {
    let utc = dt.to_offset(UtcOffset::UTC);
    format!(
        "{:04}{:02}{:02}T{:02}{:02}{:02}Z",
        utc.year(),
        utc.month() as u8,
        utc.day(),
        utc.hour(),
        utc.minute(),
        utc.second()
    )
}

pub(crate) fn vevent(template: &Template, values: &FieldValues) -> String {
    let title = template.value_or_default(values, "title");
    let start_raw = template.value_or_default(values, "start").trim();
    let end_raw = template.value_or_default(values, "end").trim();
    let location = template.value_or_default(values, "location");
    let description = template.value_or_default(values, "description");

    let mut out = String::from("BEGIN:VEVENT");
    out.push_str(LINE_END);
    push_line(&mut out, "SUMMARY", &escape(title, EscapeRuleset::Mecard));

    match parse_date_time(start_raw) {
        Some(start) => {
            push_line(&mut out, "DTSTART", &format_date_time(start));
            let end = parse_date_time(end_raw).unwrap_or(start + DEFAULT_EVENT_DURATION);
            push_line(&mut out, "DTEND", &format_date_time(end));
        }
        // contract breach (formatter called without validation); pass the
        // raw value through rather than panicking
        None => {
            push_line(&mut out, "DTSTART", start_raw);
            if let Some(end) = parse_date_time(end_raw) {
                push_line(&mut out, "DTEND", &format_date_time(end));
            } else if !end_raw.is_empty() {
                push_line(&mut out, "DTEND", end_raw);
            }
        }
    }

    if !location.is_empty() {
        push_line(&mut out, "LOCATION", &escape(location, EscapeRuleset::Mecard));
    }
    if !description.is_empty() {
        push_line(&mut out, "DESCRIPTION", &escape(description, EscapeRuleset::Mecard));
    }
    out.push_str("END:VEVENT");
    out.push_str(LINE_END);
    out
}

fn push_line(out: &mut String, property: &str, value: &str) {
    out.push_str(property);
    out.push(':');
    out.push_str(value);
    out.push_str(LINE_END);
}

#[cfg(test)]
mod event_tests {
    use test_case::test_case;

    use super::{format_date_time, parse_date_time};
    use crate::builder::format;
    use crate::template::{FieldValues, TemplateRegistry};

    fn values(pairs: &[(&str, &str)]) -> FieldValues {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test_case("20260805T120000Z"; "basic utc")]
    #[test_case("20260805T120000"; "basic naive")]
    #[test_case("2026-08-05T12:00:00Z"; "rfc3339")]
    #[test_case("2026-08-05T12:00:00"; "extended naive")]
    fn test_parse_forms_agree(raw: &str) {
        let dt = parse_date_time(raw).unwrap();
        assert_eq!(format_date_time(dt), "20260805T120000Z");
    }

    #[test]
    fn test_parse_offset_normalized_to_utc() {
        let dt = parse_date_time("2026-08-05T14:00:00+02:00").unwrap();
        assert_eq!(format_date_time(dt), "20260805T120000Z");
    }

    #[test]
    fn test_parse_bare_dates() {
        assert_eq!(format_date_time(parse_date_time("20260805").unwrap()), "20260805T000000Z");
        assert_eq!(format_date_time(parse_date_time("2026-08-05").unwrap()), "20260805T000000Z");
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_date_time("").is_none());
        assert!(parse_date_time("next tuesday").is_none());
        assert!(parse_date_time("20261305T000000").is_none());
    }

    #[test]
    fn test_vevent_block() {
        let registry = TemplateRegistry::new();
        let template = registry.get("event").unwrap();
        let payload = format(
            template,
            &values(&[
                ("title", "Standup; daily"),
                ("start", "20260805T090000Z"),
                ("end", "20260805T091500Z"),
                ("location", "Room 4"),
            ]),
        )
        .unwrap();
        assert_eq!(
            payload,
            "BEGIN:VEVENT\r\nSUMMARY:Standup\\; daily\r\nDTSTART:20260805T090000Z\r\nDTEND:20260805T091500Z\r\nLOCATION:Room 4\r\nEND:VEVENT\r\n"
        );
    }

    #[test]
    fn test_vevent_missing_end_defaults_to_one_hour() {
        let registry = TemplateRegistry::new();
        let template = registry.get("event").unwrap();
        let payload =
            format(template, &values(&[("title", "Call"), ("start", "20261231T233000Z")])).unwrap();
        assert!(payload.contains("DTSTART:20261231T233000Z\r\n"));
        assert!(payload.contains("DTEND:20270101T003000Z\r\n"));
    }

    #[test]
    fn test_vevent_deterministic() {
        let registry = TemplateRegistry::new();
        let template = registry.get("event").unwrap();
        let vals = values(&[("title", "Call"), ("start", "2026-08-05T12:00:00+02:00")]);
        assert_eq!(format(template, &vals).unwrap(), format(template, &vals).unwrap());
    }
}
