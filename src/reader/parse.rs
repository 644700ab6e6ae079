use tracing::debug;

use crate::builder::normalize_phone;
use crate::common::escape::{find_unescaped, percent_decode, split_unescaped, unescape, EscapeRuleset};
use crate::common::metadata::ContentType;
use crate::reader::classify::starts_with_ignore_case;
use crate::template::FieldValues;

// Payload parser
//------------------------------------------------------------------------------

/// Extracts structured fields from a raw decoded string, best effort. Total:
/// malformed input yields a partial or empty mapping, never an error, and
/// unknown segments are ignored. Output keys match the corresponding
/// template field keys so scanned content can round-trip into the editor.
pub fn parse(content_type: ContentType, raw: &str) -> FieldValues {
    let raw = raw.trim();
    let fields = match content_type {
        ContentType::WifiCredential => parse_wifi(raw),
        ContentType::ContactCard => parse_contact(raw),
        ContentType::CalendarEvent => parse_event(raw),
        ContentType::GeoLocation => parse_geo(raw),
        ContentType::PhoneNumber => parse_phone(raw),
        ContentType::Sms => parse_sms(raw),
        ContentType::Email => parse_email(raw),
        ContentType::PlainText | ContentType::Url | ContentType::Unknown => FieldValues::new(),
    };
    debug!(content_type = content_type.as_token(), fields = fields.len(), "parsed scan");
    fields
}

fn insert_first(fields: &mut FieldValues, key: &str, value: String) {
    if !value.is_empty() {
        fields.entry(key.to_string()).or_insert(value);
    }
}

// Wi-Fi
//------------------------------------------------------------------------------

/// Segment boundaries are unescaped `;` only, so an SSID or password with
/// escaped `;`/`,` survives intact.
fn parse_wifi(raw: &str) -> FieldValues {
    let mut fields = FieldValues::new();
    let Some(rest) = raw.strip_prefix("WIFI:") else {
        return fields;
    };
    for segment in split_unescaped(rest, ';') {
        if segment.is_empty() {
            continue;
        }
        let Some(idx) = find_unescaped(segment, ':') else {
            continue;
        };
        let key = match segment[..idx].trim() {
            k if k.eq_ignore_ascii_case("T") => "auth",
            k if k.eq_ignore_ascii_case("S") => "ssid",
            k if k.eq_ignore_ascii_case("P") => "password",
            k if k.eq_ignore_ascii_case("H") => "hidden",
            _ => continue,
        };
        insert_first(&mut fields, key, unescape(&segment[idx + 1..], EscapeRuleset::WifiUri));
    }
    fields
}

// Contact cards
//------------------------------------------------------------------------------

fn parse_contact(raw: &str) -> FieldValues {
    match raw.strip_prefix("MECARD:") {
        Some(rest) => parse_mecard(rest),
        None => parse_vcard(raw),
    }
}

fn mecard_key(tag: &str) -> Option<&'static str> {
    let tag = tag.trim();
    if tag.eq_ignore_ascii_case("N") {
        Some("name")
    } else if tag.eq_ignore_ascii_case("TEL") {
        Some("phone")
    } else if tag.eq_ignore_ascii_case("EMAIL") {
        Some("email")
    } else if tag.eq_ignore_ascii_case("ORG") {
        Some("org")
    } else if tag.eq_ignore_ascii_case("ADR") {
        Some("address")
    } else if tag.eq_ignore_ascii_case("URL") {
        Some("url")
    } else if tag.eq_ignore_ascii_case("NOTE") {
        Some("note")
    } else {
        None
    }
}

fn parse_mecard(rest: &str) -> FieldValues {
    let mut fields = FieldValues::new();
    for segment in split_unescaped(rest, ';') {
        if segment.is_empty() {
            continue;
        }
        let Some(idx) = find_unescaped(segment, ':') else {
            continue;
        };
        let Some(key) = mecard_key(&segment[..idx]) else {
            continue;
        };
        insert_first(&mut fields, key, unescape(&segment[idx + 1..], EscapeRuleset::Mecard));
    }
    fields
}

fn parse_vcard(raw: &str) -> FieldValues {
    let mut fields = FieldValues::new();
    let mut n_fallback = None;
    for line in raw.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let Some(idx) = find_unescaped(line, ':') else {
            continue;
        };
        // property parameters (TEL;TYPE=CELL) are tolerated and dropped
        let property = line[..idx].split(';').next().unwrap_or("").trim().to_ascii_uppercase();
        let value = &line[idx + 1..];
        match property.as_str() {
            "BEGIN" | "END" | "VERSION" => {}
            "FN" => insert_first(&mut fields, "name", unescape(value, EscapeRuleset::Mecard)),
            "N" => {
                if n_fallback.is_none() {
                    n_fallback = Some(join_components(value));
                }
            }
            "ADR" => insert_first(&mut fields, "address", join_components(value)),
            "TEL" => insert_first(&mut fields, "phone", unescape(value, EscapeRuleset::Mecard)),
            "EMAIL" => insert_first(&mut fields, "email", unescape(value, EscapeRuleset::Mecard)),
            "ORG" => insert_first(&mut fields, "org", unescape(value, EscapeRuleset::Mecard)),
            "URL" => insert_first(&mut fields, "url", unescape(value, EscapeRuleset::Mecard)),
            "NOTE" => insert_first(&mut fields, "note", unescape(value, EscapeRuleset::Mecard)),
            _ => {}
        }
    }
    if let Some(name) = n_fallback {
        insert_first(&mut fields, "name", name);
    }
    fields
}

/// Joins a structured vCard value (`Family;Given;;;`) into one display
/// string, dropping empty components.
fn join_components(value: &str) -> String {
    let parts: Vec<String> = split_unescaped(value, ';')
        .iter()
        .map(|component| unescape(component, EscapeRuleset::Mecard))
        .filter(|component| !component.trim().is_empty())
        .collect();
    parts.join(" ")
}

// Calendar events
//------------------------------------------------------------------------------

fn parse_event(raw: &str) -> FieldValues {
    let mut fields = FieldValues::new();
    for line in raw.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let Some(idx) = find_unescaped(line, ':') else {
            continue;
        };
        let property = line[..idx].split(';').next().unwrap_or("").trim().to_ascii_uppercase();
        let value = &line[idx + 1..];
        match property.as_str() {
            "SUMMARY" => insert_first(&mut fields, "title", unescape(value, EscapeRuleset::Mecard)),
            "LOCATION" => insert_first(&mut fields, "location", unescape(value, EscapeRuleset::Mecard)),
            "DESCRIPTION" => {
                insert_first(&mut fields, "description", unescape(value, EscapeRuleset::Mecard))
            }
            "DTSTART" => insert_first(&mut fields, "start", value.trim().to_string()),
            "DTEND" => insert_first(&mut fields, "end", value.trim().to_string()),
            _ => {}
        }
    }
    fields
}

// Geo locations
//------------------------------------------------------------------------------

fn parse_geo(raw: &str) -> FieldValues {
    let mut fields = FieldValues::new();
    let rest = if starts_with_ignore_case(raw, "geo:") { &raw[4..] } else { raw };
    let rest = rest.split('?').next().unwrap_or(rest);
    let mut parts = rest.split(',');
    if let Some(lat) = parts.next() {
        insert_first(&mut fields, "latitude", lat.trim().to_string());
    }
    if let Some(lon) = parts.next() {
        insert_first(&mut fields, "longitude", lon.trim().to_string());
    }
    if let Some(alt) = parts.next() {
        insert_first(&mut fields, "altitude", alt.trim().to_string());
    }
    fields
}

// URI-shaped types
//------------------------------------------------------------------------------

fn parse_phone(raw: &str) -> FieldValues {
    let mut fields = FieldValues::new();
    let rest = if starts_with_ignore_case(raw, "tel:") { &raw[4..] } else { raw };
    insert_first(&mut fields, "number", normalize_phone(rest));
    fields
}

fn parse_sms(raw: &str) -> FieldValues {
    let mut fields = FieldValues::new();
    let rest = if starts_with_ignore_case(raw, "smsto:") {
        &raw[6..]
    } else if starts_with_ignore_case(raw, "sms:") {
        &raw[4..]
    } else {
        raw
    };
    if let Some((number, query)) = rest.split_once('?') {
        insert_first(&mut fields, "number", normalize_phone(number));
        for (key, value) in query_pairs(query) {
            if key == "body" {
                insert_first(&mut fields, "message", value);
            }
        }
    } else if let Some((number, body)) = rest.split_once(':') {
        // legacy smsto:number:body form
        insert_first(&mut fields, "number", normalize_phone(number));
        insert_first(&mut fields, "message", body.to_string());
    } else {
        insert_first(&mut fields, "number", normalize_phone(rest));
    }
    fields
}

fn parse_email(raw: &str) -> FieldValues {
    let mut fields = FieldValues::new();
    let rest = if starts_with_ignore_case(raw, "mailto:") { &raw[7..] } else { raw };
    let (address, query) = match rest.split_once('?') {
        Some((address, query)) => (address, Some(query)),
        None => (rest, None),
    };
    insert_first(&mut fields, "address", percent_decode(address.trim()));
    if let Some(query) = query {
        for (key, value) in query_pairs(query) {
            match key.as_str() {
                "subject" => insert_first(&mut fields, "subject", value),
                "body" => insert_first(&mut fields, "body", value),
                _ => {}
            }
        }
    }
    fields
}

fn query_pairs(query: &str) -> impl Iterator<Item = (String, String)> + '_ {
    query.split('&').filter_map(|pair| {
        let (key, value) = pair.split_once('=')?;
        Some((percent_decode(key).to_ascii_lowercase(), percent_decode(value)))
    })
}

#[cfg(test)]
mod parse_tests {
    use super::parse;
    use crate::common::metadata::ContentType;

    fn get<'a>(fields: &'a crate::template::FieldValues, key: &str) -> Option<&'a str> {
        fields.get(key).map(String::as_str)
    }

    #[test]
    fn test_wifi_roundtrip_fields() {
        let fields = parse(ContentType::WifiCredential, "WIFI:T:WPA;S:Caf\\;e;P:p\\\\q;;");
        assert_eq!(get(&fields, "auth"), Some("WPA"));
        assert_eq!(get(&fields, "ssid"), Some("Caf;e"));
        assert_eq!(get(&fields, "password"), Some("p\\q"));
        assert_eq!(get(&fields, "hidden"), None);
    }

    #[test]
    fn test_wifi_hidden_and_unknown_segments() {
        let fields =
            parse(ContentType::WifiCredential, "WIFI:T:WEP;S:net;P:pw;H:true;X:ignored;;");
        assert_eq!(get(&fields, "hidden"), Some("true"));
        assert!(!fields.contains_key("X"));
    }

    #[test]
    fn test_wifi_escaped_delimiters_in_both_values() {
        let fields =
            parse(ContentType::WifiCredential, "WIFI:T:WPA;S:a\\;b\\,c;P:x\\:y\\;z;;");
        assert_eq!(get(&fields, "ssid"), Some("a;b,c"));
        assert_eq!(get(&fields, "password"), Some("x:y;z"));
    }

    #[test]
    fn test_wifi_malformed_is_partial_not_failed() {
        let fields = parse(ContentType::WifiCredential, "WIFI:S:only-ssid");
        assert_eq!(get(&fields, "ssid"), Some("only-ssid"));
        assert_eq!(fields.len(), 1);
    }

    #[test]
    fn test_mecard_fields() {
        let raw = "MECARD:N:Doe\\, John;TEL:+15550100;EMAIL:j@example.com;NOTE:likes\\; semicolons;;";
        let fields = parse(ContentType::ContactCard, raw);
        assert_eq!(get(&fields, "name"), Some("Doe, John"));
        assert_eq!(get(&fields, "phone"), Some("+15550100"));
        assert_eq!(get(&fields, "email"), Some("j@example.com"));
        assert_eq!(get(&fields, "note"), Some("likes; semicolons"));
    }

    #[test]
    fn test_vcard_fields_and_param_tolerance() {
        let raw = "BEGIN:VCARD\r\nVERSION:3.0\r\nN:Lovelace;Ada;;;\r\nFN:Ada Lovelace\r\nTEL;TYPE=CELL:555-0100\r\nORG:Analytical Engines\r\nEND:VCARD\r\n";
        let fields = parse(ContentType::ContactCard, raw);
        assert_eq!(get(&fields, "name"), Some("Ada Lovelace"));
        assert_eq!(get(&fields, "phone"), Some("555-0100"));
        assert_eq!(get(&fields, "org"), Some("Analytical Engines"));
    }

    #[test]
    fn test_vcard_n_fallback_when_fn_missing() {
        let raw = "BEGIN:VCARD\nVERSION:3.0\nN:Lovelace;Ada;;;\nEND:VCARD";
        let fields = parse(ContentType::ContactCard, raw);
        assert_eq!(get(&fields, "name"), Some("Lovelace Ada"));
    }

    #[test]
    fn test_vcard_adr_components_joined() {
        let raw = "BEGIN:VCARD\nVERSION:3.0\nFN:X\nADR:;;1600 Amphitheatre Pkwy;Mountain View;CA;;\nEND:VCARD";
        let fields = parse(ContentType::ContactCard, raw);
        assert_eq!(get(&fields, "address"), Some("1600 Amphitheatre Pkwy Mountain View CA"));
    }

    #[test]
    fn test_event_fields() {
        let raw = "BEGIN:VEVENT\r\nSUMMARY:Standup\\; daily\r\nDTSTART:20260805T090000Z\r\nDTEND:20260805T091500Z\r\nLOCATION:Room 4\r\nEND:VEVENT\r\n";
        let fields = parse(ContentType::CalendarEvent, raw);
        assert_eq!(get(&fields, "title"), Some("Standup; daily"));
        assert_eq!(get(&fields, "start"), Some("20260805T090000Z"));
        assert_eq!(get(&fields, "end"), Some("20260805T091500Z"));
        assert_eq!(get(&fields, "location"), Some("Room 4"));
    }

    #[test]
    fn test_event_wrapped_and_with_params() {
        let raw = "BEGIN:VCALENDAR\nBEGIN:VEVENT\nDTSTART;VALUE=DATE:20260805\nSUMMARY:Trip\nEND:VEVENT\nEND:VCALENDAR";
        let fields = parse(ContentType::CalendarEvent, raw);
        assert_eq!(get(&fields, "start"), Some("20260805"));
        assert_eq!(get(&fields, "title"), Some("Trip"));
    }

    #[test]
    fn test_geo_fields() {
        let fields = parse(ContentType::GeoLocation, "geo:48.858400,2.294500");
        assert_eq!(get(&fields, "latitude"), Some("48.858400"));
        assert_eq!(get(&fields, "longitude"), Some("2.294500"));
    }

    #[test]
    fn test_geo_altitude_and_query_ignored() {
        let fields = parse(ContentType::GeoLocation, "geo:48.8,2.2,35?z=17");
        assert_eq!(get(&fields, "altitude"), Some("35"));
        assert_eq!(get(&fields, "longitude"), Some("2.2"));
    }

    #[test]
    fn test_geo_partial() {
        let fields = parse(ContentType::GeoLocation, "geo:48.8");
        assert_eq!(get(&fields, "latitude"), Some("48.8"));
        assert_eq!(get(&fields, "longitude"), None);
    }

    #[test]
    fn test_phone_normalized() {
        let fields = parse(ContentType::PhoneNumber, "tel:+1-555-0100");
        assert_eq!(get(&fields, "number"), Some("+15550100"));
    }

    #[test]
    fn test_sms_query_form() {
        let fields = parse(ContentType::Sms, "sms:555-0100?body=running%20late");
        assert_eq!(get(&fields, "number"), Some("5550100"));
        assert_eq!(get(&fields, "message"), Some("running late"));
    }

    #[test]
    fn test_smsto_legacy_form() {
        let fields = parse(ContentType::Sms, "smsto:5550100:on my way");
        assert_eq!(get(&fields, "number"), Some("5550100"));
        assert_eq!(get(&fields, "message"), Some("on my way"));
    }

    #[test]
    fn test_email_with_query() {
        let fields =
            parse(ContentType::Email, "mailto:a@b.com?subject=hi%20there&body=see%20you");
        assert_eq!(get(&fields, "address"), Some("a@b.com"));
        assert_eq!(get(&fields, "subject"), Some("hi there"));
        assert_eq!(get(&fields, "body"), Some("see you"));
    }

    #[test]
    fn test_bare_email_address() {
        let fields = parse(ContentType::Email, "a@b.com");
        assert_eq!(get(&fields, "address"), Some("a@b.com"));
    }

    #[test]
    fn test_unstructured_types_empty() {
        assert!(parse(ContentType::PlainText, "Just some notes").is_empty());
        assert!(parse(ContentType::Url, "https://example.com").is_empty());
        assert!(parse(ContentType::Unknown, "BEGIN:VEVENT").is_empty());
    }

    #[test]
    fn test_first_occurrence_wins() {
        let fields = parse(ContentType::WifiCredential, "WIFI:S:first;S:second;;");
        assert_eq!(get(&fields, "ssid"), Some("first"));
    }
}
