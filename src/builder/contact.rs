use crate::common::escape::{escape, EscapeRuleset};
use crate::template::{FieldValues, Template};

// Contact card rendering
//------------------------------------------------------------------------------

/// vCard mandates CRLF regardless of the platform's native line ending.
pub(crate) const LINE_END: &str = "\r\n";

/// Field key → MECARD tag / vCard property, in emission order.
static CONTACT_TAGS: [(&str, &str); 6] = [
    ("phone", "TEL"),
    ("email", "EMAIL"),
    ("org", "ORG"),
    ("address", "ADR"),
    ("url", "URL"),
    ("note", "NOTE"),
];

pub(crate) fn mecard(template: &Template, values: &FieldValues) -> String {
    let mut out = String::from("MECARD:");
    push_segment(&mut out, "N", template.value_or_default(values, "name"));
    for (key, tag) in CONTACT_TAGS {
        let value = template.value_or_default(values, key);
        if !value.is_empty() {
            push_segment(&mut out, tag, value);
        }
    }
    out.push(';');
    out
}

fn push_segment(out: &mut String, tag: &str, value: &str) {
    out.push_str(tag);
    out.push(':');
    out.push_str(&escape(value, EscapeRuleset::Mecard));
    out.push(';');
}

pub(crate) fn vcard(template: &Template, values: &FieldValues) -> String {
    let name = template.value_or_default(values, "name");
    let mut out = String::from("BEGIN:VCARD");
    out.push_str(LINE_END);
    out.push_str("VERSION:3.0");
    out.push_str(LINE_END);
    push_line(&mut out, "N", name);
    push_line(&mut out, "FN", name);
    for (key, tag) in CONTACT_TAGS {
        let value = template.value_or_default(values, key);
        if !value.is_empty() {
            push_line(&mut out, tag, value);
        }
    }
    out.push_str("END:VCARD");
    out.push_str(LINE_END);
    out
}

fn push_line(out: &mut String, property: &str, value: &str) {
    out.push_str(property);
    out.push(':');
    out.push_str(&escape(value, EscapeRuleset::Mecard));
    out.push_str(LINE_END);
}
