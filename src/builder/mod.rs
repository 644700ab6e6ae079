pub(crate) mod contact;
pub(crate) mod event;

use tracing::debug;

use crate::common::error::{CodecError, CodecResult};
use crate::common::escape::{escape, percent_encode, EscapeRuleset};
use crate::common::metadata::{BarcodeFormat, ContentType};
use crate::template::{ContactFlavor, FieldValues, Template, TemplateRegistry};

// Payload formatter
//------------------------------------------------------------------------------

/// Schemes the URL rule recognizes; anything else gets the template's default
/// scheme prefixed.
static URL_SCHEMES: [&str; 5] = ["http://", "https://", "ftp://", "mailto:", "tel:"];

/// Renders `template` + `values` into the payload string. Assumes
/// [`TemplateRegistry::validate`] has passed; absent optional fields take the
/// spec default or drop their segment. Field content can no longer fail here,
/// only a template declaring a content type without a rendering rule can.
pub fn format(template: &Template, values: &FieldValues) -> CodecResult<String> {
    debug!(template = template.id, "formatting payload");
    let payload = match template.content_type {
        ContentType::PlainText => plain_text(template, values),
        ContentType::Url => url(template, values),
        ContentType::Email => email(template, values),
        ContentType::PhoneNumber => phone(template, values),
        ContentType::Sms => sms(template, values),
        ContentType::WifiCredential => wifi(template, values),
        ContentType::ContactCard => match template.flavor {
            Some(ContactFlavor::VCard3) => contact::vcard(template, values),
            _ => contact::mecard(template, values),
        },
        ContentType::CalendarEvent => event::vevent(template, values),
        ContentType::GeoLocation => geo(template, values),
        ContentType::Unknown => return Err(CodecError::UnsupportedContentType(ContentType::Unknown)),
    };
    Ok(payload)
}

/// True when the formatter has a rendering rule for `content_type`.
pub fn has_rule(content_type: ContentType) -> bool {
    content_type != ContentType::Unknown
}

/// Registry/formatter consistency gate, meant to run once at process start.
/// A template whose content type has no rendering rule is a configuration
/// bug, as is a non-empty default that its own validator rejects.
pub fn self_check(registry: &TemplateRegistry) -> CodecResult<()> {
    for template in registry.list() {
        if !has_rule(template.content_type) {
            return Err(CodecError::UnsupportedContentType(template.content_type));
        }
        let mut invalid = Vec::new();
        for spec in template.fields {
            if !spec.default.is_empty() && !(spec.validator)(spec.default) {
                invalid.push(spec.key.to_string());
            }
        }
        if !invalid.is_empty() {
            return Err(CodecError::Validation { missing: Vec::new(), invalid });
        }
    }
    Ok(())
}

/// Advisory pre-flight for the symbol encoder: does the target symbology's
/// character set and length rules admit this payload?
pub fn check_payload(format: BarcodeFormat, payload: &str) -> CodecResult<()> {
    if format.accepts(payload) {
        Ok(())
    } else {
        Err(CodecError::SymbologyMismatch(format))
    }
}

// Per-content-type rendering rules
//------------------------------------------------------------------------------

fn plain_text(template: &Template, values: &FieldValues) -> String {
    let key = template.fields.first().map(|spec| spec.key).unwrap_or("text");
    template.value_or_default(values, key).to_string()
}

fn url(template: &Template, values: &FieldValues) -> String {
    let value = template.value_or_default(values, "url").trim();
    if has_recognized_scheme(value) {
        return value.to_string();
    }
    let scheme = match template.value_or_default(values, "scheme").trim() {
        "" => "http://",
        scheme => scheme,
    };
    let mut out = String::with_capacity(scheme.len() + value.len());
    out.push_str(scheme);
    out.push_str(value);
    out
}

fn has_recognized_scheme(value: &str) -> bool {
    URL_SCHEMES.iter().any(|scheme| {
        value.len() >= scheme.len()
            && value.as_bytes()[..scheme.len()].eq_ignore_ascii_case(scheme.as_bytes())
    })
}

fn phone(template: &Template, values: &FieldValues) -> String {
    let number = normalize_phone(template.value_or_default(values, "number"));
    let mut out = String::from("tel:");
    out.push_str(&number);
    out
}

/// Strips everything but digits and a single leading `+`. The stripping
/// happens here, not in the validator, so user input survives verbatim in
/// the editor while the payload stays clean.
pub(crate) fn normalize_phone(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        if c.is_ascii_digit() || (c == '+' && out.is_empty()) {
            out.push(c);
        }
    }
    out
}

fn sms(template: &Template, values: &FieldValues) -> String {
    let number = normalize_phone(template.value_or_default(values, "number"));
    let message = template.value_or_default(values, "message");
    let mut out = String::from("sms:");
    out.push_str(&number);
    if !message.is_empty() {
        out.push_str("?body=");
        out.push_str(&percent_encode(message));
    }
    out
}

fn email(template: &Template, values: &FieldValues) -> String {
    let address = template.value_or_default(values, "address").trim();
    let mut out = String::from("mailto:");
    out.push_str(address);
    // subject before body, always, so identical input renders identically
    let mut sep = '?';
    for key in ["subject", "body"] {
        let value = template.value_or_default(values, key);
        if !value.is_empty() {
            out.push(sep);
            out.push_str(key);
            out.push('=');
            out.push_str(&percent_encode(value));
            sep = '&';
        }
    }
    out
}

fn wifi(template: &Template, values: &FieldValues) -> String {
    let auth = canonical_auth(template.value_or_default(values, "auth"));
    let ssid = template.value_or_default(values, "ssid");
    let password = template.value_or_default(values, "password");
    let hidden = template.value_or_default(values, "hidden");

    let mut out = String::from("WIFI:");
    out.push_str("T:");
    out.push_str(auth);
    out.push(';');
    out.push_str("S:");
    out.push_str(&escape(ssid, EscapeRuleset::WifiUri));
    out.push(';');
    if !password.is_empty() {
        out.push_str("P:");
        out.push_str(&escape(password, EscapeRuleset::WifiUri));
        out.push(';');
    }
    if hidden.eq_ignore_ascii_case("true") {
        out.push_str("H:true;");
    }
    out.push(';');
    out
}

fn canonical_auth(raw: &str) -> &'static str {
    if raw.eq_ignore_ascii_case("WEP") {
        "WEP"
    } else if raw.eq_ignore_ascii_case("nopass") {
        "nopass"
    } else {
        "WPA"
    }
}

fn geo(template: &Template, values: &FieldValues) -> String {
    // validation guarantees parseable coordinates; an unvalidated call
    // degrades to 0.0 rather than panicking
    let lat: f64 = template.value_or_default(values, "latitude").trim().parse().unwrap_or_default();
    let lon: f64 = template.value_or_default(values, "longitude").trim().parse().unwrap_or_default();
    format!("geo:{lat:.6},{lon:.6}")
}

// Payload builder
//------------------------------------------------------------------------------

/// Fluent validate-then-format surface over one template.
pub struct PayloadBuilder<'a> {
    template: &'a Template,
    values: FieldValues,
}

impl<'a> PayloadBuilder<'a> {
    pub fn new(template: &'a Template) -> Self {
        Self { template, values: FieldValues::new() }
    }

    pub fn set(&mut self, key: &str, value: impl Into<String>) -> &mut Self {
        self.values.insert(key.to_string(), value.into());
        self
    }

    pub fn unset(&mut self, key: &str) -> &mut Self {
        self.values.remove(key);
        self
    }

    pub fn values(&self) -> &FieldValues {
        &self.values
    }

    pub fn build(&self) -> CodecResult<String> {
        TemplateRegistry::new().validate(self.template, &self.values)?;
        format(self.template, &self.values)
    }
}
