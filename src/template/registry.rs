use crate::common::error::{CodecError, CodecResult};
use crate::common::metadata::ContentType;
use crate::template::{ContactFlavor, FieldSpec, FieldValues, Template};

// Field validators
//------------------------------------------------------------------------------

pub(crate) mod validators {
    use crate::builder::event::parse_date_time;
    use crate::reader::classify::{is_email_shaped, is_phone_shaped};

    pub fn any(_: &str) -> bool {
        true
    }

    pub fn non_empty(value: &str) -> bool {
        !value.trim().is_empty()
    }

    pub fn phone_number(value: &str) -> bool {
        is_phone_shaped(value.trim())
    }

    pub fn email_address(value: &str) -> bool {
        is_email_shaped(value.trim())
    }

    pub fn url_value(value: &str) -> bool {
        let value = value.trim();
        !value.is_empty() && !value.contains(char::is_whitespace)
    }

    pub fn auth_mode(value: &str) -> bool {
        value.is_empty()
            || value.eq_ignore_ascii_case("WPA")
            || value.eq_ignore_ascii_case("WEP")
            || value.eq_ignore_ascii_case("nopass")
    }

    pub fn bool_flag(value: &str) -> bool {
        value.is_empty() || value.eq_ignore_ascii_case("true") || value.eq_ignore_ascii_case("false")
    }

    pub fn latitude(value: &str) -> bool {
        matches!(value.trim().parse::<f64>(), Ok(deg) if (-90.0..=90.0).contains(&deg))
    }

    pub fn longitude(value: &str) -> bool {
        matches!(value.trim().parse::<f64>(), Ok(deg) if (-180.0..=180.0).contains(&deg))
    }

    pub fn date_time(value: &str) -> bool {
        parse_date_time(value.trim()).is_some()
    }
}

// Built-in templates
//------------------------------------------------------------------------------

static TEXT_FIELDS: [FieldSpec; 1] = [FieldSpec {
    key: "text",
    label: "Text",
    required: true,
    validator: validators::any,
    default: "",
}];

static URL_FIELDS: [FieldSpec; 2] = [
    FieldSpec { key: "url", label: "URL", required: true, validator: validators::url_value, default: "" },
    FieldSpec { key: "scheme", label: "Scheme", required: false, validator: validators::any, default: "http://" },
];

static URL_HTTPS_FIELDS: [FieldSpec; 2] = [
    FieldSpec { key: "url", label: "URL", required: true, validator: validators::url_value, default: "" },
    FieldSpec { key: "scheme", label: "Scheme", required: false, validator: validators::any, default: "https://" },
];

static EMAIL_FIELDS: [FieldSpec; 3] = [
    FieldSpec {
        key: "address",
        label: "Address",
        required: true,
        validator: validators::email_address,
        default: "",
    },
    FieldSpec { key: "subject", label: "Subject", required: false, validator: validators::any, default: "" },
    FieldSpec { key: "body", label: "Body", required: false, validator: validators::any, default: "" },
];

static PHONE_FIELDS: [FieldSpec; 1] = [FieldSpec {
    key: "number",
    label: "Phone number",
    required: true,
    validator: validators::phone_number,
    default: "",
}];

static SMS_FIELDS: [FieldSpec; 2] = [
    FieldSpec {
        key: "number",
        label: "Phone number",
        required: true,
        validator: validators::phone_number,
        default: "",
    },
    FieldSpec { key: "message", label: "Message", required: false, validator: validators::any, default: "" },
];

static WIFI_FIELDS: [FieldSpec; 4] = [
    FieldSpec { key: "ssid", label: "Network name", required: true, validator: validators::non_empty, default: "" },
    FieldSpec { key: "password", label: "Password", required: false, validator: validators::any, default: "" },
    FieldSpec { key: "auth", label: "Security", required: false, validator: validators::auth_mode, default: "WPA" },
    FieldSpec { key: "hidden", label: "Hidden network", required: false, validator: validators::bool_flag, default: "false" },
];

static CONTACT_FIELDS: [FieldSpec; 7] = [
    FieldSpec { key: "name", label: "Name", required: true, validator: validators::non_empty, default: "" },
    FieldSpec { key: "phone", label: "Phone", required: false, validator: validators::phone_number, default: "" },
    FieldSpec { key: "email", label: "Email", required: false, validator: validators::email_address, default: "" },
    FieldSpec { key: "org", label: "Organization", required: false, validator: validators::any, default: "" },
    FieldSpec { key: "address", label: "Address", required: false, validator: validators::any, default: "" },
    FieldSpec { key: "url", label: "Website", required: false, validator: validators::url_value, default: "" },
    FieldSpec { key: "note", label: "Note", required: false, validator: validators::any, default: "" },
];

static EVENT_FIELDS: [FieldSpec; 5] = [
    FieldSpec { key: "title", label: "Title", required: true, validator: validators::non_empty, default: "" },
    FieldSpec { key: "start", label: "Starts", required: true, validator: validators::date_time, default: "" },
    FieldSpec { key: "end", label: "Ends", required: false, validator: validators::date_time, default: "" },
    FieldSpec { key: "location", label: "Location", required: false, validator: validators::any, default: "" },
    FieldSpec { key: "description", label: "Description", required: false, validator: validators::any, default: "" },
];

static GEO_FIELDS: [FieldSpec; 2] = [
    FieldSpec { key: "latitude", label: "Latitude", required: true, validator: validators::latitude, default: "" },
    FieldSpec { key: "longitude", label: "Longitude", required: true, validator: validators::longitude, default: "" },
];

// Declaration order is the UI presentation order; ids are persisted and must
// stay stable.
static TEMPLATES: [Template; 11] = [
    Template { id: "text", name: "Text", content_type: ContentType::PlainText, flavor: None, fields: &TEXT_FIELDS },
    Template { id: "url", name: "Website", content_type: ContentType::Url, flavor: None, fields: &URL_FIELDS },
    Template {
        id: "url_https",
        name: "Website (HTTPS)",
        content_type: ContentType::Url,
        flavor: None,
        fields: &URL_HTTPS_FIELDS,
    },
    Template { id: "email", name: "Email", content_type: ContentType::Email, flavor: None, fields: &EMAIL_FIELDS },
    Template {
        id: "phone",
        name: "Phone call",
        content_type: ContentType::PhoneNumber,
        flavor: None,
        fields: &PHONE_FIELDS,
    },
    Template { id: "sms", name: "SMS", content_type: ContentType::Sms, flavor: None, fields: &SMS_FIELDS },
    Template {
        id: "wifi",
        name: "Wi-Fi network",
        content_type: ContentType::WifiCredential,
        flavor: None,
        fields: &WIFI_FIELDS,
    },
    Template {
        id: "contact_mecard",
        name: "Contact (MECARD)",
        content_type: ContentType::ContactCard,
        flavor: Some(ContactFlavor::Mecard),
        fields: &CONTACT_FIELDS,
    },
    Template {
        id: "contact_vcard",
        name: "Contact (vCard)",
        content_type: ContentType::ContactCard,
        flavor: Some(ContactFlavor::VCard3),
        fields: &CONTACT_FIELDS,
    },
    Template {
        id: "event",
        name: "Calendar event",
        content_type: ContentType::CalendarEvent,
        flavor: None,
        fields: &EVENT_FIELDS,
    },
    Template {
        id: "geo",
        name: "Location",
        content_type: ContentType::GeoLocation,
        flavor: None,
        fields: &GEO_FIELDS,
    },
];

// Template registry
//------------------------------------------------------------------------------

/// Read-only lookup over the built-in template table. Construction is free;
/// the table lives in static storage for the process lifetime.
#[derive(Debug, Copy, Clone)]
pub struct TemplateRegistry {
    templates: &'static [Template],
}

impl TemplateRegistry {
    pub fn new() -> Self {
        Self { templates: &TEMPLATES }
    }

    /// All templates in stable declaration order.
    pub fn list(&self) -> &'static [Template] {
        self.templates
    }

    pub fn get(&self, id: &str) -> CodecResult<&'static Template> {
        self.templates
            .iter()
            .find(|template| template.id == id)
            .ok_or_else(|| CodecError::UnknownTemplate(id.to_string()))
    }

    /// Checks `values` against the template's field specs, collecting every
    /// violation before reporting. A field is missing when required and
    /// absent; it is invalid when present but rejected by its validator.
    pub fn validate(&self, template: &Template, values: &FieldValues) -> CodecResult<()> {
        let mut missing = Vec::new();
        let mut invalid = Vec::new();
        for spec in template.fields {
            match values.get(spec.key) {
                Some(value) => {
                    if !(spec.validator)(value) {
                        invalid.push(spec.key.to_string());
                    }
                }
                None => {
                    if spec.required {
                        missing.push(spec.key.to_string());
                    }
                }
            }
        }
        if missing.is_empty() && invalid.is_empty() {
            Ok(())
        } else {
            Err(CodecError::Validation { missing, invalid })
        }
    }
}

impl Default for TemplateRegistry {
    fn default() -> Self {
        Self::new()
    }
}
