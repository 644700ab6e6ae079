mod registry;

pub use registry::TemplateRegistry;

use std::collections::BTreeMap;

use crate::common::metadata::ContentType;

// Field values
//------------------------------------------------------------------------------

/// User-entered values keyed by [`FieldSpec::key`]. A key that is not present
/// is absent; an empty string is a present (and validated) value.
pub type FieldValues = BTreeMap<String, String>;

// Contact flavor
//------------------------------------------------------------------------------

/// Which contact-card micro-format a [`ContentType::ContactCard`] template
/// renders to.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum ContactFlavor {
    Mecard,
    VCard3,
}

// Field spec
//------------------------------------------------------------------------------

/// One field of a template: the persisted map key, a display label, whether
/// the field must be supplied, a validator predicate and the value used when
/// an optional field is absent.
#[derive(Debug, Copy, Clone)]
pub struct FieldSpec {
    pub key: &'static str,
    pub label: &'static str,
    pub required: bool,
    pub validator: fn(&str) -> bool,
    pub default: &'static str,
}

// Template
//------------------------------------------------------------------------------

/// Immutable descriptor of one payload schema. Templates are static
/// configuration, constructed once and shared read-only; several templates
/// may produce the same content type.
#[derive(Debug, Copy, Clone)]
pub struct Template {
    pub id: &'static str,
    pub name: &'static str,
    pub content_type: ContentType,
    pub flavor: Option<ContactFlavor>,
    pub fields: &'static [FieldSpec],
}

impl Template {
    pub fn field(&self, key: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|spec| spec.key == key)
    }

    /// Value for `key`: the user-supplied one if present, else the spec
    /// default, else empty.
    pub fn value_or_default<'a>(&self, values: &'a FieldValues, key: &str) -> &'a str {
        match values.get(key) {
            Some(value) => value,
            None => self.field(key).map(|spec| spec.default).unwrap_or(""),
        }
    }
}
