//! # barcodec
//!
//! A Rust library for barcode payload encoding and content classification.
//! Turns a typed template (Wi-Fi credential, contact card, calendar event,
//! URL, plain text and friends) plus user-entered fields into the exact text
//! string to embed in a generated barcode, and classifies/parses raw scanned
//! strings back into structured fields.
//!
//! ## Features
//!
//! - **Payload Generation**: Render structured templates into MECARD, vCard
//!   3.0, `WIFI:`, `mailto:`, `tel:`, `sms:`, `geo:` and VEVENT payloads with
//!   format-compliant escaping
//! - **Content Classification**: Ordered first-match rules map any decoded
//!   string to a semantic content type, falling back to plain text
//! - **Structured Parsing**: Best-effort, never-failing field extraction for
//!   scanned structured payloads
//! - **Field Validation**: Per-template required/optional field specs with
//!   validator predicates, reporting every violation at once
//! - **Symbology Checks**: Character-set and length pre-flight per barcode
//!   format before handing payloads to a symbol encoder
//!
//! ## Quick Start
//!
//! ### Generating a payload
//!
//! ```rust
//! use barcodec::{format, FieldValues, TemplateRegistry};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let registry = TemplateRegistry::new();
//! let template = registry.get("wifi")?;
//!
//! let mut values = FieldValues::new();
//! values.insert("ssid".into(), "homenet".into());
//! values.insert("password".into(), "hunter2".into());
//!
//! registry.validate(template, &values)?;
//! let payload = format(template, &values)?;
//! assert_eq!(payload, "WIFI:T:WPA;S:homenet;P:hunter2;;");
//! # Ok(())
//! # }
//! ```
//!
//! ### The builder surface
//!
//! ```rust
//! use barcodec::{PayloadBuilder, TemplateRegistry};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let registry = TemplateRegistry::new();
//! let payload = PayloadBuilder::new(registry.get("url")?)
//!     .set("url", "example.com")
//!     .build()?;
//! assert_eq!(payload, "http://example.com");
//! # Ok(())
//! # }
//! ```
//!
//! ### Classifying and parsing a scan
//!
//! ```rust
//! use barcodec::{inspect, ContentType};
//!
//! let result = inspect("WIFI:T:WPA;S:homenet;P:hunter2;;");
//! assert_eq!(result.content_type, ContentType::WifiCredential);
//! assert_eq!(result.fields.get("ssid").map(String::as_str), Some("homenet"));
//! ```
//!
//! Classification and parsing are total: scanned content is untrusted, so
//! malformed input degrades to [`ContentType::Unknown`]/[`ContentType::PlainText`]
//! and partial field mappings instead of errors.
//!
//! Everything here is pure and synchronous; the only shared state is the
//! read-only template table, so all operations are safe to call concurrently
//! without coordination.

pub mod builder;
pub mod common;
pub mod reader;
pub mod template;

pub use builder::{check_payload, format, has_rule, self_check, PayloadBuilder};
pub use common::error::{CodecError, CodecResult};
pub use common::escape::{escape, percent_decode, percent_encode, unescape, EscapeRuleset};
pub use common::metadata::{BarcodeFormat, ContentType, BARCODE_FORMATS};
pub use reader::{classify, decode_raw, inspect, parse, Classification};
pub use template::{ContactFlavor, FieldSpec, FieldValues, Template, TemplateRegistry};
