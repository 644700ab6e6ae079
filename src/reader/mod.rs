pub mod classify;
pub mod parse;

pub use classify::classify;
pub use parse::parse;

use encoding_rs::{SHIFT_JIS, WINDOWS_1252};

use crate::common::metadata::ContentType;
use crate::template::FieldValues;

// Raw byte decoding
//------------------------------------------------------------------------------

/// Decodes the detector's raw bytes into text: UTF-8 first, Shift JIS for the
/// QR kanji convention, Windows-1252 as the total single-byte fallback. Never
/// fails; scanned input is untrusted.
pub fn decode_raw(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(utf8) => utf8.to_string(),
        Err(_) => {
            let (decoded, _, has_err) = SHIFT_JIS.decode(bytes);
            if !has_err {
                return decoded.into_owned();
            }
            WINDOWS_1252.decode(bytes).0.into_owned()
        }
    }
}

// Classification result
//------------------------------------------------------------------------------

/// Outcome of one scan event: the semantic content type plus whatever fields
/// the parser could extract. `fields` is empty for unstructured content and
/// may be partial for malformed structured content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub content_type: ContentType,
    pub fields: FieldValues,
}

/// Classifies `raw` and, when the type is structured, extracts its fields.
pub fn inspect(raw: &str) -> Classification {
    let content_type = classify(raw);
    let fields = parse(content_type, raw);
    Classification { content_type, fields }
}

#[cfg(test)]
mod reader_tests {
    use super::{decode_raw, inspect};
    use crate::common::metadata::ContentType;

    #[test]
    fn test_decode_raw_utf8() {
        assert_eq!(decode_raw("héllo".as_bytes()), "héllo");
    }

    #[test]
    fn test_decode_raw_shift_jis_fallback() {
        // "テスト" in Shift JIS
        let bytes = [0x83, 0x65, 0x83, 0x58, 0x83, 0x67];
        assert_eq!(decode_raw(&bytes), "テスト");
    }

    #[test]
    fn test_decode_raw_single_byte_fallback_is_total() {
        let bytes = [0xff, 0x00, 0x80, 0xfe];
        assert!(!decode_raw(&bytes).is_empty());
    }

    #[test]
    fn test_inspect_structured() {
        let result = inspect("WIFI:T:WPA;S:homenet;P:hunter2;;");
        assert_eq!(result.content_type, ContentType::WifiCredential);
        assert_eq!(result.fields.get("ssid").map(String::as_str), Some("homenet"));
    }

    #[test]
    fn test_inspect_plain_text_has_no_fields() {
        let result = inspect("Just some notes");
        assert_eq!(result.content_type, ContentType::PlainText);
        assert!(result.fields.is_empty());
    }
}
