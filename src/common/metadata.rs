use std::fmt::{Display, Error, Formatter};

use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

// Content type
//------------------------------------------------------------------------------

/// Semantic classification of a barcode's decoded text, distinct from the
/// symbology the text was carried in. The persisted tokens are stable across
/// versions; unknown tokens fall back to `Unknown` instead of failing a load.
#[derive(Debug, PartialEq, Eq, Copy, Clone, Hash)]
pub enum ContentType {
    PlainText,
    Url,
    Email,
    PhoneNumber,
    Sms,
    WifiCredential,
    ContactCard,
    CalendarEvent,
    GeoLocation,
    Unknown,
}

impl Serialize for ContentType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_token())
    }
}

impl<'de> Deserialize<'de> for ContentType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let token = String::deserialize(deserializer)?;
        Ok(Self::from_token(&token))
    }
}

impl ContentType {
    pub fn as_token(&self) -> &'static str {
        match self {
            Self::PlainText => "text",
            Self::Url => "url",
            Self::Email => "email",
            Self::PhoneNumber => "phone",
            Self::Sms => "sms",
            Self::WifiCredential => "wifi",
            Self::ContactCard => "contact",
            Self::CalendarEvent => "calendar",
            Self::GeoLocation => "geo",
            Self::Unknown => "unknown",
        }
    }

    /// Falls back to `Unknown` for tokens written by a newer or older build.
    pub fn from_token(token: &str) -> Self {
        match token {
            "text" => Self::PlainText,
            "url" => Self::Url,
            "email" => Self::Email,
            "phone" => Self::PhoneNumber,
            "sms" => Self::Sms,
            "wifi" => Self::WifiCredential,
            "contact" => Self::ContactCard,
            "calendar" => Self::CalendarEvent,
            "geo" => Self::GeoLocation,
            _ => Self::Unknown,
        }
    }

    /// True for the types the payload parser can extract fields from.
    pub fn is_structured(&self) -> bool {
        matches!(self, Self::WifiCredential | Self::ContactCard | Self::CalendarEvent | Self::GeoLocation)
    }
}

impl Display for ContentType {
    fn fmt(&self, f: &mut Formatter) -> Result<(), Error> {
        let name = match self {
            Self::PlainText => "Plain text",
            Self::Url => "URL",
            Self::Email => "Email",
            Self::PhoneNumber => "Phone number",
            Self::Sms => "SMS",
            Self::WifiCredential => "Wi-Fi network",
            Self::ContactCard => "Contact",
            Self::CalendarEvent => "Calendar event",
            Self::GeoLocation => "Location",
            Self::Unknown => "Unknown",
        };
        f.write_str(name)
    }
}

// Barcode format
//------------------------------------------------------------------------------

/// Symbology the payload is rendered in or was detected from. Orthogonal to
/// [`ContentType`]; the symbology constrains character set and length, not
/// the text grammar. Tokens follow the detector library's naming.
#[derive(Debug, PartialEq, Eq, Copy, Clone, Hash)]
pub enum BarcodeFormat {
    Aztec,
    Codabar,
    Code39,
    Code93,
    Code128,
    DataMatrix,
    Ean8,
    Ean13,
    Itf,
    Pdf417,
    QrCode,
    UpcA,
    UpcE,
}

impl Serialize for BarcodeFormat {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_token())
    }
}

impl<'de> Deserialize<'de> for BarcodeFormat {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let token = String::deserialize(deserializer)?;
        Self::from_token(&token)
            .ok_or_else(|| DeError::custom(format!("unknown barcode format token: {token}")))
    }
}

pub static BARCODE_FORMATS: [BarcodeFormat; 13] = [
    BarcodeFormat::Aztec,
    BarcodeFormat::Codabar,
    BarcodeFormat::Code39,
    BarcodeFormat::Code93,
    BarcodeFormat::Code128,
    BarcodeFormat::DataMatrix,
    BarcodeFormat::Ean8,
    BarcodeFormat::Ean13,
    BarcodeFormat::Itf,
    BarcodeFormat::Pdf417,
    BarcodeFormat::QrCode,
    BarcodeFormat::UpcA,
    BarcodeFormat::UpcE,
];

impl BarcodeFormat {
    pub fn as_token(&self) -> &'static str {
        match self {
            Self::Aztec => "AZTEC",
            Self::Codabar => "CODABAR",
            Self::Code39 => "CODE_39",
            Self::Code93 => "CODE_93",
            Self::Code128 => "CODE_128",
            Self::DataMatrix => "DATA_MATRIX",
            Self::Ean8 => "EAN_8",
            Self::Ean13 => "EAN_13",
            Self::Itf => "ITF",
            Self::Pdf417 => "PDF_417",
            Self::QrCode => "QR_CODE",
            Self::UpcA => "UPC_A",
            Self::UpcE => "UPC_E",
        }
    }

    pub fn from_token(token: &str) -> Option<Self> {
        BARCODE_FORMATS.iter().find(|bf| bf.as_token() == token).copied()
    }

    /// Whether the symbology's character repertoire includes `byte`.
    pub fn contains(&self, byte: u8) -> bool {
        match self {
            Self::Ean8 | Self::Ean13 | Self::Itf | Self::UpcA | Self::UpcE => byte.is_ascii_digit(),
            Self::Code39 => {
                matches!(byte, b'0'..=b'9' | b'A'..=b'Z' | b' ' | b'-' | b'.' | b'$' | b'/' | b'+' | b'%')
            }
            Self::Codabar => {
                matches!(byte, b'0'..=b'9' | b'A'..=b'D' | b'-' | b'$' | b':' | b'/' | b'.' | b'+')
            }
            Self::Code93 | Self::Code128 => byte.is_ascii(),
            Self::Aztec | Self::DataMatrix | Self::Pdf417 | Self::QrCode => true,
        }
    }

    /// Whether `payload` is representable in this symbology. Checks character
    /// repertoire and, for the fixed-length retail codes, digit count with or
    /// without the check digit.
    pub fn accepts(&self, payload: &str) -> bool {
        if !payload.bytes().all(|b| self.contains(b)) {
            return false;
        }
        let len = payload.len();
        match self {
            Self::Ean8 => len == 7 || len == 8,
            Self::Ean13 => len == 12 || len == 13,
            Self::UpcA => len == 11 || len == 12,
            Self::UpcE => (6..=8).contains(&len),
            // ITF encodes digit pairs
            Self::Itf => len > 0 && len % 2 == 0,
            _ => !payload.is_empty(),
        }
    }
}

#[cfg(test)]
mod content_type_tests {
    use super::ContentType;

    #[test]
    fn test_token_roundtrip() {
        let all = [
            ContentType::PlainText,
            ContentType::Url,
            ContentType::Email,
            ContentType::PhoneNumber,
            ContentType::Sms,
            ContentType::WifiCredential,
            ContentType::ContactCard,
            ContentType::CalendarEvent,
            ContentType::GeoLocation,
            ContentType::Unknown,
        ];
        for ct in all {
            assert_eq!(ContentType::from_token(ct.as_token()), ct);
        }
    }

    #[test]
    fn test_unknown_token_falls_back() {
        assert_eq!(ContentType::from_token("hologram"), ContentType::Unknown);
        assert_eq!(ContentType::from_token(""), ContentType::Unknown);
    }

    #[test]
    fn test_structured_split() {
        assert!(ContentType::WifiCredential.is_structured());
        assert!(ContentType::ContactCard.is_structured());
        assert!(ContentType::CalendarEvent.is_structured());
        assert!(ContentType::GeoLocation.is_structured());
        assert!(!ContentType::PlainText.is_structured());
        assert!(!ContentType::Url.is_structured());
        assert!(!ContentType::Unknown.is_structured());
    }
}

#[cfg(test)]
mod barcode_format_tests {
    use super::{BarcodeFormat, BARCODE_FORMATS};

    #[test]
    fn test_token_roundtrip() {
        for bf in BARCODE_FORMATS {
            assert_eq!(BarcodeFormat::from_token(bf.as_token()), Some(bf));
        }
    }

    #[test]
    fn test_unknown_token_rejected() {
        assert_eq!(BarcodeFormat::from_token("MAXICODE"), None);
    }

    #[test]
    fn test_retail_lengths() {
        assert!(BarcodeFormat::Ean13.accepts("5901234123457"));
        assert!(BarcodeFormat::Ean13.accepts("590123412345"));
        assert!(!BarcodeFormat::Ean13.accepts("59012341234"));
        assert!(!BarcodeFormat::Ean13.accepts("590123412345X"));
        assert!(BarcodeFormat::Ean8.accepts("96385074"));
        assert!(BarcodeFormat::UpcA.accepts("036000291452"));
    }

    #[test]
    fn test_charsets() {
        assert!(BarcodeFormat::Code39.accepts("CODE-39 TEST."));
        assert!(!BarcodeFormat::Code39.accepts("lowercase"));
        assert!(BarcodeFormat::QrCode.accepts("WIFI:T:WPA;S:home;P:pass;;"));
        assert!(!BarcodeFormat::Itf.accepts("1234567"));
        assert!(BarcodeFormat::Itf.accepts("12345678"));
    }
}
