use std::fmt::{Debug, Display, Error, Formatter};

use crate::common::metadata::{BarcodeFormat, ContentType};

// Error
//------------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq, Clone)]
pub enum CodecError {
    // Template registry
    UnknownTemplate(String),
    Validation { missing: Vec<String>, invalid: Vec<String> },

    // Payload formatter
    UnsupportedContentType(ContentType),
    SymbologyMismatch(BarcodeFormat),
}

impl Display for CodecError {
    fn fmt(&self, f: &mut Formatter) -> Result<(), Error> {
        match self {
            Self::UnknownTemplate(id) => write!(f, "Unknown template id: {id}"),
            Self::Validation { missing, invalid } => {
                write!(f, "Validation failed; missing: [{}], invalid: [{}]", missing.join(", "), invalid.join(", "))
            }
            Self::UnsupportedContentType(ct) => {
                write!(f, "No rendering rule for content type: {ct:?}")
            }
            Self::SymbologyMismatch(bf) => {
                write!(f, "Payload not representable in symbology: {bf:?}")
            }
        }
    }
}

impl std::error::Error for CodecError {}

pub type CodecResult<T> = Result<T, CodecError>;
