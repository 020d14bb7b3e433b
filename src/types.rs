use crate::common::error::{EncodeError, EncodeResult};
use crate::qr::metadata::ECLevel;

// Barcode format
//------------------------------------------------------------------------------

/// Every symbology this crate can encode.
#[derive(Debug, PartialEq, Eq, Copy, Clone, Hash)]
pub enum BarcodeFormat {
    Codabar,
    Code39,
    Code93,
    Code128,
    Ean8,
    Ean13,
    Itf,
    Msi,
    Plessey,
    QrCode,
    UpcA,
    UpcE,
}

// Character set
//------------------------------------------------------------------------------

/// Byte encodings QR byte mode can carry, each with its ECI designator.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum CharacterSet {
    Iso8859_1,
    ShiftJis,
    Utf8,
}

impl CharacterSet {
    pub fn eci_value(self) -> u32 {
        match self {
            Self::Iso8859_1 => 1,
            Self::ShiftJis => 20,
            Self::Utf8 => 26,
        }
    }

    /// Encodes text into this character set. Shift_JIS is limited to its
    /// ASCII subset; full transcoding tables are out of scope and CJK text
    /// travels as UTF-8 with an ECI header instead.
    pub fn encode(self, content: &str) -> EncodeResult<Vec<u8>> {
        match self {
            Self::Iso8859_1 => content
                .chars()
                .map(|c| {
                    u8::try_from(c as u32).map_err(|_| {
                        EncodeError::BadInput(format!("{c:?} is not representable in ISO-8859-1"))
                    })
                })
                .collect(),
            Self::ShiftJis => {
                if content.is_ascii() {
                    Ok(content.as_bytes().to_vec())
                } else {
                    Err(EncodeError::BadInput(
                        "Shift_JIS transcoding beyond ASCII is not supported".into(),
                    ))
                }
            }
            Self::Utf8 => Ok(content.as_bytes().to_vec()),
        }
    }
}

// Encode hints
//------------------------------------------------------------------------------

/// Optional knobs for [`crate::encode_with_hints`]. An unset field means
/// "use the default".
#[derive(Debug, Default, Clone)]
pub struct EncodeHints {
    /// QR error correction level; defaults to L.
    pub error_correction: Option<ECLevel>,
    /// Byte-mode character set; defaults to ISO-8859-1 with a UTF-8
    /// fallback for unrepresentable text.
    pub character_set: Option<CharacterSet>,
    /// Pins the QR version instead of picking the smallest fit.
    pub qr_version: Option<usize>,
    /// Suppresses the ECI header byte mode would otherwise emit.
    pub disable_eci: bool,
    /// Formats the payload as GS1: FNC1 in first position.
    pub gs1_format: bool,
    /// Forces CODE 128 to stay in code set B.
    pub code128_force_codeset_b: bool,
    /// Overrides the 1-D quiet zone, in modules across both sides.
    pub margin: Option<usize>,
}

#[cfg(test)]
mod character_set_tests {
    use super::CharacterSet;

    #[test]
    fn test_eci_values() {
        assert_eq!(CharacterSet::Iso8859_1.eci_value(), 1);
        assert_eq!(CharacterSet::ShiftJis.eci_value(), 20);
        assert_eq!(CharacterSet::Utf8.eci_value(), 26);
    }

    #[test]
    fn test_iso8859_1_encoding() {
        assert_eq!(CharacterSet::Iso8859_1.encode("café").unwrap(), b"caf\xe9");
        assert!(CharacterSet::Iso8859_1.encode("→").is_err());
    }

    #[test]
    fn test_utf8_encoding() {
        assert_eq!(CharacterSet::Utf8.encode("→").unwrap(), "→".as_bytes());
    }

    #[test]
    fn test_shift_jis_is_ascii_only() {
        assert_eq!(CharacterSet::ShiftJis.encode("ABC").unwrap(), b"ABC");
        assert!(CharacterSet::ShiftJis.encode("点").is_err());
    }
}
