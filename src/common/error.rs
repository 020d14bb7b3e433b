use std::fmt::{Debug, Display, Error, Formatter};

// Error
//------------------------------------------------------------------------------

/// Every failure an encode call can report. All variants are recoverable by
/// the caller; `InternalInvariant` signals programmer error and never fires
/// for valid input.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum EncodeError {
    /// Content not representable in the requested symbology, length bounds
    /// violated, negative dimensions, or a format routed to the wrong
    /// encoder.
    BadInput(String),
    /// Data does not fit: no QR version can hold it, or a 1-D symbology's
    /// length bound is exceeded.
    Overflow(String),
    /// A caller-supplied UPC/EAN check digit disagrees with the computed one.
    ChecksumMismatch(String),
    /// Unexpected internal state.
    InternalInvariant(&'static str),
}

impl Display for EncodeError {
    fn fmt(&self, f: &mut Formatter) -> Result<(), Error> {
        match self {
            Self::BadInput(msg) => write!(f, "bad input: {msg}"),
            Self::Overflow(msg) => write!(f, "overflow: {msg}"),
            Self::ChecksumMismatch(msg) => write!(f, "checksum mismatch: {msg}"),
            Self::InternalInvariant(msg) => write!(f, "internal invariant violated: {msg}"),
        }
    }
}

impl std::error::Error for EncodeError {}

pub type EncodeResult<T> = Result<T, EncodeError>;
