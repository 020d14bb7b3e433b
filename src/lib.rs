//! Encoders for one- and two-dimensional optical barcodes.
//!
//! Turns text into a monochrome [`BitMatrix`] ready for rasterization.
//! Supported symbologies: CODABAR, CODE 39, CODE 93, CODE 128, ITF, MSI,
//! Plessey, UPC-A, UPC-E, EAN-8, EAN-13 and QR Code.
//!
//! ```
//! use matricode::{encode, BarcodeFormat};
//!
//! let matrix = encode("590123412345", BarcodeFormat::Ean13, 0, 0).unwrap();
//! assert_eq!(matrix.height(), 1);
//! ```

pub mod common;
mod oned;
pub mod qr;
mod types;

pub use common::bits::{BitArray, BitMatrix};
pub use common::error::{EncodeError, EncodeResult};
pub use qr::metadata::{ECLevel, Version};
pub use qr::{MaskPattern, QrBuilder, QrCode};
pub use types::{BarcodeFormat, CharacterSet, EncodeHints};

/// Encodes `contents` into the requested symbology with default hints.
///
/// `width` and `height` are pixel preferences; zero asks for the natural
/// size, and the result grows past the request whenever the symbology's
/// minimum footprint demands it.
pub fn encode(
    contents: &str,
    format: BarcodeFormat,
    width: i32,
    height: i32,
) -> EncodeResult<BitMatrix> {
    encode_with_hints(contents, format, width, height, &EncodeHints::default())
}

/// Like [`encode`], with explicit [`EncodeHints`].
pub fn encode_with_hints(
    contents: &str,
    format: BarcodeFormat,
    width: i32,
    height: i32,
    hints: &EncodeHints,
) -> EncodeResult<BitMatrix> {
    if contents.is_empty() {
        return Err(EncodeError::BadInput("found empty contents".into()));
    }
    if width < 0 || height < 0 {
        return Err(EncodeError::BadInput(format!(
            "negative size is not allowed: {width}x{height}"
        )));
    }
    match format {
        BarcodeFormat::QrCode => qr::encode(contents, width, height, hints),
        _ => oned::encode(format, contents, width, height, hints),
    }
}
