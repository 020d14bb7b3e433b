mod codabar;
mod code128;
mod code39;
mod code93;
mod itf;
mod msi;
mod plessey;
mod upc_ean;

use crate::common::bits::BitMatrix;
use crate::common::error::{EncodeError, EncodeResult};
use crate::types::{BarcodeFormat, EncodeHints};

// One-dimensional encoder framework
//------------------------------------------------------------------------------

/// A 1-D symbology: turns text into the minimal run of modules, bars true.
pub(crate) trait OneDimensionalEncoder {
    fn encode_contents(&self, contents: &str, hints: &EncodeHints) -> EncodeResult<Vec<bool>>;

    /// Quiet zone in modules, summed over both sides.
    fn default_margin(&self) -> usize {
        10
    }
}

/// Facade entry point for the 1-D symbologies.
pub(crate) fn encode(
    format: BarcodeFormat,
    contents: &str,
    width: i32,
    height: i32,
    hints: &EncodeHints,
) -> EncodeResult<BitMatrix> {
    let encoder: &dyn OneDimensionalEncoder = match format {
        BarcodeFormat::Codabar => &codabar::CodabarEncoder,
        BarcodeFormat::Code39 => &code39::Code39Encoder,
        BarcodeFormat::Code93 => &code93::Code93Encoder,
        BarcodeFormat::Code128 => &code128::Code128Encoder,
        BarcodeFormat::Ean8 => &upc_ean::Ean8Encoder,
        BarcodeFormat::Ean13 => &upc_ean::Ean13Encoder,
        BarcodeFormat::Itf => &itf::ItfEncoder,
        BarcodeFormat::Msi => &msi::MsiEncoder,
        BarcodeFormat::Plessey => &plessey::PlesseyEncoder,
        BarcodeFormat::UpcA => &upc_ean::UpcAEncoder,
        BarcodeFormat::UpcE => &upc_ean::UpcEEncoder,
        BarcodeFormat::QrCode => {
            return Err(EncodeError::BadInput(
                "QR Code is not a one-dimensional format".into(),
            ))
        }
    };
    let code = encoder.encode_contents(contents, hints)?;
    let margin = hints.margin.unwrap_or_else(|| encoder.default_margin());
    render_row(&code, width, height, margin)
}

/// Scales a module run into the requested pixel box. The output is at least
/// `modules + margin` wide; whole multiples only, leftover width split
/// evenly; every row identical.
pub(crate) fn render_row(
    code: &[bool],
    width: i32,
    height: i32,
    sides_margin: usize,
) -> EncodeResult<BitMatrix> {
    let input_width = code.len();
    let full_width = input_width + sides_margin;
    let output_width = full_width.max(width.max(0) as usize);
    let output_height = 1.max(height.max(0) as usize);
    let multiple = output_width / full_width;
    let left_padding = (output_width - input_width * multiple) / 2;

    let mut matrix = BitMatrix::new(output_width, output_height);
    let mut x = left_padding;
    for &module in code {
        if module {
            matrix.set_region(x, 0, multiple, output_height)?;
        }
        x += multiple;
    }
    Ok(matrix)
}

/// Writes `pattern` run lengths into `target` starting at `pos`, the first
/// run colored `start_color`, alternating after each. Returns the module
/// count written.
pub(crate) fn append_pattern(
    target: &mut [bool],
    pos: usize,
    pattern: &[usize],
    start_color: bool,
) -> usize {
    let mut color = start_color;
    let mut added = 0;
    for &run in pattern {
        for i in 0..run {
            target[pos + added + i] = color;
        }
        added += run;
        color = !color;
    }
    added
}

/// Parses decimal content, rejecting anything that is not an ASCII digit.
pub(crate) fn digit_values(contents: &str) -> EncodeResult<Vec<u8>> {
    contents
        .chars()
        .map(|c| {
            c.to_digit(10)
                .map(|d| d as u8)
                .ok_or_else(|| EncodeError::BadInput(format!("{c:?} is not a digit")))
        })
        .collect()
}
