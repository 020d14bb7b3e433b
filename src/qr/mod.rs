pub mod codec;
mod code;
mod iter;
mod mask;
pub mod metadata;

pub use self::code::QrCode;
pub use self::mask::MaskPattern;

use std::ops::Deref;

use self::codec::{
    check_pinned_version, choose_mode, choose_version, push_alphanumeric_data, push_byte_data,
    push_char_count, push_eci, push_mode, push_numeric_data, terminate_bits, Mode,
};
use self::mask::apply_best_mask;
use self::metadata::{ECLevel, Version};

use crate::common::bits::{BitArray, BitMatrix};
use crate::common::ec::ecc;
use crate::common::error::{EncodeError, EncodeResult};
use crate::types::{CharacterSet, EncodeHints};

// Builder
//------------------------------------------------------------------------------

/// Chainable QR construction: pin a version, EC level or mask, or let the
/// builder pick them.
pub struct QrBuilder<'a> {
    content: &'a str,
    version: Option<Version>,
    ec_level: ECLevel,
    mask: Option<MaskPattern>,
    character_set: Option<CharacterSet>,
    disable_eci: bool,
    gs1_format: bool,
}

impl<'a> QrBuilder<'a> {
    pub fn new(content: &'a str) -> Self {
        Self {
            content,
            version: None,
            ec_level: ECLevel::L,
            mask: None,
            character_set: None,
            disable_eci: false,
            gs1_format: false,
        }
    }

    pub fn version(&mut self, version: Version) -> &mut Self {
        self.version = Some(version);
        self
    }

    pub fn ec_level(&mut self, ec_level: ECLevel) -> &mut Self {
        self.ec_level = ec_level;
        self
    }

    pub fn mask(&mut self, mask: MaskPattern) -> &mut Self {
        self.mask = Some(mask);
        self
    }

    pub fn character_set(&mut self, character_set: CharacterSet) -> &mut Self {
        self.character_set = Some(character_set);
        self
    }

    pub fn disable_eci(&mut self) -> &mut Self {
        self.disable_eci = true;
        self
    }

    pub fn gs1_format(&mut self) -> &mut Self {
        self.gs1_format = true;
        self
    }

    pub fn from_hints(content: &'a str, hints: &EncodeHints) -> EncodeResult<Self> {
        let mut builder = Self::new(content);
        if let Some(ec_level) = hints.error_correction {
            builder.ec_level(ec_level);
        }
        if let Some(number) = hints.qr_version {
            builder.version(Version::new(number)?);
        }
        if let Some(character_set) = hints.character_set {
            builder.character_set(character_set);
        }
        if hints.disable_eci {
            builder.disable_eci();
        }
        if hints.gs1_format {
            builder.gs1_format();
        }
        Ok(builder)
    }

    pub fn build(&self) -> EncodeResult<QrCode> {
        if self.content.is_empty() {
            return Err(EncodeError::BadInput("found empty contents".into()));
        }

        let mode = choose_mode(self.content);
        let (character_set, explicit_charset) = match self.character_set {
            Some(cs) => (cs, true),
            None if mode == Mode::Byte && !self.content.chars().all(|c| (c as u32) < 0x100) => {
                (CharacterSet::Utf8, false)
            }
            None => (CharacterSet::Iso8859_1, false),
        };

        let mut header = BitArray::new();
        let needs_eci = mode == Mode::Byte
            && (explicit_charset || character_set != CharacterSet::Iso8859_1)
            && !self.disable_eci;
        if needs_eci {
            push_eci(character_set.eci_value(), &mut header)?;
        }
        if self.gs1_format {
            push_mode(Mode::Fnc1First, &mut header)?;
        }
        push_mode(mode, &mut header)?;

        let mut data = BitArray::new();
        let num_letters = match mode {
            Mode::Numeric => {
                push_numeric_data(self.content, &mut data)?;
                self.content.len()
            }
            Mode::Alphanumeric => {
                push_alphanumeric_data(self.content, &mut data)?;
                self.content.chars().count()
            }
            Mode::Byte => {
                let bytes = character_set.encode(self.content)?;
                push_byte_data(&bytes, &mut data)?;
                bytes.len()
            }
            _ => unreachable!("choose_mode only yields data modes"),
        };

        let version = match self.version {
            Some(v) => {
                check_pinned_version(&header, &data, mode, v, self.ec_level)?;
                v
            }
            None => choose_version(&header, &data, mode, self.ec_level)?,
        };

        let mut bits = BitArray::new();
        bits.append_bit_array(&header);
        push_char_count(mode, version, num_letters, &mut bits)?;
        bits.append_bit_array(&data);
        terminate_bits(version.num_data_codewords(self.ec_level), &mut bits)?;

        let payload = interleave_with_ec(&bits, version, self.ec_level)?;

        let mut qr = QrCode::new(version, self.ec_level);
        qr.draw_function_patterns()?;
        qr.draw_encoding_region(&payload)?;
        match self.mask {
            Some(m) => qr.apply_mask(m),
            None => {
                apply_best_mask(&mut qr);
            }
        }
        Ok(qr)
    }
}

// Error correction and interleaving
//------------------------------------------------------------------------------

/// Splits the data codewords into this version's blocks: all first-group
/// blocks, then the longer second-group blocks.
pub(crate) fn blockify(data: &[u8], version: Version, ec_level: ECLevel) -> Vec<&[u8]> {
    let (block1_size, block1_count, block2_size, block2_count) =
        version.data_codewords_per_block(ec_level);

    let total_block1_size = block1_size * block1_count;
    debug_assert!(
        total_block1_size + block2_size * block2_count == data.len(),
        "Data length {} doesn't match the block layout",
        data.len()
    );

    let mut blocks = Vec::with_capacity(block1_count + block2_count);
    blocks.extend(data[..total_block1_size].chunks(block1_size));
    if block2_size > 0 {
        blocks.extend(data[total_block1_size..].chunks(block2_size));
    }
    blocks
}

pub(crate) fn interleave<T: Copy, V: Deref<Target = [T]>>(blocks: &[V]) -> Vec<T> {
    let max_len = blocks.iter().map(|b| b.len()).max().expect("blocks cannot be empty");
    let total: usize = blocks.iter().map(|b| b.len()).sum();
    let mut res = Vec::with_capacity(total);
    for i in 0..max_len {
        for block in blocks {
            if i < block.len() {
                res.push(block[i]);
            }
        }
    }
    res
}

/// Turns the terminated data bit stream into the final codeword sequence:
/// per-block Reed-Solomon parity, data codewords interleaved block by block,
/// then the parity codewords likewise.
fn interleave_with_ec(bits: &BitArray, version: Version, ec_level: ECLevel) -> EncodeResult<Vec<u8>> {
    let num_data = version.num_data_codewords(ec_level);
    let mut data = vec![0u8; num_data];
    bits.to_bytes(0, &mut data, num_data);

    let blocks = blockify(&data, version, ec_level);
    let ec_per_block = version.ecc_per_block(ec_level);
    let ec_blocks: Vec<Vec<u8>> =
        blocks.iter().map(|block| ecc(block, ec_per_block)).collect::<EncodeResult<_>>()?;

    let mut payload = interleave(&blocks);
    payload.extend(interleave(&ec_blocks));
    if payload.len() != version.total_codewords() {
        return Err(EncodeError::InternalInvariant("interleaved payload length mismatch"));
    }
    Ok(payload)
}

// Rendering
//------------------------------------------------------------------------------

const QUIET_ZONE: usize = 4;

/// Scales the grid into the requested pixel box with the standard quiet
/// zone, distributing unused space evenly around the symbol.
fn render(qr: &QrCode, width: i32, height: i32) -> EncodeResult<BitMatrix> {
    let input = qr.width();
    let full = input + 2 * QUIET_ZONE;
    let output_width = (width.max(0) as usize).max(full);
    let output_height = (height.max(0) as usize).max(full);
    let multiple = (output_width / full).min(output_height / full);
    let left = (output_width - input * multiple) / 2;
    let top = (output_height - input * multiple) / 2;

    let mut matrix = BitMatrix::new(output_width, output_height);
    let grid = qr.to_bit_matrix();
    for r in 0..input {
        for c in 0..input {
            if grid.get(c, r) {
                matrix.set_region(left + c * multiple, top + r * multiple, multiple, multiple)?;
            }
        }
    }
    Ok(matrix)
}

/// Facade entry point for QR symbols.
pub(crate) fn encode(
    contents: &str,
    width: i32,
    height: i32,
    hints: &EncodeHints,
) -> EncodeResult<BitMatrix> {
    let qr = QrBuilder::from_hints(contents, hints)?.build()?;
    render(&qr, width, height)
}

#[cfg(test)]
mod builder_tests {
    use test_case::test_case;

    use super::{blockify, interleave, interleave_with_ec, QrBuilder};
    use crate::common::bits::BitArray;
    use crate::qr::codec::{push_char_count, push_mode, push_numeric_data, terminate_bits, Mode};
    use crate::qr::mask::MaskPattern;
    use crate::qr::metadata::{ECLevel, Version};

    #[test]
    fn test_blockify_two_groups() {
        let version = Version::new(5).unwrap();
        let data: Vec<u8> = (0..62).collect();
        let blocks = blockify(&data, version, ECLevel::Q);
        assert_eq!(blocks.len(), 4);
        assert_eq!(blocks[0].len(), 15);
        assert_eq!(blocks[1].len(), 15);
        assert_eq!(blocks[2].len(), 16);
        assert_eq!(blocks[3].len(), 16);
        assert_eq!(blocks[2][0], 30);
    }

    #[test]
    fn test_interleave() {
        let blocks = vec![vec![1, 2, 3], vec![4, 5, 6], vec![7, 8, 9, 0]];
        assert_eq!(interleave(&blocks), vec![1, 4, 7, 2, 5, 8, 3, 6, 9, 0]);
    }

    // The worked example of ISO/IEC 18004: "01234567" at version 1-M
    #[test]
    fn test_codeword_sequence_for_iso_example() {
        let version = Version::new(1).unwrap();
        let mut bits = BitArray::new();
        push_mode(Mode::Numeric, &mut bits).unwrap();
        push_char_count(Mode::Numeric, version, 8, &mut bits).unwrap();
        push_numeric_data("01234567", &mut bits).unwrap();
        terminate_bits(version.num_data_codewords(ECLevel::M), &mut bits).unwrap();

        let payload = interleave_with_ec(&bits, version, ECLevel::M).unwrap();
        assert_eq!(
            payload,
            [
                16, 32, 12, 86, 97, 128, 236, 17, 236, 17, 236, 17, 236, 17, 236, 17, 165, 36,
                212, 193, 237, 54, 199, 135, 44, 85
            ]
        );
    }

    #[test]
    fn test_build_produces_filled_grid() {
        let qr = QrBuilder::new("HELLO WORLD").build().unwrap();
        assert_eq!(qr.width(), qr.version().width());
        assert!(qr.mask_pattern().is_some());
    }

    #[test]
    fn test_mask_selection_is_deterministic() {
        let first = QrBuilder::new("REPEATABLE").build().unwrap();
        for _ in 0..3 {
            let again = QrBuilder::new("REPEATABLE").build().unwrap();
            assert_eq!(again.mask_pattern(), first.mask_pattern());
            assert_eq!(again.to_bit_matrix(), first.to_bit_matrix());
        }
    }

    #[test]
    fn test_pinned_version_too_small() {
        let mut builder = QrBuilder::new("a very long byte mode payload that cannot fit");
        builder.version(Version::new(1).unwrap()).ec_level(ECLevel::H);
        assert!(builder.build().is_err());
    }

    #[test]
    fn test_pinned_mask_is_respected() {
        for m in 0..8 {
            let mut builder = QrBuilder::new("MASKED");
            builder.mask(MaskPattern::new(m));
            let qr = builder.build().unwrap();
            assert_eq!(*qr.mask_pattern().unwrap(), m);
        }
    }

    #[test_case("Hello, world!", ECLevel::L)]
    #[test_case("TEST", ECLevel::M)]
    #[test_case("12345", ECLevel::Q)]
    #[test_case("OK", ECLevel::H)]
    fn test_dimension_matches_version(content: &str, ec_level: ECLevel) {
        let mut builder = QrBuilder::new(content);
        builder.ec_level(ec_level);
        let qr = builder.build().unwrap();
        assert_eq!(qr.width(), 17 + 4 * qr.version().number());
    }
}
