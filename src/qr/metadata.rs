use std::fmt::Debug;
use std::ops::{Deref, Not};

use crate::common::error::{EncodeError, EncodeResult};
use crate::qr::codec::Mode;

// Color
//------------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum Color {
    Light,
    Dark,
}

impl Not for Color {
    type Output = Self;
    fn not(self) -> Self::Output {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }
}

impl Color {
    pub fn select<T: Debug>(&self, light: T, dark: T) -> T {
        match self {
            Self::Light => light,
            Self::Dark => dark,
        }
    }
}

// Error correction level
//------------------------------------------------------------------------------

/// Recovery capacity: L ≈ 7%, M ≈ 15%, Q ≈ 25%, H ≈ 30% of codewords.
#[derive(Debug, PartialEq, Eq, Copy, Clone, PartialOrd, Ord)]
pub enum ECLevel {
    L = 0,
    M = 1,
    Q = 2,
    H = 3,
}

impl ECLevel {
    /// Two-bit code carried in the type info: L=0b01, M=0b00, Q=0b11, H=0b10.
    pub fn format_bits(self) -> u32 {
        (self as u32) ^ 1
    }
}

// Version
//------------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq, Copy, Clone, PartialOrd, Ord)]
pub struct Version(u8);

impl Deref for Version {
    type Target = u8;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Version {
    pub fn new(number: usize) -> EncodeResult<Self> {
        if !(1..=40).contains(&number) {
            return Err(EncodeError::BadInput(format!("invalid version: {number}")));
        }
        Ok(Self(number as u8))
    }

    pub const fn number(self) -> usize {
        self.0 as usize
    }

    pub const fn width(self) -> usize {
        self.number() * 4 + 17
    }

    pub fn alignment_pattern(self) -> &'static [i16] {
        ALIGNMENT_PATTERN_POSITIONS[self.number() - 1]
    }

    /// 18-bit version info embedded twice for version 7 and up: the 6-bit
    /// version number followed by its 12-bit BCH remainder.
    pub fn info(self) -> u32 {
        debug_assert!(self.number() >= 7, "Versions below 7 carry no version info");
        let number = self.number() as u32;
        (number << 12) | bch_remainder(number, VERSION_INFO_POLY)
    }

    pub fn char_count_bits(self, mode: Mode) -> usize {
        debug_assert!(mode.is_data_mode(), "Mode {mode:?} carries no character count");

        let bracket = match self.number() {
            1..=9 => 0,
            10..=26 => 1,
            _ => 2,
        };
        match mode {
            Mode::Numeric => [10, 12, 14][bracket],
            Mode::Alphanumeric => [9, 11, 13][bracket],
            Mode::Byte => [8, 16, 16][bracket],
            Mode::Kanji => [8, 10, 12][bracket],
            _ => unreachable!("Mode {mode:?} carries no character count"),
        }
    }

    /// Block layout for a level: (size and count of the first group, size
    /// and count of the second group), in data codewords.
    pub fn data_codewords_per_block(self, ec_level: ECLevel) -> (usize, usize, usize, usize) {
        DATA_CODEWORDS_PER_BLOCK[self.number() - 1][ec_level as usize]
    }

    pub fn ecc_per_block(self, ec_level: ECLevel) -> usize {
        ECC_PER_BLOCK[self.number() - 1][ec_level as usize]
    }

    pub fn num_blocks(self, ec_level: ECLevel) -> usize {
        let (_, count1, _, count2) = self.data_codewords_per_block(ec_level);
        count1 + count2
    }

    pub fn num_data_codewords(self, ec_level: ECLevel) -> usize {
        let (size1, count1, size2, count2) = self.data_codewords_per_block(ec_level);
        size1 * count1 + size2 * count2
    }

    pub fn num_ec_codewords(self, ec_level: ECLevel) -> usize {
        self.num_blocks(ec_level) * self.ecc_per_block(ec_level)
    }

    pub fn total_codewords(self) -> usize {
        self.num_data_codewords(ECLevel::L) + self.num_ec_codewords(ECLevel::L)
    }
}

// BCH codes for type & version info
//------------------------------------------------------------------------------

/// One-based position of the highest set bit, 0 for 0.
fn msb(value: u32) -> u32 {
    32 - value.leading_zeros()
}

/// Remainder of `value << degree(poly)` divided by `poly` over GF(2).
pub fn bch_remainder(value: u32, poly: u32) -> u32 {
    let poly_msb = msb(poly);
    let mut rem = value << (poly_msb - 1);
    while msb(rem) >= poly_msb {
        rem ^= poly << (msb(rem) - poly_msb);
    }
    rem
}

/// 15-bit type info: EC-level bits and mask pattern, BCH remainder appended,
/// XORed with the fixed mask so the field is never all zeros.
pub fn format_info(ec_level: ECLevel, mask_pattern: u8) -> u32 {
    debug_assert!(mask_pattern < 8, "Invalid masking pattern");
    let data = (ec_level.format_bits() << 3) | mask_pattern as u32;
    let info = (data << 10) | bch_remainder(data, FORMAT_INFO_POLY);
    info ^ FORMAT_INFO_MASK
}

#[cfg(test)]
mod metadata_tests {
    use test_case::test_case;

    use super::{bch_remainder, format_info, ECLevel, Version};

    #[test]
    fn test_version_bounds() {
        assert!(Version::new(0).is_err());
        assert!(Version::new(41).is_err());
        assert_eq!(Version::new(1).unwrap().width(), 21);
        assert_eq!(Version::new(40).unwrap().width(), 177);
    }

    #[test]
    fn test_char_count_bits() {
        use crate::qr::codec::Mode;
        let brackets = [(1, 9), (10, 26), (27, 40)];
        let expected = [
            (Mode::Numeric, [10, 12, 14]),
            (Mode::Alphanumeric, [9, 11, 13]),
            (Mode::Byte, [8, 16, 16]),
            (Mode::Kanji, [8, 10, 12]),
        ];
        for (mode, widths) in expected {
            for (i, &(lo, hi)) in brackets.iter().enumerate() {
                assert_eq!(Version::new(lo).unwrap().char_count_bits(mode), widths[i]);
                assert_eq!(Version::new(hi).unwrap().char_count_bits(mode), widths[i]);
            }
        }
    }

    // Reference values from ISO/IEC 18004 annex tables
    #[test_case(7, 0x07C94)]
    #[test_case(8, 0x085BC)]
    #[test_case(21, 0x15683)]
    #[test_case(33, 0x216F0)]
    #[test_case(40, 0x28C69)]
    fn test_version_info(number: usize, expected: u32) {
        assert_eq!(Version::new(number).unwrap().info(), expected);
    }

    #[test]
    fn test_format_info() {
        assert_eq!(format_info(ECLevel::M, 0), 0x5412);
        assert_eq!(format_info(ECLevel::M, 7), 0x4AA0);
        assert_eq!(format_info(ECLevel::L, 0), 0x77C4);
        assert_eq!(format_info(ECLevel::Q, 3), 0x3A06);
        assert_eq!(format_info(ECLevel::H, 5), 0x0255);
    }

    #[test]
    fn test_bch_remainder() {
        // Worked example from ISO/IEC 18004: data 00101 under the type info
        // polynomial leaves remainder 0011011100
        assert_eq!(bch_remainder(0b00101, super::FORMAT_INFO_POLY), 0b0011011100);
        assert_eq!(bch_remainder(0, super::FORMAT_INFO_POLY), 0);
    }

    #[test]
    fn test_codeword_totals_are_consistent() {
        for number in 1..=40 {
            let version = Version::new(number).unwrap();
            let total = version.total_codewords();
            for ec_level in [ECLevel::L, ECLevel::M, ECLevel::Q, ECLevel::H] {
                assert_eq!(
                    version.num_data_codewords(ec_level) + version.num_ec_codewords(ec_level),
                    total,
                    "version {number} level {ec_level:?}"
                );
            }
        }
    }

    #[test]
    fn test_alignment_positions_fit_the_grid() {
        for number in 2..=40 {
            let version = Version::new(number).unwrap();
            let width = version.width() as i16;
            let positions = version.alignment_pattern();
            assert!(!positions.is_empty(), "version {number}");
            for &center in positions {
                assert!(center - 2 >= 0 && center + 2 < width, "version {number}");
            }
            assert_eq!(*positions.last().unwrap(), width - 7);
        }
    }
}

// Placement coordinates
//------------------------------------------------------------------------------

pub const FORMAT_INFO_BIT_LEN: usize = 15;
pub const VERSION_INFO_BIT_LEN: usize = 18;

/// Type info around the top-left finder, one coordinate per bit in ISO
/// bit order: bit 0 down column 8 from the top, bit 14 ending the walk
/// along row 8 at column 0.
pub static FORMAT_INFO_COORDS_MAIN: [(i16, i16); 15] = [
    (0, 8),
    (1, 8),
    (2, 8),
    (3, 8),
    (4, 8),
    (5, 8),
    (7, 8),
    (8, 8),
    (8, 7),
    (8, 5),
    (8, 4),
    (8, 3),
    (8, 2),
    (8, 1),
    (8, 0),
];

/// Duplicate copy in the same bit order: bits 0-7 leftwards along row 8
/// under the top-right finder, bits 8-14 down column 8 beside the
/// bottom-left finder. The cell between the two strips is the dark module,
/// which is not a format bit.
pub static FORMAT_INFO_COORDS_SIDE: [(i16, i16); 15] = [
    (8, -1),
    (8, -2),
    (8, -3),
    (8, -4),
    (8, -5),
    (8, -6),
    (8, -7),
    (8, -8),
    (-7, 8),
    (-6, 8),
    (-5, 8),
    (-4, 8),
    (-3, 8),
    (-2, 8),
    (-1, 8),
];

/// 6x3 strip above the bottom-left finder, most significant bit first.
pub static VERSION_INFO_COORDS_BL: [(i16, i16); 18] = [
    (-9, 5),
    (-10, 5),
    (-11, 5),
    (-9, 4),
    (-10, 4),
    (-11, 4),
    (-9, 3),
    (-10, 3),
    (-11, 3),
    (-9, 2),
    (-10, 2),
    (-11, 2),
    (-9, 1),
    (-10, 1),
    (-11, 1),
    (-9, 0),
    (-10, 0),
    (-11, 0),
];

/// Transposed strip left of the top-right finder, most significant bit first.
pub static VERSION_INFO_COORDS_TR: [(i16, i16); 18] = [
    (5, -9),
    (5, -10),
    (5, -11),
    (4, -9),
    (4, -10),
    (4, -11),
    (3, -9),
    (3, -10),
    (3, -11),
    (2, -9),
    (2, -10),
    (2, -11),
    (1, -9),
    (1, -10),
    (1, -11),
    (0, -9),
    (0, -10),
    (0, -11),
];

// Global constants
//------------------------------------------------------------------------------

/// Generator polynomial of the (15, 5) BCH code protecting the type info.
const FORMAT_INFO_POLY: u32 = 0x537;

/// Mask applied to the 15 type info bits.
const FORMAT_INFO_MASK: u32 = 0x5412;

/// Generator polynomial of the (18, 6) BCH code protecting the version info.
const VERSION_INFO_POLY: u32 = 0x1F25;

static ALIGNMENT_PATTERN_POSITIONS: [&[i16]; 40] = [
    &[],
    &[6, 18],
    &[6, 22],
    &[6, 26],
    &[6, 30],
    &[6, 34],
    &[6, 22, 38],
    &[6, 24, 42],
    &[6, 26, 46],
    &[6, 28, 50],
    &[6, 30, 54],
    &[6, 32, 58],
    &[6, 34, 62],
    &[6, 26, 46, 66],
    &[6, 26, 48, 70],
    &[6, 26, 50, 74],
    &[6, 30, 54, 78],
    &[6, 30, 56, 82],
    &[6, 30, 58, 86],
    &[6, 34, 62, 90],
    &[6, 28, 50, 72, 94],
    &[6, 26, 50, 74, 98],
    &[6, 30, 54, 78, 102],
    &[6, 28, 54, 80, 106],
    &[6, 32, 58, 84, 110],
    &[6, 30, 58, 86, 114],
    &[6, 34, 62, 90, 118],
    &[6, 26, 50, 74, 98, 122],
    &[6, 30, 54, 78, 102, 126],
    &[6, 26, 52, 78, 104, 130],
    &[6, 30, 56, 82, 108, 134],
    &[6, 34, 60, 86, 112, 138],
    &[6, 30, 58, 86, 114, 142],
    &[6, 34, 62, 90, 118, 146],
    &[6, 30, 54, 78, 102, 126, 150],
    &[6, 24, 50, 76, 102, 128, 154],
    &[6, 28, 54, 80, 106, 132, 158],
    &[6, 32, 58, 84, 110, 136, 162],
    &[6, 26, 54, 82, 110, 138, 166],
    &[6, 30, 58, 86, 114, 142, 170],
];

/// Error correction codewords per block, indexed by version then level.
static ECC_PER_BLOCK: [[usize; 4]; 40] = [
    [7, 10, 13, 17],
    [10, 16, 22, 28],
    [15, 26, 18, 22],
    [20, 18, 26, 16],
    [26, 24, 18, 22],
    [18, 16, 24, 28],
    [20, 18, 18, 26],
    [24, 22, 22, 26],
    [30, 22, 20, 24],
    [18, 26, 24, 28],
    [20, 30, 28, 24],
    [24, 22, 26, 28],
    [26, 22, 24, 22],
    [30, 24, 20, 24],
    [22, 24, 30, 24],
    [24, 28, 24, 30],
    [28, 28, 28, 28],
    [30, 26, 28, 28],
    [28, 26, 26, 26],
    [28, 26, 30, 28],
    [28, 26, 28, 30],
    [28, 28, 30, 24],
    [30, 28, 30, 30],
    [30, 28, 30, 30],
    [26, 28, 30, 30],
    [28, 28, 28, 30],
    [30, 28, 30, 30],
    [30, 28, 30, 30],
    [30, 28, 30, 30],
    [30, 28, 30, 30],
    [30, 28, 30, 30],
    [30, 28, 30, 30],
    [30, 28, 30, 30],
    [30, 28, 30, 30],
    [30, 28, 30, 30],
    [30, 28, 30, 30],
    [30, 28, 30, 30],
    [30, 28, 30, 30],
    [30, 28, 30, 30],
    [30, 28, 30, 30],
];

/// Data codewords per block as (size1, count1, size2, count2), indexed by
/// version then level. From ISO/IEC 18004 table 9.
static DATA_CODEWORDS_PER_BLOCK: [[(usize, usize, usize, usize); 4]; 40] = [
    [(19, 1, 0, 0), (16, 1, 0, 0), (13, 1, 0, 0), (9, 1, 0, 0)],
    [(34, 1, 0, 0), (28, 1, 0, 0), (22, 1, 0, 0), (16, 1, 0, 0)],
    [(55, 1, 0, 0), (44, 1, 0, 0), (17, 2, 0, 0), (13, 2, 0, 0)],
    [(80, 1, 0, 0), (32, 2, 0, 0), (24, 2, 0, 0), (9, 4, 0, 0)],
    [(108, 1, 0, 0), (43, 2, 0, 0), (15, 2, 16, 2), (11, 2, 12, 2)],
    [(68, 2, 0, 0), (27, 4, 0, 0), (19, 4, 0, 0), (15, 4, 0, 0)],
    [(78, 2, 0, 0), (31, 4, 0, 0), (14, 2, 15, 4), (13, 4, 14, 1)],
    [(97, 2, 0, 0), (38, 2, 39, 2), (18, 4, 19, 2), (14, 4, 15, 2)],
    [(116, 2, 0, 0), (36, 3, 37, 2), (16, 4, 17, 4), (12, 4, 13, 4)],
    [(68, 2, 69, 2), (43, 4, 44, 1), (19, 6, 20, 2), (15, 6, 16, 2)],
    [(81, 4, 0, 0), (50, 1, 51, 4), (22, 4, 23, 4), (12, 3, 13, 8)],
    [(92, 2, 93, 2), (36, 6, 37, 2), (20, 4, 21, 6), (14, 7, 15, 4)],
    [(107, 4, 0, 0), (37, 8, 38, 1), (20, 8, 21, 4), (11, 12, 12, 4)],
    [(115, 3, 116, 1), (40, 4, 41, 5), (16, 11, 17, 5), (12, 11, 13, 5)],
    [(87, 5, 88, 1), (41, 5, 42, 5), (24, 5, 25, 7), (12, 11, 13, 7)],
    [(98, 5, 99, 1), (45, 7, 46, 3), (19, 15, 20, 2), (15, 3, 16, 13)],
    [(107, 1, 108, 5), (46, 10, 47, 1), (22, 1, 23, 15), (14, 2, 15, 17)],
    [(120, 5, 121, 1), (43, 9, 44, 4), (22, 17, 23, 1), (14, 2, 15, 19)],
    [(113, 3, 114, 4), (44, 3, 45, 11), (21, 17, 22, 4), (13, 9, 14, 16)],
    [(107, 3, 108, 5), (41, 3, 42, 13), (24, 15, 25, 5), (15, 15, 16, 10)],
    [(116, 4, 117, 4), (42, 17, 0, 0), (22, 17, 23, 6), (16, 19, 17, 6)],
    [(111, 2, 112, 7), (46, 17, 0, 0), (24, 7, 25, 16), (13, 34, 0, 0)],
    [(121, 4, 122, 5), (47, 4, 48, 14), (24, 11, 25, 14), (15, 16, 16, 14)],
    [(117, 6, 118, 4), (45, 6, 46, 14), (24, 11, 25, 16), (16, 30, 17, 2)],
    [(106, 8, 107, 4), (47, 8, 48, 13), (24, 7, 25, 22), (15, 22, 16, 13)],
    [(114, 10, 115, 2), (46, 19, 47, 4), (22, 28, 23, 6), (16, 33, 17, 4)],
    [(122, 8, 123, 4), (45, 22, 46, 3), (23, 8, 24, 26), (15, 12, 16, 28)],
    [(117, 3, 118, 10), (45, 3, 46, 23), (24, 4, 25, 31), (15, 11, 16, 31)],
    [(116, 7, 117, 7), (45, 21, 46, 7), (23, 1, 24, 37), (15, 19, 16, 26)],
    [(115, 5, 116, 10), (47, 19, 48, 10), (24, 15, 25, 25), (15, 23, 16, 25)],
    [(115, 13, 116, 3), (46, 2, 47, 29), (24, 42, 25, 1), (15, 23, 16, 28)],
    [(115, 17, 0, 0), (46, 10, 47, 23), (24, 10, 25, 35), (15, 19, 16, 35)],
    [(115, 17, 116, 1), (46, 14, 47, 21), (24, 29, 25, 19), (15, 11, 16, 46)],
    [(115, 13, 116, 6), (46, 14, 47, 23), (24, 44, 25, 7), (16, 59, 17, 1)],
    [(121, 12, 122, 7), (47, 12, 48, 26), (24, 39, 25, 14), (15, 22, 16, 41)],
    [(121, 6, 122, 14), (47, 6, 48, 34), (24, 46, 25, 10), (15, 2, 16, 64)],
    [(122, 17, 123, 4), (46, 29, 47, 14), (24, 49, 25, 10), (15, 24, 16, 46)],
    [(122, 4, 123, 18), (46, 13, 47, 32), (24, 48, 25, 14), (15, 42, 16, 32)],
    [(117, 20, 118, 4), (47, 40, 48, 7), (24, 43, 25, 22), (15, 10, 16, 67)],
    [(118, 19, 119, 6), (47, 18, 48, 31), (24, 34, 25, 34), (15, 20, 16, 61)],
];
