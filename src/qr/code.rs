use std::ops::Deref;

use super::iter::EncRegionIter;
use super::mask::MaskPattern;
use super::metadata::{
    format_info, Color, ECLevel, Version, FORMAT_INFO_BIT_LEN, FORMAT_INFO_COORDS_MAIN,
    FORMAT_INFO_COORDS_SIDE, VERSION_INFO_BIT_LEN, VERSION_INFO_COORDS_BL, VERSION_INFO_COORDS_TR,
};
use crate::common::bits::BitMatrix;
use crate::common::error::{EncodeError, EncodeResult};

// Module
//------------------------------------------------------------------------------

/// One grid cell. `Empty` marks a cell no drawing pass has touched yet,
/// which the placement passes must distinguish from a cell written light.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Module {
    Empty,
    Func(Color),
    Version(Color),
    Format(Color),
    Data(Color),
}

impl Deref for Module {
    type Target = Color;
    fn deref(&self) -> &Self::Target {
        match self {
            Module::Empty => &Color::Light,
            Module::Func(c) => c,
            Module::Version(c) => c,
            Module::Format(c) => c,
            Module::Data(c) => c,
        }
    }
}

// QR grid
//------------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct QrCode {
    version: Version,
    width: usize,
    ec_level: ECLevel,
    mask_pattern: Option<MaskPattern>,
    grid: Vec<Module>,
}

impl QrCode {
    pub(crate) fn new(version: Version, ec_level: ECLevel) -> Self {
        let width = version.width();
        Self { version, width, ec_level, mask_pattern: None, grid: vec![Module::Empty; width * width] }
    }

    pub fn version(&self) -> Version {
        self.version
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn ec_level(&self) -> ECLevel {
        self.ec_level
    }

    pub fn mask_pattern(&self) -> Option<MaskPattern> {
        self.mask_pattern
    }

    pub fn count_dark_modules(&self) -> usize {
        self.grid.iter().filter(|&m| matches!(**m, Color::Dark)).count()
    }

    fn coord_to_index(&self, r: i16, c: i16) -> usize {
        let w = self.width as i16;
        debug_assert!(-w <= r && r < w, "Row {r} out of range for width {w}");
        debug_assert!(-w <= c && c < w, "Column {c} out of range for width {w}");

        let r = if r < 0 { r + w } else { r };
        let c = if c < 0 { c + w } else { c };
        (r * w + c) as _
    }

    pub(crate) fn get(&self, r: i16, c: i16) -> Module {
        self.grid[self.coord_to_index(r, c)]
    }

    pub(crate) fn set(&mut self, r: i16, c: i16, module: Module) {
        let index = self.coord_to_index(r, c);
        self.grid[index] = module;
    }

    /// Converts the finished grid into a bit matrix, dark cells set.
    pub fn to_bit_matrix(&self) -> BitMatrix {
        debug_assert!(!self.grid.contains(&Module::Empty), "Empty module in finished grid");

        let mut matrix = BitMatrix::new(self.width, self.width);
        for r in 0..self.width {
            for c in 0..self.width {
                if matches!(*self.get(r as i16, c as i16), Color::Dark) {
                    matrix.set(c, r);
                }
            }
        }
        matrix
    }

    #[cfg(test)]
    pub fn to_debug_str(&self) -> String {
        let w = self.width as i16;
        let mut res = String::with_capacity((w * (w + 1)) as usize);
        res.push('\n');
        for i in 0..w {
            for j in 0..w {
                let c = match self.get(i, j) {
                    Module::Empty => '.',
                    Module::Func(Color::Dark) => 'f',
                    Module::Func(Color::Light) => 'F',
                    Module::Version(Color::Dark) => 'v',
                    Module::Version(Color::Light) => 'V',
                    Module::Format(Color::Dark) => 'm',
                    Module::Format(Color::Light) => 'M',
                    Module::Data(Color::Dark) => 'd',
                    Module::Data(Color::Light) => 'D',
                };
                res.push(c);
            }
            res.push('\n');
        }
        res
    }
}

#[cfg(test)]
mod qr_grid_tests {
    use super::{Color, Module, QrCode};
    use crate::qr::metadata::{ECLevel, Version};

    #[test]
    fn test_index_wrap() {
        let mut qr = QrCode::new(Version::new(1).unwrap(), ECLevel::L);
        let w = qr.width as i16;
        qr.set(-1, -1, Module::Func(Color::Dark));
        assert_eq!(qr.get(w - 1, w - 1), Module::Func(Color::Dark));
        qr.set(0, 0, Module::Func(Color::Dark));
        assert_eq!(qr.get(-w, -w), Module::Func(Color::Dark));
    }

    #[test]
    #[should_panic]
    fn test_row_out_of_bound() {
        let qr = QrCode::new(Version::new(1).unwrap(), ECLevel::L);
        let w = qr.width as i16;
        qr.get(w, 0);
    }

    #[test]
    #[should_panic]
    fn test_col_index_overwrap() {
        let qr = QrCode::new(Version::new(1).unwrap(), ECLevel::L);
        let w = qr.width as i16;
        qr.get(0, -(w + 1));
    }
}

// Finder patterns
//------------------------------------------------------------------------------

impl QrCode {
    fn draw_finder_patterns(&mut self) {
        self.draw_finder_pattern_at(3, 3);
        self.draw_finder_pattern_at(3, -4);
        self.draw_finder_pattern_at(-4, 3);
    }

    /// Draws a 7x7 finder centered at (r, c) together with its one-module
    /// light separator along the inward edges.
    fn draw_finder_pattern_at(&mut self, r: i16, c: i16) {
        let (dr_top, dr_bottom) = if r > 0 { (-3, 4) } else { (-4, 3) };
        let (dc_left, dc_right) = if c > 0 { (-3, 4) } else { (-4, 3) };
        for i in dr_top..=dr_bottom {
            for j in dc_left..=dc_right {
                self.set(
                    r + i,
                    c + j,
                    match (i, j) {
                        (4 | -4, _) | (_, 4 | -4) => Module::Func(Color::Light),
                        (3 | -3, _) | (_, 3 | -3) => Module::Func(Color::Dark),
                        (2 | -2, _) | (_, 2 | -2) => Module::Func(Color::Light),
                        _ => Module::Func(Color::Dark),
                    },
                );
            }
        }
    }

    /// The always-dark cell next to the bottom-left finder.
    fn draw_dark_module(&mut self) -> EncodeResult<()> {
        match self.get(-8, 8) {
            Module::Empty => {
                self.set(-8, 8, Module::Func(Color::Dark));
                Ok(())
            }
            m if matches!(*m, Color::Dark) => Ok(()),
            _ => Err(EncodeError::InternalInvariant("dark module was already written light")),
        }
    }
}


// Alignment patterns
//------------------------------------------------------------------------------

impl QrCode {
    fn draw_alignment_patterns(&mut self) {
        let positions = self.version.alignment_pattern();
        for &r in positions {
            for &c in positions {
                // Centers colliding with the finders are already drawn
                if matches!(self.get(r, c), Module::Empty) {
                    self.draw_alignment_pattern_at(r, c);
                }
            }
        }
    }

    fn draw_alignment_pattern_at(&mut self, r: i16, c: i16) {
        for i in -2..=2 {
            for j in -2..=2 {
                self.set(
                    r + i,
                    c + j,
                    match (i, j) {
                        (-2 | 2, _) | (_, -2 | 2) | (0, 0) => Module::Func(Color::Dark),
                        _ => Module::Func(Color::Light),
                    },
                )
            }
        }
    }
}

// Timing patterns
//------------------------------------------------------------------------------

impl QrCode {
    fn draw_timing_patterns(&mut self) {
        let w = self.width as i16;
        for i in 8..w - 8 {
            let color = if i & 1 == 0 { Color::Dark } else { Color::Light };
            if matches!(self.get(6, i), Module::Empty) {
                self.set(6, i, Module::Func(color));
            }
            if matches!(self.get(i, 6), Module::Empty) {
                self.set(i, 6, Module::Func(color));
            }
        }
    }
}


// Format & version info
//------------------------------------------------------------------------------

impl QrCode {
    /// Blocks out the format cells so the data snake cannot claim them; the
    /// real value is written when the mask is applied.
    fn reserve_format_area(&mut self) {
        self.draw_format_info((1 << FORMAT_INFO_BIT_LEN) - 1);
    }

    fn draw_format_info(&mut self, info: u32) {
        self.draw_format_bits(info, &FORMAT_INFO_COORDS_MAIN);
        self.draw_format_bits(info, &FORMAT_INFO_COORDS_SIDE);
        // The cell between the two side strips is always the dark module
        self.set(-8, 8, Module::Format(Color::Dark));
    }

    /// Writes the 15 type info bits along the coordinate list, bit 0 at the
    /// first coordinate.
    fn draw_format_bits(&mut self, info: u32, coords: &[(i16, i16)]) {
        debug_assert!(coords.len() == FORMAT_INFO_BIT_LEN, "Type info size does not equal 15");

        for (i, &(r, c)) in coords.iter().enumerate() {
            let color = if (info >> i) & 1 == 0 { Color::Light } else { Color::Dark };
            self.set(r, c, Module::Format(color));
        }
    }

    fn draw_version_info(&mut self) {
        if self.version.number() < 7 {
            return;
        }
        let info = self.version.info();
        self.draw_number(
            info,
            VERSION_INFO_BIT_LEN,
            Module::Version(Color::Light),
            Module::Version(Color::Dark),
            &VERSION_INFO_COORDS_BL,
        );
        self.draw_number(
            info,
            VERSION_INFO_BIT_LEN,
            Module::Version(Color::Light),
            Module::Version(Color::Dark),
            &VERSION_INFO_COORDS_TR,
        );
    }

    /// Writes `bit_len` bits of `number` most significant first along the
    /// coordinate list.
    fn draw_number(
        &mut self,
        number: u32,
        bit_len: usize,
        off_color: Module,
        on_color: Module,
        coords: &[(i16, i16)],
    ) {
        debug_assert!(coords.len() == bit_len, "Coordinate count must match bit length");

        let mut mask = 1 << (bit_len - 1);
        for &(r, c) in coords {
            self.set(r, c, if number & mask == 0 { off_color } else { on_color });
            mask >>= 1;
        }
    }
}


// Encoding region
//------------------------------------------------------------------------------

impl QrCode {
    pub(crate) fn draw_function_patterns(&mut self) -> EncodeResult<()> {
        self.draw_finder_patterns();
        self.draw_dark_module()?;
        self.draw_alignment_patterns();
        self.draw_timing_patterns();
        Ok(())
    }

    /// Places the interleaved codewords into every still-empty cell along
    /// the snake, then backfills the remainder bits light.
    pub(crate) fn draw_encoding_region(&mut self, payload: &[u8]) -> EncodeResult<()> {
        self.reserve_format_area();
        self.draw_version_info();

        let mut coords = EncRegionIter::new(self.version);
        let mut placed = 0usize;
        for &codeword in payload {
            for i in (0..8).rev() {
                let color = if (codeword >> i) & 1 == 0 { Color::Light } else { Color::Dark };
                for (r, c) in coords.by_ref() {
                    if matches!(self.get(r, c), Module::Empty) {
                        self.set(r, c, Module::Data(color));
                        placed += 1;
                        break;
                    }
                }
            }
        }
        if placed != payload.len() * 8 {
            return Err(EncodeError::InternalInvariant("not all data bits were consumed"));
        }

        // Cells the codewords didn't reach hold the remainder bits
        for (r, c) in coords {
            if matches!(self.get(r, c), Module::Empty) {
                self.set(r, c, Module::Data(Color::Light));
            }
        }
        if self.grid.contains(&Module::Empty) {
            return Err(EncodeError::InternalInvariant("empty modules remain after placement"));
        }
        Ok(())
    }

    /// Flips the data cells the mask predicate selects and writes the type
    /// info for this EC level and mask.
    pub(crate) fn apply_mask(&mut self, pattern: MaskPattern) {
        self.mask_pattern = Some(pattern);
        let mask_function = pattern.mask_function();
        let w = self.width as i16;
        for r in 0..w {
            for c in 0..w {
                if mask_function(r, c) {
                    if let Module::Data(color) = self.get(r, c) {
                        self.set(r, c, Module::Data(!color));
                    }
                }
            }
        }
        self.draw_format_info(format_info(self.ec_level, *pattern));
    }
}
