use std::ops::Deref;

use super::code::QrCode;
use super::metadata::Color;

// Mask pattern
//------------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq, Copy, Clone, PartialOrd, Ord)]
pub struct MaskPattern(u8);

impl MaskPattern {
    pub fn new(pattern: u8) -> Self {
        debug_assert!(pattern < 8, "Invalid masking pattern");
        Self(pattern)
    }
}

impl Deref for MaskPattern {
    type Target = u8;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Predicates deciding which cells flip, with y the row and x the column.
mod mask_functions {
    pub fn checkerboard(y: i16, x: i16) -> bool {
        (y + x) % 2 == 0
    }

    pub fn horizontal_lines(y: i16, _: i16) -> bool {
        y % 2 == 0
    }

    pub fn vertical_lines(_: i16, x: i16) -> bool {
        x % 3 == 0
    }

    pub fn diagonal_lines(y: i16, x: i16) -> bool {
        (y + x) % 3 == 0
    }

    pub fn large_checkerboard(y: i16, x: i16) -> bool {
        (y / 2 + x / 3) % 2 == 0
    }

    pub fn fields(y: i16, x: i16) -> bool {
        (y * x) % 2 + (y * x) % 3 == 0
    }

    pub fn diamonds(y: i16, x: i16) -> bool {
        ((y * x) % 2 + (y * x) % 3) % 2 == 0
    }

    pub fn meadow(y: i16, x: i16) -> bool {
        ((y + x) % 2 + (y * x) % 3) % 2 == 0
    }
}

impl MaskPattern {
    pub fn mask_function(self) -> fn(i16, i16) -> bool {
        match self.0 {
            0b000 => mask_functions::checkerboard,
            0b001 => mask_functions::horizontal_lines,
            0b010 => mask_functions::vertical_lines,
            0b011 => mask_functions::diagonal_lines,
            0b100 => mask_functions::large_checkerboard,
            0b101 => mask_functions::fields,
            0b110 => mask_functions::diamonds,
            0b111 => mask_functions::meadow,
            _ => unreachable!("Invalid masking pattern"),
        }
    }
}


// Mask selection
//------------------------------------------------------------------------------

/// Scores all eight masks on a copy of the grid and applies the one with
/// the lowest penalty; ties fall to the lowest pattern number.
pub(crate) fn apply_best_mask(qr: &mut QrCode) -> MaskPattern {
    let best = (0..8)
        .min_by_key(|&m| {
            let mut candidate = qr.clone();
            candidate.apply_mask(MaskPattern(m));
            compute_total_penalty(&candidate)
        })
        .expect("at least one mask is always scored");
    let best = MaskPattern(best);
    qr.apply_mask(best);
    best
}

pub(crate) fn compute_total_penalty(qr: &QrCode) -> u32 {
    compute_run_penalty(qr)
        + compute_block_penalty(qr)
        + compute_finder_penalty(qr, true)
        + compute_finder_penalty(qr, false)
        + compute_balance_penalty(qr)
}

/// Rule 1: every same-color run of length 5 or more in a row or column
/// scores its length minus two.
fn compute_run_penalty(qr: &QrCode) -> u32 {
    let w = qr.width() as i16;
    let mut pen = 0;
    for i in 0..w {
        pen += line_run_penalty((0..w).map(|j| *qr.get(i, j)));
        pen += line_run_penalty((0..w).map(|j| *qr.get(j, i)));
    }
    pen
}

fn line_run_penalty(line: impl Iterator<Item = Color>) -> u32 {
    let mut pen = 0;
    let mut run_color = None;
    let mut run_len = 0u32;
    for color in line {
        if Some(color) == run_color {
            run_len += 1;
        } else {
            if run_len >= 5 {
                pen += run_len - 2;
            }
            run_color = Some(color);
            run_len = 1;
        }
    }
    if run_len >= 5 {
        pen += run_len - 2;
    }
    pen
}

/// Rule 2: three points for every 2x2 block of a single color.
fn compute_block_penalty(qr: &QrCode) -> u32 {
    let w = qr.width() as i16;
    let mut pen = 0;
    for r in 0..w - 1 {
        for c in 0..w - 1 {
            let color = *qr.get(r, c);
            if color == *qr.get(r + 1, c)
                && color == *qr.get(r, c + 1)
                && color == *qr.get(r + 1, c + 1)
            {
                pen += 3;
            }
        }
    }
    pen
}

/// Rule 3: forty points for every 1011101 core flanked by four light cells
/// on either side; the flank may run off the edge.
fn compute_finder_penalty(qr: &QrCode, horizontal: bool) -> u32 {
    static CORE: [Color; 7] = [
        Color::Dark,
        Color::Light,
        Color::Dark,
        Color::Dark,
        Color::Dark,
        Color::Light,
        Color::Dark,
    ];
    let w = qr.width() as i16;
    let mut pen = 0;
    for i in 0..w {
        let cell = |k: i16| if horizontal { *qr.get(i, k) } else { *qr.get(k, i) };
        let all_light = |from: i16, to: i16| {
            (from.max(0)..to.min(w)).all(|k| cell(k) == Color::Light)
        };
        for j in 0..=w - 7 {
            if (0..7).all(|t| cell(j + t) == CORE[t as usize])
                && (all_light(j - 4, j) || all_light(j + 7, j + 11))
            {
                pen += 40;
            }
        }
    }
    pen
}

/// Rule 4: ten points for every step the dark-cell ratio strays from an
/// even split.
fn compute_balance_penalty(qr: &QrCode) -> u32 {
    let dark = qr.count_dark_modules();
    let total = qr.width() * qr.width();
    let k = (dark * 2).abs_diff(total) * 20 / total;
    (k * 10) as u32
}

#[cfg(test)]
mod penalty_tests {
    use super::{
        compute_balance_penalty, compute_block_penalty, compute_finder_penalty,
        compute_run_penalty,
    };
    use crate::qr::code::{Module, QrCode};
    use crate::qr::metadata::{Color, ECLevel, Version};

    fn blank_grid() -> QrCode {
        let mut qr = QrCode::new(Version::new(1).unwrap(), ECLevel::L);
        let w = qr.width() as i16;
        for r in 0..w {
            for c in 0..w {
                qr.set(r, c, Module::Data(Color::Light));
            }
        }
        qr
    }

    #[test]
    fn test_run_penalty_on_uniform_grid() {
        let qr = blank_grid();
        // Every row and column is a single run of 21, scoring 19 each
        assert_eq!(compute_run_penalty(&qr), 21 * 19 * 2);
    }

    #[test]
    fn test_run_penalty_counts_interior_runs() {
        let mut qr = blank_grid();
        for c in 0..6 {
            qr.set(0, c, Module::Data(Color::Dark));
        }
        // Row 0 now splits into runs of 6 and 15; the first six columns
        // into runs of 1 (unscored) and 20
        let row0 = 4 + 13;
        let uniform_rows = 20 * 19;
        let columns = 6 * 18 + 15 * 19;
        assert_eq!(compute_run_penalty(&qr), row0 + uniform_rows + columns);
    }

    #[test]
    fn test_block_penalty() {
        let qr = blank_grid();
        assert_eq!(compute_block_penalty(&qr), 20 * 20 * 3);
        let mut qr = blank_grid();
        let w = qr.width() as i16;
        for r in 0..w {
            for c in 0..w {
                if (r + c) % 2 == 0 {
                    qr.set(r, c, Module::Data(Color::Dark));
                }
            }
        }
        assert_eq!(compute_block_penalty(&qr), 0);
    }

    #[test]
    fn test_finder_penalty() {
        let mut qr = blank_grid();
        // One horizontal core with light flanks on both sides
        for (offset, color) in
            [Color::Dark, Color::Light, Color::Dark, Color::Dark, Color::Dark, Color::Light, Color::Dark]
                .iter()
                .enumerate()
        {
            qr.set(10, 7 + offset as i16, Module::Data(*color));
        }
        assert_eq!(compute_finder_penalty(&qr, true), 40);
        assert_eq!(compute_finder_penalty(&qr, false), 0);
    }

    #[test]
    fn test_balance_penalty() {
        let qr = blank_grid();
        // All light: ratio 0, twenty steps of deviation
        assert_eq!(compute_balance_penalty(&qr), 200);
        let mut qr = blank_grid();
        let w = qr.width() as i16;
        for r in 0..w {
            for c in 0..w {
                if (r + c) % 2 == 0 {
                    qr.set(r, c, Module::Data(Color::Dark));
                }
            }
        }
        // 221 dark of 441: within the first step either side of balance
        assert_eq!(compute_balance_penalty(&qr), 0);
    }
}
