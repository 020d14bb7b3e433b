use super::metadata::Version;

// Iterator over the encoding region of a QR grid
//------------------------------------------------------------------------------

/// Walks the data region in placement order: two-column strips from the
/// bottom right moving left, alternating bottom-to-top and top-to-bottom,
/// right cell before left cell, never touching the vertical timing column.
pub(crate) struct EncRegionIter {
    r: i16,
    c: i16,
    width: i16,
}

const VERT_TIMING_COL: i16 = 6;

impl EncRegionIter {
    pub fn new(version: Version) -> Self {
        let w = version.width() as i16;
        Self { r: w - 1, c: w - 1, width: w }
    }
}

impl Iterator for EncRegionIter {
    type Item = (i16, i16);
    fn next(&mut self) -> Option<Self::Item> {
        let adjusted_col = if self.c <= VERT_TIMING_COL { self.c + 1 } else { self.c };
        if self.c < 0 {
            return None;
        }
        let res = (self.r, self.c);
        let col_type = (self.width - adjusted_col) % 4;
        match col_type {
            2 if self.r > 0 => {
                self.r -= 1;
                self.c += 1;
            }
            0 if self.r < self.width - 1 => {
                self.r += 1;
                self.c += 1;
            }
            0 | 2 if self.c == VERT_TIMING_COL + 1 => {
                self.c -= 2;
            }
            _ => {
                self.c -= 1;
            }
        }
        Some(res)
    }
}

#[cfg(test)]
mod iter_tests {
    use super::EncRegionIter;
    use crate::qr::metadata::Version;

    #[test]
    fn test_starts_at_bottom_right_and_snakes_up() {
        let coords: Vec<_> = EncRegionIter::new(Version::new(1).unwrap()).take(8).collect();
        assert_eq!(
            coords,
            [(20, 20), (20, 19), (19, 20), (19, 19), (18, 20), (18, 19), (17, 20), (17, 19)]
        );
    }

    #[test]
    fn test_skips_vertical_timing_column() {
        for number in [1, 7, 40] {
            let version = Version::new(number).unwrap();
            let w = version.width() as i16;
            let coords: Vec<_> = EncRegionIter::new(version).collect();
            assert!(coords.iter().all(|&(_, c)| c != 6), "version {number}");
            // Every cell outside column 6 is visited exactly once
            assert_eq!(coords.len(), (w * (w - 1)) as usize, "version {number}");
            let mut seen = vec![false; (w * w) as usize];
            for &(r, c) in &coords {
                let index = (r * w + c) as usize;
                assert!(!seen[index], "version {number} revisits ({r}, {c})");
                seen[index] = true;
            }
        }
    }
}
