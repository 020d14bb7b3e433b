use itertools::Itertools;

use super::{append_pattern, digit_values, OneDimensionalEncoder};
use crate::common::error::{EncodeError, EncodeResult};
use crate::types::EncodeHints;

// ITF (Interleaved 2 of 5)
//------------------------------------------------------------------------------

const NARROW: usize = 1;
const WIDE: usize = 3;

static START_PATTERN: [usize; 4] = [NARROW, NARROW, NARROW, NARROW];
static END_PATTERN: [usize; 3] = [WIDE, NARROW, NARROW];

/// Narrow/wide widths of the five elements of each digit.
static PATTERNS: [[usize; 5]; 10] = [
    [NARROW, NARROW, WIDE, WIDE, NARROW],
    [WIDE, NARROW, NARROW, NARROW, WIDE],
    [NARROW, WIDE, NARROW, NARROW, WIDE],
    [WIDE, WIDE, NARROW, NARROW, NARROW],
    [NARROW, NARROW, WIDE, NARROW, WIDE],
    [WIDE, NARROW, WIDE, NARROW, NARROW],
    [NARROW, WIDE, WIDE, NARROW, NARROW],
    [NARROW, NARROW, NARROW, WIDE, WIDE],
    [WIDE, NARROW, NARROW, WIDE, NARROW],
    [NARROW, WIDE, NARROW, WIDE, NARROW],
];

pub(crate) struct ItfEncoder;

impl OneDimensionalEncoder for ItfEncoder {
    fn encode_contents(&self, contents: &str, _hints: &EncodeHints) -> EncodeResult<Vec<bool>> {
        let digits = digit_values(contents)?;
        let length = digits.len();
        if length % 2 != 0 {
            return Err(EncodeError::BadInput(format!(
                "the length of the input should be even, but got {length}"
            )));
        }
        if length > 80 {
            return Err(EncodeError::Overflow(format!(
                "requested contents should be at most 80 digits, but got {length}"
            )));
        }

        let mut result = vec![false; 4 + length / 2 * 18 + 5];
        let mut pos = append_pattern(&mut result, 0, &START_PATTERN, true);
        for (&bar_digit, &space_digit) in digits.iter().tuples() {
            // One digit rides the bars, the next the spaces between them
            let mut encoding = [0usize; 10];
            for j in 0..5 {
                encoding[2 * j] = PATTERNS[bar_digit as usize][j];
                encoding[2 * j + 1] = PATTERNS[space_digit as usize][j];
            }
            pos += append_pattern(&mut result, pos, &encoding, true);
        }
        append_pattern(&mut result, pos, &END_PATTERN, true);
        Ok(result)
    }
}
