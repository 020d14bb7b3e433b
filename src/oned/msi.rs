use super::{append_pattern, digit_values, OneDimensionalEncoder};
use crate::common::error::EncodeResult;
use crate::types::EncodeHints;

// MSI
//------------------------------------------------------------------------------

static START_PATTERN: [usize; 2] = [2, 1];
static STOP_PATTERN: [usize; 3] = [1, 2, 1];

/// Each digit is its four bits most significant first; a set bit is a wide
/// bar with a narrow space, a clear bit the reverse.
static BIT_ONE: [usize; 2] = [2, 1];
static BIT_ZERO: [usize; 2] = [1, 2];

pub(crate) struct MsiEncoder;

impl OneDimensionalEncoder for MsiEncoder {
    fn encode_contents(&self, contents: &str, _hints: &EncodeHints) -> EncodeResult<Vec<bool>> {
        let digits = digit_values(contents)?;

        let mut result = vec![false; 3 + digits.len() * 12 + 4];
        let mut pos = append_pattern(&mut result, 0, &START_PATTERN, true);
        for &digit in &digits {
            for bit in (0..4).rev() {
                let pattern = if (digit >> bit) & 1 == 1 { &BIT_ONE } else { &BIT_ZERO };
                pos += append_pattern(&mut result, pos, pattern, true);
            }
        }
        append_pattern(&mut result, pos, &STOP_PATTERN, true);
        Ok(result)
    }
}
