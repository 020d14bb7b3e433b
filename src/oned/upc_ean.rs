use super::{append_pattern, digit_values, OneDimensionalEncoder};
use crate::common::error::{EncodeError, EncodeResult};
use crate::types::EncodeHints;

// Shared UPC/EAN machinery
//------------------------------------------------------------------------------

/// "L" digit patterns as space/bar run lengths, seven modules each.
static L_PATTERNS: [[usize; 4]; 10] = [
    [3, 2, 1, 1],
    [2, 2, 2, 1],
    [2, 1, 2, 2],
    [1, 4, 1, 1],
    [1, 1, 3, 2],
    [1, 2, 3, 1],
    [1, 1, 1, 4],
    [1, 3, 1, 2],
    [1, 2, 1, 3],
    [3, 1, 1, 2],
];

/// "G" patterns are the "L" patterns reversed.
static G_PATTERNS: [[usize; 4]; 10] = [
    [1, 1, 2, 3],
    [1, 2, 2, 2],
    [2, 2, 1, 2],
    [1, 1, 4, 1],
    [2, 3, 1, 1],
    [1, 3, 2, 1],
    [4, 1, 1, 1],
    [2, 1, 3, 1],
    [3, 1, 2, 1],
    [2, 1, 1, 3],
];

fn l_or_g_pattern(digit: usize) -> &'static [usize; 4] {
    if digit < 10 {
        &L_PATTERNS[digit]
    } else {
        &G_PATTERNS[digit - 10]
    }
}

static START_END_PATTERN: [usize; 3] = [1, 1, 1];
static MIDDLE_PATTERN: [usize; 5] = [1, 1, 1, 1, 1];
static UPCE_END_PATTERN: [usize; 6] = [1, 1, 1, 1, 1, 1];

/// Parity choices for EAN-13 digits 2-7, selected by the first digit; a set
/// bit means the "G" pattern.
static FIRST_DIGIT_ENCODINGS: [u32; 10] =
    [0x00, 0x0B, 0x0D, 0x0E, 0x13, 0x19, 0x1C, 0x15, 0x16, 0x1A];

/// UPC-E parities indexed by number system then check digit.
static NUMSYS_AND_CHECK_DIGIT_PATTERNS: [[u32; 10]; 2] = [
    [0x38, 0x34, 0x32, 0x31, 0x2C, 0x26, 0x23, 0x2A, 0x29, 0x25],
    [0x07, 0x0B, 0x0D, 0x0E, 0x13, 0x19, 0x1C, 0x15, 0x16, 0x1A],
];

/// UPC/EAN check digit: digits at odd positions from the right count three
/// times.
pub(crate) fn standard_check_digit(digits: &[u8]) -> u8 {
    let mut sum: usize = digits.iter().rev().step_by(2).map(|&d| d as usize).sum();
    sum *= 3;
    sum += digits.iter().rev().skip(1).step_by(2).map(|&d| d as usize).sum::<usize>();
    ((1000 - sum) % 10) as u8
}

/// Validates length, parses digits, and appends or verifies the check
/// digit so the returned vector is always the self-checking form.
fn checked_digits(contents: &str, payload_len: usize) -> EncodeResult<Vec<u8>> {
    let mut digits = digit_values(contents)?;
    if digits.len() == payload_len {
        digits.push(standard_check_digit(&digits));
    } else if digits.len() == payload_len + 1 {
        let expected = standard_check_digit(&digits[..payload_len]);
        let found = digits[payload_len];
        if found != expected {
            return Err(EncodeError::ChecksumMismatch(format!(
                "check digit {found} does not match the computed {expected}"
            )));
        }
    } else {
        return Err(EncodeError::BadInput(format!(
            "requested contents should be {payload_len} or {} digits long, but got {}",
            payload_len + 1,
            digits.len()
        )));
    }
    Ok(digits)
}


// EAN-13
//------------------------------------------------------------------------------

pub(crate) struct Ean13Encoder;

impl Ean13Encoder {
    const CODE_WIDTH: usize = 3 + 7 * 6 + 5 + 7 * 6 + 3;

    fn encode_digits(digits: &[u8]) -> Vec<bool> {
        let parities = FIRST_DIGIT_ENCODINGS[digits[0] as usize];
        let mut result = vec![false; Self::CODE_WIDTH];
        let mut pos = 0;
        pos += append_pattern(&mut result, pos, &START_END_PATTERN, true);
        // The first digit is carried by the parity choice over digits 2-7
        for i in 1..=6 {
            let mut digit = digits[i] as usize;
            if (parities >> (6 - i)) & 1 == 1 {
                digit += 10;
            }
            pos += append_pattern(&mut result, pos, l_or_g_pattern(digit), false);
        }
        pos += append_pattern(&mut result, pos, &MIDDLE_PATTERN, false);
        for i in 7..=12 {
            pos += append_pattern(&mut result, pos, &L_PATTERNS[digits[i] as usize], true);
        }
        append_pattern(&mut result, pos, &START_END_PATTERN, true);
        result
    }
}

impl OneDimensionalEncoder for Ean13Encoder {
    fn encode_contents(&self, contents: &str, _hints: &EncodeHints) -> EncodeResult<Vec<bool>> {
        let digits = checked_digits(contents, 12)?;
        Ok(Self::encode_digits(&digits))
    }

    fn default_margin(&self) -> usize {
        9
    }
}

// EAN-8
//------------------------------------------------------------------------------

pub(crate) struct Ean8Encoder;

impl Ean8Encoder {
    const CODE_WIDTH: usize = 3 + 7 * 4 + 5 + 7 * 4 + 3;
}

impl OneDimensionalEncoder for Ean8Encoder {
    fn encode_contents(&self, contents: &str, _hints: &EncodeHints) -> EncodeResult<Vec<bool>> {
        let digits = checked_digits(contents, 7)?;
        let mut result = vec![false; Self::CODE_WIDTH];
        let mut pos = 0;
        pos += append_pattern(&mut result, pos, &START_END_PATTERN, true);
        for &digit in &digits[..4] {
            pos += append_pattern(&mut result, pos, &L_PATTERNS[digit as usize], false);
        }
        pos += append_pattern(&mut result, pos, &MIDDLE_PATTERN, false);
        for &digit in &digits[4..] {
            pos += append_pattern(&mut result, pos, &L_PATTERNS[digit as usize], true);
        }
        append_pattern(&mut result, pos, &START_END_PATTERN, true);
        Ok(result)
    }

    fn default_margin(&self) -> usize {
        9
    }
}

// UPC-A
//------------------------------------------------------------------------------

/// A UPC-A symbol is the EAN-13 symbol of the same digits with a leading
/// zero.
pub(crate) struct UpcAEncoder;

impl OneDimensionalEncoder for UpcAEncoder {
    fn encode_contents(&self, contents: &str, hints: &EncodeHints) -> EncodeResult<Vec<bool>> {
        let digits = digit_values(contents)?;
        if digits.len() != 11 && digits.len() != 12 {
            return Err(EncodeError::BadInput(format!(
                "requested contents should be 11 or 12 digits long, but got {}",
                digits.len()
            )));
        }
        Ean13Encoder.encode_contents(&format!("0{contents}"), hints)
    }

    fn default_margin(&self) -> usize {
        9
    }
}

// UPC-E
//------------------------------------------------------------------------------

pub(crate) struct UpcEEncoder;

impl UpcEEncoder {
    const CODE_WIDTH: usize = 3 + 7 * 6 + 6;

    /// Expands the zero-suppressed form to the full twelve-digit UPC-A
    /// number the check digit is defined over.
    fn expand_to_upca(digits: &[u8]) -> Vec<u8> {
        let body = &digits[1..7];
        let mut expanded = Vec::with_capacity(11);
        expanded.push(digits[0]);
        match body[5] {
            0..=2 => {
                expanded.extend_from_slice(&body[..2]);
                expanded.push(body[5]);
                expanded.extend_from_slice(&[0, 0, 0, 0]);
                expanded.extend_from_slice(&body[2..5]);
            }
            3 => {
                expanded.extend_from_slice(&body[..3]);
                expanded.extend_from_slice(&[0, 0, 0, 0, 0]);
                expanded.extend_from_slice(&body[3..5]);
            }
            4 => {
                expanded.extend_from_slice(&body[..4]);
                expanded.extend_from_slice(&[0, 0, 0, 0, 0]);
                expanded.push(body[4]);
            }
            _ => {
                expanded.extend_from_slice(&body[..5]);
                expanded.extend_from_slice(&[0, 0, 0, 0]);
                expanded.push(body[5]);
            }
        }
        expanded
    }
}

impl OneDimensionalEncoder for UpcEEncoder {
    fn encode_contents(&self, contents: &str, _hints: &EncodeHints) -> EncodeResult<Vec<bool>> {
        let mut digits = digit_values(contents)?;
        match digits.len() {
            7 => {
                let check = standard_check_digit(&Self::expand_to_upca(&digits));
                digits.push(check);
            }
            8 => {
                let expected = standard_check_digit(&Self::expand_to_upca(&digits[..7]));
                if digits[7] != expected {
                    return Err(EncodeError::ChecksumMismatch(format!(
                        "check digit {} does not match the computed {expected}",
                        digits[7]
                    )));
                }
            }
            n => {
                return Err(EncodeError::BadInput(format!(
                    "requested contents should be 7 or 8 digits long, but got {n}"
                )))
            }
        }
        let number_system = digits[0] as usize;
        if number_system > 1 {
            return Err(EncodeError::BadInput(
                "number system must be 0 or 1 for UPC-E".into(),
            ));
        }

        let parities = NUMSYS_AND_CHECK_DIGIT_PATTERNS[number_system][digits[7] as usize];
        let mut result = vec![false; Self::CODE_WIDTH];
        let mut pos = 0;
        pos += append_pattern(&mut result, pos, &START_END_PATTERN, true);
        for i in 1..=6 {
            let mut digit = digits[i] as usize;
            if (parities >> (6 - i)) & 1 == 1 {
                digit += 10;
            }
            pos += append_pattern(&mut result, pos, l_or_g_pattern(digit), false);
        }
        append_pattern(&mut result, pos, &UPCE_END_PATTERN, false);
        Ok(result)
    }

    fn default_margin(&self) -> usize {
        9
    }
}
