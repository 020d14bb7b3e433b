use super::{append_pattern, digit_values, OneDimensionalEncoder};
use crate::common::error::EncodeResult;
use crate::types::EncodeHints;

// Plessey
//------------------------------------------------------------------------------

/// Generator of the 9-bit cyclic redundancy check, x^8 + x^7 + x^6 + x^5 +
/// x^3 + 1.
static CRC_POLY: [u8; 9] = [1, 1, 1, 1, 0, 1, 0, 0, 1];

/// Start bits 1101, encoded like data bits.
static START_BITS: [u8; 4] = [1, 1, 0, 1];

/// Stop sequence with the termination bar.
static STOP_PATTERN: [usize; 9] = [3, 3, 1, 3, 1, 1, 3, 1, 3];

static BIT_ONE: [usize; 2] = [3, 1];
static BIT_ZERO: [usize; 2] = [1, 3];

/// Digits as bits, least significant first.
fn data_bits(digits: &[u8]) -> Vec<u8> {
    let mut bits = Vec::with_capacity(digits.len() * 4);
    for &digit in digits {
        for bit in 0..4 {
            bits.push((digit >> bit) & 1);
        }
    }
    bits
}

/// Remainder of the bit stream times x^8 divided by the generator; the
/// eight bits appended after the data.
fn crc_bits(bits: &[u8]) -> [u8; 8] {
    let mut buffer = bits.to_vec();
    buffer.extend_from_slice(&[0; 8]);
    for i in 0..bits.len() {
        if buffer[i] == 1 {
            for (j, &p) in CRC_POLY.iter().enumerate() {
                buffer[i + j] ^= p;
            }
        }
    }
    let mut crc = [0; 8];
    crc.copy_from_slice(&buffer[bits.len()..]);
    crc
}

pub(crate) struct PlesseyEncoder;

impl OneDimensionalEncoder for PlesseyEncoder {
    fn encode_contents(&self, contents: &str, _hints: &EncodeHints) -> EncodeResult<Vec<bool>> {
        let digits = digit_values(contents)?;
        let bits = data_bits(&digits);
        let crc = crc_bits(&bits);

        let module_count = (START_BITS.len() + bits.len() + crc.len()) * 4
            + STOP_PATTERN.iter().sum::<usize>();
        let mut result = vec![false; module_count];
        let mut pos = 0;
        for bit in START_BITS.iter().chain(bits.iter()).chain(crc.iter()) {
            let pattern = if *bit == 1 { &BIT_ONE } else { &BIT_ZERO };
            pos += append_pattern(&mut result, pos, pattern, true);
        }
        append_pattern(&mut result, pos, &STOP_PATTERN, true);
        Ok(result)
    }
}
