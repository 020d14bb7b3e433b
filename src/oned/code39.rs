use super::{append_pattern, OneDimensionalEncoder};
use crate::common::error::{EncodeError, EncodeResult};
use crate::types::EncodeHints;

// CODE 39
//------------------------------------------------------------------------------

const ALPHABET: &str = "0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ-. $/+%";

/// Nine-bit masks over the 5 bars and 4 spaces of each character; a set bit
/// widens that element to two modules.
static CHARACTER_ENCODINGS: [u16; 43] = [
    0x034, 0x121, 0x061, 0x160, 0x031, 0x130, 0x070, 0x025, 0x124, 0x064, // 0-9
    0x109, 0x049, 0x148, 0x019, 0x118, 0x058, 0x00D, 0x10C, 0x04C, 0x01C, // A-J
    0x103, 0x043, 0x142, 0x013, 0x112, 0x052, 0x007, 0x106, 0x046, 0x016, // K-T
    0x181, 0x0C1, 0x1C0, 0x091, 0x190, 0x0D0, 0x085, 0x184, 0x0C4, 0x0A8, // U-$
    0x0A2, 0x08A, 0x02A, // /-%
];

const ASTERISK_ENCODING: u16 = 0x094;

pub(crate) struct Code39Encoder;

impl OneDimensionalEncoder for Code39Encoder {
    fn encode_contents(&self, contents: &str, _hints: &EncodeHints) -> EncodeResult<Vec<bool>> {
        let mut contents = contents.to_string();
        if contents.chars().count() > 80 {
            return Err(EncodeError::Overflow(format!(
                "requested contents should be at most 80 characters, but got {}",
                contents.chars().count()
            )));
        }
        if contents.chars().any(|c| !ALPHABET.contains(c)) {
            contents = to_extended_mode(&contents)?;
            if contents.len() > 80 {
                return Err(EncodeError::Overflow(format!(
                    "requested contents should be at most 80 characters, but got {} (extended \
                     full ASCII mode)",
                    contents.len()
                )));
            }
        }

        let length = contents.len();
        let mut result = vec![false; 25 + 13 * length];
        let narrow_white = [1];
        let mut pos = 0;
        pos += append_pattern(&mut result, pos, &widths(ASTERISK_ENCODING), true);
        pos += append_pattern(&mut result, pos, &narrow_white, false);
        for c in contents.chars() {
            let index = ALPHABET.find(c).expect("validated or translated above");
            pos += append_pattern(&mut result, pos, &widths(CHARACTER_ENCODINGS[index]), true);
            pos += append_pattern(&mut result, pos, &narrow_white, false);
        }
        append_pattern(&mut result, pos, &widths(ASTERISK_ENCODING), true);
        Ok(result)
    }
}

fn widths(encoding: u16) -> [usize; 9] {
    let mut widths = [1; 9];
    for (i, w) in widths.iter_mut().enumerate() {
        if encoding & (1 << (8 - i)) != 0 {
            *w = 2;
        }
    }
    widths
}

/// Full-ASCII translation: characters outside the native alphabet become
/// two-character shift pairs.
fn to_extended_mode(contents: &str) -> EncodeResult<String> {
    let mut extended = String::with_capacity(contents.len() * 2);
    for c in contents.chars() {
        match c {
            '\u{0000}' => extended.push_str("%U"),
            ' ' | '-' | '.' => extended.push(c),
            '@' => extended.push_str("%V"),
            '`' => extended.push_str("%W"),
            _ => {
                let code = c as u32;
                if code <= 26 {
                    extended.push('$');
                    extended.push(char::from(b'A' + (code as u8 - 1)));
                } else if code < 32 {
                    extended.push('%');
                    extended.push(char::from(b'A' + (code as u8 - 27)));
                } else if c <= ',' || c == '/' || c == ':' {
                    extended.push('/');
                    extended.push(char::from(b'A' + (code as u8 - 33)));
                } else if c <= '9' {
                    extended.push(char::from(b'0' + (code as u8 - 48)));
                } else if c <= '?' {
                    extended.push('%');
                    extended.push(char::from(b'F' + (code as u8 - 59)));
                } else if c <= 'Z' {
                    extended.push(char::from(b'A' + (code as u8 - 65)));
                } else if c <= '_' {
                    extended.push('%');
                    extended.push(char::from(b'K' + (code as u8 - 91)));
                } else if c <= 'z' {
                    extended.push('+');
                    extended.push(char::from(b'A' + (code as u8 - 97)));
                } else if code <= 127 {
                    extended.push('%');
                    extended.push(char::from(b'P' + (code as u8 - 123)));
                } else {
                    return Err(EncodeError::BadInput(format!(
                        "requested content contains {c:?}, which cannot be encoded"
                    )));
                }
            }
        }
    }
    Ok(extended)
}
