use super::OneDimensionalEncoder;
use crate::common::error::{EncodeError, EncodeResult};
use crate::types::EncodeHints;

// CODABAR
//------------------------------------------------------------------------------

const ALPHABET: &str = "0123456789-$:/.+ABCD";

/// Seven elements per character, alternating bar/space from a bar; a set
/// bit widens the element to two modules.
static CHARACTER_ENCODINGS: [u16; 20] = [
    0x003, 0x006, 0x009, 0x060, 0x012, 0x042, 0x021, 0x024, 0x030, 0x048, // 0-9
    0x00C, 0x018, 0x045, 0x051, 0x054, 0x015, // - $ : / . +
    0x01A, 0x029, 0x00B, 0x00E, // A B C D
];

static START_END_CHARS: [char; 4] = ['A', 'B', 'C', 'D'];
static ALT_START_END_CHARS: [char; 4] = ['T', 'N', '*', 'E'];
static TEN_MODULE_CHARS: [char; 4] = ['/', ':', '+', '.'];

const DEFAULT_GUARD: char = 'A';

pub(crate) struct CodabarEncoder;

impl OneDimensionalEncoder for CodabarEncoder {
    fn encode_contents(&self, contents: &str, _hints: &EncodeHints) -> EncodeResult<Vec<bool>> {
        let mut chars: Vec<char> = contents.chars().collect();
        if chars.len() < 2 {
            // Too short for explicit guards; wrap in the defaults
            chars.insert(0, DEFAULT_GUARD);
            chars.push(DEFAULT_GUARD);
        } else {
            let first = chars[0].to_ascii_uppercase();
            let last = chars[chars.len() - 1].to_ascii_uppercase();
            let starts_normal = START_END_CHARS.contains(&first);
            let ends_normal = START_END_CHARS.contains(&last);
            let starts_alt = ALT_START_END_CHARS.contains(&first);
            let ends_alt = ALT_START_END_CHARS.contains(&last);
            if starts_normal || starts_alt {
                if (starts_normal && !ends_normal) || (starts_alt && !ends_alt) {
                    return Err(EncodeError::BadInput(format!(
                        "invalid start/end guards: {contents}"
                    )));
                }
            } else if ends_normal || ends_alt {
                return Err(EncodeError::BadInput(format!("invalid start/end guards: {contents}")));
            } else {
                chars.insert(0, DEFAULT_GUARD);
                chars.push(DEFAULT_GUARD);
            }
        }

        // The guards decode to ten modules; the payload characters to nine
        // or ten plus a one-module separator each
        let mut result_length = 20;
        for &c in &chars[1..chars.len() - 1] {
            if c.is_ascii_digit() || c == '-' || c == '$' {
                result_length += 9;
            } else if TEN_MODULE_CHARS.contains(&c) {
                result_length += 10;
            } else {
                return Err(EncodeError::BadInput(format!("cannot encode {c:?}")));
            }
        }
        result_length += chars.len() - 1;

        let mut result = vec![false; result_length];
        let mut position = 0;
        for (index, &original) in chars.iter().enumerate() {
            let mut c = original.to_ascii_uppercase();
            if index == 0 || index == chars.len() - 1 {
                // Guard aliases map onto the canonical guard letters
                c = match c {
                    'T' => 'A',
                    'N' => 'B',
                    '*' => 'C',
                    'E' => 'D',
                    other => other,
                };
            }
            let code = ALPHABET
                .find(c)
                .map(|i| CHARACTER_ENCODINGS[i])
                .ok_or_else(|| EncodeError::BadInput(format!("cannot encode {original:?}")))?;

            // Walk the seven elements; a set bit stretches the element to
            // two modules
            let mut color = true;
            let mut counter = 0;
            let mut bit = 0;
            while bit < 7 {
                result[position] = color;
                position += 1;
                if (code >> (6 - bit)) & 1 == 0 || counter == 1 {
                    color = !color;
                    bit += 1;
                    counter = 0;
                } else {
                    counter += 1;
                }
            }
            if index < chars.len() - 1 {
                result[position] = false;
                position += 1;
            }
        }
        Ok(result)
    }
}
