use super::{append_pattern, OneDimensionalEncoder};
use crate::common::error::{EncodeError, EncodeResult};
use crate::types::EncodeHints;

// CODE 128
//------------------------------------------------------------------------------

/// Escapes for the four function codes, carried in the content string.
pub(crate) const ESCAPE_FNC_1: char = '\u{00F1}';
pub(crate) const ESCAPE_FNC_2: char = '\u{00F2}';
pub(crate) const ESCAPE_FNC_3: char = '\u{00F3}';
pub(crate) const ESCAPE_FNC_4: char = '\u{00F4}';

const CODE_CODE_C: usize = 99;
const CODE_CODE_B: usize = 100;
const CODE_CODE_A: usize = 101;
const CODE_FNC_1: usize = 102;
const CODE_FNC_2: usize = 97;
const CODE_FNC_3: usize = 96;
const CODE_FNC_4_A: usize = 101;
const CODE_FNC_4_B: usize = 100;
const CODE_START_A: usize = 103;
const CODE_START_B: usize = 104;
const CODE_START_C: usize = 105;
const CODE_STOP: usize = 106;

/// Bar/space run lengths for values 0-105, eleven modules each, plus the
/// thirteen-module stop pattern.
static CODE_PATTERNS: [&[usize]; 107] = [
    &[2, 1, 2, 2, 2, 2],
    &[2, 2, 2, 1, 2, 2],
    &[2, 2, 2, 2, 2, 1],
    &[1, 2, 1, 2, 2, 3],
    &[1, 2, 1, 3, 2, 2],
    &[1, 3, 1, 2, 2, 2],
    &[1, 2, 2, 2, 1, 3],
    &[1, 2, 2, 3, 1, 2],
    &[1, 3, 2, 2, 1, 2],
    &[2, 2, 1, 2, 1, 3],
    &[2, 2, 1, 3, 1, 2],
    &[2, 3, 1, 2, 1, 2],
    &[1, 1, 2, 2, 3, 2],
    &[1, 2, 2, 1, 3, 2],
    &[1, 2, 2, 2, 3, 1],
    &[1, 1, 3, 2, 2, 2],
    &[1, 2, 3, 1, 2, 2],
    &[1, 2, 3, 2, 2, 1],
    &[2, 2, 3, 2, 1, 1],
    &[2, 2, 1, 1, 3, 2],
    &[2, 2, 1, 2, 3, 1],
    &[2, 1, 3, 2, 1, 2],
    &[2, 2, 3, 1, 1, 2],
    &[3, 1, 2, 1, 3, 1],
    &[3, 1, 1, 2, 2, 2],
    &[3, 2, 1, 1, 2, 2],
    &[3, 2, 1, 2, 2, 1],
    &[3, 1, 2, 2, 1, 2],
    &[3, 2, 2, 1, 1, 2],
    &[3, 2, 2, 2, 1, 1],
    &[2, 1, 2, 1, 2, 3],
    &[2, 1, 2, 3, 2, 1],
    &[2, 3, 2, 1, 2, 1],
    &[1, 1, 1, 3, 2, 3],
    &[1, 3, 1, 1, 2, 3],
    &[1, 3, 1, 3, 2, 1],
    &[1, 1, 2, 3, 1, 3],
    &[1, 3, 2, 1, 1, 3],
    &[1, 3, 2, 3, 1, 1],
    &[2, 1, 1, 3, 1, 3],
    &[2, 3, 1, 1, 1, 3],
    &[2, 3, 1, 3, 1, 1],
    &[1, 1, 2, 1, 3, 3],
    &[1, 1, 2, 3, 3, 1],
    &[1, 3, 2, 1, 3, 1],
    &[1, 1, 3, 1, 2, 3],
    &[1, 1, 3, 3, 2, 1],
    &[1, 3, 3, 1, 2, 1],
    &[3, 1, 3, 1, 2, 1],
    &[2, 1, 1, 3, 3, 1],
    &[2, 3, 1, 1, 3, 1],
    &[2, 1, 3, 1, 1, 3],
    &[2, 1, 3, 3, 1, 1],
    &[2, 1, 3, 1, 3, 1],
    &[3, 1, 1, 1, 2, 3],
    &[3, 1, 1, 3, 2, 1],
    &[3, 3, 1, 1, 2, 1],
    &[3, 1, 2, 1, 1, 3],
    &[3, 1, 2, 3, 1, 1],
    &[3, 3, 2, 1, 1, 1],
    &[3, 1, 4, 1, 1, 1],
    &[2, 2, 1, 4, 1, 1],
    &[4, 3, 1, 1, 1, 1],
    &[1, 1, 1, 2, 2, 4],
    &[1, 1, 1, 4, 2, 2],
    &[1, 2, 1, 1, 2, 4],
    &[1, 2, 1, 4, 2, 1],
    &[1, 4, 1, 1, 2, 2],
    &[1, 4, 1, 2, 2, 1],
    &[1, 1, 2, 2, 1, 4],
    &[1, 1, 2, 4, 1, 2],
    &[1, 2, 2, 1, 1, 4],
    &[1, 2, 2, 4, 1, 1],
    &[1, 4, 2, 1, 1, 2],
    &[1, 4, 2, 2, 1, 1],
    &[2, 4, 1, 2, 1, 1],
    &[2, 2, 1, 1, 1, 4],
    &[4, 1, 3, 1, 1, 1],
    &[2, 4, 1, 1, 1, 2],
    &[1, 3, 4, 1, 1, 1],
    &[1, 1, 1, 2, 4, 2],
    &[1, 2, 1, 1, 4, 2],
    &[1, 2, 1, 2, 4, 1],
    &[1, 1, 4, 2, 1, 2],
    &[1, 2, 4, 1, 1, 2],
    &[1, 2, 4, 2, 1, 1],
    &[4, 1, 1, 2, 1, 2],
    &[4, 2, 1, 1, 1, 2],
    &[4, 2, 1, 2, 1, 1],
    &[2, 1, 2, 1, 4, 1],
    &[2, 1, 4, 1, 2, 1],
    &[4, 1, 2, 1, 2, 1],
    &[1, 1, 1, 1, 4, 3],
    &[1, 1, 1, 3, 4, 1],
    &[1, 3, 1, 1, 4, 1],
    &[1, 1, 4, 1, 1, 3],
    &[1, 1, 4, 3, 1, 1],
    &[4, 1, 1, 1, 1, 3],
    &[4, 1, 1, 3, 1, 1],
    &[1, 1, 3, 1, 4, 1],
    &[1, 1, 4, 1, 3, 1],
    &[3, 1, 1, 1, 4, 1],
    &[4, 1, 1, 1, 3, 1],
    &[2, 1, 1, 4, 1, 2],
    &[2, 1, 1, 2, 1, 4],
    &[2, 1, 1, 2, 3, 2],
    &[2, 3, 3, 1, 1, 1, 2],
];

#[derive(Debug, PartialEq, Eq, Copy, Clone)]
enum CType {
    Uncodable,
    OneDigit,
    TwoDigits,
    Fnc1,
}

fn find_ctype(chars: &[char], start: usize) -> CType {
    if start >= chars.len() {
        return CType::Uncodable;
    }
    let c = chars[start];
    if c == ESCAPE_FNC_1 {
        return CType::Fnc1;
    }
    if !c.is_ascii_digit() {
        return CType::Uncodable;
    }
    if start + 1 >= chars.len() {
        return CType::OneDigit;
    }
    if chars[start + 1].is_ascii_digit() {
        CType::TwoDigits
    } else {
        CType::OneDigit
    }
}

/// Greedy lookahead choosing the code set for the symbol at `start`: runs
/// of four or more digits switch to C, an odd leading digit defers the
/// switch by one.
fn choose_code(chars: &[char], start: usize, old_code: usize) -> usize {
    let mut lookahead = find_ctype(chars, start);
    if lookahead == CType::OneDigit {
        if old_code == CODE_CODE_A {
            return CODE_CODE_A;
        }
        return CODE_CODE_B;
    }
    if lookahead == CType::Uncodable {
        if start < chars.len() {
            let c = chars[start];
            if c < ' '
                || (old_code == CODE_CODE_A
                    && (c < '`' || (ESCAPE_FNC_1..=ESCAPE_FNC_4).contains(&c)))
            {
                // Stay in A for control characters and the function codes
                return CODE_CODE_A;
            }
        }
        return CODE_CODE_B;
    }
    if old_code == CODE_CODE_A && lookahead == CType::Fnc1 {
        return CODE_CODE_A;
    }
    if old_code == CODE_CODE_C {
        return CODE_CODE_C;
    }
    if old_code == CODE_CODE_B {
        if lookahead == CType::Fnc1 {
            return CODE_CODE_B;
        }
        lookahead = find_ctype(chars, start + 2);
        if lookahead == CType::Uncodable || lookahead == CType::OneDigit {
            return CODE_CODE_B;
        }
        if lookahead == CType::Fnc1 {
            // Four digits then FNC1: switch now only for an even run
            lookahead = find_ctype(chars, start + 3);
            if lookahead == CType::TwoDigits {
                return CODE_CODE_C;
            }
            return CODE_CODE_B;
        }
        let mut index = start + 4;
        loop {
            lookahead = find_ctype(chars, index);
            if lookahead != CType::TwoDigits {
                break;
            }
            index += 2;
        }
        if lookahead == CType::OneDigit {
            return CODE_CODE_B;
        }
        return CODE_CODE_C;
    }
    // Choosing the initial code set: FNC1 is transparent, two or more
    // leading digits start in C
    if lookahead == CType::Fnc1 {
        lookahead = find_ctype(chars, start + 1);
    }
    if lookahead == CType::TwoDigits {
        CODE_CODE_C
    } else {
        CODE_CODE_B
    }
}

pub(crate) struct Code128Encoder;

impl OneDimensionalEncoder for Code128Encoder {
    fn encode_contents(&self, contents: &str, hints: &EncodeHints) -> EncodeResult<Vec<bool>> {
        let mut chars: Vec<char> = contents.chars().collect();
        if hints.gs1_format && chars.first() != Some(&ESCAPE_FNC_1) {
            chars.insert(0, ESCAPE_FNC_1);
        }
        let length = chars.len();
        if length > 80 {
            return Err(EncodeError::Overflow(format!(
                "requested contents should be at most 80 characters, but got {length}"
            )));
        }
        for &c in &chars {
            match c {
                ESCAPE_FNC_1 | ESCAPE_FNC_2 | ESCAPE_FNC_3 | ESCAPE_FNC_4 => {}
                c if c as u32 > 127 => {
                    return Err(EncodeError::BadInput(format!("bad character in input: {c:?}")))
                }
                _ => {}
            }
        }
        if hints.code128_force_codeset_b {
            for &c in &chars {
                if (c as u32) < 32 && c != ESCAPE_FNC_1 {
                    return Err(EncodeError::BadInput(format!(
                        "bad character in input for forced code set B: {c:?}"
                    )));
                }
            }
        }

        let mut pattern_indices: Vec<usize> = Vec::new();
        let mut check_sum = 0usize;
        let mut check_weight = 1usize;
        let mut code_set = 0usize;
        let mut position = 0usize;

        while position < length {
            let new_code_set = if hints.code128_force_codeset_b {
                CODE_CODE_B
            } else {
                choose_code(&chars, position, code_set)
            };
            let pattern_index;
            if new_code_set == code_set {
                pattern_index = match chars[position] {
                    ESCAPE_FNC_1 => CODE_FNC_1,
                    ESCAPE_FNC_2 => CODE_FNC_2,
                    ESCAPE_FNC_3 => CODE_FNC_3,
                    ESCAPE_FNC_4 => {
                        if code_set == CODE_CODE_A {
                            CODE_FNC_4_A
                        } else {
                            CODE_FNC_4_B
                        }
                    }
                    c => match code_set {
                        CODE_CODE_A => {
                            let index = c as i32 - ' ' as i32;
                            if index < 0 {
                                (index + 96) as usize
                            } else {
                                index as usize
                            }
                        }
                        CODE_CODE_B => c as usize - 32,
                        _ => {
                            // Code set C packs two digits per symbol
                            let tens = chars[position].to_digit(10).expect("digit by lookahead");
                            let ones = chars[position + 1].to_digit(10).expect("digit by lookahead");
                            position += 1;
                            (tens * 10 + ones) as usize
                        }
                    },
                };
                position += 1;
            } else {
                pattern_index = if code_set == 0 {
                    match new_code_set {
                        CODE_CODE_A => CODE_START_A,
                        CODE_CODE_B => CODE_START_B,
                        _ => CODE_START_C,
                    }
                } else {
                    new_code_set
                };
                code_set = new_code_set;
            }
            pattern_indices.push(pattern_index);
            check_sum += pattern_index * check_weight;
            if position != 0 {
                check_weight += 1;
            }
        }

        pattern_indices.push(check_sum % 103);
        pattern_indices.push(CODE_STOP);

        let width: usize =
            pattern_indices.iter().map(|&i| CODE_PATTERNS[i].iter().sum::<usize>()).sum();
        let mut result = vec![false; width];
        let mut pos = 0;
        for &index in &pattern_indices {
            pos += append_pattern(&mut result, pos, CODE_PATTERNS[index], true);
        }
        Ok(result)
    }
}

#[cfg(test)]
mod code128_tests {
    use super::super::test_utils::modules;
    use super::{Code128Encoder, ESCAPE_FNC_1, ESCAPE_FNC_3};
    use crate::oned::OneDimensionalEncoder;
    use crate::types::EncodeHints;

    const QUIET: &str = "";
    const START_B: &str = "11010010000";
    const START_C: &str = "11010011100";
    const SWITCH_B: &str = "10111101110";
    const FNC_1: &str = "11110101110";
    const FNC_3: &str = "10111100010";
    const STOP: &str = "1100011101011";

    fn encode(contents: &str, hints: &EncodeHints) -> Vec<bool> {
        Code128Encoder.encode_contents(contents, hints).unwrap()
    }

    #[test]
    fn test_fnc3_prefix() {
        let contents = format!("{ESCAPE_FNC_3}123");
        let code = encode(&contents, &EncodeHints::default());
        // start B, FNC3, "1", "2", "3", checksum 55, stop
        let expected = format!(
            "{QUIET}{START_B}{FNC_3}10011100110 11001110010 11001011100 11101000110{STOP}"
        );
        assert_eq!(code, modules(&expected));
    }

    #[test]
    fn test_even_digit_run_uses_code_c() {
        let code = encode("1234", &EncodeHints::default());
        // start C, "12", "34", checksum, stop
        let twelve = "10110011100";
        let thirty_four = "10001011000";
        // checksum = (105 + 12*1 + 34*2) mod 103 = 82
        let check = "10010011110";
        let expected = format!("{START_C}{twelve}{thirty_four}{check}{STOP}");
        assert_eq!(code, modules(&expected));
    }

    #[test]
    fn test_odd_trailing_digit_defers_switch() {
        // Five digits: two pairs in C, the odd last digit drops back to B
        let code = encode("12345", &EncodeHints::default());
        let twelve = "10110011100";
        let thirty_four = "10001011000";
        let five_b = "11011100100";
        // checksum = (105 + 12*1 + 34*2 + 100*3 + 21*4) mod 103 = 54
        let check = "11101011000";
        let expected =
            format!("{START_C}{twelve}{thirty_four}{SWITCH_B}{five_b}{check}{STOP}");
        assert_eq!(code, modules(&expected));
    }

    #[test]
    fn test_gs1_prefix_injects_fnc1() {
        let hints = EncodeHints { gs1_format: true, ..Default::default() };
        let explicit = encode(&format!("{ESCAPE_FNC_1}10958"), &EncodeHints::default());
        let implied = encode("10958", &hints);
        assert_eq!(explicit, implied);
        assert_eq!(&super::super::test_utils::modules(START_C)[..], &implied[..11]);
        assert_eq!(&super::super::test_utils::modules(FNC_1)[..], &implied[11..22]);
    }

    #[test]
    fn test_force_codeset_b_stays_in_b() {
        let hints = EncodeHints { code128_force_codeset_b: true, ..Default::default() };
        let code = encode("1234", &hints);
        assert_eq!(&modules(START_B)[..], &code[..11]);
        // start, four digit symbols and the checksum, instead of packed pairs
        assert_eq!(code.len(), 11 * 6 + 13);
    }

    #[test]
    fn test_length_and_charset_bounds() {
        let hints = EncodeHints::default();
        assert!(Code128Encoder.encode_contents(&"5".repeat(81), &hints).is_err());
        assert!(Code128Encoder.encode_contents("héllo", &hints).is_err());
    }
}
