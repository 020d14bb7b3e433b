use matricode::qr::codec::Mode;
use matricode::{
    encode, encode_with_hints, BarcodeFormat, BitMatrix, ECLevel, EncodeError, EncodeHints,
    MaskPattern, QrBuilder, Version,
};

fn row_string(matrix: &BitMatrix) -> String {
    (0..matrix.width()).map(|x| if matrix.get(x, 0) { '1' } else { '0' }).collect()
}

fn encode_row(contents: &str, format: BarcodeFormat, width: usize) -> String {
    let matrix = encode(contents, format, width as i32, 0).unwrap();
    row_string(&matrix)
}

// Known symbol fixtures
//------------------------------------------------------------------------------

#[test]
fn test_ean13_known_symbol() {
    let expected = "00001010001011010011101100110010011011110100111010101011001101101100100001010111001001110100010010100000";
    assert_eq!(encode_row("5901234123457", BarcodeFormat::Ean13, expected.len()), expected);
    assert_eq!(encode_row("590123412345", BarcodeFormat::Ean13, expected.len()), expected);
}

#[test]
fn test_ean8_known_symbol() {
    let expected =
        "0000001010001011010111101111010110111010101001110111001010001001011100101000000";
    assert_eq!(encode_row("96385074", BarcodeFormat::Ean8, expected.len()), expected);
    assert_eq!(encode_row("9638507", BarcodeFormat::Ean8, expected.len()), expected);
}

#[test]
fn test_upce_known_symbols() {
    let expected =
        "0000000000010101110010100111000101101011110110111001011101010100000000000";
    assert_eq!(encode_row("05096893", BarcodeFormat::UpcE, expected.len()), expected);
    let expected =
        "0000000000010100100110111101010001101110010000101001000101010100000000000";
    assert_eq!(encode_row("12345670", BarcodeFormat::UpcE, expected.len()), expected);
}

#[test]
fn test_upca_is_ean13_with_leading_zero() {
    let upca = encode("72527273070", BarcodeFormat::UpcA, 0, 0).unwrap();
    let ean13 = encode("072527273070", BarcodeFormat::Ean13, 0, 0).unwrap();
    assert_eq!(upca, ean13);
}

#[test]
fn test_code128_fnc3_prefix() {
    let quiet = "00000";
    let start_b = "11010010000";
    let fnc_3 = "10111100010";
    let one = "10011100110";
    let two = "11001110010";
    let three = "11001011100";
    let check = "11101000110";
    let stop = "1100011101011";
    let expected = format!("{quiet}{start_b}{fnc_3}{one}{two}{three}{check}{stop}{quiet}");
    assert_eq!(encode_row("\u{00F3}123", BarcodeFormat::Code128, expected.len()), expected);
}

#[test]
fn test_code93_full_alphabet() {
    let contents = "ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
    let matrix = encode(contents, BarcodeFormat::Code93, 0, 0).unwrap();
    let row = row_string(&matrix);
    let raw = row.trim_matches('0');
    // 36 characters, two checksums and two asterisks, plus termination
    assert_eq!(matrix.width(), (contents.len() + 4) * 9 + 1 + 10);
    let body = &row[5..row.len() - 5];
    assert_eq!(&body[..9], "101011110");
    // checksum characters computed over the whole message: Z then 3
    let check_c = &body[9 + 36 * 9..9 + 37 * 9];
    let check_k = &body[9 + 37 * 9..9 + 38 * 9];
    assert_eq!(check_c, "100111010");
    assert_eq!(check_k, "101000010");
    assert!(raw.ends_with('1'));
}

#[test]
fn test_codabar_known_symbol() {
    let expected = String::from("00000")
        + "1001001011"
        + "0110101001"
        + "0101011001"
        + "0110101001"
        + "0101001101"
        + "0110010101"
        + "01101101011"
        + "01001001011"
        + "00000";
    assert_eq!(encode_row("B515-3/B", BarcodeFormat::Codabar, expected.len()), expected);
}

#[test]
fn test_codabar_guard_aliases() {
    let aliased = encode("T123T", BarcodeFormat::Codabar, 0, 0).unwrap();
    let canonical = encode("A123A", BarcodeFormat::Codabar, 0, 0).unwrap();
    assert_eq!(aliased, canonical);
}

// Facade behavior
//------------------------------------------------------------------------------

#[test]
fn test_negative_dimensions_fail() {
    let err = encode("123", BarcodeFormat::Ean13, -1, 0).unwrap_err();
    assert!(matches!(err, EncodeError::BadInput(_)));
    let err = encode("ABC", BarcodeFormat::QrCode, 10, -3).unwrap_err();
    assert!(matches!(err, EncodeError::BadInput(_)));
}

#[test]
fn test_empty_contents_fail() {
    assert!(encode("", BarcodeFormat::Code128, 0, 0).is_err());
    assert!(encode("", BarcodeFormat::QrCode, 0, 0).is_err());
}

#[test]
fn test_margin_hint_overrides_quiet_zone() {
    let hints = EncodeHints { margin: Some(0), ..Default::default() };
    let matrix = encode_with_hints("A123A", BarcodeFormat::Codabar, 0, 0, &hints).unwrap();
    let row = row_string(&matrix);
    assert!(row.starts_with('1') && row.ends_with('1'));
}

#[test]
fn test_rows_are_identical() {
    let matrix = encode("00123456", BarcodeFormat::Itf, 0, 30).unwrap();
    assert_eq!(matrix.height(), 30);
    let first = matrix.row(0);
    for y in 1..matrix.height() {
        assert_eq!(matrix.row(y), first);
    }
}

#[test]
fn test_text_round_trip() {
    let matrix = encode("96385074", BarcodeFormat::Ean8, 0, 2).unwrap();
    let text = matrix.to_text("1", "0");
    assert_eq!(BitMatrix::parse(&text, "1", "0").unwrap(), matrix);
}

// QR end-to-end
//------------------------------------------------------------------------------

fn to_gray_image(matrix: &BitMatrix) -> image::GrayImage {
    let mut canvas = image::GrayImage::new(matrix.width() as u32, matrix.height() as u32);
    for y in 0..matrix.height() {
        for x in 0..matrix.width() {
            let luma = if matrix.get(x, y) { 0 } else { 255 };
            canvas.put_pixel(x as u32, y as u32, image::Luma([luma]));
        }
    }
    canvas
}

fn decode_qr(matrix: &BitMatrix) -> String {
    let mut prepared = rqrr::PreparedImage::prepare(to_gray_image(matrix));
    let grids = prepared.detect_grids();
    assert_eq!(grids.len(), 1, "expected exactly one symbol");
    let (_, content) = grids[0].decode().unwrap();
    content
}

#[test]
fn test_qr_round_trip() {
    for contents in ["01234567", "HELLO WORLD", "Hello, world!", "https://example.com/?q=42"] {
        let matrix = encode(contents, BarcodeFormat::QrCode, 290, 290).unwrap();
        assert_eq!(decode_qr(&matrix), contents, "contents {contents:?}");
    }
}

#[test]
fn test_qr_round_trip_at_all_ec_levels() {
    for ec_level in [ECLevel::L, ECLevel::M, ECLevel::Q, ECLevel::H] {
        let hints = EncodeHints { error_correction: Some(ec_level), ..Default::default() };
        let matrix =
            encode_with_hints("LEVEL CHECK 123", BarcodeFormat::QrCode, 290, 290, &hints).unwrap();
        assert_eq!(decode_qr(&matrix), "LEVEL CHECK 123", "level {ec_level:?}");
    }
}

#[test]
fn test_qr_version_hint_sets_dimension() {
    let hints = EncodeHints { qr_version: Some(7), ..Default::default() };
    let matrix = encode_with_hints("VERSIONED", BarcodeFormat::QrCode, 0, 0, &hints).unwrap();
    // dimension 45 plus the four-module quiet zone on each side
    assert_eq!(matrix.width(), 45 + 8);
    assert_eq!(decode_qr(&encode_with_hints("VERSIONED", BarcodeFormat::QrCode, 290, 290, &hints).unwrap()), "VERSIONED");
}

#[test]
fn test_qr_utf8_payload_round_trips() {
    let hints = EncodeHints { disable_eci: true, ..Default::default() };
    let matrix =
        encode_with_hints("héllo → wörld", BarcodeFormat::QrCode, 290, 290, &hints).unwrap();
    assert_eq!(decode_qr(&matrix), "héllo → wörld");
}

#[test]
fn test_qr_eci_header_changes_the_symbol() {
    let with_eci = encode("héllo → wörld", BarcodeFormat::QrCode, 0, 0).unwrap();
    let hints = EncodeHints { disable_eci: true, ..Default::default() };
    let without_eci =
        encode_with_hints("héllo → wörld", BarcodeFormat::QrCode, 0, 0, &hints).unwrap();
    assert_ne!(with_eci, without_eci);
}

#[test]
fn test_qr_mask_selection_is_deterministic() {
    let first = encode("DETERMINISM", BarcodeFormat::QrCode, 0, 0).unwrap();
    for _ in 0..3 {
        assert_eq!(encode("DETERMINISM", BarcodeFormat::QrCode, 0, 0).unwrap(), first);
    }
}

// Capacity boundaries
//------------------------------------------------------------------------------

/// Most numeric characters a version and level can hold.
fn numeric_capacity(version: Version, ec_level: ECLevel) -> usize {
    let avail =
        version.num_data_codewords(ec_level) * 8 - 4 - version.char_count_bits(Mode::Numeric);
    let extra = match avail % 10 {
        7..=9 => 2,
        4..=6 => 1,
        _ => 0,
    };
    avail / 10 * 3 + extra
}

#[test]
fn test_numeric_capacity_boundaries_for_every_version_and_level() {
    for number in 1..=40 {
        let version = Version::new(number).unwrap();
        for ec_level in [ECLevel::L, ECLevel::M, ECLevel::Q, ECLevel::H] {
            let capacity = numeric_capacity(version, ec_level);
            let mut builder_input = "8".repeat(capacity);

            let mut builder = QrBuilder::new(&builder_input);
            builder.version(version).ec_level(ec_level).mask(MaskPattern::new(0));
            let qr = builder.build().unwrap_or_else(|e| {
                panic!("version {number} level {ec_level:?} rejected a full payload: {e}")
            });
            assert_eq!(qr.width(), version.width());

            builder_input.push('8');
            let mut builder = QrBuilder::new(&builder_input);
            builder.version(version).ec_level(ec_level).mask(MaskPattern::new(0));
            let err = builder.build().unwrap_err();
            assert!(
                matches!(err, EncodeError::Overflow(_)),
                "version {number} level {ec_level:?} accepted an oversized payload"
            );
        }
    }
}

#[test]
fn test_known_capacities() {
    // Version 1-L holds 41 digits, 40-L holds 7089: the classic corners
    assert_eq!(numeric_capacity(Version::new(1).unwrap(), ECLevel::L), 41);
    assert_eq!(numeric_capacity(Version::new(40).unwrap(), ECLevel::L), 7089);
    assert_eq!(numeric_capacity(Version::new(1).unwrap(), ECLevel::H), 17);
}

// Property tests
//------------------------------------------------------------------------------

mod properties {
    use proptest::prelude::*;

    use super::{decode_qr, encode, row_string, BarcodeFormat, EncodeError};

    proptest! {
        #[test]
        fn prop_numeric_symbologies_reject_non_digits(
            prefix in "[0-9]{0,6}",
            bad in "[a-zA-Z:+ ]",
            suffix in "[0-9]{0,5}",
        ) {
            let contents = format!("{prefix}{bad}{suffix}");
            for format in [
                BarcodeFormat::Ean8,
                BarcodeFormat::Ean13,
                BarcodeFormat::UpcA,
                BarcodeFormat::UpcE,
                BarcodeFormat::Itf,
                BarcodeFormat::Msi,
            ] {
                let err = encode(&contents, format, 0, 0).unwrap_err();
                prop_assert!(matches!(err, EncodeError::BadInput(_)), "format {format:?}");
            }
        }

        #[test]
        fn prop_ean13_self_checking_form_matches(payload in "[0-9]{12}") {
            let with_check = {
                let digits: Vec<u8> =
                    payload.bytes().map(|b| b - b'0').collect();
                let mut sum: usize = digits.iter().rev().step_by(2).map(|&d| d as usize).sum();
                sum *= 3;
                sum += digits.iter().rev().skip(1).step_by(2).map(|&d| d as usize).sum::<usize>();
                format!("{payload}{}", (1000 - sum) % 10)
            };
            let short = encode(&payload, BarcodeFormat::Ean13, 0, 0).unwrap();
            let full = encode(&with_check, BarcodeFormat::Ean13, 0, 0).unwrap();
            prop_assert_eq!(short, full);
        }

        #[test]
        fn prop_one_d_symbols_start_and_end_with_a_bar(payload in "[0-9]{4}") {
            for format in [
                BarcodeFormat::Code39,
                BarcodeFormat::Code93,
                BarcodeFormat::Code128,
                BarcodeFormat::Itf,
                BarcodeFormat::Msi,
                BarcodeFormat::Plessey,
            ] {
                let matrix = encode(&format!("{payload}{payload}"), format, 0, 0).unwrap();
                let row = row_string(&matrix);
                // Default margin splits five modules to each side; the
                // symbol itself is flush against them with a bar
                prop_assert_eq!(&row[..5], "00000", "format {:?}", format);
                prop_assert_eq!(&row[row.len() - 5..], "00000", "format {:?}", format);
                prop_assert_eq!(row.as_bytes()[5], b'1', "format {:?}", format);
                prop_assert_eq!(row.as_bytes()[row.len() - 6], b'1', "format {:?}", format);
            }
        }

        #[test]
        fn prop_qr_round_trips_printable_ascii(contents in "[ -~]{1,48}") {
            let matrix = encode(&contents, BarcodeFormat::QrCode, 330, 330).unwrap();
            prop_assert_eq!(decode_qr(&matrix), contents);
        }
    }
}
