use std::sync::{Mutex, OnceLock};

use super::galois::{GaloisField, Poly};
use crate::common::error::{EncodeError, EncodeResult};

// Reed-Solomon encoder
//------------------------------------------------------------------------------

/// Systematic Reed-Solomon encoder over a Galois field. Generator
/// polynomials are memoized per degree; the cache only ever grows.
#[derive(Debug)]
pub struct ReedSolomonEncoder<'f> {
    field: &'f GaloisField,
    cached_generators: Mutex<Vec<Poly<'f>>>,
}

impl<'f> ReedSolomonEncoder<'f> {
    pub fn new(field: &'f GaloisField) -> Self {
        let cached_generators = Mutex::new(vec![Poly::new(field, vec![1])]);
        Self { field, cached_generators }
    }

    /// Generator polynomial of the given degree: the product of
    /// `(x - α^(b+i))` for `i = 0..degree`.
    fn generator(&self, degree: usize) -> Poly<'f> {
        let mut cache = self.cached_generators.lock().expect("generator cache poisoned");
        while cache.len() <= degree {
            let last = cache.last().expect("cache always holds degree 0");
            let d = cache.len();
            let root = self.field.exp(d - 1 + self.field.generator_base());
            let next = last.multiply(&Poly::new(self.field, vec![1, root]));
            cache.push(next);
        }
        cache[degree].clone()
    }

    /// Fills the trailing `ec_symbols` positions of `codewords` with parity
    /// symbols computed over the leading data positions.
    pub fn encode(&self, codewords: &mut [usize], ec_symbols: usize) -> EncodeResult<()> {
        if ec_symbols == 0 {
            return Err(EncodeError::BadInput("no error correction symbols requested".into()));
        }
        if ec_symbols >= self.field.size() {
            return Err(EncodeError::BadInput(format!(
                "error correction symbol count {ec_symbols} exceeds the field size"
            )));
        }
        if codewords.len() <= ec_symbols {
            return Err(EncodeError::BadInput("no data symbols provided".into()));
        }

        let data_len = codewords.len() - ec_symbols;
        let generator = self.generator(ec_symbols);
        let info = Poly::new(self.field, codewords[..data_len].to_vec());
        let info = info.multiply_by_monomial(ec_symbols, 1);
        let (_, remainder) = info.divide(&generator)?;

        let coefficients = remainder.coefficients();
        let zero_pad = ec_symbols - coefficients.len();
        codewords[data_len..data_len + zero_pad].fill(0);
        codewords[data_len + zero_pad..].copy_from_slice(coefficients);
        Ok(())
    }
}

/// Computes QR error correction codewords for one block over GF(256).
pub fn ecc(data: &[u8], ec_len: usize) -> EncodeResult<Vec<u8>> {
    static ENCODER: OnceLock<ReedSolomonEncoder<'static>> = OnceLock::new();
    let encoder = ENCODER.get_or_init(|| ReedSolomonEncoder::new(GaloisField::qr_code_field()));

    let mut codewords = vec![0usize; data.len() + ec_len];
    for (c, &d) in codewords.iter_mut().zip(data.iter()) {
        *c = d as usize;
    }
    encoder.encode(&mut codewords, ec_len)?;
    Ok(codewords[data.len()..].iter().map(|&c| c as u8).collect())
}

#[cfg(test)]
mod reed_solomon_tests {
    use super::{ecc, GaloisField, ReedSolomonEncoder};

    #[test]
    fn test_generator_cache_reuse() {
        let rs = ReedSolomonEncoder::new(GaloisField::qr_code_field());
        let g5 = rs.generator(5);
        assert_eq!(g5.degree(), 5);
        assert_eq!(g5.coefficient(5), 1);
        // A second request hits the cache and must agree
        assert_eq!(rs.generator(5), g5);
        assert_eq!(rs.generator(2).degree(), 2);
    }

    #[test]
    fn test_known_generator_polynomial() {
        // Degree 2: (x - 1)(x - α) = x^2 + 3x + 2 over the QR field
        let rs = ReedSolomonEncoder::new(GaloisField::qr_code_field());
        assert_eq!(rs.generator(2).coefficients(), &[1, 3, 2]);
    }

    #[test]
    fn test_encode_rejects_bad_arguments() {
        let rs = ReedSolomonEncoder::new(GaloisField::qr_code_field());
        let mut codewords: [usize; 4] = [1, 2, 3, 0];
        assert!(rs.encode(&mut codewords, 0).is_err());
        assert!(rs.encode(&mut codewords, 4).is_err());
        assert!(rs.encode(&mut codewords, 300).is_err());
    }

    #[test]
    fn test_ecc_simple() {
        let msg = b" [\x0bx\xd1r\xdcMC@\xec\x11\xec\x11\xec\x11";
        let expected = b"\xc4\x23\x27\x77\xeb\xd7\xe7\xe2\x5d\x17";
        assert_eq!(ecc(msg, 10).unwrap(), expected);
    }

    #[test]
    fn test_ecc_complex() {
        let msg = b"CUF\x86W&U\xc2w2\x06\x12\x06g&";
        let expected = b"\xd5\xc7\x0b\x2d\x73\xf7\xf1\xdf\xe5\xf8\x9a\x75\x9a\x6f\x56\xa1\x6f\x27";
        assert_eq!(ecc(msg, 18).unwrap(), expected);
    }
}
