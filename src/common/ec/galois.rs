use std::sync::OnceLock;

use crate::common::error::{EncodeError, EncodeResult};

// Galois field
//------------------------------------------------------------------------------

/// GF(2^k) described by a primitive polynomial, the field size 2^k and the
/// generator base of its Reed-Solomon code. Log and antilog tables are built
/// once at construction.
#[derive(Debug)]
pub struct GaloisField {
    size: usize,
    generator_base: usize,
    exp: Vec<usize>,
    log: Vec<usize>,
}

impl GaloisField {
    pub fn new(primitive: usize, size: usize, generator_base: usize) -> Self {
        debug_assert!(size.is_power_of_two() && size > 2, "Field size must be a power of two");
        debug_assert!(primitive & size != 0, "Primitive polynomial must have degree k");

        let mut exp = vec![0; size];
        let mut log = vec![0; size];
        let mut x = 1;
        for e in exp.iter_mut() {
            *e = x;
            x <<= 1;
            // Reduce by the primitive polynomial whenever bit k gets set
            if x >= size {
                x = (x ^ primitive) & (size - 1);
            }
        }
        for (i, &e) in exp.iter().take(size - 1).enumerate() {
            log[e] = i;
        }
        Self { size, generator_base, exp, log }
    }

    /// The GF(256) instance QR codes use: primitive polynomial
    /// x^8 + x^4 + x^3 + x^2 + 1, generator base 0.
    pub fn qr_code_field() -> &'static GaloisField {
        static FIELD: OnceLock<GaloisField> = OnceLock::new();
        FIELD.get_or_init(|| GaloisField::new(0x011D, 256, 0))
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn generator_base(&self) -> usize {
        self.generator_base
    }

    /// Addition and subtraction coincide in characteristic 2.
    pub fn add(&self, a: usize, b: usize) -> usize {
        a ^ b
    }

    pub fn exp(&self, power: usize) -> usize {
        self.exp[power % (self.size - 1)]
    }

    pub fn log(&self, a: usize) -> EncodeResult<usize> {
        if a == 0 {
            return Err(EncodeError::InternalInvariant("log of zero is undefined"));
        }
        Ok(self.log[a])
    }

    pub fn multiply(&self, a: usize, b: usize) -> usize {
        if a == 0 || b == 0 {
            return 0;
        }
        self.exp[(self.log[a] + self.log[b]) % (self.size - 1)]
    }

    pub fn inverse(&self, a: usize) -> EncodeResult<usize> {
        if a == 0 {
            return Err(EncodeError::InternalInvariant("zero has no multiplicative inverse"));
        }
        Ok(self.exp[self.size - 1 - self.log[a]])
    }

    /// The polynomial `coefficient * x^degree`.
    pub fn build_monomial(&self, degree: usize, coefficient: usize) -> Poly<'_> {
        if coefficient == 0 {
            return Poly::zero(self);
        }
        let mut coefficients = vec![0; degree + 1];
        coefficients[0] = coefficient;
        Poly::new(self, coefficients)
    }
}


// Polynomial over a Galois field
//------------------------------------------------------------------------------

/// Immutable polynomial with coefficients in a [`GaloisField`], stored
/// highest degree first. Leading zeros are trimmed on construction; the zero
/// polynomial keeps a single zero coefficient.
#[derive(Debug, Clone)]
pub struct Poly<'f> {
    field: &'f GaloisField,
    coefficients: Vec<usize>,
}

impl PartialEq for Poly<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.field, other.field) && self.coefficients == other.coefficients
    }
}

impl Eq for Poly<'_> {}

impl<'f> Poly<'f> {
    pub fn new(field: &'f GaloisField, coefficients: Vec<usize>) -> Self {
        debug_assert!(!coefficients.is_empty(), "Coefficients cannot be empty");

        let leading_zeros = coefficients.iter().take_while(|&&c| c == 0).count();
        if leading_zeros == coefficients.len() {
            return Self::zero(field);
        }
        Self { field, coefficients: coefficients[leading_zeros..].to_vec() }
    }

    pub fn zero(field: &'f GaloisField) -> Self {
        Self { field, coefficients: vec![0] }
    }

    pub fn is_zero(&self) -> bool {
        self.coefficients[0] == 0
    }

    pub fn degree(&self) -> usize {
        self.coefficients.len() - 1
    }

    pub fn coefficients(&self) -> &[usize] {
        &self.coefficients
    }

    /// Coefficient of the `x^degree` term.
    pub fn coefficient(&self, degree: usize) -> usize {
        self.coefficients[self.coefficients.len() - 1 - degree]
    }

    pub fn add(&self, other: &Poly<'f>) -> Poly<'f> {
        if self.is_zero() {
            return other.clone();
        }
        if other.is_zero() {
            return self.clone();
        }

        let (smaller, larger) = if self.coefficients.len() <= other.coefficients.len() {
            (&self.coefficients, &other.coefficients)
        } else {
            (&other.coefficients, &self.coefficients)
        };
        let offset = larger.len() - smaller.len();
        let mut sum = larger.clone();
        for (s, l) in sum[offset..].iter_mut().zip(smaller.iter()) {
            *s = self.field.add(*s, *l);
        }
        Poly::new(self.field, sum)
    }

    pub fn multiply(&self, other: &Poly<'f>) -> Poly<'f> {
        if self.is_zero() || other.is_zero() {
            return Poly::zero(self.field);
        }
        let mut product = vec![0; self.coefficients.len() + other.coefficients.len() - 1];
        for (i, &a) in self.coefficients.iter().enumerate() {
            for (j, &b) in other.coefficients.iter().enumerate() {
                product[i + j] = self.field.add(product[i + j], self.field.multiply(a, b));
            }
        }
        Poly::new(self.field, product)
    }

    pub fn multiply_scalar(&self, scalar: usize) -> Poly<'f> {
        if scalar == 0 {
            return Poly::zero(self.field);
        }
        if scalar == 1 {
            return self.clone();
        }
        let product = self.coefficients.iter().map(|&c| self.field.multiply(c, scalar)).collect();
        Poly::new(self.field, product)
    }

    pub fn multiply_by_monomial(&self, degree: usize, coefficient: usize) -> Poly<'f> {
        if coefficient == 0 {
            return Poly::zero(self.field);
        }
        let mut product = vec![0; self.coefficients.len() + degree];
        for (p, &c) in product.iter_mut().zip(self.coefficients.iter()) {
            *p = self.field.multiply(c, coefficient);
        }
        Poly::new(self.field, product)
    }

    /// Polynomial long division, returning `(quotient, remainder)`.
    pub fn divide(&self, divisor: &Poly<'f>) -> EncodeResult<(Poly<'f>, Poly<'f>)> {
        if divisor.is_zero() {
            return Err(EncodeError::InternalInvariant("divide by zero polynomial"));
        }

        let inverse_leading = self.field.inverse(divisor.coefficient(divisor.degree()))?;
        let mut quotient = Poly::zero(self.field);
        let mut remainder = self.clone();
        while !remainder.is_zero() && remainder.degree() >= divisor.degree() {
            let degree_diff = remainder.degree() - divisor.degree();
            let scale =
                self.field.multiply(remainder.coefficient(remainder.degree()), inverse_leading);
            let term = divisor.multiply_by_monomial(degree_diff, scale);
            quotient = quotient.add(&self.field.build_monomial(degree_diff, scale));
            remainder = remainder.add(&term);
        }
        Ok((quotient, remainder))
    }
}
