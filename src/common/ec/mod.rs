mod encoder;
mod galois;

pub use encoder::{ecc, ReedSolomonEncoder};
pub use galois::{GaloisField, Poly};
