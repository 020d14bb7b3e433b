pub mod bits;
pub mod ec;
pub mod error;

pub use bits::{BitArray, BitMatrix};
pub use error::{EncodeError, EncodeResult};
