//! RSA key generation with selectable probabilistic primality tests,
//! optional weak-key modes and the two classic attacks that exploit them.

pub mod attacks;
pub mod error;
pub mod number_theory;
pub mod primality;
pub mod random;
pub mod rsa;

pub use error::{KeyKind, Result, RsaError};
pub use random::RandomSource;
