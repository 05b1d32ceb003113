use num_bigint::BigUint;
use num_traits::{One, Zero};
use rand::{CryptoRng, RngCore};

use crate::error::Result;

/// Source of uniformly distributed big integers.
///
/// Every component that needs randomness takes one of these explicitly, so
/// tests can substitute a seeded or failing generator. It is implemented for
/// every cryptographically secure `rand` generator (`OsRng`, `StdRng`, ...).
pub trait RandomSource {
    /// Uniform integer in `[0, bound)`. A zero bound yields zero.
    fn random_below(&mut self, bound: &BigUint) -> Result<BigUint>;

    /// Uniform integer in `[low, high)`. Degenerate ranges collapse to `low`.
    fn random_range(&mut self, low: &BigUint, high: &BigUint) -> Result<BigUint> {
        if high <= low {
            return Ok(low.clone());
        }
        Ok(low + self.random_below(&(high - low))?)
    }

    /// Uniform integer with at most `bits` bits.
    fn random_bits(&mut self, bits: u64) -> Result<BigUint> {
        self.random_below(&(BigUint::one() << bits))
    }
}

impl<R: RngCore + CryptoRng> RandomSource for R {
    fn random_below(&mut self, bound: &BigUint) -> Result<BigUint> {
        if bound.is_zero() {
            return Ok(BigUint::zero());
        }

        let bits = bound.bits();
        let len = bits.div_ceil(8) as usize;
        let excess = (len as u64 * 8 - bits) as u32;
        let mut bytes = vec![0u8; len];

        // rejection sampling keeps the distribution uniform
        loop {
            self.try_fill_bytes(&mut bytes)?;
            bytes[0] &= 0xFF >> excess;
            let candidate = BigUint::from_bytes_be(&bytes);
            if &candidate < bound {
                return Ok(candidate);
            }
        }
    }
}
