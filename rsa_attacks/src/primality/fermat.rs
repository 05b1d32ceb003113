use num_bigint::BigUint;
use num_traits::One;

use crate::error::Result;
use crate::primality::PrimalityTest;
use crate::random::RandomSource;

/// Fermat test: a random base `a` must satisfy `a^(n-1) ≡ 1 (mod n)`.
pub struct FermatTest;

impl PrimalityTest for FermatTest {
    fn run_iteration(&self, n: &BigUint, rng: &mut dyn RandomSource) -> Result<bool> {
        let one = BigUint::one();
        if *n <= one {
            return Ok(false);
        }

        // a ∈ [1, n-1]
        let a = rng.random_range(&one, n)?;
        Ok(a.modpow(&(n - &one), n).is_one())
    }
}
