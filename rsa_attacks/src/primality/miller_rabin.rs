use num_bigint::BigUint;
use num_integer::Integer;
use num_traits::One;

use crate::error::Result;
use crate::primality::PrimalityTest;
use crate::random::RandomSource;

/// Miller–Rabin test over `n - 1 = 2^s * d`, `d` odd.
pub struct MillerRabinTest;

impl PrimalityTest for MillerRabinTest {
    fn run_iteration(&self, n: &BigUint, rng: &mut dyn RandomSource) -> Result<bool> {
        let one = BigUint::one();
        let two = BigUint::from(2u8);
        if *n < BigUint::from(4u8) {
            return Ok(*n > one);
        }
        if n.is_even() {
            return Ok(false);
        }

        let n_minus_one = n - &one;
        let s = n_minus_one.trailing_zeros().unwrap_or(0);
        let d = &n_minus_one >> s;

        // a ∈ [2, n-2]
        let a = rng.random_range(&two, &n_minus_one)?;
        let mut x = a.modpow(&d, n);
        if x == one || x == n_minus_one {
            return Ok(true);
        }

        for _ in 1..s {
            x = x.modpow(&two, n);
            if x == n_minus_one {
                return Ok(true);
            }
            if x == one {
                // nontrivial square root of 1: a is a witness
                return Ok(false);
            }
        }

        Ok(false)
    }
}
