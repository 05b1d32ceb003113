use num_bigint::{BigInt, BigUint};
use num_integer::Integer;
use num_traits::One;

use crate::error::Result;
use crate::number_theory::jacobi_symbol;
use crate::primality::PrimalityTest;
use crate::random::RandomSource;

/// Solovay–Strassen test: Euler's criterion `a^((n-1)/2) ≡ (a|n) (mod n)`.
pub struct SolovayStrassenTest;

impl PrimalityTest for SolovayStrassenTest {
    fn run_iteration(&self, n: &BigUint, rng: &mut dyn RandomSource) -> Result<bool> {
        let one = BigUint::one();
        if *n < BigUint::from(4u8) {
            return Ok(*n > one);
        }
        if n.is_even() {
            return Ok(false);
        }

        let a = rng.random_range(&one, n)?;
        let symbol = jacobi_symbol(&BigInt::from(a.clone()), &BigInt::from(n.clone()));
        if symbol == 0 {
            return Ok(false);
        }

        let n_minus_one = n - &one;
        let euler = a.modpow(&(&n_minus_one >> 1), n);
        // -1 is represented by n-1 modulo n
        let expected = if symbol == 1 { one } else { n_minus_one };

        Ok(euler == expected)
    }
}
