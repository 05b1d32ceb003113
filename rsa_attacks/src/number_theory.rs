use num_bigint::{BigInt, BigUint};
use num_integer::Integer;
use num_traits::{One, Signed, ToPrimitive, Zero};

use crate::error::{Result, RsaError};
use crate::primality::{MillerRabinTest, PrimalityTest};
use crate::random::RandomSource;

/// Odd primes below 100, used to discard obvious composites cheaply.
const SMALL_PRIMES: [u32; 24] = [
    3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47, 53, 59, 61, 67, 71, 73, 79, 83, 89, 97,
];

/// Miller–Rabin rounds the prime sampler runs before handing a candidate out.
const SAMPLER_ROUNDS: u32 = 20;

/// Returns (g, x, y) such that ax + by = g = gcd(a, b)
pub fn extended_gcd(a: &BigInt, b: &BigInt) -> (BigInt, BigInt, BigInt) {
    let (mut old_r, mut r) = (a.clone(), b.clone());
    let (mut old_s, mut s) = (BigInt::one(), BigInt::zero());
    let (mut old_t, mut t) = (BigInt::zero(), BigInt::one());

    while !r.is_zero() {
        let q = &old_r / &r;

        let next_r = &old_r - &q * &r;
        old_r = std::mem::replace(&mut r, next_r);

        let next_s = &old_s - &q * &s;
        old_s = std::mem::replace(&mut s, next_s);

        let next_t = &old_t - &q * &t;
        old_t = std::mem::replace(&mut t, next_t);
    }

    (old_r, old_s, old_t)
}

/// `a^-1 mod modulus`, or `None` when `gcd(a, modulus) != 1`.
pub fn mod_inverse(a: &BigUint, modulus: &BigUint) -> Option<BigUint> {
    if modulus.is_zero() {
        return None;
    }
    let m = BigInt::from(modulus.clone());
    let (g, x, _) = extended_gcd(&BigInt::from(a.clone()), &m);
    if !g.is_one() {
        return None;
    }
    x.mod_floor(&m).to_biguint()
}

/// Jacobi symbol (a|n) for odd positive `n`. Any other `n` yields 0.
pub fn jacobi_symbol(a: &BigInt, n: &BigInt) -> i32 {
    if !n.is_positive() || n.is_even() {
        return 0;
    }

    let mut a = a.mod_floor(n).magnitude().clone();
    let mut n = n.magnitude().clone();
    let mut result = 1;

    while !a.is_zero() {
        while a.is_even() {
            a >>= 1;
            // (2|n) = -1 iff n ≡ 3, 5 (mod 8)
            let n_mod_8 = low_word(&n) & 7;
            if n_mod_8 == 3 || n_mod_8 == 5 {
                result = -result;
            }
        }

        std::mem::swap(&mut a, &mut n);
        if low_word(&a) & 3 == 3 && low_word(&n) & 3 == 3 {
            result = -result;
        }
        a %= &n;
    }

    if n.is_one() { result } else { 0 }
}

fn low_word(n: &BigUint) -> u32 {
    n.iter_u32_digits().next().unwrap_or(0)
}

/// Integer square root of `n` if `n` is a perfect square.
pub fn exact_sqrt(n: &BigUint) -> Option<BigUint> {
    let root = n.sqrt();
    (&root * &root == *n).then_some(root)
}

/// Smallest `a` with `a * a >= n`.
pub fn ceil_sqrt(n: &BigUint) -> BigUint {
    let root = n.sqrt();
    if &root * &root < *n {
        root + 1u32
    } else {
        root
    }
}

/// Samples a probable prime of exactly `bits` bits.
///
/// The two top bits are forced on, so the product of two such primes has
/// exactly `2 * bits` bits. Candidates are screened by trial division and then
/// by a fixed number of Miller–Rabin rounds. Callers that need a particular
/// confidence level should re-check the result with their own test.
pub fn random_prime(bits: u64, rng: &mut dyn RandomSource) -> Result<BigUint> {
    if bits < 2 {
        return Err(RsaError::InvalidConfig(format!(
            "cannot sample a {bits}-bit prime"
        )));
    }

    loop {
        let mut candidate = rng.random_bits(bits)?;
        candidate.set_bit(bits - 1, true);
        candidate.set_bit(bits - 2, true);
        candidate.set_bit(0, true);

        if let Some(small) = candidate.to_u32() {
            if SMALL_PRIMES.contains(&small) {
                return Ok(candidate);
            }
        }
        if SMALL_PRIMES.iter().any(|&p| (&candidate % p).is_zero()) {
            continue;
        }

        if MillerRabinTest.run_rounds(&candidate, SAMPLER_ROUNDS, rng)? {
            return Ok(candidate);
        }
    }
}
