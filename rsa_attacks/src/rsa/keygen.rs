use std::fmt;

use log::{debug, info};
use num_bigint::BigUint;
use num_integer::Integer;
use num_traits::One;

use crate::error::{Result, RsaError};
use crate::number_theory::{mod_inverse, random_prime};
use crate::primality::{PrimalityTest, PrimalityTestKind};
use crate::random::RandomSource;
use crate::rsa::keys::{PrivateKey, PublicKey};

/// Fixed public exponent used outside the small-private-exponent mode.
pub const PUBLIC_EXPONENT: u32 = 65537;

/// `q = p + 2^(bits/2 - CLOSE_FACTOR_SHIFT)` in close-factor mode.
const CLOSE_FACTOR_SHIFT: u64 = 10;
/// `|p - q| >= 2^(bits/2 - MIN_SEPARATION_SHIFT)` otherwise.
const MIN_SEPARATION_SHIFT: u64 = 100;
/// Draws of a small `d` per prime pair before the pair is discarded.
const SMALL_EXPONENT_DRAWS: u32 = 64;

/// Structural weakness deliberately planted into a generated key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Vulnerability {
    #[default]
    None,
    /// `p` and `q` differ by a small power of two (Fermat factorization).
    CloseFactors,
    /// `d < 2^(bits/16)` (Wiener's continued-fraction attack).
    SmallPrivateExponent,
}

/// Parameters of a key generation run, validated on construction.
#[derive(Debug, Clone)]
pub struct KeyGeneratorConfig {
    primality_test: PrimalityTestKind,
    min_probability: f64,
    bit_length: u64,
    vulnerability: Vulnerability,
}

impl KeyGeneratorConfig {
    pub fn new(
        primality_test: PrimalityTestKind,
        min_probability: f64,
        bit_length: u64,
        vulnerability: Vulnerability,
    ) -> Result<Self> {
        if !(min_probability > 0.0 && min_probability <= 1.0) {
            return Err(RsaError::InvalidConfig(format!(
                "minimum primality probability must lie in (0, 1], got {min_probability}"
            )));
        }
        if bit_length < 16 || bit_length % 2 != 0 {
            return Err(RsaError::InvalidConfig(format!(
                "bit length must be an even number >= 16, got {bit_length}"
            )));
        }
        match vulnerability {
            Vulnerability::CloseFactors if bit_length / 2 <= CLOSE_FACTOR_SHIFT => {
                return Err(RsaError::InvalidConfig(format!(
                    "close factors need bit length > {}, got {bit_length}",
                    2 * CLOSE_FACTOR_SHIFT + 1
                )));
            }
            Vulnerability::SmallPrivateExponent if bit_length / 16 < 2 => {
                return Err(RsaError::InvalidConfig(format!(
                    "small private exponent needs bit length >= 32, got {bit_length}"
                )));
            }
            // two 9-bit primes are the smallest whose product always exceeds 65537
            Vulnerability::None if bit_length < 18 => {
                return Err(RsaError::InvalidConfig(format!(
                    "modulus of {bit_length} bits cannot exceed the public exponent {PUBLIC_EXPONENT}"
                )));
            }
            _ => {}
        }

        Ok(Self {
            primality_test,
            min_probability,
            bit_length,
            vulnerability,
        })
    }

    pub fn primality_test(&self) -> PrimalityTestKind {
        self.primality_test
    }

    pub fn min_probability(&self) -> f64 {
        self.min_probability
    }

    pub fn bit_length(&self) -> u64 {
        self.bit_length
    }

    pub fn vulnerability(&self) -> Vulnerability {
        self.vulnerability
    }
}

/// A generated key pair together with the secrets it was derived from.
#[doc(hidden)]
#[derive(Debug, Clone)]
pub struct KeyMaterial {
    pub public_key: PublicKey,
    pub private_key: PrivateKey,
    pub p: BigUint,
    pub q: BigUint,
    pub phi: BigUint,
}

/// Why a candidate key was thrown away.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Rejection {
    CompanionNotPrime,
    PrimesTooClose,
    NoCoprimeSmallExponent,
    ExponentNotCoprime,
    InverseUndefined,
    PublicExponentOutOfRange,
    WeakPrivateExponent,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            Rejection::CompanionNotPrime => "p + gap is not prime",
            Rejection::PrimesTooClose => "p and q are too close",
            Rejection::NoCoprimeSmallExponent => "no small d coprime to phi",
            Rejection::ExponentNotCoprime => "e shares a factor with phi",
            Rejection::InverseUndefined => "exponent has no inverse mod phi",
            Rejection::PublicExponentOutOfRange => "e outside (1, phi)",
            Rejection::WeakPrivateExponent => "d is small enough for Wiener's attack",
        };
        f.write_str(reason)
    }
}

/// RSA key generation by rejection sampling.
pub struct KeyGenerator {
    config: KeyGeneratorConfig,
}

impl KeyGenerator {
    pub fn new(config: KeyGeneratorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &KeyGeneratorConfig {
        &self.config
    }

    /// Generates a key pair, retrying until every invariant holds.
    ///
    /// Only a random source failure ends the run early.
    pub fn generate_keys(&self, rng: &mut dyn RandomSource) -> Result<(PublicKey, PrivateKey)> {
        let material = self.generate_key_material(rng)?;
        Ok((material.public_key, material.private_key))
    }

    #[doc(hidden)]
    pub fn generate_key_material(&self, rng: &mut dyn RandomSource) -> Result<KeyMaterial> {
        let bit_length = self.config.bit_length;
        let mut attempt = 0u64;

        loop {
            attempt += 1;
            match self.try_candidate(rng)? {
                Ok(material) => {
                    info!(
                        "generated {}-bit key ({:?}, {:?}) after {} attempt(s)",
                        material.public_key.n.bits(),
                        self.config.primality_test,
                        self.config.vulnerability,
                        attempt
                    );
                    return Ok(material);
                }
                Err(rejection) => {
                    debug!("{bit_length}-bit key attempt {attempt} rejected: {rejection}");
                }
            }
        }
    }

    /// One pass of the generation algorithm: a fresh `p`, its companion `q`
    /// and the exponent pair.
    fn try_candidate(
        &self,
        rng: &mut dyn RandomSource,
    ) -> Result<std::result::Result<KeyMaterial, Rejection>> {
        let bit_length = self.config.bit_length;
        let half_bits = bit_length / 2;

        let p = self.generate_prime(half_bits, rng)?;
        let q = match self.config.vulnerability {
            Vulnerability::CloseFactors => {
                let q = &p + close_factor_gap(bit_length);
                if !self.is_prime(&q, rng)? {
                    return Ok(Err(Rejection::CompanionNotPrime));
                }
                q
            }
            Vulnerability::None | Vulnerability::SmallPrivateExponent => {
                let q = self.generate_prime(half_bits, rng)?;
                if !primes_far_enough(&p, &q, bit_length) {
                    return Ok(Err(Rejection::PrimesTooClose));
                }
                q
            }
        };

        let one = BigUint::one();
        let n = &p * &q;
        let phi = (&p - &one) * (&q - &one);

        let exponents = match self.config.vulnerability {
            Vulnerability::SmallPrivateExponent => {
                match self.sample_small_private_exponent(&phi, rng)? {
                    Some(d) => exponents_from_private(d, &phi),
                    None => Err(Rejection::NoCoprimeSmallExponent),
                }
            }
            Vulnerability::None | Vulnerability::CloseFactors => {
                standard_exponents(&phi, bit_length)
            }
        };

        Ok(exponents.map(|(e, d)| KeyMaterial {
            public_key: PublicKey::new(n.clone(), e),
            private_key: PrivateKey::new(n, d),
            p,
            q,
            phi,
        }))
    }

    /// Samples primes until one also passes the configured test.
    fn generate_prime(&self, bits: u64, rng: &mut dyn RandomSource) -> Result<BigUint> {
        loop {
            let candidate = random_prime(bits, rng)?;
            if self.is_prime(&candidate, rng)? {
                return Ok(candidate);
            }
            debug!("sampled prime rejected by {:?}", self.config.primality_test);
        }
    }

    fn is_prime(&self, n: &BigUint, rng: &mut dyn RandomSource) -> Result<bool> {
        self.config
            .primality_test
            .try_is_probably_prime(n, self.config.min_probability, rng)
    }

    /// Draws `d` in `[2, 2^(bits/16))` until it is coprime to `phi`.
    fn sample_small_private_exponent(
        &self,
        phi: &BigUint,
        rng: &mut dyn RandomSource,
    ) -> Result<Option<BigUint>> {
        let low = BigUint::from(2u8);
        let high = BigUint::one() << (self.config.bit_length / 16);

        for _ in 0..SMALL_EXPONENT_DRAWS {
            let d = rng.random_range(&low, &high)?;
            if d.gcd(phi).is_one() {
                return Ok(Some(d));
            }
        }
        Ok(None)
    }
}

pub(crate) fn close_factor_gap(bit_length: u64) -> BigUint {
    BigUint::one() << (bit_length / 2 - CLOSE_FACTOR_SHIFT)
}

/// `|p - q| >= 2^(bits/2 - 100)`; the exponent bottoms out at zero.
pub(crate) fn primes_far_enough(p: &BigUint, q: &BigUint, bit_length: u64) -> bool {
    let min_separation = BigUint::one() << (bit_length / 2).saturating_sub(MIN_SEPARATION_SHIFT);
    let separation = if p > q { p - q } else { q - p };
    separation >= min_separation
}

/// Wiener guard: `d >= 2^(bits/4)`.
pub(crate) fn private_exponent_large_enough(d: &BigUint, bit_length: u64) -> bool {
    *d >= BigUint::one() << (bit_length / 4)
}

/// `e = 65537`, `d = e^-1 mod phi`, rejecting keys with a small `d`.
pub(crate) fn standard_exponents(
    phi: &BigUint,
    bit_length: u64,
) -> std::result::Result<(BigUint, BigUint), Rejection> {
    let e = BigUint::from(PUBLIC_EXPONENT);
    if !e.gcd(phi).is_one() {
        return Err(Rejection::ExponentNotCoprime);
    }
    let d = mod_inverse(&e, phi).ok_or(Rejection::InverseUndefined)?;
    if !private_exponent_large_enough(&d, bit_length) {
        return Err(Rejection::WeakPrivateExponent);
    }
    Ok((e, d))
}

/// `e = d^-1 mod phi` for a chosen small `d`; `e` must lie in `(1, phi)`.
pub(crate) fn exponents_from_private(
    d: BigUint,
    phi: &BigUint,
) -> std::result::Result<(BigUint, BigUint), Rejection> {
    let e = mod_inverse(&d, phi).ok_or(Rejection::InverseUndefined)?;
    if e <= BigUint::one() || e >= *phi {
        return Err(Rejection::PublicExponentOutOfRange);
    }
    Ok((e, d))
}
