use log::{info, warn};
use num_bigint::BigUint;
use num_traits::{One, Zero};

use crate::error::{Result, RsaError};
use crate::number_theory::{ceil_sqrt, exact_sqrt, mod_inverse};
use crate::rsa::keys::PublicKey;

/// Steps past `N` the default search may take.
const DEFAULT_EXTRA_STEPS: u32 = 1000;

/// Fermat attack result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FermatAttackResult {
    pub p: BigUint,
    pub q: BigUint,
    pub phi: BigUint,
    pub d: BigUint,
}

/// Fermat factorization of a modulus whose prime factors are close together.
///
/// Searches for `a` such that `a^2 - N` is a perfect square `b^2`, giving
/// `N = (a - b)(a + b)`. The search starts at `ceil(sqrt(N))` and gives up
/// after a bounded number of increments.
#[derive(Debug, Clone, Default)]
pub struct FermatAttack {
    search_limit: Option<BigUint>,
}

impl FermatAttack {
    /// Attack with the default bound of `N + 1000` increments.
    pub fn new() -> Self {
        Self::default()
    }

    /// Attack that tries at most `limit + 1` values of `a`.
    pub fn with_search_limit(limit: BigUint) -> Self {
        Self {
            search_limit: Some(limit),
        }
    }

    /// Recovers `(p, q, phi, d)` from the public key alone.
    pub fn attack(&self, public_key: &PublicKey) -> Result<FermatAttackResult> {
        let n = &public_key.n;
        if n.is_zero() {
            return Err(RsaError::AttackExhausted { attack: "Fermat" });
        }

        let limit = match &self.search_limit {
            Some(limit) => limit.clone(),
            None => n + DEFAULT_EXTRA_STEPS,
        };

        let start = ceil_sqrt(n);
        let last = &start + &limit;
        let mut a = start.clone();
        let one = BigUint::one();

        while a <= last {
            let b_squared = &a * &a - n;
            if let Some(b) = exact_sqrt(&b_squared) {
                let p = &a - &b;
                let q = &a + &b;
                let phi = (&p - &one) * (&q - &one);
                let d = mod_inverse(&public_key.e, &phi).ok_or(RsaError::InverseUndefined)?;

                info!(
                    "Fermat attack factored N after {} step(s)",
                    &a - &start + &one
                );
                return Ok(FermatAttackResult { p, q, phi, d });
            }
            a += &one;
        }

        warn!("Fermat attack found no factorization of a {}-bit modulus", n.bits());
        Err(RsaError::AttackExhausted { attack: "Fermat" })
    }
}
