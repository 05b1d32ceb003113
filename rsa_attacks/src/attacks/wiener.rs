use std::mem;

use log::{debug, info, warn};
use num_bigint::{BigInt, BigUint};
use num_traits::{One, Signed, Zero};
use thiserror::Error;

use crate::error::RsaError;
use crate::number_theory::exact_sqrt;
use crate::rsa::keys::PublicKey;

/// One convergent `k/d` of the continued fraction of `e/N`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Convergent {
    pub k: BigUint,
    pub d: BigUint,
}

#[derive(Debug, Clone)]
pub struct WienerAttackResult {
    pub d: BigUint,
    pub phi: BigUint,
    /// Every convergent of `e/N`, in generation order.
    pub convergents: Vec<Convergent>,
}

/// A failed attack still reports the convergents it examined.
#[derive(Debug, Error)]
#[error("{source}")]
pub struct WienerAttackFailure {
    pub convergents: Vec<Convergent>,
    #[source]
    pub source: RsaError,
}

/// Partial quotients of `numerator / denominator` (Euclidean algorithm).
pub fn continued_fraction(numerator: &BigUint, denominator: &BigUint) -> Vec<BigUint> {
    let mut quotients = Vec::new();
    let mut a = numerator.clone();
    let mut b = denominator.clone();

    while !b.is_zero() {
        let q = &a / &b;
        let r = &a % &b;
        quotients.push(q);
        a = mem::replace(&mut b, r);
    }
    quotients
}

/// Convergents of a continued fraction via
/// `k_i = q_i k_{i-1} + k_{i-2}`, `d_i = q_i d_{i-1} + d_{i-2}`.
pub fn convergents(quotients: &[BigUint]) -> Vec<Convergent> {
    let (mut prev_k, mut k) = (BigUint::zero(), BigUint::one());
    let (mut prev_d, mut d) = (BigUint::one(), BigUint::zero());

    quotients
        .iter()
        .map(|q| {
            let next_k = q * &k + &prev_k;
            let next_d = q * &d + &prev_d;
            prev_k = mem::replace(&mut k, next_k);
            prev_d = mem::replace(&mut d, next_d);
            Convergent {
                k: k.clone(),
                d: d.clone(),
            }
        })
        .collect()
}

/// Wiener's attack on RSA keys with a small private exponent.
pub struct WienerAttack;

impl WienerAttack {
    pub fn attack(public_key: &PublicKey) -> Result<WienerAttackResult, WienerAttackFailure> {
        let PublicKey { n, e } = public_key;
        let convergents = convergents(&continued_fraction(e, n));

        let found = convergents
            .iter()
            .filter(|c| !c.k.is_zero() && !c.d.is_zero())
            .find_map(|c| check_convergent(e, n, c).map(|phi| (c.d.clone(), phi)));

        match found {
            Some((d, phi)) => {
                info!(
                    "Wiener attack recovered a {}-bit private exponent",
                    d.bits()
                );
                Ok(WienerAttackResult {
                    d,
                    phi,
                    convergents,
                })
            }
            None => {
                warn!(
                    "Wiener attack exhausted {} convergents without a valid factorization",
                    convergents.len()
                );
                Err(WienerAttackFailure {
                    convergents,
                    source: RsaError::AttackExhausted { attack: "Wiener" },
                })
            }
        }
    }
}

/// Tests whether convergent `k/d` fits `e*d = 1 + k*phi` for the real totient.
///
/// Returns the candidate `phi` if `x^2 - (N - phi + 1)x + N` has two integer
/// roots whose product is exactly `N`.
fn check_convergent(e: &BigUint, n: &BigUint, convergent: &Convergent) -> Option<BigUint> {
    let Convergent { k, d } = convergent;

    let ed = e * d;
    if ed.is_zero() {
        return None;
    }
    let ed_minus_one = ed - 1u32;
    if !(&ed_minus_one % k).is_zero() {
        return None;
    }
    let phi = ed_minus_one / k;

    let n_signed = BigInt::from(n.clone());
    let s = &n_signed - BigInt::from(phi.clone()) + BigInt::one();
    let discriminant = &s * &s - BigInt::from(4u8) * &n_signed;
    if discriminant.is_negative() {
        return None;
    }

    let root = BigInt::from(exact_sqrt(discriminant.magnitude())?);
    let two = BigInt::from(2u8);
    let x1 = (&s + &root) / &two;
    let x2 = (&s - &root) / &two;
    if &x1 * &x2 != n_signed {
        debug!("convergent {k}/{d}: roots do not multiply to N");
        return None;
    }

    Some(phi)
}
