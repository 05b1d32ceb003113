use num_bigint::BigUint;
use num_integer::Integer;
use num_traits::Zero;
use quickcheck::{TestResult, quickcheck};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rsa_attacks::RsaError;
use rsa_attacks::attacks::{Convergent, WienerAttack, continued_fraction, convergents};
use rsa_attacks::primality::PrimalityTestKind;
use rsa_attacks::rsa::{KeyGenerator, KeyGeneratorConfig, Vulnerability};

use crate::public_key;

fn convergent(k: u64, d: u64) -> Convergent {
    Convergent {
        k: BigUint::from(k),
        d: BigUint::from(d),
    }
}

#[test]
fn test_continued_fraction_expansion() {
    let quotients = continued_fraction(&BigUint::from(17u32), &BigUint::from(60u32));
    let expected: Vec<BigUint> = [0u32, 3, 1, 1, 8].into_iter().map(BigUint::from).collect();
    assert_eq!(quotients, expected);

    assert!(continued_fraction(&BigUint::from(5u32), &BigUint::zero()).is_empty());
}

#[test]
fn test_convergents_of_small_fraction() {
    let quotients = continued_fraction(&BigUint::from(17u32), &BigUint::from(60u32));
    assert_eq!(
        convergents(&quotients),
        vec![
            convergent(0, 1),
            convergent(1, 3),
            convergent(1, 4),
            convergent(2, 7),
            convergent(17, 60),
        ]
    );
}

#[test]
fn test_wiener_recovers_small_exponent() {
    // N = 277 * 331, d = 17
    let key = public_key(91_687, 16_073);
    let result = WienerAttack::attack(&key).unwrap();

    assert_eq!(result.d, BigUint::from(17u32));
    assert_eq!(result.phi, BigUint::from(91_080u32));
    assert!(result.convergents.contains(&convergent(3, 17)));

    let m = BigUint::from(4_242u32);
    let c = key.encrypt(&m).unwrap();
    assert_eq!(c.modpow(&result.d, &key.n), m);
}

#[test]
fn test_wiener_fails_on_standard_key() {
    let key = public_key(10_007 * 10_009, 65_537);
    let failure = WienerAttack::attack(&key).unwrap_err();

    assert!(matches!(
        failure.source,
        RsaError::AttackExhausted { attack: "Wiener" }
    ));
    let expected = convergents(&continued_fraction(&key.e, &key.n));
    assert!(!failure.convergents.is_empty());
    assert_eq!(failure.convergents, expected);
}

#[test]
fn test_wiener_zero_exponent() {
    let key = public_key(91_687, 0);
    let failure = WienerAttack::attack(&key).unwrap_err();
    assert!(matches!(failure.source, RsaError::AttackExhausted { .. }));
}

#[test]
fn test_wiener_breaks_generated_keys() {
    let config = KeyGeneratorConfig::new(
        PrimalityTestKind::MillerRabin,
        0.99,
        256,
        Vulnerability::SmallPrivateExponent,
    )
    .unwrap();
    let generator = KeyGenerator::new(config);
    let mut rng = StdRng::seed_from_u64(31);

    for _ in 0..3 {
        let material = generator.generate_key_material(&mut rng).unwrap();
        let result = WienerAttack::attack(&material.public_key).unwrap();

        assert_eq!(result.d, material.private_key.d);
        assert_eq!(result.phi, material.phi);
        assert!(result.convergents.iter().any(|c| c.d == material.private_key.d));
    }
}

quickcheck! {
    fn prop_last_convergent_is_reduced_fraction(e: u64, n: u64) -> TestResult {
        if n == 0 {
            return TestResult::discard();
        }
        let (e, n) = (BigUint::from(e), BigUint::from(n));
        let g = e.gcd(&n);

        let all = convergents(&continued_fraction(&e, &n));
        let Some(last) = all.last() else {
            return TestResult::failed();
        };
        TestResult::from_bool(last.k == &e / &g && last.d == &n / &g)
    }
}
