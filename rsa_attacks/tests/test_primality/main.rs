mod fermat;
mod solovay_strassen;

use num_bigint::BigUint;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rsa_attacks::RsaError;
use rsa_attacks::primality::{PrimalityTest, PrimalityTestKind, calculate_iterations};

pub(crate) mod support {
    use rand::{CryptoRng, RngCore};

    /// Generator whose every fallible draw fails.
    pub struct FailingRng;

    impl RngCore for FailingRng {
        fn next_u32(&mut self) -> u32 {
            0
        }

        fn next_u64(&mut self) -> u64 {
            0
        }

        fn fill_bytes(&mut self, dest: &mut [u8]) {
            dest.fill(0);
        }

        fn try_fill_bytes(&mut self, _dest: &mut [u8]) -> Result<(), rand::Error> {
            Err(rand::Error::new("entropy source unavailable"))
        }
    }

    impl CryptoRng for FailingRng {}
}

const ALL_TESTS: [PrimalityTestKind; 3] = [
    PrimalityTestKind::Fermat,
    PrimalityTestKind::SolovayStrassen,
    PrimalityTestKind::MillerRabin,
];

#[test]
fn test_iteration_count_policy() {
    assert_eq!(calculate_iterations(0.5), 1);
    assert_eq!(
        calculate_iterations(0.99),
        ((0.01f64).ln() / (0.5f64).ln()).ceil() as u32
    );
}

#[test]
fn test_all_tests_agree_on_97() {
    let mut rng = StdRng::seed_from_u64(97);
    let n = BigUint::from(97u32);
    for test in ALL_TESTS {
        for _ in 0..50 {
            assert!(test.is_probably_prime(&n, 0.99, &mut rng), "{test:?} rejected 97");
        }
    }
}

#[test]
fn test_solovay_strassen_and_miller_rabin_reject_91() {
    let mut rng = StdRng::seed_from_u64(91);
    let n = BigUint::from(91u32);
    for test in [PrimalityTestKind::SolovayStrassen, PrimalityTestKind::MillerRabin] {
        for _ in 0..50 {
            assert!(!test.is_probably_prime(&n, 0.99, &mut rng), "{test:?} accepted 91");
        }
    }
}

#[test]
fn test_random_source_failure_is_a_rejection() {
    let n = BigUint::from(97u32);
    for test in ALL_TESTS {
        assert!(!test.is_probably_prime(&n, 0.99, &mut support::FailingRng));
        let err = test
            .try_is_probably_prime(&n, 0.99, &mut support::FailingRng)
            .unwrap_err();
        assert!(matches!(err, RsaError::RandomSourceFailure(_)));
    }
}

#[test]
fn test_all_tests_on_large_prime() {
    let mut rng = StdRng::seed_from_u64(0x32416190071);
    let prime = BigUint::parse_bytes(b"32416190071", 10).unwrap();
    let composite = &prime * 7u32;
    for test in ALL_TESTS {
        assert!(test.is_probably_prime(&prime, 0.99, &mut rng), "{test:?} failed on large prime");
        assert!(
            !test.is_probably_prime(&composite, 0.99, &mut rng),
            "{test:?} failed on large composite"
        );
    }
}
