use num_bigint::BigUint;
use num_traits::FromPrimitive;
use quickcheck::quickcheck;
use rand::SeedableRng;
use rand::rngs::{OsRng, StdRng};
use rsa_attacks::primality::{FermatTest, PrimalityTest};

#[test]
fn test_fermat_on_small_primes() {
    let mut rng = StdRng::seed_from_u64(3);
    let primes = [2u32, 3, 5, 7, 11, 17, 19];

    for &p in &primes {
        let n = BigUint::from_u32(p).unwrap();
        assert!(FermatTest.is_probably_prime(&n, 0.99, &mut rng), "Fermat failed on prime {}", p);
    }
}

#[test]
fn test_fermat_on_composites() {
    let mut rng = StdRng::seed_from_u64(4);
    let composites = [4u32, 6, 8, 9, 15, 21, 25];

    for &n in &composites {
        let n = BigUint::from_u32(n).unwrap();
        assert!(!FermatTest.is_probably_prime(&n, 0.99, &mut rng), "Fermat failed on composite {}", n);
    }
}

#[test]
fn test_fermat_rejects_91_repeatedly() {
    // 40% of the bases are Fermat liars for 91, so ask for more rounds
    let mut rng = StdRng::seed_from_u64(91);
    let n = BigUint::from(91u32);
    for _ in 0..50 {
        assert!(!FermatTest.is_probably_prime(&n, 0.999_999, &mut rng));
    }
}

#[test]
fn test_fermat_is_fooled_by_carmichael_numbers() {
    let mut rng = StdRng::seed_from_u64(561);
    let carmichaels = [561u32, 1105, 1729, 2465, 2821, 6601];

    let fooled = (0..30).any(|_| {
        carmichaels
            .iter()
            .any(|&n| FermatTest.is_probably_prime(&BigUint::from(n), 0.99, &mut rng))
    });

    assert!(fooled, "Fermat test never accepted a Carmichael number");
}

#[test]
fn test_fermat_on_small_n() {
    let mut rng = StdRng::seed_from_u64(0);
    for v in [0u32, 1] {
        let n = BigUint::from_u32(v).unwrap();
        assert!(!FermatTest.is_probably_prime(&n, 0.99, &mut rng), "Fermat incorrectly passed n = {}", v);
    }
}

quickcheck! {
    fn prop_fermat_detects_even_composites(n: u8) -> bool {
        if n < 4 || n % 2 == 1 { return true; }
        let n = BigUint::from(n);
        !FermatTest.is_probably_prime(&n, 0.999_999, &mut OsRng)
    }
}
