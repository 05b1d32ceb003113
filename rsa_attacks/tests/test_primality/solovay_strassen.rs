use num_bigint::BigUint;
use num_traits::FromPrimitive;
use quickcheck::quickcheck;
use rand::SeedableRng;
use rand::rngs::{OsRng, StdRng};
use rsa_attacks::primality::{PrimalityTest, SolovayStrassenTest};

#[test]
fn test_solovay_strassen_on_primes() {
    let mut rng = StdRng::seed_from_u64(5);
    let primes = [2u32, 3, 5, 7, 13, 23, 29];

    for &p in &primes {
        let n = BigUint::from_u32(p).unwrap();
        assert!(SolovayStrassenTest.is_probably_prime(&n, 0.99, &mut rng), "SS failed on prime {}", p);
    }
}

#[test]
fn test_solovay_strassen_on_composites() {
    let mut rng = StdRng::seed_from_u64(6);
    let composites = [4u32, 9, 15, 21, 27, 33];

    for &n in &composites {
        let n = BigUint::from_u32(n).unwrap();
        assert!(!SolovayStrassenTest.is_probably_prime(&n, 0.99, &mut rng), "SS failed on composite {}", n);
    }
}

#[test]
fn test_solovay_strassen_small_n() {
    let mut rng = StdRng::seed_from_u64(0);
    for v in [0u32, 1] {
        let n = BigUint::from_u32(v).unwrap();
        assert!(!SolovayStrassenTest.is_probably_prime(&n, 0.99, &mut rng), "SS incorrectly passed n = {}", v);
    }
}

#[test]
fn test_solovay_strassen_rejects_carmichael() {
    let mut rng = StdRng::seed_from_u64(1105);
    let carmichaels = [561u32, 1105, 1729, 2465, 2821];

    for &n in &carmichaels {
        let n = BigUint::from_u32(n).unwrap();
        assert!(!SolovayStrassenTest.is_probably_prime(&n, 0.999, &mut rng), "SS accepted Carmichael number {}", n);
    }
}

quickcheck! {
    fn prop_solovay_rejects_odd_composites(a: u8, b: u8) -> bool {
        if a < 3 || b < 3 { return true; }
        let n = (a as u32) * (b as u32);
        if n % 2 == 0 { return true; }
        let n = BigUint::from(n);
        !SolovayStrassenTest.is_probably_prime(&n, 0.999_999, &mut OsRng)
    }
}
