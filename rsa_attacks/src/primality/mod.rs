pub(crate) mod fermat;
pub(crate) mod miller_rabin;
pub(crate) mod solovay_strassen;
pub use fermat::FermatTest;
pub use miller_rabin::MillerRabinTest;
pub use solovay_strassen::SolovayStrassenTest;

use num_bigint::BigUint;

use crate::error::Result;
use crate::random::RandomSource;

/// Upper bound on rounds; `calculate_iterations(1.0)` would otherwise be infinite.
pub const MAX_ITERATIONS: u32 = 128;

/// Selects which probabilistic test a key generator runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimalityTestKind {
    Fermat,
    SolovayStrassen,
    MillerRabin,
}

/// Interface for a probabilistic primality test.
///
/// Implementors provide a single randomized round; the iteration policy shared
/// by all tests lives in the provided methods.
pub trait PrimalityTest {
    /// One randomized round. `Ok(false)` means `n` is certainly composite.
    fn run_iteration(&self, n: &BigUint, rng: &mut dyn RandomSource) -> Result<bool>;

    /// Runs `rounds` independent rounds, stopping at the first failure.
    fn run_rounds(&self, n: &BigUint, rounds: u32, rng: &mut dyn RandomSource) -> Result<bool> {
        for _ in 0..rounds {
            if !self.run_iteration(n, rng)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Like [`is_probably_prime`](Self::is_probably_prime), but reports random source failures.
    fn try_is_probably_prime(
        &self,
        n: &BigUint,
        min_probability: f64,
        rng: &mut dyn RandomSource,
    ) -> Result<bool> {
        self.run_rounds(n, calculate_iterations(min_probability), rng)
    }

    /// Returns true if `n` passed enough rounds to be prime with at least
    /// `min_probability`. A failing random source counts as a rejection.
    fn is_probably_prime(&self, n: &BigUint, min_probability: f64, rng: &mut dyn RandomSource) -> bool {
        match self.try_is_probably_prime(n, min_probability, rng) {
            Ok(verdict) => verdict,
            Err(err) => {
                log::warn!("primality test aborted: {err}");
                false
            }
        }
    }
}

impl PrimalityTest for PrimalityTestKind {
    fn run_iteration(&self, n: &BigUint, rng: &mut dyn RandomSource) -> Result<bool> {
        match self {
            PrimalityTestKind::Fermat => FermatTest.run_iteration(n, rng),
            PrimalityTestKind::SolovayStrassen => SolovayStrassenTest.run_iteration(n, rng),
            PrimalityTestKind::MillerRabin => MillerRabinTest.run_iteration(n, rng),
        }
    }
}

/// Number of rounds needed so that a composite survives with probability at
/// most `1 - min_probability`, assuming each round halves that chance.
pub fn calculate_iterations(min_probability: f64) -> u32 {
    if min_probability <= 0.5 {
        return 1;
    }
    let rounds = ((1.0 - min_probability).ln() / 0.5f64.ln()).ceil();
    if rounds.is_finite() {
        (rounds as u32).clamp(1, MAX_ITERATIONS)
    } else {
        MAX_ITERATIONS
    }
}
