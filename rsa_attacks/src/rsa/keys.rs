use num_bigint::BigUint;
use num_traits::Zero;

use crate::error::{Result, RsaError};

/// Public half of an RSA key pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicKey {
    pub n: BigUint,
    pub e: BigUint,
}

/// Private half of an RSA key pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrivateKey {
    pub n: BigUint,
    pub d: BigUint,
}

impl PublicKey {
    pub fn new(n: BigUint, e: BigUint) -> Self {
        Self { n, e }
    }

    /// Textbook RSA: `message^e mod n`, no padding.
    pub fn encrypt(&self, message: &BigUint) -> Result<BigUint> {
        if *message >= self.n {
            return Err(RsaError::MessageOutOfRange);
        }
        Ok(message.modpow(&self.e, &self.n))
    }
}

impl PrivateKey {
    pub fn new(n: BigUint, d: BigUint) -> Self {
        Self { n, d }
    }

    pub fn decrypt(&self, ciphertext: &BigUint) -> Result<BigUint> {
        // nothing fits below a zero modulus
        if self.n.is_zero() {
            return Err(RsaError::MessageOutOfRange);
        }
        Ok(ciphertext.modpow(&self.d, &self.n))
    }
}
