use num_bigint::BigUint;

use crate::error::{KeyKind, Result, RsaError};
use crate::random::RandomSource;
use crate::rsa::keygen::{KeyGenerator, KeyGeneratorConfig};
use crate::rsa::keys::{PrivateKey, PublicKey};

/// Holds the key pair produced by its generator and encrypts/decrypts with it.
pub struct RsaService {
    generator: KeyGenerator,
    public_key: Option<PublicKey>,
    private_key: Option<PrivateKey>,
}

impl RsaService {
    pub fn new(config: KeyGeneratorConfig) -> Self {
        Self {
            generator: KeyGenerator::new(config),
            public_key: None,
            private_key: None,
        }
    }

    /// Runs the generator and installs the new pair. On error the previous
    /// pair, if any, is left untouched.
    pub fn generate_keys(&mut self, rng: &mut dyn RandomSource) -> Result<()> {
        let (public_key, private_key) = self.generator.generate_keys(rng)?;
        self.public_key = Some(public_key);
        self.private_key = Some(private_key);
        Ok(())
    }

    pub fn encrypt(&self, message: &BigUint) -> Result<BigUint> {
        self.public_key
            .as_ref()
            .ok_or(RsaError::UninitializedKey(KeyKind::Public))?
            .encrypt(message)
    }

    pub fn decrypt(&self, ciphertext: &BigUint) -> Result<BigUint> {
        self.private_key
            .as_ref()
            .ok_or(RsaError::UninitializedKey(KeyKind::Private))?
            .decrypt(ciphertext)
    }

    pub fn public_key(&self) -> Option<&PublicKey> {
        self.public_key.as_ref()
    }

    pub fn private_key(&self) -> Option<&PrivateKey> {
        self.private_key.as_ref()
    }

    pub fn config(&self) -> &KeyGeneratorConfig {
        self.generator.config()
    }
}
