pub mod keygen;
pub mod keys;
pub mod service;

pub use keygen::{KeyGenerator, KeyGeneratorConfig, KeyMaterial, PUBLIC_EXPONENT, Vulnerability};
pub use keys::{PrivateKey, PublicKey};
pub use service::RsaService;
