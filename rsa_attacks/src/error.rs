use std::fmt;

use thiserror::Error;

/// Which half of a key pair an operation needed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyKind {
    Public,
    Private,
}

impl fmt::Display for KeyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyKind::Public => f.write_str("public"),
            KeyKind::Private => f.write_str("private"),
        }
    }
}

#[derive(Debug, Error)]
pub enum RsaError {
    #[error("secure random source failed: {0}")]
    RandomSourceFailure(#[from] rand::Error),

    #[error("{0} key is not initialized")]
    UninitializedKey(KeyKind),

    #[error("message must be smaller than the modulus N")]
    MessageOutOfRange,

    #[error("modular inverse does not exist")]
    InverseUndefined,

    #[error("{attack} attack exhausted its search space")]
    AttackExhausted { attack: &'static str },

    #[error("invalid key generator configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, RsaError>;
