//! Error types for the crypto provider.

use itemwire_core::ItemError;
use thiserror::Error;

/// Errors that can occur in cryptographic operations.
#[derive(Debug, Error)]
pub enum CryptoError {
    /// Encryption error.
    #[error("encryption error: {0}")]
    EncryptionError(String),

    /// Decryption error.
    #[error("decryption error: {0}")]
    DecryptionError(String),

    /// Signature did not verify.
    #[error("invalid signature")]
    InvalidSignature,

    /// Cryptogram bytes of the wrong shape.
    #[error("malformed cryptogram: {0}")]
    MalformedCryptogram(String),

    /// The item was not of the kind the operation expects.
    #[error("expected {expected} item, found {found}")]
    WrongKind {
        expected: itemwire_core::Tag,
        found: itemwire_core::Tag,
    },

    /// Item encoding or framing error.
    #[error("item error: {0}")]
    Item(#[from] ItemError),
}

impl From<CryptoError> for ItemError {
    fn from(e: CryptoError) -> Self {
        match e {
            CryptoError::Item(inner) => inner,
            other => ItemError::Provider(other.to_string()),
        }
    }
}

/// Result type for crypto operations.
pub type Result<T> = std::result::Result<T, CryptoError>;
