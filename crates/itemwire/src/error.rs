//! Error types for the codec facade.

use itemwire_core::ItemError;
use itemwire_crypto::CryptoError;
use thiserror::Error;

/// Errors returned by [`ItemCodec`](crate::ItemCodec) entry points that
/// handle received data.
#[derive(Debug, Error)]
pub enum CodecError {
    /// Encoding, framing or equality error.
    #[error("item error: {0}")]
    Item(#[from] ItemError),

    /// Cryptographic failure while sealing or opening.
    #[error("crypto error: {0}")]
    Crypto(#[from] CryptoError),
}

impl CodecError {
    /// Whether this error only reports that two items differ.
    pub fn is_inequality(&self) -> bool {
        match self {
            CodecError::Item(err) => err.is_inequality(),
            CodecError::Crypto(CryptoError::Item(err)) => err.is_inequality(),
            CodecError::Crypto(_) => false,
        }
    }
}

/// Result type for codec operations.
pub type Result<T> = std::result::Result<T, CodecError>;
