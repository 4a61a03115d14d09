//! Interface to the cryptographic primitives.
//!
//! The encoder never computes a cryptogram itself. Hashes, HMACs, key
//! material and nonces are requested from a [`CryptoProvider`] and copied
//! into the encoding verbatim.

use bytes::Bytes;

use crate::error::Result;
use crate::item::KeyRef;

/// Width of the IV that prefixes symmetric ciphertext.
pub const IV_SIZE: usize = 12;

/// Which half of a principal's key material is meant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyKind {
    Symmetric,
    Public,
    Private,
}

/// Opaque cryptographic operations.
pub trait CryptoProvider {
    /// The nonce cryptogram of `key`.
    fn nonce(&self, key: KeyRef) -> Result<Bytes>;

    /// Serialized key material.
    fn key(&self, kind: KeyKind, key: KeyRef) -> Result<Bytes>;

    /// Hash of `data`.
    fn hash(&self, data: &[u8]) -> Result<Bytes>;

    /// HMAC of `data` under the symmetric key of `key`.
    fn hmac(&self, key: KeyRef, data: &[u8]) -> Result<Bytes>;

    /// Encrypt under the symmetric key of `key`. Returns the ciphertext only.
    fn symmetric_encrypt(&self, key: KeyRef, iv: &[u8; IV_SIZE], plaintext: &[u8])
        -> Result<Bytes>;

    fn symmetric_decrypt(
        &self,
        key: KeyRef,
        iv: &[u8; IV_SIZE],
        ciphertext: &[u8],
    ) -> Result<Vec<u8>>;

    /// Encrypt to the public key of `key`. `ephemeral` seeds the one-time
    /// randomness of the scheme.
    fn asymmetric_encrypt(&self, key: KeyRef, ephemeral: [u8; 32], plaintext: &[u8])
        -> Result<Bytes>;

    /// Decrypt with the private key of `key`.
    fn asymmetric_decrypt(&self, key: KeyRef, ciphertext: &[u8]) -> Result<Vec<u8>>;

    /// Sign with the private key of `key`.
    fn sign(&self, key: KeyRef, message: &[u8]) -> Result<Bytes>;

    /// Verify against the public key of `key`.
    fn verify(&self, key: KeyRef, message: &[u8], signature: &[u8]) -> Result<()>;
}

impl<P: CryptoProvider + ?Sized> CryptoProvider for &P {
    fn nonce(&self, key: KeyRef) -> Result<Bytes> {
        (**self).nonce(key)
    }

    fn key(&self, kind: KeyKind, key: KeyRef) -> Result<Bytes> {
        (**self).key(kind, key)
    }

    fn hash(&self, data: &[u8]) -> Result<Bytes> {
        (**self).hash(data)
    }

    fn hmac(&self, key: KeyRef, data: &[u8]) -> Result<Bytes> {
        (**self).hmac(key, data)
    }

    fn symmetric_encrypt(
        &self,
        key: KeyRef,
        iv: &[u8; IV_SIZE],
        plaintext: &[u8],
    ) -> Result<Bytes> {
        (**self).symmetric_encrypt(key, iv, plaintext)
    }

    fn symmetric_decrypt(
        &self,
        key: KeyRef,
        iv: &[u8; IV_SIZE],
        ciphertext: &[u8],
    ) -> Result<Vec<u8>> {
        (**self).symmetric_decrypt(key, iv, ciphertext)
    }

    fn asymmetric_encrypt(
        &self,
        key: KeyRef,
        ephemeral: [u8; 32],
        plaintext: &[u8],
    ) -> Result<Bytes> {
        (**self).asymmetric_encrypt(key, ephemeral, plaintext)
    }

    fn asymmetric_decrypt(&self, key: KeyRef, ciphertext: &[u8]) -> Result<Vec<u8>> {
        (**self).asymmetric_decrypt(key, ciphertext)
    }

    fn sign(&self, key: KeyRef, message: &[u8]) -> Result<Bytes> {
        (**self).sign(key, message)
    }

    fn verify(&self, key: KeyRef, message: &[u8], signature: &[u8]) -> Result<()> {
        (**self).verify(key, message, signature)
    }
}
