//! A deterministic keyring implementing [`CryptoProvider`].
//!
//! All key material of every principal is derived from one 32-byte master
//! secret, indexed by `(principal, count)`:
//!
//! - symmetric keys, nonces: BLAKE3 `derive_key`
//! - hash: BLAKE3, HMAC: BLAKE3 keyed hash under the symmetric key
//! - symmetric encryption: ChaCha20-Poly1305
//! - asymmetric encryption: X25519 agreement with an ephemeral key, then ChaCha20-Poly1305
//! - signatures: Ed25519

use bytes::Bytes;
use chacha20poly1305::{
    aead::{Aead, KeyInit},
    ChaCha20Poly1305, Key, Nonce,
};
use ed25519_dalek::{Signature, Signer, SigningKey, Verifier};
use rand::RngCore;
use std::fmt;
use x25519_dalek::{PublicKey, StaticSecret};

use itemwire_core::{CryptoProvider, ItemError, KeyKind, KeyRef, IV_SIZE};

use crate::error::{CryptoError, Result};

/// Width of an X25519 public key.
pub const EXCHANGE_KEY_SIZE: usize = 32;

/// Width of an Ed25519 signature.
pub const SIGNATURE_SIZE: usize = 64;

mod context {
    pub const SYMMETRIC: &str = "itemwire-v0 symmetric key";
    pub const NONCE: &str = "itemwire-v0 nonce";
    pub const SIGNING: &str = "itemwire-v0 signing key";
    pub const EXCHANGE: &str = "itemwire-v0 exchange key";
    pub const SEAL: &str = "itemwire-v0 sealed box";
}

/// Key material for a set of principals.
#[derive(Clone)]
pub struct Keyring {
    master: [u8; 32],
}

impl Keyring {
    /// Generate a keyring with a random master secret.
    pub fn generate() -> Self {
        let mut master = [0u8; 32];
        rand::thread_rng().fill_bytes(&mut master);
        Self { master }
    }

    /// Create from a 32-byte master secret.
    pub const fn from_seed(master: [u8; 32]) -> Self {
        Self { master }
    }

    fn derive(&self, context: &str, key: KeyRef) -> [u8; 32] {
        let mut hasher = blake3::Hasher::new_derive_key(context);
        hasher.update(&self.master);
        hasher.update(&key.principal.0.to_be_bytes());
        hasher.update(&key.count.to_be_bytes());
        *hasher.finalize().as_bytes()
    }

    /// The symmetric key of `key`.
    pub fn symmetric_key(&self, key: KeyRef) -> [u8; 32] {
        self.derive(context::SYMMETRIC, key)
    }

    fn signing_key(&self, key: KeyRef) -> SigningKey {
        SigningKey::from_bytes(&self.derive(context::SIGNING, key))
    }

    fn exchange_secret(&self, key: KeyRef) -> StaticSecret {
        StaticSecret::from(self.derive(context::EXCHANGE, key))
    }

    /// Public key material: Ed25519 verifying key followed by X25519 public key.
    pub fn public_key(&self, key: KeyRef) -> [u8; 64] {
        let mut out = [0u8; 64];
        out[..32].copy_from_slice(self.signing_key(key).verifying_key().as_bytes());
        out[32..].copy_from_slice(PublicKey::from(&self.exchange_secret(key)).as_bytes());
        out
    }

    /// Private key material: Ed25519 seed followed by X25519 secret.
    pub fn private_key(&self, key: KeyRef) -> [u8; 64] {
        let mut out = [0u8; 64];
        out[..32].copy_from_slice(&self.signing_key(key).to_bytes());
        out[32..].copy_from_slice(&self.exchange_secret(key).to_bytes());
        out
    }

    fn seal_cipher(
        shared: &[u8; 32],
        ephemeral: &PublicKey,
        recipient: &PublicKey,
    ) -> ChaCha20Poly1305 {
        let mut hasher = blake3::Hasher::new_derive_key(context::SEAL);
        hasher.update(shared);
        hasher.update(ephemeral.as_bytes());
        hasher.update(recipient.as_bytes());
        let key = hasher.finalize();
        ChaCha20Poly1305::new(Key::from_slice(key.as_bytes()))
    }

    fn seal(&self, key: KeyRef, ephemeral: [u8; 32], plaintext: &[u8]) -> Result<Vec<u8>> {
        let ephemeral = StaticSecret::from(ephemeral);
        let ephemeral_public = PublicKey::from(&ephemeral);
        let recipient = PublicKey::from(&self.exchange_secret(key));
        let shared = ephemeral.diffie_hellman(&recipient);

        // One AEAD key per ephemeral secret; the nonce stays fixed.
        let cipher = Self::seal_cipher(shared.as_bytes(), &ephemeral_public, &recipient);
        let ciphertext = cipher
            .encrypt(Nonce::from_slice(&[0u8; 12]), plaintext)
            .map_err(|e| CryptoError::EncryptionError(e.to_string()))?;

        let mut out = Vec::with_capacity(EXCHANGE_KEY_SIZE + ciphertext.len());
        out.extend_from_slice(ephemeral_public.as_bytes());
        out.extend_from_slice(&ciphertext);
        Ok(out)
    }

    fn unseal(&self, key: KeyRef, sealed: &[u8]) -> Result<Vec<u8>> {
        if sealed.len() < EXCHANGE_KEY_SIZE {
            return Err(CryptoError::MalformedCryptogram(format!(
                "sealed box of {} bytes",
                sealed.len()
            )));
        }
        let (ephemeral, ciphertext) = sealed.split_at(EXCHANGE_KEY_SIZE);
        let mut ephemeral_bytes = [0u8; EXCHANGE_KEY_SIZE];
        ephemeral_bytes.copy_from_slice(ephemeral);
        let ephemeral_public = PublicKey::from(ephemeral_bytes);

        let secret = self.exchange_secret(key);
        let recipient = PublicKey::from(&secret);
        let shared = secret.diffie_hellman(&ephemeral_public);

        let cipher = Self::seal_cipher(shared.as_bytes(), &ephemeral_public, &recipient);
        cipher
            .decrypt(Nonce::from_slice(&[0u8; 12]), ciphertext)
            .map_err(|e| CryptoError::DecryptionError(e.to_string()))
    }

    fn symmetric_cipher(&self, key: KeyRef) -> Result<ChaCha20Poly1305> {
        ChaCha20Poly1305::new_from_slice(&self.symmetric_key(key))
            .map_err(|e| CryptoError::EncryptionError(e.to_string()))
    }

    /// A short public fingerprint of the master secret.
    pub fn fingerprint(&self) -> String {
        hex::encode(&blake3::hash(&self.master).as_bytes()[..8])
    }
}

impl fmt::Debug for Keyring {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Keyring({})", self.fingerprint())
    }
}

impl CryptoProvider for Keyring {
    fn nonce(&self, key: KeyRef) -> itemwire_core::Result<Bytes> {
        Ok(Bytes::copy_from_slice(&self.derive(context::NONCE, key)))
    }

    fn key(&self, kind: KeyKind, key: KeyRef) -> itemwire_core::Result<Bytes> {
        let material = match kind {
            KeyKind::Symmetric => self.symmetric_key(key).to_vec(),
            KeyKind::Public => self.public_key(key).to_vec(),
            KeyKind::Private => self.private_key(key).to_vec(),
        };
        Ok(Bytes::from(material))
    }

    fn hash(&self, data: &[u8]) -> itemwire_core::Result<Bytes> {
        Ok(Bytes::copy_from_slice(blake3::hash(data).as_bytes()))
    }

    fn hmac(&self, key: KeyRef, data: &[u8]) -> itemwire_core::Result<Bytes> {
        let mac = blake3::keyed_hash(&self.symmetric_key(key), data);
        Ok(Bytes::copy_from_slice(mac.as_bytes()))
    }

    fn symmetric_encrypt(
        &self,
        key: KeyRef,
        iv: &[u8; IV_SIZE],
        plaintext: &[u8],
    ) -> itemwire_core::Result<Bytes> {
        let ciphertext = self
            .symmetric_cipher(key)?
            .encrypt(Nonce::from_slice(iv), plaintext)
            .map_err(|e| CryptoError::EncryptionError(e.to_string()))?;
        Ok(Bytes::from(ciphertext))
    }

    fn symmetric_decrypt(
        &self,
        key: KeyRef,
        iv: &[u8; IV_SIZE],
        ciphertext: &[u8],
    ) -> itemwire_core::Result<Vec<u8>> {
        let plaintext = self
            .symmetric_cipher(key)?
            .decrypt(Nonce::from_slice(iv), ciphertext)
            .map_err(|e| CryptoError::DecryptionError(e.to_string()))?;
        Ok(plaintext)
    }

    fn asymmetric_encrypt(
        &self,
        key: KeyRef,
        ephemeral: [u8; 32],
        plaintext: &[u8],
    ) -> itemwire_core::Result<Bytes> {
        Ok(Bytes::from(self.seal(key, ephemeral, plaintext)?))
    }

    fn asymmetric_decrypt(&self, key: KeyRef, ciphertext: &[u8]) -> itemwire_core::Result<Vec<u8>> {
        Ok(self.unseal(key, ciphertext)?)
    }

    fn sign(&self, key: KeyRef, message: &[u8]) -> itemwire_core::Result<Bytes> {
        let signature = self.signing_key(key).sign(message);
        Ok(Bytes::copy_from_slice(&signature.to_bytes()))
    }

    fn verify(&self, key: KeyRef, message: &[u8], signature: &[u8]) -> itemwire_core::Result<()> {
        let bytes: [u8; SIGNATURE_SIZE] = signature.try_into().map_err(|_| {
            ItemError::from(CryptoError::MalformedCryptogram(format!(
                "signature of {} bytes",
                signature.len()
            )))
        })?;
        self.signing_key(key)
            .verifying_key()
            .verify(message, &Signature::from_bytes(&bytes))
            .map_err(|_| ItemError::from(CryptoError::InvalidSignature))
    }
}
