//! # itemwire crypto
//!
//! Concrete primitives behind the [`CryptoProvider`] seam, and helpers that
//! build cryptogram items and open received ones.
//!
//! ## Primitives
//!
//! - **Hash / HMAC / key material**: BLAKE3 (`derive_key`, `keyed_hash`)
//! - **Symmetric encryption**: ChaCha20-Poly1305 with a 12-byte IV
//! - **Asymmetric encryption**: X25519 sealed box over ChaCha20-Poly1305
//! - **Signatures**: Ed25519
//!
//! All key material is derived deterministically from a [`Keyring`]'s master
//! seed and a [`KeyRef`](itemwire_core::KeyRef), so two keyrings built from
//! the same seed produce identical encodings.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use itemwire_core::{encode, CodecConfig, Item, KeyRef, Tag};
//! use itemwire_crypto::{open_symmetric, seal_symmetric, Keyring};
//!
//! let keyring = Keyring::generate();
//! let key = KeyRef::new(1, 0);
//! let sealed = seal_symmetric(&keyring, key, Item::data("hi"), [0u8; 12]).unwrap();
//! let wire = encode(&sealed, &keyring).unwrap();
//! let plaintext = open_symmetric(&keyring, key, &wire, Tag::Data, &CodecConfig::default()).unwrap();
//! ```
//!
//! [`CryptoProvider`]: itemwire_core::CryptoProvider

pub mod error;
pub mod keyring;
pub mod seal;

pub use error::{CryptoError, Result};
pub use keyring::{Keyring, EXCHANGE_KEY_SIZE, SIGNATURE_SIZE};
pub use seal::{
    open_asymmetric, open_symmetric, seal_asymmetric, seal_symmetric, sign, verify_signature,
};
