//! # itemwire
//!
//! Canonical encoding of tagged cryptographic items, with structural
//! equality decided directly on the encoded bytes.
//!
//! ## Overview
//!
//! Protocol messages are built from items: data, pairs, nonces, keys,
//! hashes, HMACs, ciphertexts and signatures. Each item has exactly one
//! encoding, so two items are equal exactly when a tag-aware walk over
//! their encodings finds no difference. Cryptograms are never decoded
//! for comparison.
//!
//! ## Error policy
//!
//! - **Local** bytes (produced by this process): any framing error is a
//!   broken invariant. `*_local` entry points log and panic.
//! - **Received** bytes (from a peer, or decrypted from a peer's
//!   ciphertext): errors are ordinary rejections. `*_received` and `open_*`
//!   entry points return [`CodecError`].
//!
//! ## Usage
//!
//! ```rust,no_run
//! use itemwire::{Item, ItemCodec, KeyRef, Keyring, Tag};
//!
//! let codec = ItemCodec::with_defaults(Keyring::generate());
//! let key = KeyRef::new(1, 0);
//!
//! let msg = Item::pair(Item::nonce(key, 0), Item::data("hello"));
//! let a = codec.encode_local(&msg);
//! let b = codec.encode_local(&msg.clone());
//! codec.check_equal_local(&a, &b);
//!
//! let sealed = codec.seal_symmetric(key, msg, [0u8; 12]).unwrap();
//! let wire = codec.encode_local(&sealed);
//! let plaintext = codec.open_symmetric(key, &wire, Tag::Pair).unwrap();
//! assert!(codec.items_equal(&plaintext, &a).unwrap());
//! ```
//!
//! ## Re-exports
//!
//! - `itemwire::core` - Item model, codecs, parser and equality
//! - `itemwire::crypto` - Keyring provider and seal/open helpers

pub mod codec;
pub mod error;

pub use itemwire_core as core;
pub use itemwire_crypto as crypto;

pub use codec::ItemCodec;
pub use error::{CodecError, Result};

pub use itemwire_core::{
    CodecConfig, CryptoProvider, Inequality, Item, ItemError, ItemView, KeyRef, Payload,
    Provenance, Sealed, Tag, IV_SIZE, TAG_LENGTH,
};
pub use itemwire_crypto::{CryptoError, Keyring};
