//! # itemwire core
//!
//! A canonical, self-delimiting binary encoding for the tagged items that
//! make up cryptographic protocol messages, and structural equality checked
//! directly on encoded bytes.
//!
//! This crate contains no I/O and no cryptography. Cryptograms come from a
//! [`CryptoProvider`] and are treated as opaque bytes.
//!
//! ## Key Types
//!
//! - [`Item`] - The recursive tagged item
//! - [`Tag`] - Item discriminator, stored [`TAG_LENGTH`] times at the start of every encoding
//! - [`ItemView`] - One parsed level of an encoded item
//! - [`Provenance`] - Whether errors abort (local data) or are returned (received data)
//!
//! ## Wire format
//!
//! See [`mod@encode`] for the layout of each item and [`mod@length`] for the pair
//! length prefix.

pub mod config;
pub mod encode;
pub mod equality;
pub mod error;
pub mod item;
pub mod length;
pub mod parse;
pub mod policy;
pub mod provider;
pub mod tag;

#[cfg(test)]
mod testing;

pub use config::CodecConfig;
pub use encode::{encode, encode_into, encode_with};
pub use equality::{check_equal, check_equal_with, items_equal, items_equal_with};
pub use error::{Inequality, ItemError, Result};
pub use item::{Item, KeyRef, Payload, Principal, Sealed};
pub use length::{decode_length, encode_length, LengthPrefix};
pub use parse::{parse, tag_of, validate, ItemView};
pub use policy::{settle_local, Provenance};
pub use provider::{CryptoProvider, KeyKind, IV_SIZE};
pub use tag::{check_tag, check_tag_against_ciphertext, read_tag, write_tag, Tag, TAG_LENGTH};
