//! The item model: a recursive tagged variant for protocol messages.
//!
//! Items are immutable values. Every variant maps to exactly one [`Tag`];
//! [`Item::tag`] is the only place that mapping lives.

use std::fmt;

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::tag::Tag;

/// Numeric identifier of a principal.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Principal(pub u32);

impl fmt::Debug for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Principal({})", self.0)
    }
}

impl fmt::Display for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for Principal {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

/// Cryptographic material of a principal: its id plus the counter value
/// at which the material was created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct KeyRef {
    pub principal: Principal,
    pub count: u32,
}

impl KeyRef {
    pub const fn new(principal: u32, count: u32) -> Self {
        Self {
            principal: Principal(principal),
            count,
        }
    }
}

impl fmt::Display for KeyRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.principal, self.count)
    }
}

/// The plaintext attributed to an encrypted or signed item.
///
/// `Absent` marks a cryptogram that cannot be attributed a plaintext, such
/// as adversarial ciphertext. An item holding it is not well-formed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Payload {
    Present(Box<Item>),
    Absent,
}

impl Payload {
    pub fn present(item: Item) -> Self {
        Payload::Present(Box::new(item))
    }

    pub fn as_item(&self) -> Option<&Item> {
        match self {
            Payload::Present(item) => Some(item),
            Payload::Absent => None,
        }
    }

    pub fn is_present(&self) -> bool {
        matches!(self, Payload::Present(_))
    }
}

impl From<Option<Item>> for Payload {
    fn from(item: Option<Item>) -> Self {
        match item {
            Some(item) => Payload::present(item),
            None => Payload::Absent,
        }
    }
}

/// An encrypted or signed item: the key used, the attributed plaintext,
/// and the externally produced entropy bytes.
///
/// For symmetric encryption `entropy` is `IV || ciphertext`; for asymmetric
/// encryption it is the ciphertext; for signatures it is the signature.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Sealed {
    pub key: KeyRef,
    pub payload: Payload,
    pub entropy: Bytes,
}

impl Sealed {
    pub fn new(key: KeyRef, payload: Payload, entropy: impl Into<Bytes>) -> Self {
        Self {
            key,
            payload,
            entropy: entropy.into(),
        }
    }
}

impl fmt::Debug for Sealed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sealed")
            .field("key", &self.key)
            .field("payload", &self.payload)
            .field("entropy", &format_args!("{} bytes", self.entropy.len()))
            .finish()
    }
}

/// A protocol item.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Item {
    Data(Bytes),
    Pair(Box<Item>, Box<Item>),
    Nonce { key: KeyRef, increment: u8 },
    Hash(Box<Item>),
    SymmetricKey(KeyRef),
    PublicKey(KeyRef),
    PrivateKey(KeyRef),
    Hmac { key: KeyRef, payload: Box<Item> },
    SymmetricEncrypted(Sealed),
    AsymmetricEncrypted(Sealed),
    AsymmetricSignature(Sealed),
}

impl Item {
    pub fn data(bytes: impl Into<Bytes>) -> Self {
        Item::Data(bytes.into())
    }

    pub fn pair(first: Item, second: Item) -> Self {
        Item::Pair(Box::new(first), Box::new(second))
    }

    pub fn nonce(key: KeyRef, increment: u8) -> Self {
        Item::Nonce { key, increment }
    }

    pub fn hash(payload: Item) -> Self {
        Item::Hash(Box::new(payload))
    }

    pub fn hmac(key: KeyRef, payload: Item) -> Self {
        Item::Hmac {
            key,
            payload: Box::new(payload),
        }
    }

    /// The tag this item is encoded under.
    pub const fn tag(&self) -> Tag {
        match self {
            Item::Data(_) => Tag::Data,
            Item::Pair(..) => Tag::Pair,
            Item::Nonce { .. } => Tag::Nonce,
            Item::Hash(_) => Tag::Hash,
            Item::SymmetricKey(_) => Tag::SymmetricKey,
            Item::PublicKey(_) => Tag::PublicKey,
            Item::PrivateKey(_) => Tag::PrivateKey,
            Item::Hmac { .. } => Tag::Hmac,
            Item::SymmetricEncrypted(_) => Tag::SymmetricEncrypted,
            Item::AsymmetricEncrypted(_) => Tag::AsymmetricEncrypted,
            Item::AsymmetricSignature(_) => Tag::AsymmetricSignature,
        }
    }

    /// The sealed part of an encrypted or signed item.
    pub fn sealed(&self) -> Option<&Sealed> {
        match self {
            Item::SymmetricEncrypted(s)
            | Item::AsymmetricEncrypted(s)
            | Item::AsymmetricSignature(s) => Some(s),
            _ => None,
        }
    }

    /// Whether every nested payload is present and itself well-formed.
    pub fn well_formed(&self) -> bool {
        match self {
            Item::Data(_)
            | Item::Nonce { .. }
            | Item::SymmetricKey(_)
            | Item::PublicKey(_)
            | Item::PrivateKey(_) => true,
            Item::Pair(first, second) => first.well_formed() && second.well_formed(),
            Item::Hash(payload) | Item::Hmac { payload, .. } => payload.well_formed(),
            Item::SymmetricEncrypted(sealed)
            | Item::AsymmetricEncrypted(sealed)
            | Item::AsymmetricSignature(sealed) => match &sealed.payload {
                Payload::Present(item) => item.well_formed(),
                Payload::Absent => false,
            },
        }
    }

    /// Nesting depth; leaves have depth 1.
    pub fn depth(&self) -> usize {
        match self {
            Item::Pair(first, second) => 1 + first.depth().max(second.depth()),
            Item::Hash(payload) | Item::Hmac { payload, .. } => 1 + payload.depth(),
            Item::SymmetricEncrypted(sealed)
            | Item::AsymmetricEncrypted(sealed)
            | Item::AsymmetricSignature(sealed) => {
                1 + sealed.payload.as_item().map_or(0, Item::depth)
            }
            _ => 1,
        }
    }
}
