//! Item tags and the redundant tag field.
//!
//! Every encoded item starts with [`TAG_LENGTH`] copies of its tag byte.
//! All copies must agree; a buffer whose prefix disagrees with itself was
//! corrupted or forged.

use std::fmt;

use bytes::BufMut;
use serde::{Deserialize, Serialize};

use crate::error::{ItemError, Result};
use crate::policy::Provenance;

/// Width of the redundant tag field in bytes.
pub const TAG_LENGTH: usize = 4;

/// Discriminator of an item variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum Tag {
    Data = 0x01,
    Pair = 0x02,
    Nonce = 0x03,
    Hash = 0x04,
    SymmetricKey = 0x05,
    PublicKey = 0x06,
    PrivateKey = 0x07,
    Hmac = 0x08,
    SymmetricEncrypted = 0x09,
    AsymmetricEncrypted = 0x0A,
    AsymmetricSignature = 0x0B,
}

impl Tag {
    /// All tags, in wire order.
    pub const ALL: [Tag; 11] = [
        Tag::Data,
        Tag::Pair,
        Tag::Nonce,
        Tag::Hash,
        Tag::SymmetricKey,
        Tag::PublicKey,
        Tag::PrivateKey,
        Tag::Hmac,
        Tag::SymmetricEncrypted,
        Tag::AsymmetricEncrypted,
        Tag::AsymmetricSignature,
    ];

    /// Convert to the wire byte.
    pub const fn to_u8(self) -> u8 {
        self as u8
    }

    /// Try to parse from a wire byte.
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            0x01 => Some(Self::Data),
            0x02 => Some(Self::Pair),
            0x03 => Some(Self::Nonce),
            0x04 => Some(Self::Hash),
            0x05 => Some(Self::SymmetricKey),
            0x06 => Some(Self::PublicKey),
            0x07 => Some(Self::PrivateKey),
            0x08 => Some(Self::Hmac),
            0x09 => Some(Self::SymmetricEncrypted),
            0x0A => Some(Self::AsymmetricEncrypted),
            0x0B => Some(Self::AsymmetricSignature),
            _ => None,
        }
    }

    /// The full redundant tag field for this tag.
    pub const fn field(self) -> [u8; TAG_LENGTH] {
        [self as u8; TAG_LENGTH]
    }

    /// Whether the content of this tag is produced by a cryptographic primitive.
    pub const fn is_cryptogram(self) -> bool {
        !matches!(self, Tag::Data | Tag::Pair)
    }
}

impl TryFrom<u8> for Tag {
    type Error = ItemError;

    fn try_from(value: u8) -> Result<Self> {
        Tag::from_u8(value).ok_or(ItemError::UnknownTag(value))
    }
}

impl From<Tag> for u8 {
    fn from(tag: Tag) -> u8 {
        tag.to_u8()
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Tag::Data => "data",
            Tag::Pair => "pair",
            Tag::Nonce => "nonce",
            Tag::Hash => "hash",
            Tag::SymmetricKey => "symmetric key",
            Tag::PublicKey => "public key",
            Tag::PrivateKey => "private key",
            Tag::Hmac => "hmac",
            Tag::SymmetricEncrypted => "symmetric encrypted",
            Tag::AsymmetricEncrypted => "asymmetric encrypted",
            Tag::AsymmetricSignature => "asymmetric signature",
        };
        f.write_str(name)
    }
}

/// Fill the first [`TAG_LENGTH`] bytes of `buffer` with `tag`.
///
/// # Panics
///
/// Panics if `buffer` is shorter than [`TAG_LENGTH`].
pub fn write_tag(buffer: &mut [u8], tag: Tag) {
    buffer[..TAG_LENGTH].fill(tag.to_u8());
}

/// Append the tag field for `tag` to `dst`.
pub fn put_tag<B: BufMut>(dst: &mut B, tag: Tag) {
    dst.put_bytes(tag.to_u8(), TAG_LENGTH);
}

/// Check that `buffer` starts with the tag field of `tag`.
///
/// Returns the verified prefix.
pub fn check_tag(buffer: &[u8], tag: Tag) -> Result<&[u8]> {
    let prefix = tag_prefix(buffer, Some(tag.to_u8()))?;
    if prefix.iter().any(|&b| b != tag.to_u8()) {
        return Err(mismatch(Some(tag.to_u8()), prefix));
    }
    Ok(prefix)
}

/// Read the tag of an encoded item whose tag is not known yet.
///
/// All [`TAG_LENGTH`] bytes must be identical and name a known tag.
pub fn read_tag(buffer: &[u8]) -> Result<Tag> {
    let prefix = tag_prefix(buffer, None)?;
    let first = prefix[0];
    if prefix.iter().any(|&b| b != first) {
        return Err(mismatch(None, prefix));
    }
    Tag::try_from(first)
}

/// Check the tag of bytes that may come out of a decryption.
///
/// Fails exactly like [`check_tag`]. With [`Provenance::Received`] the
/// buffer is the plaintext of externally supplied ciphertext, so a
/// mismatch is an expected rejection of garbage rather than a broken
/// invariant, and it is logged as such.
pub fn check_tag_against_ciphertext(
    buffer: &[u8],
    tag: Tag,
    provenance: Provenance,
) -> Result<&[u8]> {
    check_tag(buffer, tag).map_err(|err| {
        match provenance {
            Provenance::Received => {
                tracing::debug!(expected = %tag, error = %err, "rejecting decrypted bytes");
            }
            Provenance::Local => {
                tracing::error!(expected = %tag, error = %err, "tag check failed on local bytes");
            }
        }
        err
    })
}

fn tag_prefix(buffer: &[u8], expected: Option<u8>) -> Result<&[u8]> {
    buffer
        .get(..TAG_LENGTH)
        .ok_or_else(|| mismatch(expected, buffer))
}

fn mismatch(expected: Option<u8>, found: &[u8]) -> ItemError {
    ItemError::FramingMismatch {
        expected,
        found: found.to_vec(),
    }
}
