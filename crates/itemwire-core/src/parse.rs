//! Reading encoded items without rebuilding them.
//!
//! Cryptograms cannot be turned back into the items they came from, so
//! there is no general decoder. Instead [`parse`] splits one level of an
//! encoded item into its layout fields, and [`validate`] walks the whole
//! framing of an untrusted buffer.

use crate::config::CodecConfig;
use crate::error::{ItemError, Result};
use crate::length::{decode_length, LengthPrefix};
use crate::provider::IV_SIZE;
use crate::tag::{read_tag, Tag, TAG_LENGTH};

/// One level of an encoded item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemView<'a> {
    Data(&'a [u8]),
    Pair {
        length: LengthPrefix,
        first: &'a [u8],
        second: &'a [u8],
    },
    Nonce {
        increment: u8,
        cryptogram: &'a [u8],
    },
    SymmetricEncrypted {
        iv: &'a [u8; IV_SIZE],
        ciphertext: &'a [u8],
    },
    /// Hash, key, HMAC, asymmetric ciphertext or signature.
    Cryptogram { tag: Tag, bytes: &'a [u8] },
}

impl ItemView<'_> {
    pub fn tag(&self) -> Tag {
        match self {
            ItemView::Data(_) => Tag::Data,
            ItemView::Pair { .. } => Tag::Pair,
            ItemView::Nonce { .. } => Tag::Nonce,
            ItemView::SymmetricEncrypted { .. } => Tag::SymmetricEncrypted,
            ItemView::Cryptogram { tag, .. } => *tag,
        }
    }
}

/// The tag of an encoded item.
pub fn tag_of(bytes: &[u8]) -> Result<Tag> {
    read_tag(bytes)
}

/// Split the outer level of an encoded item.
pub fn parse(bytes: &[u8]) -> Result<ItemView<'_>> {
    let tag = read_tag(bytes)?;
    parse_content(tag, &bytes[TAG_LENGTH..])
}

pub(crate) fn parse_content(tag: Tag, content: &[u8]) -> Result<ItemView<'_>> {
    let view = match tag {
        Tag::Data => ItemView::Data(content),
        Tag::Pair => {
            let length = decode_length(content)?;
            let (first, second) = content[length.width..].split_at(length.value);
            ItemView::Pair {
                length,
                first,
                second,
            }
        }
        Tag::Nonce => {
            let (increment, cryptogram) = split_fixed(content, 1, "nonce increment")?;
            ItemView::Nonce {
                increment: increment[0],
                cryptogram,
            }
        }
        Tag::SymmetricEncrypted => {
            let (iv, ciphertext) = split_fixed(content, IV_SIZE, "iv")?;
            ItemView::SymmetricEncrypted {
                iv: iv.try_into().map_err(|_| ItemError::Truncated {
                    field: "iv",
                    needed: IV_SIZE,
                    remaining: iv.len(),
                })?,
                ciphertext,
            }
        }
        Tag::Hash
        | Tag::SymmetricKey
        | Tag::PublicKey
        | Tag::PrivateKey
        | Tag::Hmac
        | Tag::AsymmetricEncrypted
        | Tag::AsymmetricSignature => ItemView::Cryptogram {
            tag,
            bytes: content,
        },
    };
    Ok(view)
}

pub(crate) fn split_fixed<'a>(
    content: &'a [u8],
    width: usize,
    field: &'static str,
) -> Result<(&'a [u8], &'a [u8])> {
    if content.len() < width {
        return Err(ItemError::Truncated {
            field,
            needed: width,
            remaining: content.len(),
        });
    }
    Ok(content.split_at(width))
}

/// Check the complete framing of an encoded item.
///
/// Every nested tag field must be consistent and every pair length must
/// fit, within the limits of `config`. Returns the outer tag.
pub fn validate(bytes: &[u8], config: &CodecConfig) -> Result<Tag> {
    config.check_size(bytes.len())?;
    validate_at(bytes, config, 1)
}

fn validate_at(bytes: &[u8], config: &CodecConfig, depth: usize) -> Result<Tag> {
    config.check_depth(depth)?;
    let view = parse(bytes)?;
    if let ItemView::Pair { first, second, .. } = view {
        validate_at(first, config, depth + 1)?;
        validate_at(second, config, depth + 1)?;
    }
    Ok(view.tag())
}
