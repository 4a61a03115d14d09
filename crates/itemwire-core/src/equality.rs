//! Structural equality of encoded items, computed on the bytes.
//!
//! Two items are compared by walking their encodings in lockstep: tags,
//! sizes and pair splits must agree, data is compared bytewise, and each
//! cryptogram is compared as an atomic blob. Nothing is decoded further.
//!
//! This is sound because the encoding is injective: tags are checked at
//! every level, each pair length has a single encoding, and distinct
//! cryptograms coincide only on a collision of the underlying primitive.
//!
//! [`items_equal`] reports differing tags as `false`. Only framing errors
//! and unknown tags are errors there.

use crate::config::CodecConfig;
use crate::error::{Inequality, ItemError, Result};
use crate::length::decode_length;
use crate::parse::split_fixed;
use crate::provider::IV_SIZE;
use crate::tag::{read_tag, Tag, TAG_LENGTH};

/// Whether two encoded items are equal.
pub fn items_equal(a: &[u8], b: &[u8]) -> Result<bool> {
    items_equal_with(a, b, &CodecConfig::default())
}

/// [`items_equal`] under explicit limits.
pub fn items_equal_with(a: &[u8], b: &[u8], config: &CodecConfig) -> Result<bool> {
    match check_equal_with(a, b, config) {
        Ok(()) => Ok(true),
        Err(err) if err.is_inequality() => Ok(false),
        Err(err) => Err(err),
    }
}

/// Check that two encoded items are equal, reporting why they are not.
///
/// Fails with [`ItemError::NotEqual`] or [`ItemError::SizeMismatch`] when
/// the items differ, and with a framing error when either buffer is
/// malformed.
pub fn check_equal(a: &[u8], b: &[u8]) -> Result<()> {
    check_equal_with(a, b, &CodecConfig::default())
}

/// [`check_equal`] under explicit limits.
pub fn check_equal_with(a: &[u8], b: &[u8], config: &CodecConfig) -> Result<()> {
    config.check_size(a.len())?;
    config.check_size(b.len())?;
    check_equal_at(a, b, config, 1)
}

fn check_equal_at(a: &[u8], b: &[u8], config: &CodecConfig, depth: usize) -> Result<()> {
    config.check_depth(depth)?;

    let tag_a = read_tag(a)?;
    let tag_b = read_tag(b)?;
    if tag_a != tag_b {
        return Err(ItemError::NotEqual(Inequality::Tags {
            left: tag_a,
            right: tag_b,
        }));
    }
    if a.len() != b.len() {
        return Err(ItemError::SizeMismatch {
            left: a.len(),
            right: b.len(),
        });
    }
    tracing::trace!(tag = %tag_a, depth, size = a.len(), "comparing items");

    let (a, b) = (&a[TAG_LENGTH..], &b[TAG_LENGTH..]);
    match tag_a {
        Tag::Data => compare(a, b, Inequality::Content(Tag::Data)),
        Tag::Pair => {
            let len_a = decode_length(a)?;
            let len_b = decode_length(b)?;
            if len_a != len_b {
                return Err(ItemError::NotEqual(Inequality::PairSplit {
                    left: len_a.value,
                    right: len_b.value,
                }));
            }
            let (first_a, second_a) = a[len_a.width..].split_at(len_a.value);
            let (first_b, second_b) = b[len_b.width..].split_at(len_b.value);
            check_equal_at(first_a, first_b, config, depth + 1)?;
            check_equal_at(second_a, second_b, config, depth + 1)
        }
        Tag::Nonce => {
            let (inc_a, cg_a) = split_fixed(a, 1, "nonce increment")?;
            let (inc_b, cg_b) = split_fixed(b, 1, "nonce increment")?;
            compare(inc_a, inc_b, Inequality::NonceIncrement)?;
            compare(cg_a, cg_b, Inequality::Content(Tag::Nonce))
        }
        Tag::SymmetricEncrypted => {
            let (iv_a, ct_a) = split_fixed(a, IV_SIZE, "iv")?;
            let (iv_b, ct_b) = split_fixed(b, IV_SIZE, "iv")?;
            compare(iv_a, iv_b, Inequality::Iv)?;
            compare(ct_a, ct_b, Inequality::Content(Tag::SymmetricEncrypted))
        }
        Tag::Hash
        | Tag::SymmetricKey
        | Tag::PublicKey
        | Tag::PrivateKey
        | Tag::Hmac
        | Tag::AsymmetricEncrypted
        | Tag::AsymmetricSignature => compare(a, b, Inequality::Content(tag_a)),
    }
}

fn compare(a: &[u8], b: &[u8], reason: Inequality) -> Result<()> {
    if a == b {
        Ok(())
    } else {
        Err(ItemError::NotEqual(reason))
    }
}
