//! Canonical encoding of items.
//!
//! ```text
//! item     = tag_field || content
//! Data     : bytes
//! Pair     : length(encode(first)) || encode(first) || encode(second)
//! Nonce    : increment || cryptogram
//! SymEnc   : iv || ciphertext           (the sealed entropy, verbatim)
//! AsymEnc  : ciphertext
//! AsymSig  : signature
//! others   : cryptogram
//! ```
//!
//! The encoding is a pure function of the item and the provider's outputs.

use bytes::{BufMut, Bytes, BytesMut};

use crate::config::CodecConfig;
use crate::error::{ItemError, Result};
use crate::item::{Item, Sealed};
use crate::length::{encode_length, encoded_width};
use crate::provider::{CryptoProvider, KeyKind, IV_SIZE};
use crate::tag::{put_tag, Tag, TAG_LENGTH};

/// Encode an item to its canonical bytes under the default limits.
pub fn encode<P: CryptoProvider + ?Sized>(item: &Item, provider: &P) -> Result<Bytes> {
    encode_with(item, provider, &CodecConfig::default())
}

/// Encode an item, refusing anything the comparator and validator would
/// reject under `config`.
pub fn encode_with<P: CryptoProvider + ?Sized>(
    item: &Item,
    provider: &P,
    config: &CodecConfig,
) -> Result<Bytes> {
    let mut dst = BytesMut::new();
    encode_into(item, provider, config, &mut dst)?;
    Ok(dst.freeze())
}

/// Append the canonical bytes of an item to `dst`.
///
/// All cryptograms are computed and all limits checked before the first
/// byte is written, so on error `dst` is unchanged.
pub fn encode_into<P: CryptoProvider + ?Sized>(
    item: &Item,
    provider: &P,
    config: &CodecConfig,
    dst: &mut BytesMut,
) -> Result<()> {
    let planned = plan(item, provider, config, 1)?;
    tracing::trace!(tag = %planned.tag, size = planned.size, "encoding item");
    dst.reserve(planned.size);
    write(&planned, dst)
}

/// An item with every cryptogram resolved and every size known.
struct Planned<'a> {
    tag: Tag,
    /// Encoded size, tag field included.
    size: usize,
    body: Body<'a>,
}

enum Body<'a> {
    Data(&'a [u8]),
    Pair(Box<Planned<'a>>, Box<Planned<'a>>),
    Cryptogram {
        increment: Option<u8>,
        bytes: Bytes,
    },
}

fn plan<'a, P: CryptoProvider + ?Sized>(
    item: &'a Item,
    provider: &P,
    config: &CodecConfig,
    depth: usize,
) -> Result<Planned<'a>> {
    config.check_depth(depth)?;

    let cryptogram = |bytes: Bytes| Body::Cryptogram {
        increment: None,
        bytes,
    };
    let body = match item {
        Item::Data(bytes) => Body::Data(bytes),
        Item::Pair(first, second) => Body::Pair(
            Box::new(plan(first, provider, config, depth + 1)?),
            Box::new(plan(second, provider, config, depth + 1)?),
        ),
        Item::Nonce { key, increment } => Body::Cryptogram {
            increment: Some(*increment),
            bytes: provider.nonce(*key)?,
        },
        Item::Hash(payload) => {
            let plain = encode_with(payload, provider, config)?;
            cryptogram(provider.hash(&plain)?)
        }
        Item::SymmetricKey(key) => cryptogram(provider.key(KeyKind::Symmetric, *key)?),
        Item::PublicKey(key) => cryptogram(provider.key(KeyKind::Public, *key)?),
        Item::PrivateKey(key) => cryptogram(provider.key(KeyKind::Private, *key)?),
        Item::Hmac { key, payload } => {
            let plain = encode_with(payload, provider, config)?;
            cryptogram(provider.hmac(*key, &plain)?)
        }
        Item::SymmetricEncrypted(sealed) => {
            check_iv(sealed)?;
            cryptogram(sealed.entropy.clone())
        }
        Item::AsymmetricEncrypted(sealed) | Item::AsymmetricSignature(sealed) => {
            cryptogram(sealed.entropy.clone())
        }
    };

    let content = match &body {
        Body::Data(bytes) => bytes.len(),
        Body::Pair(first, second) => encoded_width(first.size) + first.size + second.size,
        Body::Cryptogram { increment, bytes } => usize::from(increment.is_some()) + bytes.len(),
    };
    let size = TAG_LENGTH + content;
    config.check_size(size)?;
    Ok(Planned {
        tag: item.tag(),
        size,
        body,
    })
}

fn write(planned: &Planned<'_>, dst: &mut BytesMut) -> Result<()> {
    put_tag(dst, planned.tag);
    match &planned.body {
        Body::Data(bytes) => dst.put_slice(bytes),
        Body::Pair(first, second) => {
            encode_length(first.size, dst)?;
            write(first, dst)?;
            write(second, dst)?;
        }
        Body::Cryptogram { increment, bytes } => {
            if let Some(increment) = increment {
                dst.put_u8(*increment);
            }
            dst.put_slice(bytes);
        }
    }
    Ok(())
}

fn check_iv(sealed: &Sealed) -> Result<()> {
    if sealed.entropy.len() < IV_SIZE {
        return Err(ItemError::Truncated {
            field: "iv",
            needed: IV_SIZE,
            remaining: sealed.entropy.len(),
        });
    }
    Ok(())
}
