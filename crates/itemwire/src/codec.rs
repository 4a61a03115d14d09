//! The codec: one handle for encoding, comparing and opening items.
//!
//! Every inspection of encoded bytes comes in two flavours. `*_local`
//! methods are for bytes this process produced with its own encoder; an
//! error there means a broken invariant, so they log and panic. `*_received`
//! methods are for bytes from a peer, or decrypted from a peer's
//! ciphertext; they return typed errors.

use bytes::Bytes;

use itemwire_core::{
    check_equal_with, check_tag, encode_with, items_equal_with, read_tag, settle_local, validate,
    CodecConfig, CryptoProvider, Item, KeyRef, Provenance, Tag, IV_SIZE,
};
use itemwire_crypto::seal;

use crate::error::Result;

/// Bundles a primitive provider with the limits for inspecting items.
#[derive(Debug, Clone)]
pub struct ItemCodec<P> {
    provider: P,
    config: CodecConfig,
}

impl<P: CryptoProvider> ItemCodec<P> {
    /// Create a codec over `provider`.
    pub fn new(provider: P, config: CodecConfig) -> Self {
        Self { provider, config }
    }

    /// Create a codec with default limits.
    pub fn with_defaults(provider: P) -> Self {
        Self::new(provider, CodecConfig::default())
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Encoding
    // ─────────────────────────────────────────────────────────────────────────

    /// Encode an item.
    ///
    /// Items nested deeper or encoding larger than the configured limits
    /// are refused, so every encoding this returns can be validated and
    /// compared by the same codec.
    pub fn encode(&self, item: &Item) -> Result<Bytes> {
        Ok(encode_with(item, &self.provider, &self.config)?)
    }

    /// Encode an item this process built itself.
    ///
    /// # Panics
    ///
    /// Panics if the item cannot be encoded, including when it exceeds the
    /// configured limits.
    #[track_caller]
    pub fn encode_local(&self, item: &Item) -> Bytes {
        settle_local(encode_with(item, &self.provider, &self.config))
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Tags
    // ─────────────────────────────────────────────────────────────────────────

    /// The tag of locally encoded bytes.
    ///
    /// # Panics
    ///
    /// Panics if the tag field is malformed.
    #[track_caller]
    pub fn tag_of_local(&self, bytes: &[u8]) -> Tag {
        settle_local(read_tag(bytes))
    }

    /// The tag of received bytes.
    pub fn tag_of_received(&self, bytes: &[u8]) -> Result<Tag> {
        Ok(received(read_tag(bytes))?)
    }

    /// Check the tag field of locally encoded bytes.
    ///
    /// # Panics
    ///
    /// Panics if `bytes` does not start with the tag field of `tag`.
    #[track_caller]
    pub fn check_tag_local(&self, bytes: &[u8], tag: Tag) {
        settle_local(check_tag(bytes, tag));
    }

    /// Check the tag field of received bytes.
    pub fn check_tag_received(&self, bytes: &[u8], tag: Tag) -> Result<()> {
        received(check_tag(bytes, tag))?;
        Ok(())
    }

    /// Check the full framing of received bytes, returning the outer tag.
    pub fn validate_received(&self, bytes: &[u8]) -> Result<Tag> {
        Ok(received(validate(bytes, &self.config))?)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Equality
    // ─────────────────────────────────────────────────────────────────────────

    /// Whether two encoded items are equal.
    ///
    /// Differing items give `Ok(false)`; malformed framing is an error.
    pub fn items_equal(&self, a: &[u8], b: &[u8]) -> Result<bool> {
        Ok(received(items_equal_with(a, b, &self.config))?)
    }

    /// Assert that two locally encoded items are equal.
    ///
    /// # Panics
    ///
    /// Panics when the items differ or either buffer is malformed, naming
    /// the first difference found.
    #[track_caller]
    pub fn check_equal_local(&self, a: &[u8], b: &[u8]) {
        settle_local(check_equal_with(a, b, &self.config));
    }

    /// Check that two received items are equal, reporting why they are not.
    pub fn check_equal_received(&self, a: &[u8], b: &[u8]) -> Result<()> {
        Ok(received(check_equal_with(a, b, &self.config))?)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Cryptograms
    // ─────────────────────────────────────────────────────────────────────────

    /// Build a symmetric ciphertext item over `payload`.
    pub fn seal_symmetric(&self, key: KeyRef, payload: Item, iv: [u8; IV_SIZE]) -> Result<Item> {
        Ok(seal::seal_symmetric(&self.provider, key, payload, iv)?)
    }

    /// Build an asymmetric ciphertext item over `payload`.
    pub fn seal_asymmetric(&self, key: KeyRef, payload: Item, ephemeral: [u8; 32]) -> Result<Item> {
        Ok(seal::seal_asymmetric(&self.provider, key, payload, ephemeral)?)
    }

    /// Build a signature item over `payload`.
    pub fn sign(&self, key: KeyRef, payload: Item) -> Result<Item> {
        Ok(seal::sign(&self.provider, key, payload)?)
    }

    /// Decrypt a received symmetric ciphertext expected to hold an item
    /// tagged `expected`.
    pub fn open_symmetric(&self, key: KeyRef, bytes: &[u8], expected: Tag) -> Result<Bytes> {
        Ok(seal::open_symmetric(&self.provider, key, bytes, expected, &self.config)?)
    }

    /// Decrypt a received asymmetric ciphertext expected to hold an item
    /// tagged `expected`.
    pub fn open_asymmetric(&self, key: KeyRef, bytes: &[u8], expected: Tag) -> Result<Bytes> {
        Ok(seal::open_asymmetric(&self.provider, key, bytes, expected, &self.config)?)
    }

    /// Verify a received signature over a received message.
    pub fn verify_signature(&self, key: KeyRef, signature: &[u8], message: &[u8]) -> Result<()> {
        Ok(seal::verify_signature(&self.provider, key, signature, message, &self.config)?)
    }
}

fn received<T>(result: itemwire_core::Result<T>) -> itemwire_core::Result<T> {
    Provenance::Received.settle(result).map_err(|err| {
        if !err.is_inequality() {
            tracing::debug!(error = %err, "rejecting received item");
        }
        err
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use itemwire_core::{Inequality, ItemError};
    use itemwire_crypto::{CryptoError, Keyring};
    use proptest::prelude::*;

    fn codec() -> ItemCodec<Keyring> {
        ItemCodec::with_defaults(Keyring::from_seed([0x11; 32]))
    }

    fn sample() -> Item {
        let key = KeyRef::new(1, 1);
        Item::pair(Item::nonce(key, 0), Item::hmac(key, Item::data("body")))
    }

    #[test]
    fn test_encode_local_matches_encode() {
        let codec = codec();
        assert_eq!(codec.encode_local(&sample()), codec.encode(&sample()).unwrap());
    }

    #[test]
    #[should_panic(expected = "broken invariant")]
    fn test_encode_local_aborts_on_short_iv() {
        let codec = codec();
        let bad = Item::SymmetricEncrypted(itemwire_core::Sealed::new(
            KeyRef::new(1, 1),
            itemwire_core::Payload::Absent,
            vec![0u8; 3],
        ));
        codec.encode_local(&bad);
    }

    fn nested(levels: usize) -> Item {
        let mut item = Item::data("leaf");
        for _ in 0..levels {
            item = Item::pair(item, Item::data("x"));
        }
        item
    }

    #[test]
    fn test_deep_item_is_refused_at_encode() {
        let codec = codec();
        assert!(matches!(
            codec.encode(&nested(70)),
            Err(crate::CodecError::Item(ItemError::DepthExceeded(64)))
        ));
    }

    #[test]
    fn test_local_encodings_always_compare() {
        let codec = codec();
        let item = nested(63);
        let a = codec.encode_local(&item);
        let b = codec.encode_local(&item);
        assert!(codec.items_equal(&a, &b).unwrap());
        codec.check_equal_local(&a, &b);
        assert_eq!(codec.validate_received(&a).unwrap(), Tag::Pair);
    }

    #[test]
    fn test_encode_uses_codec_limits() {
        let codec = ItemCodec::new(
            Keyring::from_seed([0x11; 32]),
            CodecConfig {
                max_depth: 2,
                max_item_size: 64,
            },
        );
        assert!(codec.encode(&nested(1)).is_ok());
        assert!(matches!(
            codec.encode(&nested(2)),
            Err(crate::CodecError::Item(ItemError::DepthExceeded(2)))
        ));
        assert!(matches!(
            codec.encode(&Item::data(vec![0u8; 61])),
            Err(crate::CodecError::Item(ItemError::ItemTooLarge { .. }))
        ));
    }

    #[test]
    fn test_tag_of() {
        let codec = codec();
        let bytes = codec.encode_local(&sample());
        assert_eq!(codec.tag_of_local(&bytes), Tag::Pair);
        assert_eq!(codec.tag_of_received(&bytes).unwrap(), Tag::Pair);
        assert!(codec.tag_of_received(&bytes[..2]).is_err());
    }

    #[test]
    #[should_panic(expected = "broken invariant")]
    fn test_check_tag_local_aborts() {
        let codec = codec();
        let bytes = codec.encode_local(&Item::data("x"));
        codec.check_tag_local(&bytes, Tag::Pair);
    }

    #[test]
    fn test_check_tag_received_is_recoverable() {
        let codec = codec();
        let bytes = codec.encode_local(&Item::data("x"));
        codec.check_tag_received(&bytes, Tag::Data).unwrap();
        assert!(codec.check_tag_received(&bytes, Tag::Pair).is_err());
    }

    #[test]
    fn test_equality_entry_points() {
        let codec = codec();
        let a = codec.encode_local(&sample());
        let b = codec.encode_local(&Item::data("other"));

        assert!(codec.items_equal(&a, &a).unwrap());
        assert!(!codec.items_equal(&a, &b).unwrap());
        codec.check_equal_local(&a, &a);

        let err = codec.check_equal_received(&a, &b).unwrap_err();
        assert!(err.is_inequality());
        assert!(matches!(
            err,
            crate::CodecError::Item(ItemError::NotEqual(Inequality::Tags { .. }))
        ));
    }

    #[test]
    #[should_panic(expected = "items not equal")]
    fn test_check_equal_local_aborts() {
        let codec = codec();
        let a = codec.encode_local(&Item::data("a"));
        let b = codec.encode_local(&Item::data("b"));
        codec.check_equal_local(&a, &b);
    }

    #[test]
    fn test_validate_received_respects_config() {
        let codec = ItemCodec::new(
            Keyring::from_seed([0x11; 32]),
            CodecConfig {
                max_depth: 1,
                ..CodecConfig::default()
            },
        );
        let bytes = self::codec().encode_local(&sample());
        assert!(matches!(
            codec.validate_received(&bytes),
            Err(crate::CodecError::Item(ItemError::DepthExceeded(1)))
        ));
    }

    #[test]
    fn test_seal_and_open() {
        let codec = codec();
        let key = KeyRef::new(2, 0);
        let sealed = codec.seal_symmetric(key, sample(), [4u8; IV_SIZE]).unwrap();
        let wire = codec.encode_local(&sealed);
        let plaintext = codec.open_symmetric(key, &wire, Tag::Pair).unwrap();
        codec.check_equal_local(&plaintext, &codec.encode_local(&sample()));

        let sealed = codec.seal_asymmetric(key, sample(), [6u8; 32]).unwrap();
        let wire = codec.encode_local(&sealed);
        let plaintext = codec.open_asymmetric(key, &wire, Tag::Pair).unwrap();
        assert!(codec.items_equal(&plaintext, &codec.encode_local(&sample())).unwrap());
    }

    #[test]
    fn test_open_garbage_is_recoverable() {
        let codec = codec();
        let key = KeyRef::new(2, 0);
        let sealed = codec.seal_symmetric(key, sample(), [4u8; IV_SIZE]).unwrap();
        let mut wire = codec.encode_local(&sealed).to_vec();
        let last = wire.len() - 1;
        wire[last] ^= 0x01;
        assert!(matches!(
            codec.open_symmetric(key, &wire, Tag::Pair),
            Err(crate::CodecError::Crypto(CryptoError::DecryptionError(_)))
        ));
    }

    #[test]
    fn test_sign_and_verify() {
        let codec = codec();
        let key = KeyRef::new(3, 0);
        let signature = codec.encode_local(&codec.sign(key, sample()).unwrap());
        let message = codec.encode_local(&sample());
        codec.verify_signature(key, &signature, &message).unwrap();
        assert!(codec
            .verify_signature(KeyRef::new(3, 1), &signature, &message)
            .is_err());
    }

    proptest! {
        #[test]
        fn prop_encoding_limits_match_comparison_limits(
            levels in 0usize..100,
            max_depth in 1usize..80,
        ) {
            let codec = ItemCodec::new(
                Keyring::from_seed([0x11; 32]),
                CodecConfig { max_depth, ..CodecConfig::default() },
            );
            match codec.encode(&nested(levels)) {
                Ok(bytes) => {
                    prop_assert!(levels < max_depth);
                    prop_assert!(codec.items_equal(&bytes, &bytes)?);
                    prop_assert_eq!(codec.validate_received(&bytes)?, nested(levels).tag());
                }
                Err(err) => {
                    prop_assert!(levels >= max_depth);
                    let is_depth = matches!(
                        err,
                        crate::CodecError::Item(ItemError::DepthExceeded(d)) if d == max_depth
                    );
                    prop_assert!(is_depth);
                }
            }
        }

        #[test]
        fn prop_received_bytes_never_panic(
            a in prop::collection::vec(any::<u8>(), 0..96),
            b in prop::collection::vec(any::<u8>(), 0..96),
        ) {
            let codec = codec();
            let key = KeyRef::new(1, 0);
            let _ = codec.tag_of_received(&a);
            let _ = codec.validate_received(&a);
            let _ = codec.check_tag_received(&a, Tag::Pair);
            let _ = codec.items_equal(&a, &b);
            let _ = codec.check_equal_received(&a, &b);
            let _ = codec.open_symmetric(key, &a, Tag::Pair);
            let _ = codec.open_asymmetric(key, &a, Tag::Pair);
            let _ = codec.verify_signature(key, &a, &b);
        }
    }
}
