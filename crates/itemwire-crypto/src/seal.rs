//! Building encrypted and signed items, and opening received ones.
//!
//! Sealing encodes the payload item and hands the bytes to the provider.
//! Opening goes the other way for bytes that arrived from a peer: decrypt,
//! then check that the plaintext is framed as the expected item. Every
//! failure on the open side is a typed rejection, never a panic.

use bytes::Bytes;

use itemwire_core::{
    check_tag_against_ciphertext, encode, parse, read_tag, validate, CodecConfig, CryptoProvider,
    Item, ItemView, KeyRef, Payload, Provenance, Sealed, Tag, IV_SIZE,
};

use crate::error::{CryptoError, Result};

/// Encrypt `payload` under the symmetric key of `key`.
pub fn seal_symmetric<P: CryptoProvider + ?Sized>(
    provider: &P,
    key: KeyRef,
    payload: Item,
    iv: [u8; IV_SIZE],
) -> Result<Item> {
    let plaintext = encode(&payload, provider)?;
    let ciphertext = provider.symmetric_encrypt(key, &iv, &plaintext)?;

    let mut entropy = Vec::with_capacity(IV_SIZE + ciphertext.len());
    entropy.extend_from_slice(&iv);
    entropy.extend_from_slice(&ciphertext);
    Ok(Item::SymmetricEncrypted(Sealed::new(
        key,
        Payload::present(payload),
        entropy,
    )))
}

/// Encrypt `payload` to the public key of `key`.
pub fn seal_asymmetric<P: CryptoProvider + ?Sized>(
    provider: &P,
    key: KeyRef,
    payload: Item,
    ephemeral: [u8; 32],
) -> Result<Item> {
    let plaintext = encode(&payload, provider)?;
    let ciphertext = provider.asymmetric_encrypt(key, ephemeral, &plaintext)?;
    Ok(Item::AsymmetricEncrypted(Sealed::new(
        key,
        Payload::present(payload),
        ciphertext,
    )))
}

/// Sign `payload` with the private key of `key`.
pub fn sign<P: CryptoProvider + ?Sized>(provider: &P, key: KeyRef, payload: Item) -> Result<Item> {
    let message = encode(&payload, provider)?;
    let signature = provider.sign(key, &message)?;
    Ok(Item::AsymmetricSignature(Sealed::new(
        key,
        Payload::present(payload),
        signature,
    )))
}

/// Decrypt a received symmetric ciphertext item.
///
/// Returns the plaintext, which is the encoding of an item tagged
/// `expected`.
pub fn open_symmetric<P: CryptoProvider + ?Sized>(
    provider: &P,
    key: KeyRef,
    bytes: &[u8],
    expected: Tag,
    config: &CodecConfig,
) -> Result<Bytes> {
    check_received_tag(bytes, Tag::SymmetricEncrypted)?;
    let ItemView::SymmetricEncrypted { iv, ciphertext } = parse(bytes)? else {
        return Err(CryptoError::MalformedCryptogram(
            "not a symmetric ciphertext".into(),
        ));
    };
    let plaintext = provider
        .symmetric_decrypt(key, iv, ciphertext)
        .map_err(|e| reject(CryptoError::DecryptionError(e.to_string())))?;
    accept_plaintext(plaintext, expected, config)
}

/// Decrypt a received asymmetric ciphertext item.
pub fn open_asymmetric<P: CryptoProvider + ?Sized>(
    provider: &P,
    key: KeyRef,
    bytes: &[u8],
    expected: Tag,
    config: &CodecConfig,
) -> Result<Bytes> {
    check_received_tag(bytes, Tag::AsymmetricEncrypted)?;
    let ItemView::Cryptogram { bytes: ciphertext, .. } = parse(bytes)? else {
        return Err(CryptoError::MalformedCryptogram(
            "not an asymmetric ciphertext".into(),
        ));
    };
    let plaintext = provider
        .asymmetric_decrypt(key, ciphertext)
        .map_err(|e| reject(CryptoError::DecryptionError(e.to_string())))?;
    accept_plaintext(plaintext, expected, config)
}

/// Verify a received signature item over a received encoded message.
pub fn verify_signature<P: CryptoProvider + ?Sized>(
    provider: &P,
    key: KeyRef,
    signature: &[u8],
    message: &[u8],
    config: &CodecConfig,
) -> Result<()> {
    check_received_tag(signature, Tag::AsymmetricSignature)?;
    validate(message, config).map_err(|err| reject(err.into()))?;
    let ItemView::Cryptogram { bytes: sig, .. } = parse(signature)? else {
        return Err(CryptoError::MalformedCryptogram("not a signature".into()));
    };
    provider
        .verify(key, message, sig)
        .map_err(|_| reject(CryptoError::InvalidSignature))
}

fn check_received_tag(bytes: &[u8], tag: Tag) -> Result<()> {
    // read_tag already demands all tag bytes agree.
    let found = read_tag(bytes).map_err(|err| reject(err.into()))?;
    if found != tag {
        return Err(reject(CryptoError::WrongKind {
            expected: tag,
            found,
        }));
    }
    Ok(())
}

fn accept_plaintext(plaintext: Vec<u8>, expected: Tag, config: &CodecConfig) -> Result<Bytes> {
    check_tag_against_ciphertext(&plaintext, expected, Provenance::Received)?;
    validate(&plaintext, config).map_err(|err| reject(err.into()))?;
    Ok(Bytes::from(plaintext))
}

fn reject(err: CryptoError) -> CryptoError {
    tracing::debug!(error = %err, "rejecting received item");
    err
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keyring::Keyring;
    use itemwire_core::{items_equal, ItemError, TAG_LENGTH};
    use proptest::prelude::*;

    fn keyring() -> Keyring {
        Keyring::from_seed([7u8; 32])
    }

    fn message() -> Item {
        Item::pair(Item::data("hello"), Item::nonce(KeyRef::new(1, 4), 0))
    }

    #[test]
    fn test_symmetric_seal_open() {
        let k = keyring();
        let key = KeyRef::new(1, 0);
        let sealed = seal_symmetric(&k, key, message(), [3u8; IV_SIZE]).unwrap();
        assert!(sealed.well_formed());

        let wire = encode(&sealed, &k).unwrap();
        let plaintext =
            open_symmetric(&k, key, &wire, Tag::Pair, &CodecConfig::default()).unwrap();
        let expected = encode(&message(), &k).unwrap();
        assert!(items_equal(&plaintext, &expected).unwrap());
    }

    #[test]
    fn test_symmetric_entropy_layout() {
        let k = keyring();
        let sealed = seal_symmetric(&k, KeyRef::new(1, 0), message(), [5u8; IV_SIZE]).unwrap();
        let wire = encode(&sealed, &k).unwrap();
        assert_eq!(&wire[TAG_LENGTH..TAG_LENGTH + IV_SIZE], &[5u8; IV_SIZE]);
    }

    #[test]
    fn test_open_with_wrong_key_is_rejected() {
        let k = keyring();
        let sealed = seal_symmetric(&k, KeyRef::new(1, 0), message(), [3u8; IV_SIZE]).unwrap();
        let wire = encode(&sealed, &k).unwrap();
        let err = open_symmetric(&k, KeyRef::new(2, 0), &wire, Tag::Pair, &CodecConfig::default())
            .unwrap_err();
        assert!(matches!(err, CryptoError::DecryptionError(_)));
    }

    #[test]
    fn test_open_rejects_unexpected_plaintext_tag() {
        let k = keyring();
        let key = KeyRef::new(1, 0);
        let sealed = seal_symmetric(&k, key, Item::data("x"), [1u8; IV_SIZE]).unwrap();
        let wire = encode(&sealed, &k).unwrap();
        let err = open_symmetric(&k, key, &wire, Tag::Pair, &CodecConfig::default()).unwrap_err();
        assert!(matches!(
            err,
            CryptoError::Item(ItemError::FramingMismatch { .. })
        ));
    }

    #[test]
    fn test_open_rejects_garbage_plaintext() {
        // Encrypt raw bytes that are not an item at all.
        let k = keyring();
        let key = KeyRef::new(1, 0);
        let iv = [8u8; IV_SIZE];
        let ct = k.symmetric_encrypt(key, &iv, &[0x02, 0x02, 0x02, 0x02, 0x50]).unwrap();
        let mut wire = Tag::SymmetricEncrypted.field().to_vec();
        wire.extend_from_slice(&iv);
        wire.extend_from_slice(&ct);

        let err = open_symmetric(&k, key, &wire, Tag::Pair, &CodecConfig::default()).unwrap_err();
        assert!(matches!(
            err,
            CryptoError::Item(ItemError::LengthDecode { .. })
        ));
    }

    #[test]
    fn test_open_wrong_item_kind() {
        let k = keyring();
        let wire = encode(&Item::data("plain"), &k).unwrap();
        let err = open_symmetric(&k, KeyRef::new(1, 0), &wire, Tag::Data, &CodecConfig::default())
            .unwrap_err();
        assert!(matches!(err, CryptoError::WrongKind { .. }));
    }

    #[test]
    fn test_asymmetric_seal_open() {
        let k = keyring();
        let key = KeyRef::new(4, 1);
        let sealed = seal_asymmetric(&k, key, message(), [9u8; 32]).unwrap();
        let wire = encode(&sealed, &k).unwrap();
        let plaintext =
            open_asymmetric(&k, key, &wire, Tag::Pair, &CodecConfig::default()).unwrap();
        assert!(items_equal(&plaintext, &encode(&message(), &k).unwrap()).unwrap());
    }

    #[test]
    fn test_fresh_ephemeral_changes_ciphertext() {
        let k = keyring();
        let key = KeyRef::new(4, 1);
        let a = encode(&seal_asymmetric(&k, key, message(), [1u8; 32]).unwrap(), &k).unwrap();
        let b = encode(&seal_asymmetric(&k, key, message(), [2u8; 32]).unwrap(), &k).unwrap();
        assert!(!items_equal(&a, &b).unwrap());
    }

    #[test]
    fn test_sign_verify() {
        let k = keyring();
        let key = KeyRef::new(2, 0);
        let signed = sign(&k, key, message()).unwrap();
        let sig = encode(&signed, &k).unwrap();
        let msg = encode(&message(), &k).unwrap();
        verify_signature(&k, key, &sig, &msg, &CodecConfig::default()).unwrap();

        let other = encode(&Item::data("other"), &k).unwrap();
        assert!(matches!(
            verify_signature(&k, key, &sig, &other, &CodecConfig::default()),
            Err(CryptoError::InvalidSignature)
        ));
    }

    #[test]
    fn test_verify_rejects_malformed_message() {
        let k = keyring();
        let key = KeyRef::new(2, 0);
        let sig = encode(&sign(&k, key, message()).unwrap(), &k).unwrap();
        let truncated = [0x02, 0x02, 0x02, 0x02, 0x50];
        assert!(matches!(
            verify_signature(&k, key, &sig, &truncated, &CodecConfig::default()),
            Err(CryptoError::Item(ItemError::LengthDecode { .. }))
        ));
    }

    #[test]
    fn test_open_rejects_tampered_tag_field() {
        let k = keyring();
        let key = KeyRef::new(1, 0);
        let sealed = seal_symmetric(&k, key, message(), [3u8; IV_SIZE]).unwrap();
        let mut wire = encode(&sealed, &k).unwrap().to_vec();
        wire[1] = Tag::Data.to_u8();
        let err = open_symmetric(&k, key, &wire, Tag::Pair, &CodecConfig::default()).unwrap_err();
        assert!(matches!(
            err,
            CryptoError::Item(ItemError::FramingMismatch { expected: None, .. })
        ));

        let sig = encode(&sign(&k, key, message()).unwrap(), &k).unwrap();
        let msg = encode(&message(), &k).unwrap();
        let err = verify_signature(&k, key, &msg, &sig, &CodecConfig::default()).unwrap_err();
        assert!(matches!(
            err,
            CryptoError::WrongKind {
                expected: Tag::AsymmetricSignature,
                found: Tag::Pair,
            }
        ));
    }

    fn payload() -> impl Strategy<Value = Item> {
        (
            prop::collection::vec(any::<u8>(), 0..200),
            prop::collection::vec(any::<u8>(), 0..200),
            any::<bool>(),
        )
            .prop_map(|(first, second, paired)| {
                if paired {
                    Item::pair(Item::data(first), Item::data(second))
                } else {
                    Item::data(first)
                }
            })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn prop_symmetric_open_recovers_payload(
            item in payload(),
            iv in any::<[u8; IV_SIZE]>(),
        ) {
            let k = keyring();
            let key = KeyRef::new(1, 0);
            let wire = encode(&seal_symmetric(&k, key, item.clone(), iv)?, &k)?;
            let plaintext = open_symmetric(&k, key, &wire, item.tag(), &CodecConfig::default())?;
            prop_assert_eq!(plaintext, encode(&item, &k)?);
        }

        #[test]
        fn prop_asymmetric_open_recovers_payload(
            item in payload(),
            ephemeral in any::<[u8; 32]>(),
        ) {
            let k = keyring();
            let key = KeyRef::new(4, 1);
            let wire = encode(&seal_asymmetric(&k, key, item.clone(), ephemeral)?, &k)?;
            let plaintext = open_asymmetric(&k, key, &wire, item.tag(), &CodecConfig::default())?;
            prop_assert_eq!(plaintext, encode(&item, &k)?);
        }

        #[test]
        fn prop_flipped_symmetric_byte_is_rejected(
            item in payload(),
            position in any::<prop::sample::Index>(),
            flip in 1u8..=255,
        ) {
            let k = keyring();
            let key = KeyRef::new(1, 0);
            let sealed = seal_symmetric(&k, key, item.clone(), [2u8; IV_SIZE])?;
            let mut wire = encode(&sealed, &k)?.to_vec();
            let at = position.index(wire.len());
            wire[at] ^= flip;
            let opened = open_symmetric(&k, key, &wire, item.tag(), &CodecConfig::default());
            prop_assert!(opened.is_err(), "byte {} flipped yet opened", at);
        }

        #[test]
        fn prop_flipped_asymmetric_byte_is_rejected(
            item in payload(),
            position in any::<prop::sample::Index>(),
            flip in 1u8..=255,
        ) {
            let k = keyring();
            let key = KeyRef::new(4, 1);
            let sealed = seal_asymmetric(&k, key, item.clone(), [5u8; 32])?;
            let mut wire = encode(&sealed, &k)?.to_vec();
            let at = position.index(wire.len());
            wire[at] ^= flip;
            let opened = open_asymmetric(&k, key, &wire, item.tag(), &CodecConfig::default());
            prop_assert!(opened.is_err(), "byte {} flipped yet opened", at);
        }
    }
}
