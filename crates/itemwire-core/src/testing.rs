//! A transparent provider for unit tests: every cryptogram spells out its
//! inputs, so distinct inputs give distinct bytes.

use bytes::{BufMut, Bytes, BytesMut};

use crate::error::{ItemError, Result};
use crate::item::KeyRef;
use crate::provider::{CryptoProvider, KeyKind, IV_SIZE};

pub(crate) struct StubProvider;

fn labelled(label: &[u8], key: Option<KeyRef>, data: &[u8]) -> Bytes {
    let mut buf = BytesMut::new();
    buf.put_slice(label);
    if let Some(key) = key {
        buf.put_u32(key.principal.0);
        buf.put_u32(key.count);
    }
    buf.put_slice(data);
    buf.freeze()
}

impl CryptoProvider for StubProvider {
    fn nonce(&self, key: KeyRef) -> Result<Bytes> {
        Ok(labelled(b"nonce", Some(key), &[]))
    }

    fn key(&self, kind: KeyKind, key: KeyRef) -> Result<Bytes> {
        let label: &[u8] = match kind {
            KeyKind::Symmetric => b"sym",
            KeyKind::Public => b"pub",
            KeyKind::Private => b"prv",
        };
        Ok(labelled(label, Some(key), &[]))
    }

    fn hash(&self, data: &[u8]) -> Result<Bytes> {
        Ok(labelled(b"hash", None, data))
    }

    fn hmac(&self, key: KeyRef, data: &[u8]) -> Result<Bytes> {
        Ok(labelled(b"hmac", Some(key), data))
    }

    fn symmetric_encrypt(
        &self,
        key: KeyRef,
        iv: &[u8; IV_SIZE],
        plaintext: &[u8],
    ) -> Result<Bytes> {
        let mut data = iv.to_vec();
        data.extend_from_slice(plaintext);
        Ok(labelled(b"senc", Some(key), &data))
    }

    fn symmetric_decrypt(
        &self,
        _key: KeyRef,
        _iv: &[u8; IV_SIZE],
        _ciphertext: &[u8],
    ) -> Result<Vec<u8>> {
        Err(ItemError::Provider("stub cannot decrypt".into()))
    }

    fn asymmetric_encrypt(
        &self,
        key: KeyRef,
        ephemeral: [u8; 32],
        plaintext: &[u8],
    ) -> Result<Bytes> {
        let mut data = ephemeral.to_vec();
        data.extend_from_slice(plaintext);
        Ok(labelled(b"aenc", Some(key), &data))
    }

    fn asymmetric_decrypt(&self, _key: KeyRef, _ciphertext: &[u8]) -> Result<Vec<u8>> {
        Err(ItemError::Provider("stub cannot decrypt".into()))
    }

    fn sign(&self, key: KeyRef, message: &[u8]) -> Result<Bytes> {
        Ok(labelled(b"sig", Some(key), message))
    }

    fn verify(&self, key: KeyRef, message: &[u8], signature: &[u8]) -> Result<()> {
        if labelled(b"sig", Some(key), message).as_ref() == signature {
            Ok(())
        } else {
            Err(ItemError::Provider("bad signature".into()))
        }
    }
}
