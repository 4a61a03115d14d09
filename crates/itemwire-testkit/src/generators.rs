//! Proptest generators for property-based testing.
//!
//! Generated items are well-formed and their cryptograms come from a real
//! [`Keyring`], so distinct items differ except on a primitive collision.

use proptest::prelude::*;

use itemwire_core::{Item, KeyRef, IV_SIZE};
use itemwire_crypto::{seal_asymmetric, seal_symmetric, sign, Keyring};

/// Generate a keyring from a random seed.
pub fn keyring() -> impl Strategy<Value = Keyring> {
    any::<[u8; 32]>().prop_map(Keyring::from_seed)
}

/// Generate a key reference from a small pool, so that shared keys occur.
pub fn key_ref() -> impl Strategy<Value = KeyRef> {
    (0u32..4, 0u32..4).prop_map(|(principal, count)| KeyRef::new(principal, count))
}

/// Generate data content of at most `max_len` bytes.
pub fn data(max_len: usize) -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 0..=max_len)
}

/// Generate an IV from a small pool.
pub fn iv() -> impl Strategy<Value = [u8; IV_SIZE]> {
    (0u8..4).prop_map(|b| [b; IV_SIZE])
}

/// Generate a leaf item: one that holds no nested item.
pub fn leaf() -> impl Strategy<Value = Item> {
    prop_oneof![
        data(40).prop_map(Item::data),
        (key_ref(), 0u8..4).prop_map(|(key, increment)| Item::nonce(key, increment)),
        key_ref().prop_map(Item::SymmetricKey),
        key_ref().prop_map(Item::PublicKey),
        key_ref().prop_map(Item::PrivateKey),
    ]
}

/// Generate a well-formed item whose cryptograms are produced by `keyring`.
pub fn item(keyring: Keyring) -> impl Strategy<Value = Item> {
    leaf().prop_recursive(4, 32, 2, move |inner| {
        let sym = keyring.clone();
        let asym = keyring.clone();
        let sig = keyring.clone();
        prop_oneof![
            (inner.clone(), inner.clone()).prop_map(|(a, b)| Item::pair(a, b)),
            inner.clone().prop_map(Item::hash),
            (key_ref(), inner.clone()).prop_map(|(key, payload)| Item::hmac(key, payload)),
            (key_ref(), inner.clone(), iv()).prop_filter_map(
                "symmetric sealing failed",
                move |(key, payload, iv)| seal_symmetric(&sym, key, payload, iv).ok()
            ),
            (key_ref(), inner.clone(), 0u8..4).prop_filter_map(
                "asymmetric sealing failed",
                move |(key, payload, e)| seal_asymmetric(&asym, key, payload, [e; 32]).ok()
            ),
            (key_ref(), inner).prop_filter_map("signing failed", move |(key, payload)| {
                sign(&sig, key, payload).ok()
            }),
        ]
    })
}

/// Generate a keyring seed and two items built from that keyring.
pub fn item_pair() -> impl Strategy<Value = ([u8; 32], Item, Item)> {
    any::<[u8; 32]>().prop_flat_map(|seed| {
        let keyring = Keyring::from_seed(seed);
        (Just(seed), item(keyring.clone()), item(keyring))
    })
}
