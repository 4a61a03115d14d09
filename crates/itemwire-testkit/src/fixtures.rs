//! Test fixtures and helpers.
//!
//! Common setup code for integration tests.

use bytes::Bytes;
use rand::RngCore;

use itemwire::ItemCodec;
use itemwire_core::{Item, KeyRef, IV_SIZE};
use itemwire_crypto::Keyring;

/// A test fixture: one party with its own keyring.
pub struct TestFixture {
    pub codec: ItemCodec<Keyring>,
    pub principal: u32,
}

impl TestFixture {
    /// Create a new test fixture with random key material.
    pub fn new() -> Self {
        Self {
            codec: ItemCodec::with_defaults(Keyring::generate()),
            principal: 0,
        }
    }

    /// Create with deterministic key material from seed.
    pub fn with_seed(seed: [u8; 32]) -> Self {
        Self {
            codec: ItemCodec::with_defaults(Keyring::from_seed(seed)),
            principal: 0,
        }
    }

    pub fn keyring(&self) -> &Keyring {
        self.codec.provider()
    }

    /// This party's key with counter `count`.
    pub fn key(&self, count: u32) -> KeyRef {
        KeyRef::new(self.principal, count)
    }

    /// A fresh random IV.
    pub fn fresh_iv(&self) -> [u8; IV_SIZE] {
        let mut iv = [0u8; IV_SIZE];
        rand::thread_rng().fill_bytes(&mut iv);
        iv
    }

    /// A typical message: a nonce paired with a data body.
    pub fn message(&self, body: &[u8]) -> Item {
        Item::pair(
            Item::nonce(self.key(0), 0),
            Item::data(Bytes::copy_from_slice(body)),
        )
    }

    /// Encode a locally built item.
    pub fn encode(&self, item: &Item) -> Bytes {
        self.codec.encode_local(item)
    }

    /// Encrypt `message(body)` under key `count` with a fresh IV, and
    /// encode it.
    pub fn sealed_message(&self, count: u32, body: &[u8]) -> Bytes {
        let item = self
            .codec
            .seal_symmetric(self.key(count), self.message(body), self.fresh_iv())
            .unwrap_or_else(|err| panic!("sealing a fixture message failed: {err}"));
        self.encode(&item)
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// Create multiple test fixtures for multi-party tests.
pub fn multi_party_fixtures(count: usize) -> Vec<TestFixture> {
    (0..count)
        .map(|i| {
            let mut seed = [0u8; 32];
            seed[0] = i as u8;
            TestFixture {
                principal: i as u32,
                ..TestFixture::with_seed(seed)
            }
        })
        .collect()
}
