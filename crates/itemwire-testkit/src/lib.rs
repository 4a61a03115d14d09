//! # itemwire testkit
//!
//! Testing utilities for itemwire.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Golden vectors**: Known items with expected encodings
//! - **Generators**: Proptest strategies for well-formed items over real key material
//! - **Fixtures**: Helper structs for setting up test scenarios
//!
//! ## Golden Vectors
//!
//! ```rust
//! use itemwire_testkit::vectors::{all_vectors, encode_vector};
//!
//! for vector in all_vectors() {
//!     let bytes = encode_vector(&vector).unwrap();
//!     println!("{}: {}", vector.name, hex::encode(bytes));
//! }
//! ```
//!
//! ## Property Testing
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use itemwire_testkit::generators::item_pair;
//!
//! proptest! {
//!     #[test]
//!     fn equality_is_structural((seed, a, b) in item_pair()) {
//!         let k = Keyring::from_seed(seed);
//!         let (ea, eb) = (encode(&a, &k)?, encode(&b, &k)?);
//!         prop_assert_eq!(items_equal(&ea, &eb)?, a == b);
//!     }
//! }
//! ```
//!
//! ## Test Fixtures
//!
//! ```rust
//! use itemwire_testkit::fixtures::TestFixture;
//!
//! let fixture = TestFixture::new();
//! let wire = fixture.sealed_message(1, b"hello");
//! ```

pub mod fixtures;
pub mod generators;
pub mod vectors;

pub use fixtures::{multi_party_fixtures, TestFixture};
pub use generators::{item, item_pair, key_ref, leaf};
pub use vectors::{all_vectors, encode_vector, verify_all_vectors, GoldenVector};
