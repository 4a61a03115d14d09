//! Error policy by data provenance.
//!
//! A framing or length error on bytes this process encoded itself means an
//! invariant is broken; the enclosing request must not continue. The same
//! error on bytes that came from the network, or out of a decryption of
//! network ciphertext, is an ordinary rejection the caller handles.

use serde::{Deserialize, Serialize};

use crate::error::{ItemError, Result};

/// Where the bytes under inspection came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Provenance {
    /// Produced by this process's own encoder.
    Local,
    /// Received from a peer, or decrypted from received ciphertext.
    Received,
}

impl Provenance {
    /// Apply the policy to the outcome of an operation.
    ///
    /// Received errors are returned unchanged.
    ///
    /// # Panics
    ///
    /// Panics on any error when `self` is [`Provenance::Local`].
    #[track_caller]
    pub fn settle<T>(self, result: Result<T>) -> Result<T> {
        match (self, result) {
            (Provenance::Local, Err(err)) => abort(err),
            (_, result) => result,
        }
    }
}

/// Unwrap the outcome of an operation over locally produced bytes.
///
/// # Panics
///
/// Panics on any error, after logging it.
#[track_caller]
pub fn settle_local<T>(result: Result<T>) -> T {
    match result {
        Ok(value) => value,
        Err(err) => abort(err),
    }
}

#[track_caller]
fn abort(err: ItemError) -> ! {
    tracing::error!(error = %err, "aborting on locally produced item");
    panic!("broken invariant on locally produced item: {err}");
}
