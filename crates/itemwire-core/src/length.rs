//! Length prefix for the first component of a pair.
//!
//! Two forms, selected by the high bit of the first byte:
//!
//! ```text
//! short: 0xxxxxxx                              n in 0..=127
//! wide:  1xxxxxxx xxxxxxxx xxxxxxxx xxxxxxxx   n in 128..=i32::MAX, big-endian
//! ```
//!
//! The wide form is `size_of::<i32>()` bytes holding `n | 0x8000_0000`.
//! A wide prefix carrying a value that fits the short form is rejected, so
//! every length has exactly one encoding.

use bytes::BufMut;

use crate::error::{ItemError, Result};

/// Largest value written in the one-byte form.
pub const SHORT_MAX: usize = 0x7F;

/// Width of the wide form.
pub const WIDE_WIDTH: usize = std::mem::size_of::<i32>();

/// Largest encodable length.
pub const MAX_LENGTH: usize = i32::MAX as usize;

const WIDE_FLAG: u32 = 0x8000_0000;

/// A decoded length prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LengthPrefix {
    /// The declared length.
    pub value: usize,
    /// Bytes taken by the prefix itself.
    pub width: usize,
}

/// Number of bytes the prefix for `n` takes.
pub const fn encoded_width(n: usize) -> usize {
    if n <= SHORT_MAX {
        1
    } else {
        WIDE_WIDTH
    }
}

/// Append the length prefix for `n`.
pub fn encode_length<B: BufMut>(n: usize, dst: &mut B) -> Result<()> {
    if n <= SHORT_MAX {
        dst.put_u8(n as u8);
    } else if n <= MAX_LENGTH {
        dst.put_u32(n as u32 | WIDE_FLAG);
    } else {
        return Err(ItemError::LengthOverflow(n));
    }
    Ok(())
}

/// Decode the length prefix at the start of `src`.
///
/// The declared length must fit in the bytes following the prefix.
pub fn decode_length(src: &[u8]) -> Result<LengthPrefix> {
    let first = *src.first().ok_or(ItemError::Truncated {
        field: "pair length",
        needed: 1,
        remaining: 0,
    })?;

    let prefix = if first & 0x80 == 0 {
        LengthPrefix {
            value: first as usize,
            width: 1,
        }
    } else {
        let raw: [u8; WIDE_WIDTH] = src
            .get(..WIDE_WIDTH)
            .and_then(|b| b.try_into().ok())
            .ok_or(ItemError::Truncated {
                field: "pair length",
                needed: WIDE_WIDTH,
                remaining: src.len(),
            })?;
        let value = (u32::from_be_bytes(raw) & !WIDE_FLAG) as usize;
        if value <= SHORT_MAX {
            return Err(ItemError::NonCanonicalLength(value));
        }
        LengthPrefix {
            value,
            width: WIDE_WIDTH,
        }
    };

    let remaining = src.len() - prefix.width;
    if prefix.value > remaining {
        return Err(ItemError::LengthDecode {
            declared: prefix.value,
            remaining,
        });
    }
    Ok(prefix)
}
