//! Error types for itemwire core.

use std::fmt;

use thiserror::Error;

use crate::tag::Tag;

/// Errors that can occur while encoding, parsing or comparing items.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ItemError {
    /// The redundant tag field is inconsistent or not the expected tag.
    #[error("framing mismatch: expected {}, found {}", ExpectedTag(.expected), hex::encode(.found))]
    FramingMismatch {
        expected: Option<u8>,
        found: Vec<u8>,
    },

    /// A pair length prefix declares more bytes than the buffer holds.
    #[error("length decode error: declared {declared} bytes, {remaining} remaining")]
    LengthDecode { declared: usize, remaining: usize },

    /// A wide length prefix carries a value that has a one-byte encoding.
    #[error("non-canonical length encoding for {0}")]
    NonCanonicalLength(usize),

    /// A pair component is too large for the wide length form.
    #[error("length {0} exceeds the encodable maximum")]
    LengthOverflow(usize),

    /// The tag field holds a byte outside the tag enumeration.
    #[error("unknown tag 0x{0:02x}")]
    UnknownTag(u8),

    /// Two buffers with equal tags have different overall sizes.
    #[error("size mismatch: {left} vs {right} bytes")]
    SizeMismatch { left: usize, right: usize },

    /// Two well-framed buffers encode different items.
    #[error("items not equal: {0}")]
    NotEqual(Inequality),

    /// A fixed-width field runs past the end of the buffer.
    #[error("truncated {field}: need {needed} bytes, {remaining} remaining")]
    Truncated {
        field: &'static str,
        needed: usize,
        remaining: usize,
    },

    /// Pair nesting exceeds the configured depth.
    #[error("nesting depth exceeds limit of {0}")]
    DepthExceeded(usize),

    /// Buffer exceeds the configured maximum item size.
    #[error("item of {size} bytes exceeds limit of {max}")]
    ItemTooLarge { size: usize, max: usize },

    /// An item without an attributable payload was used where one is required.
    #[error("ill-formed item: {0}")]
    IllFormed(&'static str),

    /// The cryptographic primitive provider failed.
    #[error("provider error: {0}")]
    Provider(String),
}

impl ItemError {
    /// Whether this error only says the two compared items differ.
    pub fn is_inequality(&self) -> bool {
        matches!(self, ItemError::NotEqual(_) | ItemError::SizeMismatch { .. })
    }
}

/// The reason two encoded items were found to differ.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Inequality {
    /// Outer tags differ.
    Tags { left: Tag, right: Tag },
    /// Pair length prefixes differ.
    PairSplit { left: usize, right: usize },
    /// Nonce increment bytes differ.
    NonceIncrement,
    /// Symmetric ciphertext IVs differ.
    Iv,
    /// Data bytes or cryptogram bytes differ.
    Content(Tag),
}

impl fmt::Display for Inequality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Inequality::Tags { left, right } => write!(f, "different tags ({left} vs {right})"),
            Inequality::PairSplit { left, right } => {
                write!(f, "pairs split differently ({left} vs {right})")
            }
            Inequality::NonceIncrement => write!(f, "nonces with different increment"),
            Inequality::Iv => write!(f, "encrypted items with distinct IVs"),
            Inequality::Content(tag) => write!(f, "{tag} content differs"),
        }
    }
}

struct ExpectedTag<'a>(&'a Option<u8>);

impl fmt::Display for ExpectedTag<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(tag) => write!(f, "tag 0x{tag:02x}"),
            None => write!(f, "a uniform tag"),
        }
    }
}

/// Result type for item operations.
pub type Result<T> = std::result::Result<T, ItemError>;
