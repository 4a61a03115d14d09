//! Limits applied when inspecting encoded items.

use serde::{Deserialize, Serialize};

use crate::error::{ItemError, Result};

/// Resource limits for parsing, validation and comparison.
///
/// The wire format itself is fixed; these only bound how much work an
/// untrusted buffer can cause.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecConfig {
    /// Maximum pair nesting depth.
    pub max_depth: usize,
    /// Maximum size of an encoded item in bytes.
    pub max_item_size: usize,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            max_depth: 64,
            max_item_size: 16 * 1024 * 1024,
        }
    }
}

impl CodecConfig {
    pub(crate) fn check_size(&self, size: usize) -> Result<()> {
        if size > self.max_item_size {
            return Err(ItemError::ItemTooLarge {
                size,
                max: self.max_item_size,
            });
        }
        Ok(())
    }

    pub(crate) fn check_depth(&self, depth: usize) -> Result<()> {
        if depth > self.max_depth {
            return Err(ItemError::DepthExceeded(self.max_depth));
        }
        Ok(())
    }
}
