//! Errors reported when a [`Tree`][crate::Tree] fails its self-check.

use thiserror::Error;

/// The first place where an in-order walk of a tree stopped strictly increasing.
///
/// `position` is the in-order index of the second key of the offending adjacent pair, so a
/// tree built from `[5, 5]` reports `Duplicate { position: 1 }`.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvariantError {
    /// Two adjacent in-order keys compare equal.
    #[error("duplicate key at in-order position {position}")]
    Duplicate {
        /// In-order index of the repeated key.
        position: usize,
    },

    /// An in-order key is smaller than the key visited just before it.
    #[error("key out of order at in-order position {position}")]
    OutOfOrder {
        /// In-order index of the misplaced key.
        position: usize,
    },
}

impl InvariantError {
    /// In-order index of the key that broke the strictly increasing sequence.
    pub fn position(&self) -> usize {
        match self {
            Self::Duplicate { position } | Self::OutOfOrder { position } => *position,
        }
    }
}
