// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Errors raised while laying out or reading a descriptor table.
//!
//! Registration never fails: duplicate members, malformed signatures and
//! unresolved notify names are accepted silently. Only the layout stage can
//! report a problem, and only when an internal size computation disagrees
//! with what was written or a count no longer fits a 32-bit word.

use std::fmt;

/// Layout or read failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayoutError {
    /// A write went past the preallocated table.
    WriteOverflow { offset: usize, capacity: usize },
    /// A read went past the end of the table or blob.
    ReadOutOfBounds { offset: usize, len: usize },
    /// The precomputed size and the number of words written differ.
    SizeMismatch { expected: usize, written: usize },
    /// A count, index or offset does not fit in 32 bits.
    IndexOverflow { what: &'static str },
}

impl fmt::Display for LayoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayoutError::WriteOverflow { offset, capacity } => {
                write!(f, "write at word {} exceeds table of {} words", offset, capacity)
            }
            LayoutError::ReadOutOfBounds { offset, len } => {
                write!(f, "read at {} is out of bounds (len {})", offset, len)
            }
            LayoutError::SizeMismatch { expected, written } => write!(
                f,
                "table size mismatch: computed {} words, wrote {}",
                expected, written
            ),
            LayoutError::IndexOverflow { what } => write!(f, "{} does not fit in 32 bits", what),
        }
    }
}

impl std::error::Error for LayoutError {}

pub type LayoutResult<T> = core::result::Result<T, LayoutError>;

/// Narrow a `usize` to a table word.
pub(crate) fn to_word(value: usize, what: &'static str) -> LayoutResult<u32> {
    u32::try_from(value).map_err(|_| LayoutError::IndexOverflow { what })
}
