// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Descriptor format constants and compiler configuration.
//!
//! Every layout constant of the produced table lives here.
//! **NEVER hardcode word widths or header slots elsewhere!**
//!
//! # Architecture
//!
//! - **Level 1 (Static)**: format constants fixed by the consumer (revision,
//!   header slots, row widths, type-info bits)
//! - **Level 2 (Dynamic)**: [`CompilerConfig`] for per-type choices (access
//!   level of registered methods, string descriptor layout)
//!
//! # Example
//!
//! ```
//! use dynmeta::config::{BlobLayout, CompilerConfig, HEADER_WORDS};
//! use dynmeta::Access;
//!
//! let config = CompilerConfig::default()
//!     .with_method_access(Access::Protected)
//!     .with_blob_layout(BlobLayout::ByteArrayData);
//! assert_eq!(config.blob_layout.descriptor_width(), 24);
//! assert_eq!(HEADER_WORDS, 14);
//! ```

use crate::member::Access;

// =======================================================================
// Table format
// =======================================================================

/// Format revision written into header word 0.
pub const FORMAT_REVISION: u32 = 7;

/// Number of header words. The signal count is the last one.
pub const HEADER_WORDS: usize = 14;

/// Words per class-info row: key, value.
pub const CLASS_INFO_WORDS: usize = 2;

/// Words per method row: name, argc, parameter offset, tag, flags.
pub const METHOD_WORDS: usize = 5;

/// Words per property row: name, type, flags.
pub const PROPERTY_WORDS: usize = 3;

/// Words per property in the trailing notify block.
pub const PROPERTY_NOTIFY_WORDS: usize = 1;

/// Header slot indices, in serialization order.
pub mod header {
    pub const REVISION: usize = 0;
    pub const CLASS_NAME: usize = 1;
    pub const CLASS_INFO_COUNT: usize = 2;
    pub const CLASS_INFO_OFFSET: usize = 3;
    pub const METHOD_COUNT: usize = 4;
    pub const METHOD_OFFSET: usize = 5;
    pub const PROPERTY_COUNT: usize = 6;
    pub const PROPERTY_OFFSET: usize = 7;
    pub const ENUM_COUNT: usize = 8;
    pub const ENUM_OFFSET: usize = 9;
    pub const CONSTRUCTOR_COUNT: usize = 10;
    pub const CONSTRUCTOR_OFFSET: usize = 11;
    pub const FLAGS: usize = 12;
    pub const SIGNAL_COUNT: usize = 13;
}

// =======================================================================
// Parameter type-info words
// =======================================================================

/// Set on a type-info word that carries a string-pool index instead of a
/// built-in type id.
pub const UNRESOLVED_TYPE: u32 = 0x8000_0000;

/// Mask extracting the string-pool index from an unresolved type-info word.
pub const TYPE_NAME_INDEX_MASK: u32 = 0x7FFF_FFFF;

// =======================================================================
// Runtime configuration
// =======================================================================

/// Layout of the per-string descriptors at the head of the string blob.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlobLayout {
    /// `(u32 byte_length, u32 byte_offset_from_blob_start)`, little endian.
    #[default]
    Compact,
    /// 64-bit static byte-array header: `i32 ref (-1)`, `i32 size`,
    /// `u32 alloc (0)`, `u32 padding`, `i64 offset` measured from the
    /// descriptor's own first byte.
    ByteArrayData,
}

impl BlobLayout {
    /// Width of one string descriptor in bytes.
    pub const fn descriptor_width(self) -> usize {
        match self {
            Self::Compact => 8,
            Self::ByteArrayData => 24,
        }
    }
}

/// Per-type compiler settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompilerConfig {
    /// Revision written into the header.
    pub revision: u32,
    /// Access level applied to every registered method.
    pub method_access: Access,
    /// String descriptor layout.
    pub blob_layout: BlobLayout,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            revision: FORMAT_REVISION,
            method_access: Access::Public,
            blob_layout: BlobLayout::Compact,
        }
    }
}

impl CompilerConfig {
    /// Override the header revision.
    #[must_use]
    pub fn with_revision(mut self, revision: u32) -> Self {
        self.revision = revision;
        self
    }

    /// Set the access level used for registered methods.
    #[must_use]
    pub fn with_method_access(mut self, access: Access) -> Self {
        self.method_access = access;
        self
    }

    /// Select the string descriptor layout.
    #[must_use]
    pub fn with_blob_layout(mut self, layout: BlobLayout) -> Self {
        self.blob_layout = layout;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_slots_cover_header() {
        assert_eq!(header::SIGNAL_COUNT + 1, HEADER_WORDS);
    }

    #[test]
    fn test_default_config() {
        let config = CompilerConfig::default();
        assert_eq!(config.revision, FORMAT_REVISION);
        assert_eq!(config.method_access, Access::Public);
        assert_eq!(config.blob_layout, BlobLayout::Compact);
    }

    #[test]
    fn test_unresolved_bit_disjoint_from_mask() {
        assert_eq!(UNRESOLVED_TYPE & TYPE_NAME_INDEX_MASK, 0);
        assert_eq!(UNRESOLVED_TYPE | TYPE_NAME_INDEX_MASK, u32::MAX);
    }
}
