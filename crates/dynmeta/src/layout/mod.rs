// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Binary descriptor layout.
//!
//! # Table layout
//!
//! All words are `u32`. Offsets are word indices from the table start.
//!
//! ```text
//! header        14 words (revision, class name, counts and offsets,
//!               flags, signal count)
//! class info    (key, value)                       per pair
//! properties    (name, type, flags)                per property
//!               notify                             per property
//! methods       (name, argc, params, tag, flags)   per method, signals first
//! parameters    return type, N param types, N empty names   per method
//! terminator    0
//! ```
//!
//! # String blob
//!
//! One descriptor per pooled string, then every string's bytes followed by a
//! NUL, in pool order. See [`BlobLayout`](crate::config::BlobLayout) for the
//! descriptor formats.

mod blob;
mod builder;
mod view;
mod writer;

pub use blob::StringBlobWriter;
pub use builder::{table_size, BinaryLayoutBuilder, CompiledTable};
pub use view::{MethodRow, PropertyRow, TableView, TypeInfo};
