// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Runtime compiler for reflection descriptors.
//!
//! Types whose signals, slots, properties and class info are declared at
//! runtime still need the flat word table and string blob that a
//! statically generated descriptor would carry, because the reflection
//! runtime reading them walks the table by offset and never parses.
//! This crate keeps a mutable member registry per type and rebuilds that
//! table and blob from scratch whenever the registry changed.
//!
//! # Features
//!
//! - **Stable indices**: a removal leaves a placeholder row that the next
//!   registration of the same group fills, so live methods keep their rows
//! - **Idempotent registration**: registering the same method or property
//!   twice returns the first index
//! - **Exact layout**: table size is computed before allocation and checked
//!   after writing
//! - **Immutable snapshots**: each rebuild publishes a new
//!   [`MetaObjectSnapshot`]; older ones stay readable
//!
//! # Architecture
//!
//! ```text
//! TypeIntrospectionAdapter --populate--> DynamicMetaObject
//!                                          |  MemberRegistry (method arena)
//!                                          v
//!                              rebuild_if_dirty
//!                                          |  BinaryLayoutBuilder -> words + StringPool
//!                                          |  StringBlobWriter    -> blob
//!                                          v
//!                                 MetaObjectSnapshot (table, blob)
//! ```

pub mod builtin_types;
pub mod config;
pub mod error;
pub mod flags;
pub mod introspect;
pub mod layout;
pub mod member;
pub mod meta_object;
pub mod registry;
pub mod shared;
pub mod signature;
pub mod string_pool;

pub use config::{BlobLayout, CompilerConfig};
pub use error::{LayoutError, LayoutResult};
pub use flags::{MethodFlags, PropertyCapabilities, PropertyFlags};
pub use introspect::{populate, InMemoryType, TypeIntrospectionAdapter};
pub use layout::{BinaryLayoutBuilder, StringBlobWriter, TableView};
pub use member::{
    Access, MethodEntry, MethodKind, MethodSlot, PropertyDescriptor, PropertyEntry, PropertySpec,
};
pub use meta_object::{class_name_from_qualified, DynamicMetaObject, MetaObjectSnapshot};
pub use registry::MemberRegistry;
pub use shared::SharedMetaObject;
pub use string_pool::StringPool;
