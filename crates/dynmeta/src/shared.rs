// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Thread-shared [`DynamicMetaObject`].
//!
//! Registration and rebuild take the write lock, so a rebuild never runs
//! while another thread reads the registry. Readers of a published
//! [`MetaObjectSnapshot`] need no lock at all: a snapshot is immutable and
//! owned by its handle.

use crate::error::LayoutResult;
use crate::member::{MethodKind, PropertyDescriptor};
use crate::meta_object::{DynamicMetaObject, MetaObjectSnapshot};
use parking_lot::RwLock;
use std::sync::Arc;

/// Cloneable handle to one locked metaobject.
#[derive(Debug, Clone)]
pub struct SharedMetaObject {
    inner: Arc<RwLock<DynamicMetaObject>>,
}

impl SharedMetaObject {
    pub fn new(meta: DynamicMetaObject) -> Self {
        Self {
            inner: Arc::new(RwLock::new(meta)),
        }
    }

    /// Run `f` under the read lock.
    pub fn read<R>(&self, f: impl FnOnce(&DynamicMetaObject) -> R) -> R {
        f(&*self.inner.read())
    }

    /// Run `f` under the write lock, e.g. to register a batch of members.
    pub fn write<R>(&self, f: impl FnOnce(&mut DynamicMetaObject) -> R) -> R {
        f(&mut *self.inner.write())
    }

    pub fn add_method(&self, kind: MethodKind, signature: &str, return_type: &str) -> usize {
        self.inner.write().add_method(kind, signature, return_type)
    }

    pub fn remove_method(&self, kind: MethodKind, index: usize) -> bool {
        self.inner.write().remove_method(kind, index)
    }

    pub fn add_property(&self, name: &str, descriptor: Arc<dyn PropertyDescriptor>) -> usize {
        self.inner.write().add_property(name, descriptor)
    }

    pub fn add_class_info(&self, key: impl AsRef<[u8]>, value: impl AsRef<[u8]>) {
        self.inner.write().add_class_info(key, value);
    }

    /// Current snapshot, rebuilding first if the registry changed.
    ///
    /// A clean metaobject is served under the read lock only.
    pub fn descriptor(&self) -> LayoutResult<MetaObjectSnapshot> {
        {
            let meta = self.inner.read();
            if let (false, Some(snapshot)) = (meta.is_dirty(), meta.snapshot()) {
                return Ok(snapshot.clone());
            }
        }
        self.inner.write().rebuild_if_dirty()
    }
}
