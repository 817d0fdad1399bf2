// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Dynamic metaobject: a member registry plus its published descriptor.
//!
//! Registration only edits the registry and marks it dirty. The table and
//! string blob are rebuilt from scratch on the next [`rebuild_if_dirty`]
//! call and published as an immutable [`MetaObjectSnapshot`]. A snapshot is
//! never modified afterwards, so pointers taken from it stay valid for as long
//! as the snapshot is held, even across later rebuilds.
//!
//! [`rebuild_if_dirty`]: DynamicMetaObject::rebuild_if_dirty

use crate::config::{BlobLayout, CompilerConfig};
use crate::error::LayoutResult;
use crate::layout::{BinaryLayoutBuilder, StringBlobWriter, TableView};
use crate::member::{MethodKind, PropertyDescriptor};
use crate::registry::MemberRegistry;
use std::sync::Arc;

/// Last path segment of a dotted type name: `"app.widgets.Dial"` -> `"Dial"`.
pub fn class_name_from_qualified(qualified: &str) -> &str {
    qualified.rsplit('.').next().unwrap_or(qualified)
}

#[derive(Debug)]
struct SnapshotData {
    class_name: String,
    table: Vec<u32>,
    blob: Vec<u8>,
    signal_count: usize,
    layout: BlobLayout,
}

/// Published table and string blob of one rebuild.
///
/// Cloning is cheap (reference counted).
#[derive(Debug, Clone)]
pub struct MetaObjectSnapshot {
    inner: Arc<SnapshotData>,
}

impl MetaObjectSnapshot {
    pub fn class_name(&self) -> &str {
        &self.inner.class_name
    }

    pub fn table(&self) -> &[u32] {
        &self.inner.table
    }

    pub fn string_blob(&self) -> &[u8] {
        &self.inner.blob
    }

    /// First table word, for consumers that walk the table by offset.
    pub fn table_ptr(&self) -> *const u32 {
        self.inner.table.as_ptr()
    }

    /// First blob byte.
    pub fn string_blob_ptr(&self) -> *const u8 {
        self.inner.blob.as_ptr()
    }

    pub fn signal_count(&self) -> usize {
        self.inner.signal_count
    }

    pub fn blob_layout(&self) -> BlobLayout {
        self.inner.layout
    }

    /// Resolve a string-pool index through the blob.
    pub fn string(&self, index: usize) -> Option<&[u8]> {
        self.view().string(index).ok()
    }

    /// Bounds-checked reader over this snapshot.
    pub fn view(&self) -> TableView<'_> {
        TableView::new(&self.inner.table, &self.inner.blob, self.inner.layout)
    }

    /// Whether two handles refer to the same rebuild.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

/// Runtime-extensible type descriptor.
///
/// # Example
///
/// ```
/// use dynmeta::{CompilerConfig, DynamicMetaObject, PropertySpec};
///
/// let mut meta = DynamicMetaObject::new("Dial", 5, 3, CompilerConfig::default());
/// assert_eq!(meta.add_signal("valueChanged(int)"), 6);
/// assert_eq!(meta.add_slot("setValue(int)", "void"), 7);
/// let value = PropertySpec::new("int").writable(true).notify("valueChanged");
/// assert_eq!(meta.add_property("value", value.into_handle()), 4);
///
/// let snapshot = meta.rebuild_if_dirty().expect("layout");
/// assert_eq!(snapshot.signal_count(), 1);
/// ```
#[derive(Debug)]
pub struct DynamicMetaObject {
    class_name: String,
    config: CompilerConfig,
    registry: MemberRegistry,
    published: Option<MetaObjectSnapshot>,
}

impl DynamicMetaObject {
    /// Create a descriptor for `class_name` deriving from an ancestor that
    /// already has `inherited_methods` methods and `inherited_properties`
    /// properties.
    pub fn new(
        class_name: impl Into<String>,
        inherited_methods: usize,
        inherited_properties: usize,
        config: CompilerConfig,
    ) -> Self {
        let mut registry = MemberRegistry::new(inherited_methods, inherited_properties);
        registry.set_method_access(config.method_access);
        Self {
            class_name: class_name.into(),
            config,
            registry,
            published: None,
        }
    }

    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    pub fn config(&self) -> &CompilerConfig {
        &self.config
    }

    pub fn registry(&self) -> &MemberRegistry {
        &self.registry
    }

    pub fn is_dirty(&self) -> bool {
        self.registry.is_dirty()
    }

    /// Most recently published snapshot, without rebuilding.
    pub fn snapshot(&self) -> Option<&MetaObjectSnapshot> {
        self.published.as_ref()
    }

    // ===== Registration =====

    pub fn add_method(&mut self, kind: MethodKind, signature: &str, return_type: &str) -> usize {
        self.registry.add_method(kind, signature, return_type)
    }

    pub fn remove_method(&mut self, kind: MethodKind, index: usize) -> bool {
        self.registry.remove_method(kind, index)
    }

    /// Register a signal. Signals have no return type.
    pub fn add_signal(&mut self, signature: &str) -> usize {
        self.add_method(MethodKind::Signal, signature, "")
    }

    pub fn add_slot(&mut self, signature: &str, return_type: &str) -> usize {
        self.add_method(MethodKind::Slot, signature, return_type)
    }

    pub fn remove_signal(&mut self, index: usize) -> bool {
        self.remove_method(MethodKind::Signal, index)
    }

    pub fn remove_slot(&mut self, index: usize) -> bool {
        self.remove_method(MethodKind::Slot, index)
    }

    pub fn add_property(&mut self, name: &str, descriptor: Arc<dyn PropertyDescriptor>) -> usize {
        self.registry.add_property(name, descriptor)
    }

    pub fn add_class_info(&mut self, key: impl AsRef<[u8]>, value: impl AsRef<[u8]>) {
        self.registry.add_class_info(key, value);
    }

    /// Bulk form of [`add_class_info`](Self::add_class_info).
    pub fn add_class_info_map<K, V>(&mut self, pairs: impl IntoIterator<Item = (K, V)>)
    where
        K: AsRef<[u8]>,
        V: AsRef<[u8]>,
    {
        self.registry.merge_class_info(pairs);
    }

    // ===== Publication =====

    /// Rebuild the table and blob if anything changed since the last call,
    /// then return the current snapshot.
    ///
    /// The method arena is put in serialized order first, so afterwards every
    /// live method's external index points at its own row of the table.
    /// On error nothing is published and the registry stays dirty.
    pub fn rebuild_if_dirty(&mut self) -> LayoutResult<MetaObjectSnapshot> {
        if let Some(snapshot) = &self.published {
            if !self.registry.is_dirty() {
                return Ok(snapshot.clone());
            }
        }

        self.registry.order_signals_first();
        let compiled =
            BinaryLayoutBuilder::new(&self.class_name, &self.registry, self.config).build()?;
        let blob = StringBlobWriter::new(self.config.blob_layout).write(&compiled.strings)?;

        log::debug!(
            "[metaobject] rebuilt {}: {} words, {} strings, {} blob bytes",
            self.class_name,
            compiled.words.len(),
            compiled.strings.len(),
            blob.len()
        );

        let snapshot = MetaObjectSnapshot {
            inner: Arc::new(SnapshotData {
                class_name: self.class_name.clone(),
                table: compiled.words,
                blob,
                signal_count: compiled.signal_count,
                layout: self.config.blob_layout,
            }),
        };
        self.published = Some(snapshot.clone());
        self.registry.mark_clean();
        Ok(snapshot)
    }
}
