// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Mutable member registry of one dynamic type.
//!
//! Methods live in an arena of [`MethodSlot`]s. Removal leaves a
//! [`MethodSlot::Removed`] marker in place without shifting later entries, and
//! the next registration of the same group (signal or non-signal) refills the
//! first such marker before appending. Every rebuild stable-sorts the arena
//! signals-first, so a slot position is also the row of the published table.
//!
//! External indices are `inherited_count + slot + 1`: values at or below the
//! inherited count belong to ancestors. An index handed out before a rebuild
//! moves only when that rebuild pulls an appended signal ahead of non-signal
//! entries.

use crate::member::{Access, MethodEntry, MethodKind, MethodSlot, PropertyDescriptor, PropertyEntry};
use crate::signature;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Registered members of one dynamic type.
#[derive(Debug, Clone)]
pub struct MemberRegistry {
    method_offset: usize,
    property_offset: usize,
    access: Access,
    methods: Vec<MethodSlot>,
    properties: Vec<PropertyEntry>,
    class_info: BTreeMap<Vec<u8>, Vec<u8>>,
    dirty: bool,
}

impl MemberRegistry {
    /// Create a registry bound to the ancestor's method and property counts.
    pub fn new(inherited_methods: usize, inherited_properties: usize) -> Self {
        Self {
            method_offset: inherited_methods,
            property_offset: inherited_properties,
            access: Access::Public,
            methods: Vec::new(),
            properties: Vec::new(),
            class_info: BTreeMap::new(),
            dirty: true,
        }
    }

    /// Access level given to methods registered from now on.
    pub fn set_method_access(&mut self, access: Access) {
        self.access = access;
    }

    pub fn method_offset(&self) -> usize {
        self.method_offset
    }

    pub fn property_offset(&self) -> usize {
        self.property_offset
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub(crate) fn mark_clean(&mut self) {
        self.dirty = false;
    }

    // ===== Methods =====

    /// Register a method; idempotent on `(kind, normalized signature)`.
    ///
    /// Returns the external index of the new or existing entry.
    pub fn add_method(&mut self, kind: MethodKind, signature: &str, return_type: &str) -> usize {
        let normalized = signature::normalize_signature(signature);
        if let Some(slot) = self.find_method(kind, &normalized) {
            return self.method_offset + slot + 1;
        }

        let entry = MethodEntry {
            kind,
            signature: normalized,
            return_type: signature::normalize_type(return_type),
            access: self.access,
        };
        let slot = match self.methods.iter().position(|s| s.is_reusable_for(kind)) {
            Some(free) => {
                log::trace!("[registry] {} {} reuses slot {}", kind, entry.signature, free);
                self.methods[free] = MethodSlot::Live(entry);
                free
            }
            None => {
                log::trace!("[registry] {} {} appended", kind, entry.signature);
                self.methods.push(MethodSlot::Live(entry));
                self.methods.len() - 1
            }
        };
        self.dirty = true;
        self.method_offset + slot + 1
    }

    /// Remove the `kind` method currently at `external_index`.
    ///
    /// The index is resolved to a signature first and the entry is then looked
    /// up by `(kind, signature)`. Returns whether an entry was removed.
    pub fn remove_method(&mut self, kind: MethodKind, external_index: usize) -> bool {
        let Some(signature) = self.method_signature(external_index).map(str::to_owned) else {
            log::debug!("[registry] remove {}: index {} is not a local method", kind, external_index);
            return false;
        };
        let Some(slot) = self.find_method(kind, &signature) else {
            log::debug!("[registry] remove {}: {} is not a {}", kind, signature, kind);
            return false;
        };

        self.methods[slot] = MethodSlot::Removed(kind);
        self.dirty = true;
        log::trace!("[registry] {} {} removed from slot {}", kind, signature, slot);
        true
    }

    /// Signature of the live method at `external_index`.
    pub fn method_signature(&self, external_index: usize) -> Option<&str> {
        self.method_at(external_index).map(|m| m.signature.as_str())
    }

    /// Live method at `external_index`.
    pub fn method_at(&self, external_index: usize) -> Option<&MethodEntry> {
        let slot = external_index.checked_sub(self.method_offset + 1)?;
        self.methods.get(slot)?.entry()
    }

    /// External index of a live method.
    pub fn index_of_method(&self, kind: MethodKind, signature: &str) -> Option<usize> {
        let normalized = signature::normalize_signature(signature);
        self.find_method(kind, &normalized)
            .map(|slot| self.method_offset + slot + 1)
    }

    /// Arena view, removed slots included.
    pub fn method_slots(&self) -> &[MethodSlot] {
        &self.methods
    }

    /// Live methods.
    pub fn method_count(&self) -> usize {
        self.live_methods().count()
    }

    /// Live signals.
    pub fn signal_count(&self) -> usize {
        self.live_methods().filter(|m| m.kind.is_signal()).count()
    }

    fn live_methods(&self) -> impl Iterator<Item = &MethodEntry> {
        self.methods.iter().filter_map(MethodSlot::entry)
    }

    /// Stable-sort the arena so the signal group forms a prefix. Returns
    /// whether any slot moved.
    pub(crate) fn order_signals_first(&mut self) -> bool {
        let ordered = self
            .methods
            .windows(2)
            .all(|pair| pair[0].is_signal_group() || !pair[1].is_signal_group());
        if ordered {
            return false;
        }
        self.methods.sort_by_key(|slot| !slot.is_signal_group());
        log::debug!("[registry] moved appended signals ahead of other methods");
        true
    }

    fn find_method(&self, kind: MethodKind, normalized: &str) -> Option<usize> {
        self.methods
            .iter()
            .position(|s| s.entry().is_some_and(|m| m.matches(kind, normalized)))
    }

    /// Signature of the signal a notify name refers to.
    ///
    /// A name with parentheses must match a full signature; a bare name
    /// matches the first signal with that method name.
    fn find_notify_signal(&self, notify: &str) -> Option<String> {
        if notify.contains('(') {
            let normalized = signature::normalize_signature(notify);
            return self
                .find_method(MethodKind::Signal, &normalized)
                .map(|_| normalized);
        }
        let name = notify.trim();
        self.live_methods()
            .find(|m| m.kind.is_signal() && m.name() == name)
            .map(|m| m.signature.clone())
    }

    // ===== Properties =====

    /// Register a property; idempotent on name.
    ///
    /// The descriptor's notify name is resolved against the signals registered
    /// so far. No match means no notify signal.
    pub fn add_property(&mut self, name: &str, descriptor: Arc<dyn PropertyDescriptor>) -> usize {
        if let Some(slot) = self.find_property(name) {
            return self.property_offset + slot + 1;
        }

        let notify = descriptor.notify_name().and_then(|signal| {
            let resolved = self.find_notify_signal(signal);
            if resolved.is_none() {
                log::debug!("[registry] property {}: notify {} not registered", name, signal);
            }
            resolved
        });

        self.properties.push(PropertyEntry {
            name: name.to_owned(),
            descriptor,
            notify,
        });
        let slot = self.properties.len() - 1;
        log::trace!("[registry] property {} in slot {}", name, slot);
        self.dirty = true;
        self.property_offset + slot + 1
    }

    /// External index of a property.
    pub fn index_of_property(&self, name: &str) -> Option<usize> {
        self.find_property(name)
            .map(|slot| self.property_offset + slot + 1)
    }

    pub fn property_at(&self, external_index: usize) -> Option<&PropertyEntry> {
        let slot = external_index.checked_sub(self.property_offset + 1)?;
        self.properties.get(slot)
    }

    /// Properties in registration order.
    pub fn properties(&self) -> &[PropertyEntry] {
        &self.properties
    }

    pub fn property_count(&self) -> usize {
        self.properties.len()
    }

    fn find_property(&self, name: &str) -> Option<usize> {
        self.properties.iter().position(|p| p.name == name)
    }

    // ===== Class info =====

    /// Set a class-info pair, replacing any previous value for `key`.
    pub fn add_class_info(&mut self, key: impl AsRef<[u8]>, value: impl AsRef<[u8]>) {
        self.class_info
            .insert(key.as_ref().to_vec(), value.as_ref().to_vec());
        self.dirty = true;
    }

    /// Merge many pairs with the same overwrite rule.
    pub fn merge_class_info<K, V>(&mut self, pairs: impl IntoIterator<Item = (K, V)>)
    where
        K: AsRef<[u8]>,
        V: AsRef<[u8]>,
    {
        for (key, value) in pairs {
            self.class_info
                .insert(key.as_ref().to_vec(), value.as_ref().to_vec());
        }
        self.dirty = true;
    }

    pub fn class_info(&self, key: &[u8]) -> Option<&[u8]> {
        self.class_info.get(key).map(Vec::as_slice)
    }

    /// Class-info pairs in key order.
    pub fn class_info_pairs(&self) -> impl Iterator<Item = (&[u8], &[u8])> {
        self.class_info
            .iter()
            .map(|(k, v)| (k.as_slice(), v.as_slice()))
    }

    pub fn class_info_count(&self) -> usize {
        self.class_info.len()
    }
}
