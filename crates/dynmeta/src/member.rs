// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Member entries held by a [`MemberRegistry`](crate::MemberRegistry).

use crate::flags::{PropertyCapabilities, PropertyFlags};
use crate::signature;
use std::fmt;
use std::sync::Arc;

/// Kind of a method entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MethodKind {
    Signal,
    Slot,
    Method,
    Constructor,
}

impl MethodKind {
    pub fn is_signal(self) -> bool {
        self == MethodKind::Signal
    }
}

impl fmt::Display for MethodKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MethodKind::Signal => "signal",
            MethodKind::Slot => "slot",
            MethodKind::Method => "method",
            MethodKind::Constructor => "constructor",
        };
        f.write_str(name)
    }
}

/// Method access level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Access {
    Private,
    Protected,
    #[default]
    Public,
}

/// A registered signal, slot or method.
///
/// The signature is stored normalized; the parameter list is re-parsed from it
/// when needed rather than cached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodEntry {
    pub kind: MethodKind,
    pub signature: String,
    pub return_type: String,
    pub access: Access,
}

impl MethodEntry {
    /// Create an entry, normalizing `signature` and `return_type`.
    pub fn new(kind: MethodKind, signature: &str, return_type: &str, access: Access) -> Self {
        Self {
            kind,
            signature: signature::normalize_signature(signature),
            return_type: signature::normalize_type(return_type),
            access,
        }
    }

    /// Name part of the signature.
    pub fn name(&self) -> &str {
        signature::method_name(&self.signature)
    }

    pub fn parameter_types(&self) -> Vec<&str> {
        signature::parameter_types(&self.signature)
    }

    pub fn parameter_count(&self) -> usize {
        signature::parameter_count(&self.signature)
    }

    /// Identity check: same kind and same normalized signature.
    pub fn matches(&self, kind: MethodKind, normalized_signature: &str) -> bool {
        self.kind == kind && self.signature == normalized_signature
    }
}

/// One position of the method arena.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MethodSlot {
    Live(MethodEntry),
    /// Left behind by a removal. The removed kind keeps the slot inside the
    /// signal prefix when it held a signal.
    Removed(MethodKind),
}

impl MethodSlot {
    pub fn entry(&self) -> Option<&MethodEntry> {
        match self {
            MethodSlot::Live(entry) => Some(entry),
            MethodSlot::Removed(_) => None,
        }
    }

    pub fn kind(&self) -> MethodKind {
        match self {
            MethodSlot::Live(entry) => entry.kind,
            MethodSlot::Removed(kind) => *kind,
        }
    }

    /// Whether the slot sorts into the signal prefix.
    pub fn is_signal_group(&self) -> bool {
        self.kind().is_signal()
    }

    /// Free slot that a new `kind` entry may take without leaving its group.
    pub fn is_reusable_for(&self, kind: MethodKind) -> bool {
        matches!(self, MethodSlot::Removed(removed) if removed.is_signal() == kind.is_signal())
    }

    /// Return type; empty for a removed slot.
    pub fn return_type(&self) -> &str {
        self.entry().map_or("", |m| m.return_type.as_str())
    }

    pub fn parameter_types(&self) -> Vec<&str> {
        self.entry().map_or_else(Vec::new, MethodEntry::parameter_types)
    }

    pub fn parameter_count(&self) -> usize {
        self.entry().map_or(0, MethodEntry::parameter_count)
    }
}

/// Source of a property's type and capabilities.
///
/// The registry only stores a handle to this; every capability query at
/// rebuild time goes through it.
pub trait PropertyDescriptor: fmt::Debug + Send + Sync {
    /// Type name as the consumer should see it.
    fn type_name(&self) -> &str;

    fn capabilities(&self) -> PropertyCapabilities;

    /// Name (or full signature) of the signal that announces changes.
    fn notify_name(&self) -> Option<&str> {
        None
    }
}

/// Plain-data [`PropertyDescriptor`].
///
/// # Example
///
/// ```
/// use dynmeta::PropertySpec;
///
/// let spec = PropertySpec::new("int").writable(true).notify("valueChanged");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertySpec {
    type_name: String,
    capabilities: PropertyCapabilities,
    notify: Option<String>,
}

impl PropertySpec {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            capabilities: PropertyCapabilities::default(),
            notify: None,
        }
    }

    pub fn readable(mut self, on: bool) -> Self {
        self.capabilities.readable = on;
        self
    }

    pub fn writable(mut self, on: bool) -> Self {
        self.capabilities.writable = on;
        self
    }

    pub fn resettable(mut self, on: bool) -> Self {
        self.capabilities.resettable = on;
        self
    }

    pub fn designable(mut self, on: bool) -> Self {
        self.capabilities.designable = on;
        self
    }

    pub fn scriptable(mut self, on: bool) -> Self {
        self.capabilities.scriptable = on;
        self
    }

    pub fn stored(mut self, on: bool) -> Self {
        self.capabilities.stored = on;
        self
    }

    pub fn user(mut self, on: bool) -> Self {
        self.capabilities.user = on;
        self
    }

    pub fn constant(mut self, on: bool) -> Self {
        self.capabilities.constant = on;
        self
    }

    pub fn is_final(mut self, on: bool) -> Self {
        self.capabilities.is_final = on;
        self
    }

    pub fn enum_or_flag(mut self, on: bool) -> Self {
        self.capabilities.enum_or_flag = on;
        self
    }

    /// Name the signal emitted on change.
    pub fn notify(mut self, signal: impl Into<String>) -> Self {
        self.notify = Some(signal.into());
        self
    }

    /// Wrap into a shareable handle.
    pub fn into_handle(self) -> Arc<dyn PropertyDescriptor> {
        Arc::new(self)
    }
}

impl PropertyDescriptor for PropertySpec {
    fn type_name(&self) -> &str {
        &self.type_name
    }

    fn capabilities(&self) -> PropertyCapabilities {
        self.capabilities
    }

    fn notify_name(&self) -> Option<&str> {
        self.notify.as_deref()
    }
}

/// A registered property.
#[derive(Debug, Clone)]
pub struct PropertyEntry {
    pub name: String,
    pub descriptor: Arc<dyn PropertyDescriptor>,
    /// Normalized signature of the notify signal, resolved at registration.
    pub notify: Option<String>,
}

impl PropertyEntry {
    /// Normalized type name from the descriptor.
    pub fn type_name(&self) -> String {
        signature::normalize_type(self.descriptor.type_name())
    }

    /// Flag word given whether the notify reference still resolves.
    pub fn flags(&self, has_notify: bool) -> PropertyFlags {
        PropertyFlags::from_capabilities(&self.descriptor.capabilities(), has_notify)
    }
}
