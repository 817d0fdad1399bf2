// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Populate a [`DynamicMetaObject`] from a type's declared members.
//!
//! Discovery of members is delegated to a [`TypeIntrospectionAdapter`]; this
//! module only decides registration order and skips members the ancestor
//! already provides. Properties are registered last because their notify
//! names must resolve against the signals.

use crate::config::CompilerConfig;
use crate::member::{PropertyDescriptor, PropertySpec};
use crate::meta_object::{class_name_from_qualified, DynamicMetaObject};
use crate::signature;
use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

/// A signal and its alternative parameter lists.
///
/// `parameter_lists` holds the text between the parentheses, one entry per
/// overload (`["int", "QString"]` declares `name(int)` and `name(QString)`).
/// An empty list declares the single signal `name()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignalDeclaration {
    pub name: String,
    pub parameter_lists: Vec<String>,
}

impl SignalDeclaration {
    pub fn new(name: impl Into<String>, parameter_lists: &[&str]) -> Self {
        Self {
            name: name.into(),
            parameter_lists: parameter_lists.iter().map(|p| (*p).to_owned()).collect(),
        }
    }

    /// Full signatures, one per overload.
    pub fn signatures(&self) -> Vec<String> {
        if self.parameter_lists.is_empty() {
            return vec![format!("{}()", self.name)];
        }
        self.parameter_lists
            .iter()
            .map(|params| format!("{}({})", self.name, params))
            .collect()
    }
}

/// A method annotated for export as a slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotatedMethod {
    pub signature: String,
    pub return_type: String,
}

impl AnnotatedMethod {
    pub fn new(signature: impl Into<String>, return_type: impl Into<String>) -> Self {
        Self {
            signature: signature.into(),
            return_type: return_type.into(),
        }
    }

    /// Parse `"<return type> <signature>"`, e.g. `"void setValue(int)"`.
    pub fn from_declaration(declaration: &str) -> Self {
        let (return_type, signature) = signature::split_declaration(declaration);
        Self::new(signature, return_type)
    }
}

/// A declared property.
#[derive(Debug, Clone)]
pub struct DeclaredProperty {
    pub name: String,
    pub descriptor: Arc<dyn PropertyDescriptor>,
}

/// Member looked up on the ancestor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InheritedMember<'a> {
    Signal(&'a str),
    Slot(&'a str),
    Property(&'a str),
    ClassInfo(&'a [u8]),
}

/// Source of member declarations for one dynamic type.
pub trait TypeIntrospectionAdapter {
    fn list_properties(&self) -> Vec<DeclaredProperty>;

    fn list_signal_declarations(&self) -> Vec<SignalDeclaration>;

    fn list_annotated_methods(&self) -> Vec<AnnotatedMethod>;

    /// Class-info pairs declared on the type.
    fn list_class_info(&self) -> Vec<(Vec<u8>, Vec<u8>)> {
        Vec::new()
    }

    /// Whether the ancestor already declares `member`. Signatures are
    /// passed normalized.
    fn lookup_inherited(&self, member: InheritedMember<'_>) -> bool;
}

/// Counts of one [`populate`] run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PopulateReport {
    pub signals: usize,
    pub slots: usize,
    pub properties: usize,
    pub class_info: usize,
    /// Declarations skipped because the ancestor has them.
    pub inherited: usize,
}

/// Register everything `adapter` declares: signals, then slots, then
/// properties, then class info.
pub fn populate(meta: &mut DynamicMetaObject, adapter: &dyn TypeIntrospectionAdapter) -> PopulateReport {
    let mut report = PopulateReport::default();

    for declaration in adapter.list_signal_declarations() {
        for raw in declaration.signatures() {
            let normalized = signature::normalize_signature(&raw);
            if adapter.lookup_inherited(InheritedMember::Signal(&normalized)) {
                report.inherited += 1;
                continue;
            }
            meta.add_signal(&normalized);
            report.signals += 1;
        }
    }

    for method in adapter.list_annotated_methods() {
        let normalized = signature::normalize_signature(&method.signature);
        if adapter.lookup_inherited(InheritedMember::Slot(&normalized)) {
            report.inherited += 1;
            continue;
        }
        meta.add_slot(&normalized, &method.return_type);
        report.slots += 1;
    }

    for property in adapter.list_properties() {
        if adapter.lookup_inherited(InheritedMember::Property(&property.name)) {
            report.inherited += 1;
            continue;
        }
        meta.add_property(&property.name, property.descriptor);
        report.properties += 1;
    }

    let mut class_info = Vec::new();
    for (key, value) in adapter.list_class_info() {
        if adapter.lookup_inherited(InheritedMember::ClassInfo(&key)) {
            report.inherited += 1;
            continue;
        }
        class_info.push((key, value));
    }
    report.class_info = class_info.len();
    if !class_info.is_empty() {
        meta.add_class_info_map(class_info);
    }

    log::debug!(
        "[introspect] {}: {} signals, {} slots, {} properties, {} class info, {} inherited skipped",
        meta.class_name(),
        report.signals,
        report.slots,
        report.properties,
        report.class_info,
        report.inherited
    );
    report
}

/// Create a metaobject named after the last segment of `qualified_name` and
/// populate it from `adapter`.
pub fn build_from_adapter(
    qualified_name: &str,
    inherited_methods: usize,
    inherited_properties: usize,
    config: CompilerConfig,
    adapter: &dyn TypeIntrospectionAdapter,
) -> DynamicMetaObject {
    let mut meta = DynamicMetaObject::new(
        class_name_from_qualified(qualified_name),
        inherited_methods,
        inherited_properties,
        config,
    );
    populate(&mut meta, adapter);
    meta
}

/// In-memory [`TypeIntrospectionAdapter`] for static declarations and tests.
///
/// # Example
///
/// ```
/// use dynmeta::introspect::{build_from_adapter, InMemoryType};
/// use dynmeta::{CompilerConfig, PropertySpec};
///
/// let ty = InMemoryType::new()
///     .signal("valueChanged", &["int"])
///     .slot("void setValue(int)")
///     .property("value", PropertySpec::new("int").notify("valueChanged"));
/// let meta = build_from_adapter("app.Dial", 0, 0, CompilerConfig::default(), &ty);
/// assert_eq!(meta.class_name(), "Dial");
/// assert_eq!(meta.registry().method_count(), 2);
/// ```
#[derive(Debug, Default, Clone)]
pub struct InMemoryType {
    signals: Vec<SignalDeclaration>,
    methods: Vec<AnnotatedMethod>,
    properties: Vec<DeclaredProperty>,
    class_info: BTreeMap<Vec<u8>, Vec<u8>>,
    inherited_signals: HashSet<String>,
    inherited_slots: HashSet<String>,
    inherited_properties: HashSet<String>,
    inherited_class_info: HashSet<Vec<u8>>,
}

impl InMemoryType {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare signal `name` with one overload per parameter list.
    #[must_use]
    pub fn signal(mut self, name: &str, parameter_lists: &[&str]) -> Self {
        self.signals.push(SignalDeclaration::new(name, parameter_lists));
        self
    }

    /// Declare a slot as `"<return type> <signature>"`.
    #[must_use]
    pub fn slot(mut self, declaration: &str) -> Self {
        self.methods.push(AnnotatedMethod::from_declaration(declaration));
        self
    }

    #[must_use]
    pub fn property(mut self, name: &str, spec: PropertySpec) -> Self {
        self.properties.push(DeclaredProperty {
            name: name.to_owned(),
            descriptor: spec.into_handle(),
        });
        self
    }

    #[must_use]
    pub fn class_info(mut self, key: impl AsRef<[u8]>, value: impl AsRef<[u8]>) -> Self {
        self.class_info
            .insert(key.as_ref().to_vec(), value.as_ref().to_vec());
        self
    }

    /// Mark a signal as declared by the ancestor.
    #[must_use]
    pub fn inherit_signal(mut self, signature: &str) -> Self {
        self.inherited_signals
            .insert(signature::normalize_signature(signature));
        self
    }

    #[must_use]
    pub fn inherit_slot(mut self, signature: &str) -> Self {
        self.inherited_slots
            .insert(signature::normalize_signature(signature));
        self
    }

    #[must_use]
    pub fn inherit_property(mut self, name: &str) -> Self {
        self.inherited_properties.insert(name.to_owned());
        self
    }

    #[must_use]
    pub fn inherit_class_info(mut self, key: impl AsRef<[u8]>) -> Self {
        self.inherited_class_info.insert(key.as_ref().to_vec());
        self
    }
}

impl TypeIntrospectionAdapter for InMemoryType {
    fn list_properties(&self) -> Vec<DeclaredProperty> {
        self.properties.clone()
    }

    fn list_signal_declarations(&self) -> Vec<SignalDeclaration> {
        self.signals.clone()
    }

    fn list_annotated_methods(&self) -> Vec<AnnotatedMethod> {
        self.methods.clone()
    }

    fn list_class_info(&self) -> Vec<(Vec<u8>, Vec<u8>)> {
        self.class_info
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    fn lookup_inherited(&self, member: InheritedMember<'_>) -> bool {
        match member {
            InheritedMember::Signal(signature) => self.inherited_signals.contains(signature),
            InheritedMember::Slot(signature) => self.inherited_slots.contains(signature),
            InheritedMember::Property(name) => self.inherited_properties.contains(name),
            InheritedMember::ClassInfo(key) => self.inherited_class_info.contains(key),
        }
    }
}
