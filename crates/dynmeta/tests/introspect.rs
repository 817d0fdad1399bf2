// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com
//
// Adapter-driven population, including a hand-written adapter over a
// custom property descriptor.

#![allow(clippy::missing_panics_doc)]

use dynmeta::introspect::{
    build_from_adapter, AnnotatedMethod, DeclaredProperty, InheritedMember, SignalDeclaration,
};
use dynmeta::{
    populate, CompilerConfig, DynamicMetaObject, InMemoryType, MethodKind, PropertyCapabilities,
    PropertyDescriptor, PropertyFlags, PropertySpec, TypeIntrospectionAdapter,
};
use std::sync::Arc;

/// Descriptor that answers capability queries from a fixed mode string.
#[derive(Debug)]
struct ModeDescriptor {
    type_name: &'static str,
    mode: &'static str,
    notify: Option<&'static str>,
}

impl PropertyDescriptor for ModeDescriptor {
    fn type_name(&self) -> &str {
        self.type_name
    }

    fn capabilities(&self) -> PropertyCapabilities {
        PropertyCapabilities {
            writable: self.mode.contains('w'),
            constant: self.mode.contains('c'),
            user: self.mode.contains('u'),
            ..PropertyCapabilities::default()
        }
    }

    fn notify_name(&self) -> Option<&str> {
        self.notify
    }
}

struct Thermostat;

impl TypeIntrospectionAdapter for Thermostat {
    fn list_properties(&self) -> Vec<DeclaredProperty> {
        vec![
            DeclaredProperty {
                name: "target".into(),
                descriptor: Arc::new(ModeDescriptor {
                    type_name: "double",
                    mode: "wu",
                    notify: Some("targetChanged(double)"),
                }),
            },
            DeclaredProperty {
                name: "model".into(),
                descriptor: Arc::new(ModeDescriptor {
                    type_name: "const QString &",
                    mode: "c",
                    notify: None,
                }),
            },
        ]
    }

    fn list_signal_declarations(&self) -> Vec<SignalDeclaration> {
        vec![SignalDeclaration::new("targetChanged", &["double"])]
    }

    fn list_annotated_methods(&self) -> Vec<AnnotatedMethod> {
        vec![
            AnnotatedMethod::from_declaration("void setTarget(double)"),
            AnnotatedMethod::new("objectName()", "QString"),
        ]
    }

    fn list_class_info(&self) -> Vec<(Vec<u8>, Vec<u8>)> {
        vec![(b"vendor".to_vec(), b"acme".to_vec())]
    }

    fn lookup_inherited(&self, member: InheritedMember<'_>) -> bool {
        member == InheritedMember::Slot("objectName()")
    }
}

#[test]
fn test_custom_adapter_builds_consumable_table() {
    let mut meta = build_from_adapter(
        "home.devices.Thermostat",
        4,
        1,
        CompilerConfig::default(),
        &Thermostat,
    );
    assert_eq!(meta.class_name(), "Thermostat");
    assert_eq!(meta.registry().method_count(), 2);
    assert_eq!(
        meta.registry()
            .index_of_method(MethodKind::Signal, "targetChanged(double)"),
        Some(5)
    );
    assert_eq!(meta.registry().index_of_property("model"), Some(3));

    let snapshot = meta.rebuild_if_dirty().expect("rebuild");
    let view = snapshot.view();

    let target = view.property(0).expect("target");
    assert!(target
        .flags
        .contains(PropertyFlags::WRITABLE | PropertyFlags::USER | PropertyFlags::NOTIFY));
    assert_eq!(target.notify, 0);

    let model = view.property(1).expect("model");
    assert_eq!(model.type_name, b"QString");
    assert!(model.flags.contains(PropertyFlags::CONSTANT | PropertyFlags::RESOLVE_USER));
    assert!(!model.flags.contains(PropertyFlags::NOTIFY));

    assert_eq!(view.class_info().expect("info"), vec![(&b"vendor"[..], &b"acme"[..])]);
}

#[test]
fn test_populate_twice_is_idempotent() {
    let ty = InMemoryType::new()
        .signal("clicked", &["", "bool"])
        .slot("void toggle()")
        .property("checked", PropertySpec::new("bool").writable(true).notify("clicked(bool)"));
    let mut meta = DynamicMetaObject::new("Button", 0, 0, CompilerConfig::default());

    populate(&mut meta, &ty);
    let first = meta.rebuild_if_dirty().expect("rebuild");
    populate(&mut meta, &ty);
    let second = meta.rebuild_if_dirty().expect("rebuild");

    assert!(first.ptr_eq(&second));
    assert_eq!(first.signal_count(), 2);
    let checked = first.view().property(0).expect("checked");
    assert_eq!(checked.notify, 1);
}
