// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Full-rebuild serializer from a [`MemberRegistry`] to the word table.
//!
//! Section order is fixed: header, class info, properties (rows, then one
//! notify word per property), methods (signals first), parameters, and a
//! zero terminator. A section offset stays 0 when the section is empty.
//!
//! Strings are interned in the order the sections reference them, starting
//! with the class name and the empty string.

use crate::builtin_types::builtin_type_id;
use crate::config::{
    header, CompilerConfig, CLASS_INFO_WORDS, HEADER_WORDS, METHOD_WORDS, PROPERTY_NOTIFY_WORDS,
    PROPERTY_WORDS, TYPE_NAME_INDEX_MASK, UNRESOLVED_TYPE,
};
use crate::error::{to_word, LayoutError, LayoutResult};
use crate::flags::MethodFlags;
use crate::layout::writer::WordWriter;
use crate::member::{Access, MethodKind, MethodSlot};
use crate::registry::MemberRegistry;
use crate::string_pool::StringPool;

/// Exact word count of the table for the registry's current state.
///
/// A removed method still takes its row and one return-type word.
pub fn table_size(registry: &MemberRegistry) -> usize {
    let slots = registry.method_slots();
    let parameter_words: usize = slots.iter().map(|m| 1 + 2 * m.parameter_count()).sum();

    HEADER_WORDS
        + CLASS_INFO_WORDS * registry.class_info_count()
        + METHOD_WORDS * slots.len()
        + (PROPERTY_WORDS + PROPERTY_NOTIFY_WORDS) * registry.property_count()
        + 1
        + parameter_words
}

/// Output of one layout pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledTable {
    pub words: Vec<u32>,
    /// Every string the table references, in index order.
    pub strings: StringPool,
    /// Length of the signal prefix, placeholder rows included.
    pub signal_count: usize,
}

/// Builds the word table for one registry.
pub struct BinaryLayoutBuilder<'a> {
    class_name: &'a str,
    registry: &'a MemberRegistry,
    config: CompilerConfig,
}

impl<'a> BinaryLayoutBuilder<'a> {
    pub fn new(class_name: &'a str, registry: &'a MemberRegistry, config: CompilerConfig) -> Self {
        Self {
            class_name,
            registry,
            config,
        }
    }

    /// Method slots in serialized order: signal group first, arena order
    /// kept within each group. A registry ordered by a rebuild comes out
    /// unchanged.
    pub fn ordered_methods(&self) -> Vec<&'a MethodSlot> {
        let mut methods: Vec<&MethodSlot> = self.registry.method_slots().iter().collect();
        methods.sort_by_key(|m| !m.is_signal_group());
        methods
    }

    /// Serialize the registry into a freshly allocated table.
    pub fn build(&self) -> LayoutResult<CompiledTable> {
        let expected = table_size(self.registry);
        let mut words = vec![0u32; expected];
        let mut strings = StringPool::new();
        let methods = self.ordered_methods();

        let class_name = strings.intern(self.class_name);
        let empty = to_word(strings.intern(""), "empty string index")?;

        let mut out = WordWriter::new(&mut words);
        self.write_header(&mut out, class_name, methods.len())?;
        self.write_class_info(&mut out, &mut strings)?;
        self.write_properties(&mut out, &mut strings, &methods)?;
        let signal_count = write_methods(&mut out, &mut strings, &methods, empty)?;
        write_parameters(&mut out, &mut strings, &methods, empty)?;
        out.write(0)?;

        let written = out.offset();
        if written != expected {
            return Err(LayoutError::SizeMismatch { expected, written });
        }

        log::debug!(
            "[layout] {}: {} words, {} strings, {} method rows ({} live, {} signal rows), {} properties",
            self.class_name,
            written,
            strings.len(),
            methods.len(),
            self.registry.method_count(),
            signal_count,
            self.registry.property_count()
        );

        Ok(CompiledTable {
            words,
            strings,
            signal_count,
        })
    }

    /// Header with counts filled in; offsets and the signal count are
    /// patched by the sections.
    fn write_header(
        &self,
        out: &mut WordWriter<'_>,
        class_name: usize,
        method_rows: usize,
    ) -> LayoutResult<()> {
        out.write(self.config.revision)?;
        out.write_index(class_name, "class name index")?;
        out.write_index(self.registry.class_info_count(), "class info count")?;
        out.write(0)?;
        out.write_index(method_rows, "method count")?;
        out.write(0)?;
        out.write_index(self.registry.property_count(), "property count")?;
        out.write(0)?;
        // enums, constructors, flags, signal count
        out.write_row(&[0; HEADER_WORDS - header::ENUM_COUNT])
    }

    fn write_class_info(&self, out: &mut WordWriter<'_>, strings: &mut StringPool) -> LayoutResult<()> {
        if self.registry.class_info_count() == 0 {
            return Ok(());
        }
        out.patch(header::CLASS_INFO_OFFSET, to_word(out.offset(), "class info offset")?)?;

        for (key, value) in self.registry.class_info_pairs() {
            let value = strings.intern(value);
            let key = strings.intern(key);
            out.write_index(key, "class info key index")?;
            out.write_index(value, "class info value index")?;
        }
        Ok(())
    }

    /// Property rows, then one notify word per property.
    ///
    /// The notify word is the 0-based row of the signal in the serialized
    /// method order, not the 1-based local position used by external
    /// indices. A notify signal that no longer exists gives 0 and no
    /// notify flag.
    fn write_properties(
        &self,
        out: &mut WordWriter<'_>,
        strings: &mut StringPool,
        methods: &[&MethodSlot],
    ) -> LayoutResult<()> {
        let properties = self.registry.properties();
        if properties.is_empty() {
            return Ok(());
        }
        out.patch(header::PROPERTY_OFFSET, to_word(out.offset(), "property offset")?)?;

        let mut notify_words = Vec::with_capacity(properties.len());
        for property in properties {
            let notify = property.notify.as_deref().and_then(|signature| {
                methods.iter().position(|slot| {
                    slot.entry()
                        .is_some_and(|m| m.kind.is_signal() && m.signature == signature)
                })
            });
            if property.notify.is_some() && notify.is_none() {
                log::debug!(
                    "[layout] {}: notify signal of {} was removed",
                    self.class_name,
                    property.name
                );
            }

            let name = strings.intern(&property.name);
            let type_name = strings.intern(property.type_name());
            out.write_index(name, "property name index")?;
            out.write_index(type_name, "property type index")?;
            out.write(property.flags(notify.is_some()).bits())?;
            notify_words.push(to_word(notify.unwrap_or(0), "notify index")?);
        }
        out.write_row(&notify_words)
    }
}

/// Flag word of a removed slot: private, and still a signal inside the
/// signal prefix.
fn placeholder_flags(slot: &MethodSlot) -> MethodFlags {
    let kind = if slot.is_signal_group() {
        MethodKind::Signal
    } else {
        MethodKind::Method
    };
    MethodFlags::for_method(Access::Private, kind)
}

/// Method rows. Returns the length of the signal prefix.
///
/// A removed slot is written as a row with the empty name and no
/// parameters, so every later row keeps its position.
fn write_methods(
    out: &mut WordWriter<'_>,
    strings: &mut StringPool,
    methods: &[&MethodSlot],
    empty: u32,
) -> LayoutResult<usize> {
    if methods.is_empty() {
        return Ok(0);
    }
    out.patch(header::METHOD_OFFSET, to_word(out.offset(), "method offset")?)?;

    let mut parameter_offset = out.offset() + METHOD_WORDS * methods.len();
    let mut signal_count = 0;
    for slot in methods {
        let argc = slot.parameter_count();
        let (name, flags) = match slot {
            MethodSlot::Live(method) => (
                to_word(strings.intern(method.name()), "method name index")?,
                MethodFlags::for_method(method.access, method.kind),
            ),
            MethodSlot::Removed(_) => (empty, placeholder_flags(slot)),
        };
        out.write(name)?;
        out.write_index(argc, "parameter count")?;
        out.write_index(parameter_offset, "parameter offset")?;
        out.write(empty)?;
        out.write(flags.bits())?;

        if slot.is_signal_group() {
            signal_count += 1;
        }
        parameter_offset += 1 + 2 * argc;
    }
    out.patch(header::SIGNAL_COUNT, to_word(signal_count, "signal count")?)?;
    Ok(signal_count)
}

/// Per method: return type, parameter types, then one empty name per
/// parameter. A removed slot has an unknown return type and nothing else.
fn write_parameters(
    out: &mut WordWriter<'_>,
    strings: &mut StringPool,
    methods: &[&MethodSlot],
    empty: u32,
) -> LayoutResult<()> {
    for slot in methods {
        let parameters = slot.parameter_types();
        out.write(type_info(strings, slot.return_type())?)?;
        for parameter in &parameters {
            out.write(type_info(strings, parameter)?)?;
        }
        for _ in &parameters {
            out.write(empty)?;
        }
    }
    Ok(())
}

/// Built-in type id, or the unresolved bit with the name's pool index.
fn type_info(strings: &mut StringPool, type_name: &str) -> LayoutResult<u32> {
    if let Some(id) = builtin_type_id(type_name) {
        return Ok(id);
    }
    let index = to_word(strings.intern(type_name), "type name index")?;
    if index > TYPE_NAME_INDEX_MASK {
        return Err(LayoutError::IndexOverflow {
            what: "type name index",
        });
    }
    Ok(UNRESOLVED_TYPE | index)
}
