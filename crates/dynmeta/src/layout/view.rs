// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Read-only, bounds-checked access to a produced table and string blob.
//!
//! Used for verification and dumps. Reads follow the same offsets a
//! consumer would follow, so a table that reads back correctly here has the
//! layout the consumer expects.

use crate::config::{
    header, BlobLayout, CLASS_INFO_WORDS, HEADER_WORDS, METHOD_WORDS, PROPERTY_WORDS,
    TYPE_NAME_INDEX_MASK, UNRESOLVED_TYPE,
};
use crate::error::{LayoutError, LayoutResult};
use crate::flags::{MethodFlags, PropertyFlags};

/// One property row with its notify word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PropertyRow<'a> {
    pub name: &'a [u8],
    pub type_name: &'a [u8],
    pub flags: PropertyFlags,
    pub notify: u32,
}

/// One method row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MethodRow<'a> {
    pub name: &'a [u8],
    pub argc: u32,
    pub parameter_offset: u32,
    pub tag: &'a [u8],
    pub flags: MethodFlags,
}

/// A decoded parameter type-info word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeInfo<'a> {
    Builtin(u32),
    Named(&'a [u8]),
}

/// View over a table and its string blob.
#[derive(Debug, Clone, Copy)]
pub struct TableView<'a> {
    table: &'a [u32],
    blob: &'a [u8],
    layout: BlobLayout,
}

impl<'a> TableView<'a> {
    pub fn new(table: &'a [u32], blob: &'a [u8], layout: BlobLayout) -> Self {
        Self {
            table,
            blob,
            layout,
        }
    }

    pub fn word(&self, at: usize) -> LayoutResult<u32> {
        self.table
            .get(at)
            .copied()
            .ok_or(LayoutError::ReadOutOfBounds {
                offset: at,
                len: self.table.len(),
            })
    }

    /// Header field by slot (see [`header`]).
    pub fn header(&self, slot: usize) -> LayoutResult<u32> {
        if slot >= HEADER_WORDS {
            return Err(LayoutError::ReadOutOfBounds {
                offset: slot,
                len: HEADER_WORDS,
            });
        }
        self.word(slot)
    }

    fn header_usize(&self, slot: usize) -> LayoutResult<usize> {
        Ok(self.header(slot)? as usize)
    }

    pub fn revision(&self) -> LayoutResult<u32> {
        self.header(header::REVISION)
    }

    pub fn class_name(&self) -> LayoutResult<&'a [u8]> {
        self.string(self.header_usize(header::CLASS_NAME)?)
    }

    pub fn signal_count(&self) -> LayoutResult<usize> {
        self.header_usize(header::SIGNAL_COUNT)
    }

    pub fn method_count(&self) -> LayoutResult<usize> {
        self.header_usize(header::METHOD_COUNT)
    }

    pub fn property_count(&self) -> LayoutResult<usize> {
        self.header_usize(header::PROPERTY_COUNT)
    }

    /// Class-info pairs in table order.
    pub fn class_info(&self) -> LayoutResult<Vec<(&'a [u8], &'a [u8])>> {
        let count = self.header_usize(header::CLASS_INFO_COUNT)?;
        let base = self.header_usize(header::CLASS_INFO_OFFSET)?;
        (0..count)
            .map(|i| {
                let row = base + i * CLASS_INFO_WORDS;
                Ok((self.string_at(row)?, self.string_at(row + 1)?))
            })
            .collect()
    }

    /// Property `index`, 0-based within this table.
    pub fn property(&self, index: usize) -> LayoutResult<PropertyRow<'a>> {
        let count = self.property_count()?;
        check_index(index, count)?;
        let base = self.header_usize(header::PROPERTY_OFFSET)?;
        let row = base + index * PROPERTY_WORDS;
        Ok(PropertyRow {
            name: self.string_at(row)?,
            type_name: self.string_at(row + 1)?,
            flags: PropertyFlags(self.word(row + 2)?),
            notify: self.word(base + count * PROPERTY_WORDS + index)?,
        })
    }

    /// Method `index` in serialized order, 0-based within this table.
    pub fn method(&self, index: usize) -> LayoutResult<MethodRow<'a>> {
        check_index(index, self.method_count()?)?;
        let row = self.header_usize(header::METHOD_OFFSET)? + index * METHOD_WORDS;
        Ok(MethodRow {
            name: self.string_at(row)?,
            argc: self.word(row + 1)?,
            parameter_offset: self.word(row + 2)?,
            tag: self.string_at(row + 3)?,
            flags: MethodFlags(self.word(row + 4)?),
        })
    }

    /// Return type followed by the parameter types of method `index`.
    pub fn method_types(&self, index: usize) -> LayoutResult<Vec<TypeInfo<'a>>> {
        let method = self.method(index)?;
        let start = method.parameter_offset as usize;
        (start..=start + method.argc as usize)
            .map(|at| self.type_info(self.word(at)?))
            .collect()
    }

    /// Decode a type-info word.
    pub fn type_info(&self, word: u32) -> LayoutResult<TypeInfo<'a>> {
        if word & UNRESOLVED_TYPE == 0 {
            return Ok(TypeInfo::Builtin(word));
        }
        Ok(TypeInfo::Named(
            self.string((word & TYPE_NAME_INDEX_MASK) as usize)?,
        ))
    }

    /// Resolve string `index` through its blob descriptor.
    pub fn string(&self, index: usize) -> LayoutResult<&'a [u8]> {
        let descriptor = index * self.layout.descriptor_width();
        let (len, start) = match self.layout {
            BlobLayout::Compact => (
                self.blob_u32(descriptor)? as usize,
                self.blob_u32(descriptor + 4)? as usize,
            ),
            BlobLayout::ByteArrayData => {
                let relative = self.blob_i64(descriptor + 16)?;
                let start = usize::try_from(relative)
                    .ok()
                    .and_then(|r| r.checked_add(descriptor))
                    .ok_or(LayoutError::ReadOutOfBounds {
                        offset: descriptor,
                        len: self.blob.len(),
                    })?;
                (self.blob_u32(descriptor + 4)? as usize, start)
            }
        };
        self.blob_bytes(start, len)
    }

    fn string_at(&self, at: usize) -> LayoutResult<&'a [u8]> {
        self.string(self.word(at)? as usize)
    }

    fn blob_bytes(&self, at: usize, len: usize) -> LayoutResult<&'a [u8]> {
        at.checked_add(len)
            .and_then(|end| self.blob.get(at..end))
            .ok_or(LayoutError::ReadOutOfBounds {
                offset: at,
                len: self.blob.len(),
            })
    }

    fn blob_u32(&self, at: usize) -> LayoutResult<u32> {
        let mut bytes = [0u8; 4];
        bytes.copy_from_slice(self.blob_bytes(at, 4)?);
        Ok(u32::from_le_bytes(bytes))
    }

    fn blob_i64(&self, at: usize) -> LayoutResult<i64> {
        let mut bytes = [0u8; 8];
        bytes.copy_from_slice(self.blob_bytes(at, 8)?);
        Ok(i64::from_le_bytes(bytes))
    }
}

fn check_index(index: usize, count: usize) -> LayoutResult<()> {
    if index >= count {
        return Err(LayoutError::ReadOutOfBounds {
            offset: index,
            len: count,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CompilerConfig;
    use crate::layout::{BinaryLayoutBuilder, StringBlobWriter};
    use crate::member::{MethodKind, PropertySpec};
    use crate::registry::MemberRegistry;

    fn compile(registry: &MemberRegistry, layout: BlobLayout) -> (Vec<u32>, Vec<u8>) {
        let config = CompilerConfig::default().with_blob_layout(layout);
        let table = BinaryLayoutBuilder::new("Gauge", registry, config)
            .build()
            .expect("layout");
        let blob = StringBlobWriter::new(layout)
            .write(&table.strings)
            .expect("blob");
        (table.words, blob)
    }

    fn sample() -> MemberRegistry {
        let mut registry = MemberRegistry::new(0, 0);
        registry.add_method(MethodKind::Slot, "setLevel(double)", "void");
        registry.add_method(MethodKind::Signal, "levelChanged(double)", "");
        registry.add_property(
            "level",
            PropertySpec::new("double").notify("levelChanged").into_handle(),
        );
        registry.add_class_info("unit", "bar");
        registry
    }

    #[test]
    fn test_reads_back_both_layouts() {
        let registry = sample();
        for layout in [BlobLayout::Compact, BlobLayout::ByteArrayData] {
            let (words, blob) = compile(&registry, layout);
            let view = TableView::new(&words, &blob, layout);

            assert_eq!(view.revision().expect("revision"), 7);
            assert_eq!(view.class_name().expect("name"), b"Gauge");
            assert_eq!(view.class_info().expect("info"), vec![(&b"unit"[..], &b"bar"[..])]);

            let signal = view.method(0).expect("method 0");
            assert_eq!(signal.name, b"levelChanged");
            assert_eq!(signal.flags.kind(), MethodKind::Signal);
            assert_eq!(signal.tag, b"");
            let slot = view.method(1).expect("method 1");
            assert_eq!(slot.name, b"setLevel");
            assert_eq!(
                view.method_types(1).expect("types"),
                vec![TypeInfo::Builtin(43), TypeInfo::Builtin(6)]
            );

            let property = view.property(0).expect("property");
            assert_eq!(property.name, b"level");
            assert_eq!(property.type_name, b"double");
            assert!(property.flags.contains(PropertyFlags::NOTIFY));
            assert_eq!(property.notify, 0);
        }
    }

    #[test]
    fn test_named_types_resolve_through_blob() {
        let mut registry = MemberRegistry::new(0, 0);
        registry.add_method(MethodKind::Slot, "attach(Sensor*)", "void");
        let (words, blob) = compile(&registry, BlobLayout::Compact);
        let view = TableView::new(&words, &blob, BlobLayout::Compact);
        assert_eq!(
            view.method_types(0).expect("types"),
            vec![TypeInfo::Builtin(43), TypeInfo::Named(b"Sensor*")]
        );
    }

    #[test]
    fn test_out_of_range_reads_fail() {
        let registry = sample();
        let (words, blob) = compile(&registry, BlobLayout::Compact);
        let view = TableView::new(&words, &blob, BlobLayout::Compact);
        assert!(view.method(2).is_err());
        assert!(view.property(1).is_err());
        assert!(view.string(100).is_err());
        assert!(view.header(HEADER_WORDS).is_err());
        assert!(view.word(words.len()).is_err());
    }
}
