// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! String blob: one descriptor per pooled string, then the NUL-terminated
//! bytes of every string in pool order.

use crate::config::BlobLayout;
use crate::error::{to_word, LayoutError, LayoutResult};
use crate::layout::writer::ByteWriter;
use crate::string_pool::StringPool;

/// Serializes a finished [`StringPool`].
///
/// Run it only after the table pass: any string interned later would shift
/// the byte region and invalidate every descriptor.
#[derive(Debug, Clone, Copy, Default)]
pub struct StringBlobWriter {
    layout: BlobLayout,
}

impl StringBlobWriter {
    pub fn new(layout: BlobLayout) -> Self {
        Self { layout }
    }

    pub fn layout(&self) -> BlobLayout {
        self.layout
    }

    /// Total blob size in bytes.
    pub fn blob_size(&self, pool: &StringPool) -> usize {
        pool.len() * self.layout.descriptor_width() + pool.byte_len() + pool.len()
    }

    /// Allocate and fill the blob.
    pub fn write(&self, pool: &StringPool) -> LayoutResult<Vec<u8>> {
        let size = self.blob_size(pool);
        let mut blob = vec![0u8; size];
        let width = self.layout.descriptor_width();
        let data_start = pool.len() * width;

        let mut out = ByteWriter::new(&mut blob);
        let mut data_offset = data_start;
        for (i, string) in pool.iter().enumerate() {
            let len = to_word(string.len(), "string length")?;
            match self.layout {
                BlobLayout::Compact => {
                    out.write_u32_le(len)?;
                    out.write_u32_le(to_word(data_offset, "string offset")?)?;
                }
                BlobLayout::ByteArrayData => {
                    let relative = data_offset - i * width;
                    out.write_i32_le(-1)?;
                    out.write_i32_le(narrow_signed(string.len(), "string length")?)?;
                    out.write_u32_le(0)?;
                    out.write_u32_le(0)?;
                    out.write_i64_le(
                        i64::try_from(relative).map_err(|_| LayoutError::IndexOverflow {
                            what: "string offset",
                        })?,
                    )?;
                }
            }
            data_offset += string.len() + 1;
        }

        for string in pool.iter() {
            out.write_bytes(string)?;
            out.write_u8(0)?;
        }

        let written = out.offset();
        if written != size {
            return Err(LayoutError::SizeMismatch {
                expected: size,
                written,
            });
        }
        Ok(blob)
    }
}

fn narrow_signed(value: usize, what: &'static str) -> LayoutResult<i32> {
    i32::try_from(value).map_err(|_| LayoutError::IndexOverflow { what })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pool(strings: &[&str]) -> StringPool {
        let mut pool = StringPool::new();
        for s in strings {
            pool.intern(s);
        }
        pool
    }

    fn u32_at(blob: &[u8], at: usize) -> u32 {
        u32::from_le_bytes(blob[at..at + 4].try_into().expect("4 bytes"))
    }

    #[test]
    fn test_compact_layout() {
        let pool = pool(&["Dial", "", "value"]);
        let writer = StringBlobWriter::default();
        let blob = writer.write(&pool).expect("blob");

        assert_eq!(blob.len(), 3 * 8 + 5 + 1 + 6);
        assert_eq!((u32_at(&blob, 0), u32_at(&blob, 4)), (4, 24));
        assert_eq!((u32_at(&blob, 8), u32_at(&blob, 12)), (0, 29));
        assert_eq!((u32_at(&blob, 16), u32_at(&blob, 20)), (5, 30));
        assert_eq!(&blob[24..], b"Dial\0\0value\0");
    }

    #[test]
    fn test_byte_array_data_offsets_are_relative() {
        let pool = pool(&["ab", "c"]);
        let writer = StringBlobWriter::new(BlobLayout::ByteArrayData);
        let blob = writer.write(&pool).expect("blob");

        assert_eq!(blob.len(), 2 * 24 + 3 + 2);
        assert_eq!(i32::from_le_bytes(blob[0..4].try_into().expect("4")), -1);
        assert_eq!(u32_at(&blob, 4), 2);
        let first = i64::from_le_bytes(blob[16..24].try_into().expect("8"));
        let second = i64::from_le_bytes(blob[40..48].try_into().expect("8"));
        assert_eq!(first, 48);
        assert_eq!(second, 48 + 3 - 24);
        assert_eq!(&blob[48..], b"ab\0c\0");
    }

    #[test]
    fn test_empty_pool() {
        let blob = StringBlobWriter::default()
            .write(&StringPool::new())
            .expect("blob");
        assert!(blob.is_empty());
    }
}
