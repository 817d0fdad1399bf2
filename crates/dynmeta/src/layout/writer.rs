// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Bounds-checked cursors over preallocated table and blob buffers.

use crate::error::{to_word, LayoutError, LayoutResult};

/// Generate little-endian write methods for [`ByteWriter`].
macro_rules! impl_write_le {
    ($name:ident, $type:ty) => {
        pub fn $name(&mut self, value: $type) -> LayoutResult<()> {
            self.write_bytes(&value.to_le_bytes())
        }
    };
}

/// Cursor writing 32-bit words into a table of fixed size.
pub(crate) struct WordWriter<'a> {
    table: &'a mut [u32],
    offset: usize,
}

impl<'a> WordWriter<'a> {
    pub fn new(table: &'a mut [u32]) -> Self {
        Self { table, offset: 0 }
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn write(&mut self, word: u32) -> LayoutResult<()> {
        self.patch(self.offset, word)?;
        self.offset += 1;
        Ok(())
    }

    /// Write a count or index, failing if it does not fit a word.
    pub fn write_index(&mut self, value: usize, what: &'static str) -> LayoutResult<()> {
        self.write(to_word(value, what)?)
    }

    pub fn write_row(&mut self, words: &[u32]) -> LayoutResult<()> {
        words.iter().try_for_each(|&word| self.write(word))
    }

    /// Overwrite an already reserved word without moving the cursor.
    pub fn patch(&mut self, at: usize, word: u32) -> LayoutResult<()> {
        let capacity = self.table.len();
        let slot = self.table.get_mut(at).ok_or(LayoutError::WriteOverflow {
            offset: at,
            capacity,
        })?;
        *slot = word;
        Ok(())
    }
}

/// Cursor writing little-endian values into a byte buffer of fixed size.
pub(crate) struct ByteWriter<'a> {
    buffer: &'a mut [u8],
    offset: usize,
}

impl<'a> ByteWriter<'a> {
    pub fn new(buffer: &'a mut [u8]) -> Self {
        Self { buffer, offset: 0 }
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    impl_write_le!(write_u32_le, u32);
    impl_write_le!(write_i32_le, i32);
    impl_write_le!(write_i64_le, i64);

    pub fn write_u8(&mut self, value: u8) -> LayoutResult<()> {
        self.write_bytes(&[value])
    }

    pub fn write_bytes(&mut self, data: &[u8]) -> LayoutResult<()> {
        let end = self.offset + data.len();
        if end > self.buffer.len() {
            return Err(LayoutError::WriteOverflow {
                offset: self.offset,
                capacity: self.buffer.len(),
            });
        }
        self.buffer[self.offset..end].copy_from_slice(data);
        self.offset = end;
        Ok(())
    }
}
