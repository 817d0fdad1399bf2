// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Insertion-ordered, deduplicating byte-string table.
//!
//! Indices are assigned by first insertion and never change for the life of
//! the pool. A fresh pool is built on every table rebuild, so the order in
//! which the layout builder interns strings is the serialization order.

/// Ordered set of unique byte strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StringPool {
    strings: Vec<Vec<u8>>,
}

impl StringPool {
    /// Create an empty pool.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the index of `bytes`, appending it if not present.
    ///
    /// Linear scan: per-type member counts are small.
    pub fn intern(&mut self, bytes: impl AsRef<[u8]>) -> usize {
        let bytes = bytes.as_ref();
        if let Some(index) = self.index_of(bytes) {
            return index;
        }
        self.strings.push(bytes.to_vec());
        self.strings.len() - 1
    }

    /// Index of `bytes` if already interned.
    pub fn index_of(&self, bytes: &[u8]) -> Option<usize> {
        self.strings.iter().position(|s| s.as_slice() == bytes)
    }

    /// String at `index`.
    pub fn get(&self, index: usize) -> Option<&[u8]> {
        self.strings.get(index).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.strings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }

    /// Iterate in index order.
    pub fn iter(&self) -> impl Iterator<Item = &[u8]> {
        self.strings.iter().map(Vec::as_slice)
    }

    /// Sum of string lengths, excluding terminators.
    pub fn byte_len(&self) -> usize {
        self.strings.iter().map(Vec::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intern_deduplicates() {
        let mut pool = StringPool::new();
        let a = pool.intern("valueChanged");
        let b = pool.intern("setValue");
        let again = pool.intern(b"valueChanged");

        assert_eq!(a, 0);
        assert_eq!(b, 1);
        assert_eq!(again, a);
        assert_eq!(pool.len(), 2);
    }

    #[test]
    fn test_empty_string_is_a_regular_entry() {
        let mut pool = StringPool::new();
        pool.intern("Dial");
        let empty = pool.intern("");
        assert_eq!(empty, 1);
        assert_eq!(pool.get(empty), Some(&b""[..]));
        assert_eq!(pool.intern(""), empty);
    }

    #[test]
    fn test_order_is_first_insertion() {
        let mut pool = StringPool::new();
        for name in ["c", "a", "b", "a", "c"] {
            pool.intern(name);
        }
        let order: Vec<&[u8]> = pool.iter().collect();
        assert_eq!(order, vec![&b"c"[..], &b"a"[..], &b"b"[..]]);
        assert_eq!(pool.byte_len(), 3);
    }

    #[test]
    fn test_prefix_is_not_a_match() {
        let mut pool = StringPool::new();
        pool.intern("value");
        assert_eq!(pool.index_of(b"val"), None);
        assert_eq!(pool.intern("val"), 1);
    }
}
