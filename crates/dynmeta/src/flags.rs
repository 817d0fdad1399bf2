// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Property and method flag words.
//!
//! The bit assignments are fixed by the consumer and listed exactly once, in
//! the associated constants below. Code elsewhere builds flag words from named
//! capabilities ([`PropertyCapabilities`], [`Access`], [`MethodKind`]) and
//! never spells out a mask.
//!
//! # Property bits (table revision 1)
//!
//! | Bit        | Name                 |
//! |------------|----------------------|
//! | 0x00000001 | READABLE             |
//! | 0x00000002 | WRITABLE             |
//! | 0x00000004 | RESETTABLE           |
//! | 0x00000008 | ENUM_OR_FLAG         |
//! | 0x00000100 | STD_CPP_SET          |
//! | 0x00000400 | CONSTANT             |
//! | 0x00000800 | FINAL                |
//! | 0x00001000 | DESIGNABLE           |
//! | 0x00002000 | RESOLVE_DESIGNABLE   |
//! | 0x00004000 | SCRIPTABLE           |
//! | 0x00008000 | RESOLVE_SCRIPTABLE   |
//! | 0x00010000 | STORED               |
//! | 0x00020000 | RESOLVE_STORED       |
//! | 0x00040000 | EDITABLE             |
//! | 0x00080000 | RESOLVE_EDITABLE     |
//! | 0x00100000 | USER                 |
//! | 0x00200000 | RESOLVE_USER         |
//! | 0x00400000 | NOTIFY               |
//!
//! # Method bits
//!
//! Access in bits 0-1, kind in bits 2-3, then COMPATIBILITY 0x10,
//! CLONED 0x20, SCRIPTABLE 0x40.

use crate::member::{Access, MethodKind};
use std::ops::{BitOr, BitOrAssign};

/// Revision of the property bit table above.
pub const FLAGS_TABLE_REVISION: u32 = 1;

/// PropertyFlags - third word of a property row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(transparent)]
pub struct PropertyFlags(pub u32);

impl PropertyFlags {
    pub const READABLE: Self = Self(0x0000_0001);
    pub const WRITABLE: Self = Self(0x0000_0002);
    pub const RESETTABLE: Self = Self(0x0000_0004);
    pub const ENUM_OR_FLAG: Self = Self(0x0000_0008);
    pub const STD_CPP_SET: Self = Self(0x0000_0100);
    pub const CONSTANT: Self = Self(0x0000_0400);
    pub const FINAL: Self = Self(0x0000_0800);
    pub const DESIGNABLE: Self = Self(0x0000_1000);
    pub const RESOLVE_DESIGNABLE: Self = Self(0x0000_2000);
    pub const SCRIPTABLE: Self = Self(0x0000_4000);
    pub const RESOLVE_SCRIPTABLE: Self = Self(0x0000_8000);
    pub const STORED: Self = Self(0x0001_0000);
    pub const RESOLVE_STORED: Self = Self(0x0002_0000);
    pub const EDITABLE: Self = Self(0x0004_0000);
    pub const RESOLVE_EDITABLE: Self = Self(0x0008_0000);
    pub const USER: Self = Self(0x0010_0000);
    pub const RESOLVE_USER: Self = Self(0x0020_0000);
    pub const NOTIFY: Self = Self(0x0040_0000);

    /// Empty flags (written for removed properties)
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Check if flag is set
    pub const fn contains(self, flag: Self) -> bool {
        (self.0 & flag.0) == flag.0
    }

    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Derive the flag word from capabilities.
    ///
    /// Designable, scriptable, stored and user each set either the positive
    /// bit or its "resolve" counterpart. Editable is never declared, so its
    /// resolve bit is always set.
    pub fn from_capabilities(caps: &PropertyCapabilities, has_notify: bool) -> Self {
        let mut flags = Self::empty();
        flags |= pick(caps.designable, Self::DESIGNABLE, Self::RESOLVE_DESIGNABLE);
        flags |= pick(caps.scriptable, Self::SCRIPTABLE, Self::RESOLVE_SCRIPTABLE);
        flags |= pick(caps.stored, Self::STORED, Self::RESOLVE_STORED);
        flags |= pick(caps.user, Self::USER, Self::RESOLVE_USER);
        flags |= Self::RESOLVE_EDITABLE;

        for (on, flag) in [
            (caps.enum_or_flag, Self::ENUM_OR_FLAG),
            (caps.readable, Self::READABLE),
            (caps.writable, Self::WRITABLE),
            (caps.resettable, Self::RESETTABLE),
            (caps.constant, Self::CONSTANT),
            (caps.is_final, Self::FINAL),
            (has_notify, Self::NOTIFY),
        ] {
            if on {
                flags |= flag;
            }
        }
        flags
    }
}

fn pick(on: bool, yes: PropertyFlags, resolve: PropertyFlags) -> PropertyFlags {
    if on {
        yes
    } else {
        resolve
    }
}

impl BitOr for PropertyFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for PropertyFlags {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

/// Capability answers for one property, as reported by its descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PropertyCapabilities {
    pub readable: bool,
    pub writable: bool,
    pub resettable: bool,
    pub designable: bool,
    pub scriptable: bool,
    pub stored: bool,
    pub user: bool,
    pub constant: bool,
    pub is_final: bool,
    pub enum_or_flag: bool,
}

impl Default for PropertyCapabilities {
    /// A plain readable property; designable, scriptable and stored as the
    /// consumer assumes when nothing is declared.
    fn default() -> Self {
        Self {
            readable: true,
            writable: false,
            resettable: false,
            designable: true,
            scriptable: true,
            stored: true,
            user: false,
            constant: false,
            is_final: false,
            enum_or_flag: false,
        }
    }
}

/// MethodFlags - fifth word of a method row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(transparent)]
pub struct MethodFlags(pub u32);

impl MethodFlags {
    pub const ACCESS_PRIVATE: Self = Self(0x00);
    pub const ACCESS_PROTECTED: Self = Self(0x01);
    pub const ACCESS_PUBLIC: Self = Self(0x02);
    pub const ACCESS_MASK: Self = Self(0x03);

    pub const METHOD_METHOD: Self = Self(0x00);
    pub const METHOD_SIGNAL: Self = Self(0x04);
    pub const METHOD_SLOT: Self = Self(0x08);
    pub const METHOD_CONSTRUCTOR: Self = Self(0x0c);
    pub const METHOD_TYPE_MASK: Self = Self(0x0c);

    pub const COMPATIBILITY: Self = Self(0x10);
    pub const CLONED: Self = Self(0x20);
    pub const SCRIPTABLE: Self = Self(0x40);

    /// Flag word for a method of `kind` with `access`.
    pub const fn for_method(access: Access, kind: MethodKind) -> Self {
        let access_bits = match access {
            Access::Private => Self::ACCESS_PRIVATE.0,
            Access::Protected => Self::ACCESS_PROTECTED.0,
            Access::Public => Self::ACCESS_PUBLIC.0,
        };
        let kind_bits = match kind {
            MethodKind::Method => Self::METHOD_METHOD.0,
            MethodKind::Signal => Self::METHOD_SIGNAL.0,
            MethodKind::Slot => Self::METHOD_SLOT.0,
            MethodKind::Constructor => Self::METHOD_CONSTRUCTOR.0,
        };
        Self(access_bits | kind_bits)
    }

    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Kind encoded in bits 2-3.
    pub const fn kind(self) -> MethodKind {
        match self.0 & Self::METHOD_TYPE_MASK.0 {
            0x04 => MethodKind::Signal,
            0x08 => MethodKind::Slot,
            0x0c => MethodKind::Constructor,
            _ => MethodKind::Method,
        }
    }

    /// Access encoded in bits 0-1.
    pub const fn access(self) -> Access {
        match self.0 & Self::ACCESS_MASK.0 {
            0x01 => Access::Protected,
            0x02 => Access::Public,
            _ => Access::Private,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_capabilities_flags() {
        let flags = PropertyFlags::from_capabilities(&PropertyCapabilities::default(), false);
        let expected = PropertyFlags::READABLE
            | PropertyFlags::DESIGNABLE
            | PropertyFlags::SCRIPTABLE
            | PropertyFlags::STORED
            | PropertyFlags::RESOLVE_USER
            | PropertyFlags::RESOLVE_EDITABLE;
        assert_eq!(flags, expected);
        assert!(!flags.contains(PropertyFlags::NOTIFY));
    }

    #[test]
    fn test_resolve_bits_replace_negative_answers() {
        let caps = PropertyCapabilities {
            designable: false,
            scriptable: false,
            stored: false,
            user: true,
            ..PropertyCapabilities::default()
        };
        let flags = PropertyFlags::from_capabilities(&caps, true);
        assert!(flags.contains(PropertyFlags::RESOLVE_DESIGNABLE));
        assert!(flags.contains(PropertyFlags::RESOLVE_SCRIPTABLE));
        assert!(flags.contains(PropertyFlags::RESOLVE_STORED));
        assert!(flags.contains(PropertyFlags::USER));
        assert!(!flags.contains(PropertyFlags::RESOLVE_USER));
        assert!(flags.contains(PropertyFlags::NOTIFY));
    }

    #[test]
    fn test_full_capabilities() {
        let caps = PropertyCapabilities {
            readable: true,
            writable: true,
            resettable: true,
            designable: true,
            scriptable: true,
            stored: true,
            user: true,
            constant: true,
            is_final: true,
            enum_or_flag: true,
        };
        let flags = PropertyFlags::from_capabilities(&caps, true);
        assert_eq!(flags.bits(), 0x0059_5C0F);
    }

    #[test]
    fn test_method_flags_roundtrip_fields() {
        let flags = MethodFlags::for_method(Access::Public, MethodKind::Signal);
        assert_eq!(flags.bits(), 0x06);
        assert_eq!(flags.kind(), MethodKind::Signal);
        assert_eq!(flags.access(), Access::Public);

        let flags = MethodFlags::for_method(Access::Protected, MethodKind::Slot);
        assert_eq!(flags.bits(), 0x09);
        assert_eq!(MethodFlags::for_method(Access::Private, MethodKind::Constructor).bits(), 0x0c);
    }
}
