#[cfg(test)]
mod addr_test;

use core::fmt;
use core::ops::{Add, Sub};

/// A virtual address in a process's address space.
///
/// The top nibble of a `Vaddr` tags the kind of storage it points into
/// (see [`AddrType`]); the remaining 60 bits are an opaque offset chosen by
/// whichever allocator owns that tag.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(transparent)]
pub struct Vaddr(u64);

impl Vaddr {
    #[inline]
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    #[inline]
    #[must_use]
    pub const fn null() -> Self {
        Self(0)
    }

    #[inline]
    #[must_use]
    pub const fn is_null(self) -> bool {
        self.0 == 0
    }

    #[inline]
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }

    #[inline]
    #[must_use]
    pub const fn add(self, offset: u64) -> Self {
        Self(self.0.wrapping_add(offset))
    }

    #[inline]
    #[must_use]
    pub const fn sub(self, offset: u64) -> Self {
        Self(self.0.wrapping_sub(offset))
    }

    /// Byte distance from `other` to `self`; negative if `self` precedes `other`.
    #[inline]
    #[must_use]
    pub const fn diff(self, other: Self) -> i64 {
        self.0.wrapping_sub(other.0) as i64
    }

    #[inline]
    #[must_use]
    pub const fn align_up(self, align: u64) -> Self {
        Self((self.0 + align - 1) & !(align - 1))
    }

    #[inline]
    #[must_use]
    pub const fn align_down(self, align: u64) -> Self {
        Self(self.0 & !(align - 1))
    }

    #[inline]
    #[must_use]
    pub const fn is_aligned(self, align: u64) -> bool {
        self.0 & (align - 1) == 0
    }

    /// The storage tag carried in the top nibble.
    #[inline]
    #[must_use]
    pub const fn addr_type(self) -> AddrType {
        AddrType::from_tag((self.0 >> 60) as u8)
    }
}

impl Add<u64> for Vaddr {
    type Output = Self;

    #[inline]
    fn add(self, rhs: u64) -> Self {
        self.add(rhs)
    }
}

impl Sub<u64> for Vaddr {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: u64) -> Self {
        self.sub(rhs)
    }
}

impl fmt::Debug for Vaddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Vaddr(0x{:016x})", self.0)
    }
}

impl fmt::Display for Vaddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:016x}", self.0)
    }
}

/// What kind of storage a [`Vaddr`]'s top nibble refers to.
///
/// `ValueNN` tags mark heap allocations from the size class that can hold
/// up to `NN` bytes; `Program` addresses name types, functions, and other
/// load-time constants that never move.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum AddrType {
    Meta,
    Value08,
    Value16,
    Value24,
    Value32,
    Value40,
    Value48,
    Program,
    Unknown(u8),
}

impl AddrType {
    pub const MASK: u64 = 0xF000_0000_0000_0000;

    #[inline]
    #[must_use]
    pub const fn from_tag(tag: u8) -> Self {
        match tag {
            0x0 => Self::Meta,
            0x1 => Self::Value08,
            0x2 => Self::Value16,
            0x3 => Self::Value24,
            0x4 => Self::Value32,
            0x5 => Self::Value40,
            0x6 => Self::Value48,
            0xF => Self::Program,
            other => Self::Unknown(other),
        }
    }

    #[inline]
    #[must_use]
    pub const fn tag(self) -> u8 {
        match self {
            Self::Meta => 0x0,
            Self::Value08 => 0x1,
            Self::Value16 => 0x2,
            Self::Value24 => 0x3,
            Self::Value32 => 0x4,
            Self::Value40 => 0x5,
            Self::Value48 => 0x6,
            Self::Program => 0xF,
            Self::Unknown(n) => n,
        }
    }
}

/// Maps an allocation's byte count to the smallest covering size class.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct SizeClass;

impl SizeClass {
    /// Size classes in ascending byte-capacity order, paired with the
    /// `AddrType` tag an allocation of that class is addressed through.
    /// Class `NN` covers lengths up to `2^NN - 1`.
    const CLASSES: [(u64, AddrType); 6] = [
        (0xFF, AddrType::Value08),
        (0xFFFF, AddrType::Value16),
        (0x00FF_FFFF, AddrType::Value24),
        (0xFFFF_FFFF, AddrType::Value32),
        (0xFF_FFFF_FFFF, AddrType::Value40),
        (0xFFFF_FFFF_FFFF, AddrType::Value48),
    ];

    /// The smallest class able to hold `len` bytes.
    #[inline]
    #[must_use]
    pub fn for_len(len: u64) -> AddrType {
        for (capacity, tag) in Self::CLASSES {
            if len <= capacity {
                return tag;
            }
        }
        AddrType::Value48
    }
}
