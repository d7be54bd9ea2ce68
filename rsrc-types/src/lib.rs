// SPDX-License-Identifier: MIT

//! Types and constants from Apple's [Inside Macintosh: More Macintosh Toolbox > Resource Manager](https://developer.apple.com/library/archive/documentation/mac/pdf/MoreMacintoshToolbox.pdf),
//! adjusted to use Rust-friendly naming.

#![forbid(dead_code, unsafe_code, unused)]

use std::fmt;
use std::str::FromStr;

/// Four-character code classifying a resource, called `ResType` in
/// Inside Macintosh.
///
/// Codes are compared bytewise and displayed as Latin-1, one character per
/// byte. They are not guaranteed to be printable or ASCII.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ResourceType(pub [u8; 4]);

impl ResourceType {
    /// Black and white icon with mask.
    pub const ICON_LIST: Self = Self(*b"ICN#");
    pub const ICON_LARGE_4BIT: Self = Self(*b"icl4");
    pub const ICON_LARGE_8BIT: Self = Self(*b"icl8");
    pub const ICON_SMALL_LIST: Self = Self(*b"ics#");
    pub const ICON_SMALL_4BIT: Self = Self(*b"ics4");
    pub const ICON_SMALL_8BIT: Self = Self(*b"ics8");
    pub const STRING: Self = Self(*b"STR ");
    pub const STRING_LIST: Self = Self(*b"STR#");
    pub const CODE: Self = Self(*b"CODE");
    pub const VERSION: Self = Self(*b"vers");
    pub const BUNDLE: Self = Self(*b"BNDL");
    pub const FILE_REFERENCE: Self = Self(*b"FREF");

    pub const fn from_bytes(bytes: [u8; 4]) -> Self {
        Self(bytes)
    }

    pub const fn as_bytes(&self) -> &[u8; 4] {
        &self.0
    }

    /// Render the code as Latin-1 text. Every byte maps to exactly one
    /// character, so this never fails.
    pub fn to_latin1(&self) -> String {
        self.0.iter().map(|&b| char::from(b)).collect()
    }
}

impl From<[u8; 4]> for ResourceType {
    fn from(bytes: [u8; 4]) -> Self {
        Self(bytes)
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.to_latin1())
    }
}

impl fmt::Debug for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}'", self.to_latin1().escape_debug())
    }
}

/// Failure to interpret text as a [`ResourceType`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseResourceTypeError {
    Empty,
    TooLong(usize),
    NotLatin1(char),
}

impl fmt::Display for ParseResourceTypeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "resource type is empty"),
            Self::TooLong(len) => write!(f, "resource type has {len} characters, expected at most 4"),
            Self::NotLatin1(c) => write!(f, "resource type character {c:?} is not Latin-1"),
        }
    }
}

impl std::error::Error for ParseResourceTypeError {}

impl FromStr for ResourceType {
    type Err = ParseResourceTypeError;

    /// Parse up to four Latin-1 characters. Short codes are padded with
    /// spaces, so `"snd"` is `'snd '`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let count = s.chars().count();
        if count == 0 {
            return Err(ParseResourceTypeError::Empty);
        }
        if count > 4 {
            return Err(ParseResourceTypeError::TooLong(count));
        }

        let mut bytes = [b' '; 4];
        for (slot, c) in bytes.iter_mut().zip(s.chars()) {
            *slot = u8::try_from(c).map_err(|_| ParseResourceTypeError::NotLatin1(c))?;
        }

        Ok(Self(bytes))
    }
}

/// Resource ID. Negative IDs are conventionally owned by the system.
pub type ResourceId = i16;

/// Bits of the reference list attribute byte.
///
/// Described in Inside Macintosh: More Macintosh Toolbox > Resource Attributes.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceAttribute {
    /// Reserved for use by the Resource Manager.
    SystemReference = 0x80,
    /// Read into the system heap rather than the application heap.
    SystemHeap = 0x40,
    Purgeable = 0x20,
    Locked = 0x10,
    /// Cannot be changed or removed by the application.
    Protected = 0x08,
    /// Read in as soon as the resource file is opened.
    Preload = 0x04,
    /// Marked for writing on the next update.
    Changed = 0x02,
}

impl ResourceAttribute {
    pub const ALL: [Self; 7] = [
        Self::SystemReference,
        Self::SystemHeap,
        Self::Purgeable,
        Self::Locked,
        Self::Protected,
        Self::Preload,
        Self::Changed,
    ];

    pub const fn mask(self) -> u8 {
        self as u8
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::SystemReference => "sysref",
            Self::SystemHeap => "sysheap",
            Self::Purgeable => "purgeable",
            Self::Locked => "locked",
            Self::Protected => "protected",
            Self::Preload => "preload",
            Self::Changed => "changed",
        }
    }
}

/// The raw attribute byte of a reference list entry. Unknown bits are kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ResourceAttributes(pub u8);

impl ResourceAttributes {
    pub const fn bits(self) -> u8 {
        self.0
    }

    pub const fn contains(self, attribute: ResourceAttribute) -> bool {
        self.0 & attribute.mask() != 0
    }

    /// Named attributes that are set, most significant bit first.
    pub fn iter(self) -> impl Iterator<Item = ResourceAttribute> {
        ResourceAttribute::ALL
            .into_iter()
            .filter(move |attribute| self.contains(*attribute))
    }
}

impl From<u8> for ResourceAttributes {
    fn from(bits: u8) -> Self {
        Self(bits)
    }
}

impl fmt::Display for ResourceAttributes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for attribute in self.iter() {
            if !first {
                f.write_str("|")?;
            }
            f.write_str(attribute.label())?;
            first = false;
        }
        Ok(())
    }
}
