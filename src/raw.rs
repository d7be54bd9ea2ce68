// SPDX-License-Identifier: MIT

//! Unvalidated on-disk records, decoded with deku. Offsets and counts are
//! stored exactly as written, including the "count minus one" fields.
//!
//! Layouts are described in Inside Macintosh: More Macintosh Toolbox >
//! Resource Manager Reference > Data Structures.

use deku::prelude::*;

/// Resource header at the start of the fork.
#[derive(Debug, Clone, PartialEq, DekuRead)]
#[deku(endian = "big")]
pub struct ForkHeader {
    pub data_offset: u32,
    pub map_offset: u32,
    pub data_length: u32,
    pub map_length: u32,
}

impl ForkHeader {
    pub const SIZE: usize = 16;
}

/// Fixed portion of the resource map. Only the two list offsets are
/// meaningful on disk; the rest is scratch space for the Resource Manager.
#[derive(Debug, Clone, PartialEq, DekuRead)]
#[deku(endian = "big")]
pub struct MapHeader {
    /// Copy of the resource header, often zeroed.
    pub header_copy: [u8; 16],
    pub next_map_handle: u32,
    pub file_ref_num: u16,
    pub attributes: u16,
    /// Relative to the start of the map.
    pub type_list_offset: u16,
    /// Relative to the start of the map.
    pub name_list_offset: u16,
}

impl MapHeader {
    pub const SIZE: usize = 28;
}

/// One entry of the type list, following its `u16` count field.
#[derive(Debug, Clone, PartialEq, DekuRead)]
#[deku(endian = "big")]
pub struct TypeListEntry {
    pub resource_type: [u8; 4],
    pub count_minus_one: u16,
    /// Relative to the start of the type list.
    pub reference_list_offset: u16,
}

impl TypeListEntry {
    pub const SIZE: usize = 8;

    pub fn count(&self) -> usize {
        usize::from(self.count_minus_one) + 1
    }
}

/// Type list count field. The wire format stores the number of types minus one.
pub const TYPE_COUNT_SIZE: usize = 2;

/// One resource in a type's reference list.
#[derive(Debug, Clone, PartialEq, DekuRead)]
#[deku(endian = "big")]
pub struct ReferenceListEntry {
    pub id: i16,
    /// Relative to the start of the name list. [`NO_NAME`] if unnamed.
    pub name_offset: i16,
    pub attributes: u8,
    /// 24-bit offset into the data area.
    pub data_offset: [u8; 3],
    pub handle: u32,
}

impl ReferenceListEntry {
    pub const SIZE: usize = 12;

    pub fn data_offset(&self) -> u32 {
        let [b0, b1, b2] = self.data_offset;
        (u32::from(b0) << 16) | (u32::from(b1) << 8) | u32::from(b2)
    }

    pub fn has_name(&self) -> bool {
        self.name_offset != NO_NAME
    }
}

/// Name offset sentinel for unnamed resources.
pub const NO_NAME: i16 = -1;

/// Each resource's data is preceded by its length as a `u32`.
pub const DATA_LENGTH_SIZE: usize = 4;

/// Decode a record from a slice already known to hold at least `T::SIZE`
/// bytes.
pub(crate) fn decode<'a, T>(bytes: &'a [u8]) -> Result<T, DekuError>
where
    T: DekuContainerRead<'a>,
{
    let (_rest, record) = T::from_bytes((bytes, 0))?;
    Ok(record)
}
