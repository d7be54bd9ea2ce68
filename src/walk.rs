// SPDX-License-Identifier: MIT

//! Walkers for the type list and the per-type reference lists, and the
//! resolution of each reference's name and data.
//!
//! Offsets chain through three bases: the type list is relative to the map,
//! reference lists are relative to the type list, and names are relative to
//! the name list. Data offsets are relative to the data area.

use std::ops::Range;

use log::{debug, trace};
use rsrc_types::{ResourceId, ResourceType};

use crate::error::{Error, Result};
use crate::layout::MapLayout;
use crate::raw::{self, DATA_LENGTH_SIZE, ReferenceListEntry, TYPE_COUNT_SIZE, TypeListEntry};
use crate::reader::{fits, read_u16, read_u32};
use crate::text::read_pascal_string;

/// One type from the type list, with its reference list located in the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct TypeListing {
    pub resource_type: ResourceType,
    pub count: usize,
    /// Relative to the start of the map.
    pub reference_list_start: usize,
}

/// Iterates over the entries of a type list, checking each against the map.
pub(crate) struct TypeList<'a> {
    map: &'a [u8],
    type_list_offset: usize,
    index: usize,
    count: usize,
}

impl<'a> TypeList<'a> {
    pub fn new(map: &'a [u8], type_list_offset: usize) -> Result<Self> {
        if !fits(map, type_list_offset, TYPE_COUNT_SIZE) {
            return Err(Error::TruncatedTypeListHeader {
                offset: type_list_offset,
            });
        }

        let count = usize::from(read_u16(map, type_list_offset)?) + 1;
        debug!("type list at {type_list_offset:#X} holds {count} types");

        Ok(Self {
            map,
            type_list_offset,
            index: 0,
            count,
        })
    }

    fn read_entry(&self, index: usize) -> Result<TypeListing> {
        let offset = self.type_list_offset + TYPE_COUNT_SIZE + index * TypeListEntry::SIZE;
        if !fits(self.map, offset, TypeListEntry::SIZE) {
            return Err(Error::TruncatedTypeListEntry { index, offset });
        }

        let entry: TypeListEntry = raw::decode(&self.map[offset..offset + TypeListEntry::SIZE])?;
        let listing = TypeListing {
            resource_type: ResourceType(entry.resource_type),
            count: entry.count(),
            reference_list_start: self.type_list_offset
                + usize::from(entry.reference_list_offset),
        };
        debug!(
            "type {} has {} resources, references at {:#X}",
            listing.resource_type, listing.count, listing.reference_list_start
        );

        Ok(listing)
    }
}

impl Iterator for TypeList<'_> {
    type Item = Result<TypeListing>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.index >= self.count {
            return None;
        }

        let item = self.read_entry(self.index);
        // Stop after the first failure.
        self.index = if item.is_ok() { self.index + 1 } else { self.count };

        Some(item)
    }
}

/// Iterates over the reference list of one type.
pub(crate) struct ReferenceList<'a> {
    map: &'a [u8],
    listing: TypeListing,
    index: usize,
}

impl<'a> ReferenceList<'a> {
    pub fn new(map: &'a [u8], listing: TypeListing) -> Self {
        Self {
            map,
            listing,
            index: 0,
        }
    }

    fn read_entry(&self, index: usize) -> Result<ReferenceListEntry> {
        let offset = self.listing.reference_list_start + index * ReferenceListEntry::SIZE;
        if !fits(self.map, offset, ReferenceListEntry::SIZE) {
            return Err(Error::TruncatedReferenceList {
                resource_type: self.listing.resource_type,
            });
        }

        let entry: ReferenceListEntry =
            raw::decode(&self.map[offset..offset + ReferenceListEntry::SIZE])?;
        trace!(
            "{} {}: name {}, attrs {:#04X}, data {:#X}",
            self.listing.resource_type,
            entry.id,
            entry.name_offset,
            entry.attributes,
            entry.data_offset()
        );

        Ok(entry)
    }
}

impl Iterator for ReferenceList<'_> {
    type Item = Result<ReferenceListEntry>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.index >= self.listing.count {
            return None;
        }

        let item = self.read_entry(self.index);
        self.index = if item.is_ok() {
            self.index + 1
        } else {
            self.listing.count
        };

        Some(item)
    }
}

/// Resolve a reference's name through the name list. `None` when the
/// reference has no name or the map has no name list.
pub(crate) fn resolve_name(
    map: &[u8],
    layout: &MapLayout,
    entry: &ReferenceListEntry,
) -> Option<String> {
    if !layout.has_names || !entry.has_name() {
        return None;
    }

    // Negative offsets other than the sentinel point before the list and
    // decode as empty text, like any other unreadable name.
    let name = usize::try_from(entry.name_offset)
        .map(|offset| read_pascal_string(map, layout.name_list_offset + offset))
        .unwrap_or_default();

    Some(name)
}

/// Locate a resource's payload in the data area. The range excludes the
/// length prefix.
pub(crate) fn resolve_data(
    data: &[u8],
    resource_type: ResourceType,
    id: ResourceId,
    data_offset: u32,
) -> Result<Range<usize>> {
    let bad_offset = || Error::BadDataOffset {
        resource_type,
        id,
        offset: data_offset,
    };
    let offset = usize::try_from(data_offset).map_err(|_| bad_offset())?;
    if !fits(data, offset, DATA_LENGTH_SIZE) {
        return Err(bad_offset());
    }

    let length = read_u32(data, offset)?;
    let start = offset + DATA_LENGTH_SIZE;
    let bad_length = || Error::BadDataLength {
        resource_type,
        id,
        length,
    };
    let span = usize::try_from(length).map_err(|_| bad_length())?;
    if !fits(data, start, span) {
        return Err(bad_length());
    }

    Ok(start..start + span)
}
