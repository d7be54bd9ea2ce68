// SPDX-License-Identifier: MIT

//! Decoder for classic Mac OS resource forks.
//!
//! A fork is a 16-byte header naming a data area and a resource map. The map
//! holds a type list, one reference list per type and a name list, each
//! addressed relative to a different base. [`ResourceFork::parse`] walks them with
//! bounds checks at every hop and yields a [`ResourceFork`] borrowing the
//! input; payloads are never copied.
//!
//! ```
//! # fn run(buf: &[u8]) -> rsrcfork::Result<()> {
//! use rsrcfork::{ResourceFork, ResourceType};
//!
//! let fork = ResourceFork::parse(buf)?;
//! for entry in fork.entries() {
//!     println!("{} ({}) {} bytes", entry.resource_type, entry.id, entry.data_length);
//! }
//! let icon = fork.extract(ResourceType::ICON_LIST, 128)?;
//! # let _ = icon;
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]

pub mod error;
pub mod raw;
pub mod reader;
pub mod text;

mod layout;
mod walk;

use std::ops::Range;

use itertools::Itertools;
use log::debug;

pub use error::{Error, Result};
pub use rsrc_types::{ResourceAttribute, ResourceAttributes, ResourceId, ResourceType};

use layout::{parse_fork_header, parse_map_header};
use walk::{ReferenceList, TypeList, resolve_data, resolve_name};

/// One resource, with its payload located in the data area.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceEntry {
    pub resource_type: ResourceType,
    pub id: ResourceId,
    /// `None` when the reference has no name.
    pub name: Option<String>,
    /// Attribute byte, passed through untouched.
    pub attributes: u8,
    /// Start of the payload in the data area, past its length prefix.
    pub data_offset: usize,
    pub data_length: usize,
}

impl ResourceEntry {
    /// The decoded name, or empty text for unnamed resources.
    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or_default()
    }

    pub fn attributes(&self) -> ResourceAttributes {
        ResourceAttributes(self.attributes)
    }

    pub fn data_range(&self) -> Range<usize> {
        self.data_offset..self.data_offset + self.data_length
    }

    fn matches(&self, resource_type: ResourceType, id: ResourceId) -> bool {
        self.resource_type == resource_type && self.id == id
    }
}

/// A parsed fork: the data area and its entries sorted by type, then ID.
#[derive(Debug, Clone)]
pub struct ResourceFork<'a> {
    data: &'a [u8],
    entries: Vec<ResourceEntry>,
}

impl<'a> ResourceFork<'a> {
    /// Decode a fully-buffered fork. The first structural problem aborts
    /// the whole parse.
    pub fn parse(buf: &'a [u8]) -> Result<Self> {
        let regions = parse_fork_header(buf)?;
        let layout = parse_map_header(regions.map)?;

        let mut entries = Vec::new();
        for listing in TypeList::new(regions.map, layout.type_list_offset)? {
            let listing = listing?;
            for reference in ReferenceList::new(regions.map, listing) {
                let reference = reference?;
                let name = resolve_name(regions.map, &layout, &reference);
                let range = resolve_data(
                    regions.data,
                    listing.resource_type,
                    reference.id,
                    reference.data_offset(),
                )?;

                entries.push(ResourceEntry {
                    resource_type: listing.resource_type,
                    id: reference.id,
                    name,
                    attributes: reference.attributes,
                    data_offset: range.start,
                    data_length: range.len(),
                });
            }
        }

        // Stable, so duplicate (type, id) pairs keep their on-disk order.
        entries.sort_by_key(|entry| (entry.resource_type, entry.id));
        debug!("parsed {} resources", entries.len());

        Ok(Self {
            data: regions.data,
            entries,
        })
    }

    pub fn data_area(&self) -> &'a [u8] {
        self.data
    }

    pub fn entries(&self) -> &[ResourceEntry] {
        &self.entries
    }

    pub fn into_parts(self) -> (&'a [u8], Vec<ResourceEntry>) {
        (self.data, self.entries)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The first entry with this type and ID.
    pub fn get(&self, resource_type: ResourceType, id: ResourceId) -> Option<&ResourceEntry> {
        self.entries
            .iter()
            .find(|entry| entry.matches(resource_type, id))
    }

    /// Payload of the first entry with this type and ID.
    pub fn extract(&self, resource_type: ResourceType, id: ResourceId) -> Result<&'a [u8]> {
        extract(self.data, &self.entries, resource_type, id)
    }

    /// Distinct types, in sorted order.
    pub fn types(&self) -> impl Iterator<Item = ResourceType> + '_ {
        self.entries.iter().map(|entry| entry.resource_type).dedup()
    }

    /// Number of resources of each type, in sorted order.
    pub fn type_counts(&self) -> Vec<(ResourceType, usize)> {
        self.entries
            .iter()
            .map(|entry| entry.resource_type)
            .dedup_with_count()
            .map(|(count, resource_type)| (resource_type, count))
            .collect()
    }
}

/// Decode a fork into its data area and sorted entries.
pub fn parse(buf: &[u8]) -> Result<(&[u8], Vec<ResourceEntry>)> {
    ResourceFork::parse(buf).map(ResourceFork::into_parts)
}

/// Borrow the payload of the first entry matching `resource_type` and `id`.
///
/// Ranges were validated during parsing, so a hit never reads outside
/// `data`. A miss reports [`Error::NotFound`].
pub fn extract<'a>(
    data: &'a [u8],
    entries: &[ResourceEntry],
    resource_type: ResourceType,
    id: ResourceId,
) -> Result<&'a [u8]> {
    let entry = entries
        .iter()
        .find(|entry| entry.matches(resource_type, id))
        .ok_or(Error::NotFound { resource_type, id })?;

    data.get(entry.data_range())
        .ok_or_else(|| Error::OutOfRange {
            offset: entry.data_offset,
            width: entry.data_length,
            length: data.len(),
        })
}

#[cfg(test)]
pub(crate) mod testing {
    //! Encoder for synthetic forks, laid out in the usual order:
    //! header, data area, then the map with type list, reference lists and
    //! name list in that order.

    use crate::raw::{ForkHeader, MapHeader, ReferenceListEntry, TypeListEntry};

    pub struct Resource {
        pub resource_type: [u8; 4],
        pub id: i16,
        pub name: Option<Vec<u8>>,
        pub attributes: u8,
        pub payload: Vec<u8>,
    }

    #[derive(Default)]
    pub struct ForkBuilder {
        resources: Vec<Resource>,
    }

    /// Offsets of the interesting structures in a built fork.
    #[derive(Debug, Clone, Copy)]
    pub struct Built {
        pub data_offset: usize,
        pub map_offset: usize,
        pub type_list_offset: usize,
        pub reference_lists_offset: usize,
    }

    impl ForkBuilder {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn resource(self, resource_type: &[u8; 4], id: i16, attributes: u8, payload: &[u8]) -> Self {
            self.push(resource_type, id, None, attributes, payload)
        }

        /// Add a resource whose name is stored as raw Mac OS Roman bytes.
        pub fn named_resource(
            self,
            resource_type: &[u8; 4],
            id: i16,
            name: &[u8],
            attributes: u8,
            payload: &[u8],
        ) -> Self {
            self.push(resource_type, id, Some(name.to_vec()), attributes, payload)
        }

        fn push(
            mut self,
            resource_type: &[u8; 4],
            id: i16,
            name: Option<Vec<u8>>,
            attributes: u8,
            payload: &[u8],
        ) -> Self {
            self.resources.push(Resource {
                resource_type: *resource_type,
                id,
                name,
                attributes,
                payload: payload.to_vec(),
            });
            self
        }

        pub fn build(&self) -> Vec<u8> {
            self.build_with_layout().0
        }

        /// Types are written in order of first appearance and references in
        /// insertion order, so callers control the on-disk order.
        pub fn build_with_layout(&self) -> (Vec<u8>, Built) {
            let mut types: Vec<[u8; 4]> = Vec::new();
            for resource in &self.resources {
                if !types.contains(&resource.resource_type) {
                    types.push(resource.resource_type);
                }
            }

            let mut data = Vec::new();
            let mut data_offsets = Vec::new();
            for resource in &self.resources {
                data_offsets.push(data.len() as u32);
                data.extend_from_slice(&(resource.payload.len() as u32).to_be_bytes());
                data.extend_from_slice(&resource.payload);
            }

            let mut names = Vec::new();
            let mut name_offsets = Vec::new();
            for resource in &self.resources {
                match &resource.name {
                    Some(name) => {
                        name_offsets.push(names.len() as i16);
                        names.push(name.len() as u8);
                        names.extend_from_slice(name);
                    }
                    None => name_offsets.push(-1),
                }
            }

            let type_list_offset = MapHeader::SIZE;
            let type_list_size = 2 + types.len() * TypeListEntry::SIZE;
            let mut type_list = Vec::new();
            type_list.extend_from_slice(&(types.len() as u16).wrapping_sub(1).to_be_bytes());
            let mut references = Vec::new();
            for code in &types {
                let members: Vec<usize> = (0..self.resources.len())
                    .filter(|&i| self.resources[i].resource_type == *code)
                    .collect();
                let reference_list_offset = type_list_size + references.len();

                type_list.extend_from_slice(code);
                type_list.extend_from_slice(&(members.len() as u16 - 1).to_be_bytes());
                type_list.extend_from_slice(&(reference_list_offset as u16).to_be_bytes());

                for i in members {
                    let resource = &self.resources[i];
                    references.extend_from_slice(&resource.id.to_be_bytes());
                    references.extend_from_slice(&name_offsets[i].to_be_bytes());
                    references.push(resource.attributes);
                    references.extend_from_slice(&data_offsets[i].to_be_bytes()[1..]);
                    references.extend_from_slice(&0u32.to_be_bytes());
                }
            }
            debug_assert_eq!(references.len() % ReferenceListEntry::SIZE, 0);

            let name_list_offset = type_list_offset + type_list.len() + references.len();
            let map_length = name_list_offset + names.len();

            let data_offset = ForkHeader::SIZE;
            let map_offset = data_offset + data.len();
            let mut header = Vec::new();
            for field in [data_offset, map_offset, data.len(), map_length] {
                header.extend_from_slice(&(field as u32).to_be_bytes());
            }

            let mut map = header.clone();
            map.extend_from_slice(&[0u8; 8]);
            map.extend_from_slice(&(type_list_offset as u16).to_be_bytes());
            map.extend_from_slice(&(name_list_offset as u16).to_be_bytes());
            map.extend_from_slice(&type_list);
            map.extend_from_slice(&references);
            map.extend_from_slice(&names);
            debug_assert_eq!(map.len(), map_length);

            let mut fork = header;
            fork.extend_from_slice(&data);
            fork.extend_from_slice(&map);

            let built = Built {
                data_offset,
                map_offset,
                type_list_offset: map_offset + type_list_offset,
                reference_lists_offset: map_offset + type_list_offset + type_list_size,
            };
            (fork, built)
        }
    }

    pub fn put_u16(buf: &mut [u8], offset: usize, value: u16) {
        buf[offset..offset + 2].copy_from_slice(&value.to_be_bytes());
    }

    pub fn put_u32(buf: &mut [u8], offset: usize, value: u32) {
        buf[offset..offset + 4].copy_from_slice(&value.to_be_bytes());
    }
}
