// SPDX-License-Identifier: MIT

//! Top-level regions of a fork: the fork header splits the input into the
//! data and map areas, and the map header locates the type and name lists.

use log::debug;

use crate::error::{Error, Result};
use crate::raw::{self, ForkHeader, MapHeader};
use crate::reader::bytes_at;

/// The two areas named by the fork header, borrowed from the input.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ForkRegions<'a> {
    pub data: &'a [u8],
    pub map: &'a [u8],
}

fn region(buf: &[u8], offset: u32, length: u32) -> Option<&[u8]> {
    let offset = usize::try_from(offset).ok()?;
    let length = usize::try_from(length).ok()?;
    bytes_at(buf, offset, length).ok()
}

pub(crate) fn parse_fork_header(buf: &[u8]) -> Result<ForkRegions<'_>> {
    if buf.len() < ForkHeader::SIZE {
        return Err(Error::TooSmall { length: buf.len() });
    }

    let header: ForkHeader = raw::decode(&buf[..ForkHeader::SIZE])?;
    debug!(
        "fork header: data {:#X}+{:#X}, map {:#X}+{:#X}",
        header.data_offset, header.data_length, header.map_offset, header.map_length
    );

    let data = region(buf, header.data_offset, header.data_length);
    let map = region(buf, header.map_offset, header.map_length);
    match (data, map) {
        (Some(data), Some(map)) => Ok(ForkRegions { data, map }),
        _ => Err(Error::HeaderBoundsExceeded {
            data_offset: header.data_offset,
            data_length: header.data_length,
            map_offset: header.map_offset,
            map_length: header.map_length,
            length: buf.len(),
        }),
    }
}

/// Where the lists live inside the map area. Both offsets are relative to
/// the start of the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct MapLayout {
    pub type_list_offset: usize,
    pub name_list_offset: usize,
    /// False when the name list starts exactly at the end of the map.
    pub has_names: bool,
}

pub(crate) fn parse_map_header(map: &[u8]) -> Result<MapLayout> {
    if map.len() < MapHeader::SIZE {
        return Err(Error::MapTooSmall { length: map.len() });
    }

    let header: MapHeader = raw::decode(&map[..MapHeader::SIZE])?;

    let type_list_offset = usize::from(header.type_list_offset);
    if type_list_offset >= map.len() {
        return Err(Error::TypeListOffsetOutOfRange {
            offset: header.type_list_offset,
            map_length: map.len(),
        });
    }

    // A name list ending flush with the map is simply empty.
    let name_list_offset = usize::from(header.name_list_offset);
    if name_list_offset > map.len() {
        return Err(Error::NameListOffsetOutOfRange {
            offset: header.name_list_offset,
            map_length: map.len(),
        });
    }

    let layout = MapLayout {
        type_list_offset,
        name_list_offset,
        has_names: name_list_offset < map.len(),
    };
    debug!("map layout: {layout:?}");

    Ok(layout)
}
