// SPDX-License-Identifier: MIT

use rsrc_types::{ResourceId, ResourceType};
use thiserror::Error;

/// Everything that can go wrong while decoding a resource fork or looking up
/// one of its resources.
///
/// Every variant except [`Error::NotFound`] aborts the parse: no partial
/// entry list is ever produced.
#[derive(Error, Debug)]
pub enum Error {
    /// A primitive read ran past the end of its buffer.
    #[error("reading {width} bytes at offset {offset} exceeds buffer of {length} bytes")]
    OutOfRange {
        offset: usize,
        width: usize,
        length: usize,
    },

    /// Input is shorter than the 16-byte fork header.
    #[error("file too small to be a resource fork ({length} bytes)")]
    TooSmall { length: usize },

    /// The fork header places the data or map area outside the input.
    #[error(
        "header regions exceed file size {length}: data {data_offset}+{data_length}, map {map_offset}+{map_length}"
    )]
    HeaderBoundsExceeded {
        data_offset: u32,
        data_length: u32,
        map_offset: u32,
        map_length: u32,
        length: usize,
    },

    /// The map area cannot hold the fixed 28-byte map header.
    #[error("resource map too small ({length} bytes)")]
    MapTooSmall { length: usize },

    #[error("type list offset {offset} out of range for map of {map_length} bytes")]
    TypeListOffsetOutOfRange { offset: u16, map_length: usize },

    #[error("name list offset {offset} out of range for map of {map_length} bytes")]
    NameListOffsetOutOfRange { offset: u16, map_length: usize },

    #[error("truncated type list header at map offset {offset}")]
    TruncatedTypeListHeader { offset: usize },

    #[error("truncated type list entry {index} at map offset {offset}")]
    TruncatedTypeListEntry { index: usize, offset: usize },

    #[error("truncated reference list for type {resource_type}")]
    TruncatedReferenceList { resource_type: ResourceType },

    #[error("bad data offset for {resource_type} {id}: {offset}")]
    BadDataOffset {
        resource_type: ResourceType,
        id: ResourceId,
        offset: u32,
    },

    #[error("bad data length for {resource_type} {id}: {length}")]
    BadDataLength {
        resource_type: ResourceType,
        id: ResourceId,
        length: u32,
    },

    /// No entry matched an extraction request. Not a parse failure.
    #[error("not found: {resource_type} ({id})")]
    NotFound {
        resource_type: ResourceType,
        id: ResourceId,
    },

    /// A fixed-size record failed to decode despite passing its bounds check.
    #[error("{0}")]
    Decode(#[from] deku::DekuError),
}

pub type Result<T> = std::result::Result<T, Error>;
