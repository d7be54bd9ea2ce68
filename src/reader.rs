// SPDX-License-Identifier: MIT

//! Bounds-checked big-endian reads. Every on-disk integer in a resource fork
//! is big-endian, regardless of host.

use crate::error::{Error, Result};

/// Borrow `width` bytes at `offset`, failing rather than panicking when the
/// range leaves `buf`.
pub(crate) fn bytes_at(buf: &[u8], offset: usize, width: usize) -> Result<&[u8]> {
    offset
        .checked_add(width)
        .and_then(|end| buf.get(offset..end))
        .ok_or(Error::OutOfRange {
            offset,
            width,
            length: buf.len(),
        })
}

fn array_at<const N: usize>(buf: &[u8], offset: usize) -> Result<[u8; N]> {
    let mut out = [0u8; N];
    out.copy_from_slice(bytes_at(buf, offset, N)?);
    Ok(out)
}

pub fn read_u8(buf: &[u8], offset: usize) -> Result<u8> {
    Ok(array_at::<1>(buf, offset)?[0])
}

pub fn read_u16(buf: &[u8], offset: usize) -> Result<u16> {
    array_at(buf, offset).map(u16::from_be_bytes)
}

pub fn read_i16(buf: &[u8], offset: usize) -> Result<i16> {
    array_at(buf, offset).map(i16::from_be_bytes)
}

pub fn read_u32(buf: &[u8], offset: usize) -> Result<u32> {
    array_at(buf, offset).map(u32::from_be_bytes)
}

/// True when `width` bytes starting at `offset` fit inside `buf`.
pub(crate) fn fits(buf: &[u8], offset: usize, width: usize) -> bool {
    offset
        .checked_add(width)
        .is_some_and(|end| end <= buf.len())
}
