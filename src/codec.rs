//! On-disk block layouts and their explicit little-endian encodings.
//!
//! Every block is 512 bytes. Fields are marshalled with `to_le_bytes`/
//! `from_le_bytes` rather than `#[repr(C)]` reinterpretation, so the layout
//! is independent of the host's struct-layout rules.

use crate::error::Error;
use crate::fnv::Handle;

pub const BLOCK_SIZE: usize = 512;

pub const TAG_FREE: u8 = 0x00;
pub const TAG_SEGMENT0: u8 = 0x01;
pub const TAG_SEGMENT: u8 = 0x02;

pub const MAGIC: [u8; 5] = [0xAE, b'h', b'a', b's', b'h'];
pub const SUPERBLOCK_HEADER_LEN: usize = MAGIC.len() + 1 + 4; // magic + version + bucket_count

pub const MAX_FILENAME_LEN: usize = 23;
const NAME_FIELD_LEN: usize = 24; // filename bytes + padding, fixed region
pub const SEGMENT0_META_LEN: usize = 1 + 4 + 2 + NAME_FIELD_LEN; // tag+handle+seg_count+name field = 31

pub const SEGMENT_HEADER_LEN: usize = 1 + 4 + 2; // tag + segment0_addr + length
pub const SEGMENT_DATA_LEN: usize = BLOCK_SIZE - SEGMENT_HEADER_LEN; // 505

/// What a segment-0 block tells us about the file it heads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileInfo {
    pub handle: Handle,
    pub segment_count: u16,
    name: [u8; MAX_FILENAME_LEN],
    name_len: u8,
}

impl FileInfo {
    pub fn name(&self) -> &[u8] {
        &self.name[..self.name_len as usize]
    }
}

/// What a data-segment block tells us about its contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SegmentInfo {
    pub segment0_address: u32,
    pub length: u16,
}

pub fn encode_superblock(version: u8, bucket_count: u32) -> [u8; SUPERBLOCK_HEADER_LEN] {
    let mut block = [0u8; SUPERBLOCK_HEADER_LEN];
    block[0..5].copy_from_slice(&MAGIC);
    block[5] = version;
    block[6..10].copy_from_slice(&bucket_count.to_le_bytes());
    block
}

/// Returns `None` when the block does not start with the volume magic —
/// the device is blank or holds something else entirely.
pub fn decode_superblock(block: &[u8]) -> Option<(u8, u32)> {
    if block.len() < SUPERBLOCK_HEADER_LEN || block[0..5] != MAGIC {
        return None;
    }
    let version = block[5];
    let bucket_count = u32::from_le_bytes([block[6], block[7], block[8], block[9]]);
    Some((version, bucket_count))
}

/// Encodes a segment-0 (file head) block body. Does not include the
/// trailing reserved region of the physical block; callers pad it with
/// zeros up to [`BLOCK_SIZE`] when writing.
pub fn encode_segment0(
    handle: Handle,
    segment_count: u16,
    name: &[u8],
) -> Result<[u8; SEGMENT0_META_LEN], Error> {
    if name.is_empty() || name.len() > MAX_FILENAME_LEN {
        return Err(Error::BadFilename);
    }
    let mut block = [0u8; SEGMENT0_META_LEN];
    block[0] = TAG_SEGMENT0;
    block[1..5].copy_from_slice(&handle.0.to_le_bytes());
    block[5..7].copy_from_slice(&segment_count.to_le_bytes());
    let padding_byte = (NAME_FIELD_LEN - name.len()) as u8;
    block[7..7 + name.len()].copy_from_slice(name);
    for b in &mut block[7 + name.len()..7 + NAME_FIELD_LEN] {
        *b = padding_byte;
    }
    Ok(block)
}

/// Patches only the segment-count field of an already-encoded segment-0
/// meta block, in place.
pub fn patch_segment_count(meta: &mut [u8; SEGMENT0_META_LEN], segment_count: u16) {
    meta[5..7].copy_from_slice(&segment_count.to_le_bytes());
}

/// Decodes the meta region of a segment-0 block (header + name field).
/// `Err(FileNotFound)` means the block is free; `Err(WrongSegmentType)`
/// means it holds a data segment instead.
pub fn decode_segment0(block: &[u8]) -> Result<FileInfo, Error> {
    if block.is_empty() || block[0] == TAG_FREE {
        return Err(Error::FileNotFound);
    }
    if block[0] != TAG_SEGMENT0 {
        return Err(Error::WrongSegmentType);
    }
    let handle = Handle(u32::from_le_bytes([block[1], block[2], block[3], block[4]]));
    let segment_count = u16::from_le_bytes([block[5], block[6]]);
    let padding_byte = block[7 + NAME_FIELD_LEN - 1];
    let name_len = (NAME_FIELD_LEN as u8).saturating_sub(padding_byte).max(1) as usize;
    let name_len = name_len.min(MAX_FILENAME_LEN);
    let mut name = [0u8; MAX_FILENAME_LEN];
    name[..name_len].copy_from_slice(&block[7..7 + name_len]);
    Ok(FileInfo {
        handle,
        segment_count,
        name,
        name_len: name_len as u8,
    })
}

/// Encodes a data-segment block body (header + payload). Payload longer
/// than [`SEGMENT_DATA_LEN`] is rejected; callers pad up to [`BLOCK_SIZE`]
/// when writing.
pub fn encode_segment(
    segment0_address: u32,
    payload: &[u8],
    out: &mut [u8],
) -> Result<usize, Error> {
    if payload.len() > SEGMENT_DATA_LEN {
        return Err(Error::InvalidArgument);
    }
    out[0] = TAG_SEGMENT;
    out[1..5].copy_from_slice(&segment0_address.to_le_bytes());
    out[5..7].copy_from_slice(&(payload.len() as u16).to_le_bytes());
    out[7..7 + payload.len()].copy_from_slice(payload);
    Ok(SEGMENT_HEADER_LEN + payload.len())
}

/// Decodes a data-segment block's header only (no payload copy).
/// `Err(FileNotFound)` means the block is free; `Err(WrongSegmentType)`
/// means it holds a segment-0 block instead.
pub fn decode_segment(block: &[u8]) -> Result<SegmentInfo, Error> {
    if block.is_empty() || block[0] == TAG_FREE {
        return Err(Error::FileNotFound);
    }
    if block[0] != TAG_SEGMENT {
        return Err(Error::WrongSegmentType);
    }
    let segment0_address = u32::from_le_bytes([block[1], block[2], block[3], block[4]]);
    let length = u16::from_le_bytes([block[5], block[6]]);
    Ok(SegmentInfo { segment0_address, length })
}
