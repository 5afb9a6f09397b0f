//! Probing the hash table: locating a file's head, its segments, and free
//! slots for new ones.

use crate::codec::{self, FileInfo, SegmentInfo};
use crate::device::BlockDevice;
use crate::error::Error;
use crate::fnv::Handle;
use crate::fs::Volume;
use crate::probe::{advance, fold, step_for};
use crate::Address;

/// Outcome of probing for a file's segment-0 block.
pub(crate) enum FileProbe {
    Found(FileInfo, Address),
    FreeSlot(Address),
}

impl<D: BlockDevice> Volume<D> {
    /// Reads a segment-0 block's meta region at `addr`.
    pub fn stat_segment0(&mut self, addr: Address) -> Result<FileInfo, Error> {
        let mut block = [0u8; codec::SEGMENT0_META_LEN];
        self.read_block(addr, &mut block)?;
        codec::decode_segment0(&block)
    }

    /// Reads a data-segment block's header at `addr`.
    pub fn stat_segment(&mut self, addr: Address) -> Result<SegmentInfo, Error> {
        let mut block = [0u8; codec::SEGMENT_HEADER_LEN];
        self.read_block(addr, &mut block)?;
        codec::decode_segment(&block)
    }

    /// Looks up a file by handle. `Err(FileNotFound)` is returned the
    /// moment the probe lands on a free block — open addressing's usual
    /// stop condition: if the file existed, insertion would have claimed
    /// the first empty slot on its own chain before this one.
    pub(crate) fn probe_file(&mut self, handle: Handle) -> Result<FileProbe, Error> {
        let a0 = fold(handle.0, self.bucket_count);
        let step = step_for(a0);
        let mut addr = a0;
        loop {
            match self.stat_segment0(addr) {
                Ok(info) => {
                    if info.handle == handle {
                        return Ok(FileProbe::Found(info, addr));
                    }
                    // a different file's head landed here on collision; keep probing
                }
                Err(Error::FileNotFound) => return Ok(FileProbe::FreeSlot(addr)),
                Err(Error::WrongSegmentType) => {} // a data segment occupies this slot; skip
                Err(e) => return Err(e),
            }
            addr = advance(addr, step, self.bucket_count);
            if addr == a0 {
                return Err(Error::NoSpace);
            }
        }
    }

    /// Looks up a file by handle.
    pub fn stat_file(&mut self, handle: Handle) -> Result<(FileInfo, Address), Error> {
        match self.probe_file(handle)? {
            FileProbe::Found(info, addr) => Ok((info, addr)),
            FileProbe::FreeSlot(_) => Err(Error::FileNotFound),
        }
    }

    /// Finds the first free block starting the probe at `start`.
    pub(crate) fn find_free_segment(&mut self, start: Address) -> Result<Address, Error> {
        let a0 = start;
        let step = step_for(a0);
        let mut addr = a0;
        loop {
            let mut tag = [0u8; 1];
            self.read_block(addr, &mut tag)?;
            if tag[0] == codec::TAG_FREE {
                return Ok(addr);
            }
            addr = advance(addr, step, self.bucket_count);
            if addr == a0 {
                return Err(Error::NoSpace);
            }
        }
    }

    /// Finds the data segment belonging to `seg0_addr` starting the probe
    /// at `start`. Landing on a free block ends the search immediately with
    /// `Err(FileNotFound)` — a hole in the chain, not an empty ring.
    /// Segment-0 blocks met along the way belong to other files and are
    /// skipped.
    pub(crate) fn find_segment(&mut self, seg0_addr: Address, start: Address) -> Result<Address, Error> {
        let a0 = start;
        let step = step_for(a0);
        let mut addr = a0;
        loop {
            match self.stat_segment(addr) {
                Ok(info) => {
                    if info.segment0_address == seg0_addr {
                        return Ok(addr);
                    }
                }
                Err(Error::FileNotFound) => return Err(Error::FileNotFound),
                Err(Error::WrongSegmentType) => {}
                Err(e) => return Err(e),
            }
            addr = advance(addr, step, self.bucket_count);
            if addr == a0 {
                return Err(Error::NoSpace);
            }
        }
    }

    /// Resolves segment `seg_number` of `handle`, given its already-known
    /// segment-0 address, to a block address. Segment 0 is the file's head
    /// itself — callers that treat segment 0 as invalid (replace_segment,
    /// truncate_segment) reject it before reaching here.
    pub(crate) fn segment_address(&mut self, handle: Handle, seg0_addr: Address, seg_number: u16) -> Result<Address, Error> {
        if seg_number == 0 {
            return Ok(seg0_addr);
        }
        let target_handle = crate::fnv::rehash_n(handle, seg_number);
        let target = fold(target_handle.0, self.bucket_count);
        self.find_segment(seg0_addr, target)
    }

    /// Resolves segment `seg_number` of `handle` to a block address.
    pub fn find_segment_by_index(&mut self, handle: Handle, seg_number: u16) -> Result<Address, Error> {
        let (_, seg0_addr) = self.stat_file(handle)?;
        self.segment_address(handle, seg0_addr, seg_number)
    }
}
