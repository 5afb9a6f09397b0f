//! File operations: create, append, read, replace, truncate, delete.

use crate::codec::{self, SEGMENT_DATA_LEN};
use crate::device::BlockDevice;
use crate::error::Error;
use crate::fnv::{rehash, rehash_n, Handle};
use crate::fs::Volume;
use crate::journal::{is_reserved_name, JournalKind};
use crate::lookup::FileProbe;
use crate::probe::fold;

impl<D: BlockDevice> Volume<D> {
    /// Creates a file, optionally seeding it with `data`.
    pub fn create_file(&mut self, handle: Handle, name: &str, data: Option<&[u8]>) -> Result<(), Error> {
        let name_bytes = name.as_bytes();
        if name_bytes.is_empty() || name_bytes.len() > codec::MAX_FILENAME_LEN {
            return Err(Error::BadFilename);
        }
        let free_addr = match self.probe_file(handle)? {
            FileProbe::Found(_, _) => return Err(Error::Exists),
            FileProbe::FreeSlot(addr) => addr,
        };

        let meta = codec::encode_segment0(handle, 1, name_bytes)?;
        self.write_full_block(free_addr, &meta)?;

        if !is_reserved_name(name_bytes) {
            self.append_journal(JournalKind::Create, free_addr)?;
        }

        match data {
            Some(data) if !data.is_empty() => self.append_file(handle, data),
            _ => Ok(()),
        }
    }

    /// Appends `data` to a file, splitting it across as many 505-byte
    /// segments as needed.
    pub fn append_file(&mut self, handle: Handle, mut data: &[u8]) -> Result<(), Error> {
        if data.is_empty() {
            return Err(Error::InvalidArgument);
        }
        let (info, seg0_addr) = self.stat_file(handle)?;
        let mut segment_count = info.segment_count;
        let mut next_handle = rehash_n(handle, segment_count);

        while !data.is_empty() {
            let write_len = data.len().min(SEGMENT_DATA_LEN);
            let target = fold(next_handle.0, self.bucket_count);
            let addr = self.find_free_segment(target)?;

            let mut body = [0u8; codec::SEGMENT_HEADER_LEN + SEGMENT_DATA_LEN];
            let len = codec::encode_segment(seg0_addr, &data[..write_len], &mut body)?;
            self.write_full_block(addr, &body[..len])?;

            data = &data[write_len..];
            next_handle = rehash(next_handle);
            segment_count += 1;
        }

        self.update_segment_count(seg0_addr, segment_count)
    }

    /// Reads up to `dest.len()` bytes starting at `offset`, returning the
    /// number of bytes actually filled.
    pub fn read_file(&mut self, handle: Handle, offset: u32, dest: &mut [u8]) -> Result<usize, Error> {
        let (info, seg0_addr) = self.stat_file(handle)?;
        let mut remaining_segments = info.segment_count.saturating_sub(1);
        let mut h = handle;
        let mut offset = offset as usize;
        let mut filled = 0usize;
        let mut want = dest.len();

        while remaining_segments > 0 && want > 0 {
            h = rehash(h);
            let target = fold(h.0, self.bucket_count);
            let addr = match self.find_segment(seg0_addr, target) {
                Ok(addr) => addr,
                Err(Error::FileNotFound) => return Err(Error::MissingSegment),
                Err(e) => return Err(e),
            };

            let seg_info = self.stat_segment(addr)?;
            let seg_len = seg_info.length as usize;
            if offset > seg_len {
                offset -= seg_len;
            } else {
                let avail = seg_len - offset;
                let take = avail.min(want);
                let block_offset = codec::SEGMENT_HEADER_LEN + offset;
                self.read_segment_payload(addr, block_offset, &mut dest[filled..filled + take])?;
                filled += take;
                want -= take;
                offset = 0;
            }
            remaining_segments -= 1;
        }
        Ok(filled)
    }

    fn read_segment_payload(&mut self, addr: u32, block_offset: usize, dest: &mut [u8]) -> Result<(), Error> {
        let mut full = [0u8; codec::SEGMENT_HEADER_LEN + SEGMENT_DATA_LEN];
        self.read_block(addr, &mut full)?;
        dest.copy_from_slice(&full[block_offset..block_offset + dest.len()]);
        Ok(())
    }

    /// Overwrites segment `seg_number` of `handle` with `data`
    /// (`data.len() <= 505`). Segment 0 is the file head and is not a
    /// valid data segment; this always fails for `seg_number == 0`.
    pub fn replace_segment(&mut self, handle: Handle, seg_number: u16, data: &[u8]) -> Result<(), Error> {
        if seg_number == 0 {
            return Err(Error::InvalidArgument);
        }
        if data.len() > SEGMENT_DATA_LEN {
            return Err(Error::InvalidArgument);
        }
        let (_, seg0_addr) = self.stat_file(handle)?;
        let addr = self.segment_address(handle, seg0_addr, seg_number)?;

        let mut body = [0u8; codec::SEGMENT_HEADER_LEN + SEGMENT_DATA_LEN];
        let len = codec::encode_segment(seg0_addr, data, &mut body)?;
        self.write_full_block(addr, &body[..len])
    }

    /// Empties segment `seg_number` without removing it from the hash
    /// chain; the space is only reclaimed by a future defragmentation pass.
    pub fn truncate_segment(&mut self, handle: Handle, seg_number: u16) -> Result<(), Error> {
        self.replace_segment(handle, seg_number, &[])
    }

    /// Drops the last `count` segments of a file.
    pub fn truncate_file(&mut self, handle: Handle, count: u16) -> Result<(), Error> {
        let (info, seg0_addr) = self.stat_file(handle)?;
        if count > info.segment_count {
            return Err(Error::InvalidArgument);
        }
        let mut remaining = info.segment_count;
        for _ in 0..count {
            remaining -= 1;
            let addr = self.segment_address(handle, seg0_addr, remaining)?;
            self.free_block(addr)?;
        }
        self.update_segment_count(seg0_addr, remaining)
    }

    /// Deletes a file and every segment in its chain. A missing segment
    /// (a hole) is tolerated rather than treated as an error, since deletes
    /// must be able to clean up after a prior partial write.
    pub fn delete_file(&mut self, handle: Handle) -> Result<(), Error> {
        let (info, seg0_addr) = self.stat_file(handle)?;

        if !is_reserved_name(info.name()) {
            self.append_journal(JournalKind::Delete, seg0_addr)?;
        }

        self.free_block(seg0_addr)?;

        let mut h = handle;
        for _ in 1..info.segment_count {
            h = rehash(h);
            let target = fold(h.0, self.bucket_count);
            match self.find_segment(seg0_addr, target) {
                Ok(addr) => self.free_block(addr)?,
                Err(Error::FileNotFound) => {
                    log::debug!("hashfs: delete_file tolerating missing segment for handle {:?}", handle);
                }
                Err(e) => return Err(e),
            }
        }
        Ok(())
    }

    pub(crate) fn update_segment_count(&mut self, seg0_addr: u32, segment_count: u16) -> Result<(), Error> {
        let mut meta = [0u8; codec::SEGMENT0_META_LEN];
        self.read_block(seg0_addr, &mut meta)?;
        codec::patch_segment_count(&mut meta, segment_count);
        self.write_block_raw(seg0_addr, &meta, meta.len() as u16)
    }
}
