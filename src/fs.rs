//! The volume: construction, mounting, and the superblock.

use crate::codec;
use crate::device::BlockDevice;
use crate::error::Error;
use crate::fnv::Handle;
use crate::journal::{log_handle, LOG_NAME};
use crate::Address;

/// A mounted volume: a block device plus the geometry read from (or written
/// to) its superblock.
///
/// Plain value type — no internal locking, no global instance. Callers own
/// their `Volume` the way they own the device underneath it.
pub struct Volume<D: BlockDevice> {
    pub(crate) device: D,
    pub(crate) version: u8,
    pub(crate) bucket_count: u32,
}

impl<D: BlockDevice> Volume<D> {
    /// Derives a file's handle from its name.
    pub fn handle(name: &str) -> Handle {
        crate::fnv::handle_for(name.as_bytes())
    }

    /// Brings up the device and either recognizes an existing volume or
    /// formats a blank one, ensuring the journal file exists either way.
    pub fn mount(mut device: D) -> Result<Self, Error> {
        if !device.init() {
            return Err(Error::IoError(device.error_code()));
        }
        // A prior session may have left a streamed write or read open.
        device.write_stop();
        device.read_end();

        let mut header = [0u8; codec::SUPERBLOCK_HEADER_LEN];
        if !device.read_data(0, 0, header.len() as u16, &mut header) {
            return Err(Error::IoError(device.error_code()));
        }

        let mut fs = match codec::decode_superblock(&header) {
            Some((version, bucket_count)) => {
                log::debug!(
                    "hashfs: mounting existing volume (version={version}, bucket_count={bucket_count})"
                );
                let device_size = device.card_size();
                if bucket_count < 2 || bucket_count > device_size {
                    return Err(Error::CardError { bucket_count, device_size });
                }
                Volume { device, version, bucket_count }
            }
            None => {
                let device_size = device.card_size();
                if device_size < 2 {
                    return Err(Error::CardError { bucket_count: 0, device_size });
                }
                log::debug!("hashfs: formatting blank volume (bucket_count={device_size})");
                let version = 1u8;
                let mut fs = Volume { device, version, bucket_count: device_size };
                fs.write_superblock()?;
                // Any stale journal from a previous format is dropped before
                // it gets recreated below.
                let _ = fs.delete_file(log_handle());
                fs
            }
        };

        match fs.stat_file(log_handle()) {
            Ok(_) => {}
            Err(Error::FileNotFound) => fs.create_file(log_handle(), LOG_NAME, None)?,
            Err(e) => return Err(e),
        }

        Ok(fs)
    }

    fn write_superblock(&mut self) -> Result<(), Error> {
        let block = codec::encode_superblock(self.version, self.bucket_count);
        self.write_block_raw(0, &block, block.len() as u16)
    }

    pub(crate) fn write_block_raw(&mut self, addr: Address, src: &[u8], length: u16) -> Result<(), Error> {
        if !self.device.write_block(addr, src, length) {
            return Err(Error::IoError(self.device.error_code()));
        }
        Ok(())
    }

    /// Writes a full block via the streamed path, zero-padding whatever is
    /// left of the 512 bytes `body` does not cover.
    pub(crate) fn write_full_block(&mut self, addr: Address, body: &[u8]) -> Result<(), Error> {
        let dev = &mut self.device;
        if !dev.write_start(addr, 1) {
            return Err(Error::IoError(dev.error_code()));
        }
        if !body.is_empty() && !dev.write_data(body, body.len() as u16, 0) {
            return Err(Error::IoError(dev.error_code()));
        }
        let remaining = codec::BLOCK_SIZE - body.len();
        if remaining > 0 && !dev.write_data_padding(remaining as u16) {
            return Err(Error::IoError(dev.error_code()));
        }
        if !dev.write_stop() {
            return Err(Error::IoError(dev.error_code()));
        }
        Ok(())
    }

    pub(crate) fn read_block(&mut self, addr: Address, dest: &mut [u8]) -> Result<(), Error> {
        let len = dest.len() as u16;
        if !self.device.read_data(addr, 0, len, dest) {
            return Err(Error::IoError(self.device.error_code()));
        }
        Ok(())
    }

    /// Reclaims a block by zeroing its type tag.
    pub(crate) fn free_block(&mut self, addr: Address) -> Result<(), Error> {
        self.write_block_raw(addr, &[codec::TAG_FREE], 1)
    }

    /// Zeros `count` blocks starting at `start`, one streamed write.
    pub fn zero(&mut self, start: Address, count: u32) -> Result<(), Error> {
        let dev = &mut self.device;
        if !dev.write_start(start, count) {
            return Err(Error::IoError(dev.error_code()));
        }
        for _ in 0..count {
            if !dev.write_data(&[0u8], 1, 0) {
                return Err(Error::IoError(dev.error_code()));
            }
            if !dev.write_data_padding((codec::BLOCK_SIZE - 1) as u16) {
                return Err(Error::IoError(dev.error_code()));
            }
        }
        if !dev.write_stop() {
            return Err(Error::IoError(dev.error_code()));
        }
        Ok(())
    }

    /// Zeros the superblock's magic, so the device is no longer recognized
    /// as a volume.
    pub fn zero_magic(&mut self) -> Result<(), Error> {
        self.write_block_raw(0, &[0u8], 1)
    }

    pub fn device(&self) -> &D {
        &self.device
    }

    pub fn device_mut(&mut self) -> &mut D {
        &mut self.device
    }

    pub fn bucket_count(&self) -> u32 {
        self.bucket_count
    }

    pub fn version(&self) -> u8 {
        self.version
    }
}
