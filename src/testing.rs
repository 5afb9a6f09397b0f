//! An in-memory [`BlockDevice`] stand-in for hardware, used by this crate's
//! own tests and available to downstream users under the `testing`
//! feature.

extern crate std;

use std::vec;
use std::vec::Vec;

use crate::codec::BLOCK_SIZE;
use crate::device::BlockDevice;
use crate::Address;

/// A fixed-size block device backed by a `Vec<u8>`, mirroring the role a
/// `RefCell<File>`-backed volume plays in on-host filesystem tests.
#[derive(Clone)]
pub struct MemoryCard {
    blocks: Vec<u8>,
    block_count: u32,
    error_code: u8,
    write_cursor: Option<(Address, u32, u16)>, // (start, blocks_left, byte offset within current block)
}

impl MemoryCard {
    pub fn new(block_count: u32) -> Self {
        MemoryCard {
            blocks: vec![0u8; block_count as usize * BLOCK_SIZE],
            block_count,
            error_code: 0,
            write_cursor: None,
        }
    }

    fn block_mut(&mut self, addr: Address) -> &mut [u8] {
        let start = addr as usize * BLOCK_SIZE;
        &mut self.blocks[start..start + BLOCK_SIZE]
    }

    fn block(&self, addr: Address) -> &[u8] {
        let start = addr as usize * BLOCK_SIZE;
        &self.blocks[start..start + BLOCK_SIZE]
    }

    fn in_range(&self, addr: Address) -> bool {
        addr < self.block_count
    }
}

impl BlockDevice for MemoryCard {
    fn init(&mut self) -> bool {
        true
    }

    fn card_size(&self) -> u32 {
        self.block_count
    }

    fn error_code(&self) -> u8 {
        self.error_code
    }

    fn read_data(&mut self, block_addr: Address, byte_offset: u16, length: u16, dest: &mut [u8]) -> bool {
        if !self.in_range(block_addr) || byte_offset as usize + length as usize > BLOCK_SIZE {
            self.error_code = 1;
            return false;
        }
        let src = self.block(block_addr);
        let off = byte_offset as usize;
        dest[..length as usize].copy_from_slice(&src[off..off + length as usize]);
        true
    }

    fn write_block(&mut self, block_addr: Address, src: &[u8], length: u16) -> bool {
        if !self.in_range(block_addr) || length as usize > BLOCK_SIZE {
            self.error_code = 1;
            return false;
        }
        let len = length as usize;
        self.block_mut(block_addr)[..len].copy_from_slice(&src[..len]);
        true
    }

    fn write_start(&mut self, block_addr: Address, count: u32) -> bool {
        if !self.in_range(block_addr) {
            self.error_code = 1;
            return false;
        }
        self.write_cursor = Some((block_addr, count, 0));
        true
    }

    fn write_data(&mut self, src: &[u8], length: u16, byte_offset: u16) -> bool {
        let Some((addr, blocks_left, cursor)) = self.write_cursor else {
            self.error_code = 2;
            return false;
        };
        if blocks_left == 0 {
            self.error_code = 2;
            return false;
        }
        let off = byte_offset as usize + cursor as usize;
        if off + length as usize > BLOCK_SIZE {
            self.error_code = 2;
            return false;
        }
        self.block_mut(addr)[off..off + length as usize].copy_from_slice(&src[..length as usize]);
        self.write_cursor = Some((addr, blocks_left, off as u16 + length));
        true
    }

    fn write_data_padding(&mut self, length: u16) -> bool {
        let Some((addr, blocks_left, cursor)) = self.write_cursor else {
            self.error_code = 2;
            return false;
        };
        if blocks_left == 0 {
            self.error_code = 2;
            return false;
        }
        let off = cursor as usize;
        if off + length as usize > BLOCK_SIZE {
            self.error_code = 2;
            return false;
        }
        for b in &mut self.block_mut(addr)[off..off + length as usize] {
            *b = 0;
        }
        let new_cursor = off as u16 + length;
        if new_cursor as usize == BLOCK_SIZE && blocks_left > 1 {
            self.write_cursor = Some((addr + 1, blocks_left - 1, 0));
        } else {
            self.write_cursor = Some((addr, blocks_left, new_cursor));
        }
        true
    }

    fn write_stop(&mut self) -> bool {
        self.write_cursor = None;
        true
    }

    fn read_end(&mut self) {}
}
