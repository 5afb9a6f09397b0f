//! The storage collaborator a volume is built on.
//!
//! Mirrors the split the Arduino `Sd2Card` driver exposes: a handful of
//! whole-block primitives (`read_data`, `write_block`) plus a streamed
//! write mode (`write_start`/`write_data`/`write_data_padding`/`write_stop`)
//! for laying down a full block without holding it in a buffer first.

use crate::Address;

/// A 512-byte-block storage device.
///
/// Implementors are not required to be thread-safe; [`crate::Volume`] never
/// calls into a `BlockDevice` from more than one place at a time, and a
/// streamed write is always fully bracketed within a single `Volume` method
/// before any other call reaches the device.
pub trait BlockDevice {
    /// (Re-)initializes the device. Returns `false` on failure.
    fn init(&mut self) -> bool;

    /// Device size in 512-byte blocks.
    fn card_size(&self) -> u32;

    /// Last error code reported by the device, for diagnostics.
    fn error_code(&self) -> u8;

    /// Reads `length` bytes starting at `byte_offset` within block
    /// `block_addr` into `dest`. Returns `false` on failure.
    fn read_data(&mut self, block_addr: Address, byte_offset: u16, length: u16, dest: &mut [u8]) -> bool;

    /// Writes `length` bytes from `src` starting at offset 0 of block
    /// `block_addr`. Bytes past `length` within the block are left as they
    /// were on the medium.
    fn write_block(&mut self, block_addr: Address, src: &[u8], length: u16) -> bool;

    /// Opens a streamed write spanning `count` consecutive blocks starting
    /// at `block_addr`.
    fn write_start(&mut self, block_addr: Address, count: u32) -> bool;

    /// Appends `length` bytes from `src` to the open streamed write.
    fn write_data(&mut self, src: &[u8], length: u16, byte_offset: u16) -> bool;

    /// Pads the open streamed write with `length` zero bytes.
    fn write_data_padding(&mut self, length: u16) -> bool;

    /// Closes the open streamed write.
    fn write_stop(&mut self) -> bool;

    /// Releases any state left over from an in-progress streamed read.
    fn read_end(&mut self);
}
