#![cfg_attr(not(test), no_std)]

//! An append-oriented flat-file store over a raw block device.
//!
//! Files have no directory, no permissions, and no in-memory index. Each
//! one is identified by a 32-bit handle — the FNV-1a hash of its name —
//! and its segments are scattered across the device by open-addressing
//! probing: the handle folds to a starting block, and a deterministic
//! rehash chain gives every following segment's starting point. A small
//! hidden journal file records every create and delete.
//!
//! The device itself is a caller-supplied [`BlockDevice`]; this crate
//! never touches hardware directly.

pub mod codec;
pub mod device;
pub mod fnv;
mod fs;
mod journal;
mod lookup;
mod ops;
pub mod probe;

pub mod error;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use codec::{FileInfo, SegmentInfo};
pub use device::BlockDevice;
pub use error::Error;
pub use fnv::Handle;
pub use fs::Volume;
pub use journal::LOG_NAME;

/// A block index on the device: `0` is the superblock, `1..bucket_count`
/// is the segment pool.
pub type Address = u32;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MemoryCard;

    #[test]
    fn mount_formats_a_blank_card_and_creates_the_journal() {
        let card = MemoryCard::new(64);
        let fs = Volume::mount(card).unwrap();
        assert_eq!(fs.bucket_count(), 64);
    }

    #[test]
    fn create_read_and_delete_roundtrip() {
        let card = MemoryCard::new(64);
        let mut fs = Volume::mount(card).unwrap();

        let handle = Volume::<MemoryCard>::handle("notes.txt");
        fs.create_file(handle, "notes.txt", Some(b"hello world")).unwrap();

        let mut buf = [0u8; 11];
        let n = fs.read_file(handle, 0, &mut buf).unwrap();
        assert_eq!(n, 11);
        assert_eq!(&buf, b"hello world");

        fs.delete_file(handle).unwrap();
        assert_eq!(fs.stat_file(handle).unwrap_err(), Error::FileNotFound);
    }
}
