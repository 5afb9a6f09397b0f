//! Pure ring arithmetic for the open-addressing probe.
//!
//! The ring covers addresses `1..=bucket_count-1`; block 0 is the
//! superblock and is never a probe target.

use crate::Address;

/// Folds a handle down to its first probe address.
pub fn fold(handle: u32, bucket_count: u32) -> Address {
    1 + (handle % (bucket_count - 1))
}

/// Probe direction for a chain starting at `a0`: forward for odd starts,
/// backward for even ones.
pub fn step_for(a0: Address) -> i32 {
    if a0 % 2 == 1 {
        1
    } else {
        -1
    }
}

/// Advances `addr` by one probe step, wrapping within the ring.
pub fn advance(addr: Address, step: i32, bucket_count: u32) -> Address {
    let modulus = (bucket_count - 1) as i64;
    let idx = (addr - 1) as i64;
    let next = (idx + step as i64).rem_euclid(modulus);
    1 + next as u32
}
