//! File handles and the FNV-1a variant they are derived from.

use core::fmt;

/// A file's identity: the FNV-1a hash of its name.
///
/// Also doubles as the seed of its own probe chain — rehashing a handle's
/// own little-endian bytes yields the handle of its next segment.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Handle(pub u32);

impl fmt::Debug for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Handle({:#010x})", self.0)
    }
}

impl From<u32> for Handle {
    fn from(raw: u32) -> Self {
        Handle(raw)
    }
}

const FNV_DEFAULT_SEED: u32 = 0x811c_9dc5;

/// FNV-1a over `bytes`, seeded with `seed` (0 maps to the standard FNV
/// offset basis). XOR happens before the multiply, in byte order.
pub fn fnv1a32(bytes: &[u8], seed: u32) -> u32 {
    let mut h = if seed == 0 { FNV_DEFAULT_SEED } else { seed };
    for &b in bytes {
        h ^= b as u32;
        h = h
            .wrapping_add(h << 1)
            .wrapping_add(h << 4)
            .wrapping_add(h << 7)
            .wrapping_add(h << 8)
            .wrapping_add(h << 24);
    }
    h
}

/// Derives a handle from a filename.
pub fn handle_for(name: &[u8]) -> Handle {
    Handle(fnv1a32(name, 0))
}

/// Advances a handle to the handle of its next segment.
pub fn rehash(h: Handle) -> Handle {
    Handle(fnv1a32(&h.0.to_le_bytes(), h.0))
}

/// Advances a handle `n` segments forward.
pub fn rehash_n(mut h: Handle, n: u16) -> Handle {
    for _ in 0..n {
        h = rehash(h);
    }
    h
}
