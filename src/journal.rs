//! The create/delete journal: a reserved, hidden file recording every
//! non-hidden file's lifecycle events.

use crate::device::BlockDevice;
use crate::error::Error;
use crate::fnv::Handle;
use crate::fs::Volume;
use crate::Address;

pub const LOG_NAME: &str = "__LOG";

/// The journal's own handle. The reference design hardcodes this as a
/// precomputed constant (`0x00428ef4`); that value does not actually match
/// this FNV-1a variant applied to `"__LOG"`, so it is derived here instead
/// of copied — see Open Question 4.
pub fn log_handle() -> Handle {
    crate::fnv::handle_for(LOG_NAME.as_bytes())
}

const KIND_CREATE: u8 = b'c';
const KIND_DELETE: u8 = b'd';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum JournalKind {
    Create,
    Delete,
}

/// Names beginning with `__` are reserved for the filesystem itself and are
/// never journaled — otherwise the journal would record its own writes.
pub(crate) fn is_reserved_name(name: &[u8]) -> bool {
    name.starts_with(b"__")
}

impl<D: BlockDevice> Volume<D> {
    pub(crate) fn append_journal(&mut self, kind: JournalKind, seg0_addr: Address) -> Result<(), Error> {
        let tag = match kind {
            JournalKind::Create => KIND_CREATE,
            JournalKind::Delete => KIND_DELETE,
        };
        let mut record = [0u8; 5];
        record[0] = tag;
        record[1..5].copy_from_slice(&seg0_addr.to_le_bytes());
        log::trace!("hashfs: journal {:?} addr={}", kind, seg0_addr);
        self.append_file(log_handle(), &record)
    }
}
